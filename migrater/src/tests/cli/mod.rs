use std::path::PathBuf;

use clap::Parser;
use rstest::*;

use crate::cli::{Cli, Commands, GenerateCmd, MigrationCmd};
use crate::types::params::MongoConfig;

#[test]
fn no_command_is_accepted() {
    let cli = Cli::try_parse_from(["migrater"]).unwrap();
    assert!(cli.command.is_none());
}

#[rstest]
#[case::default_root(&["migrater", "migration", "generate", "mongo"], "app")]
#[case::custom_root(&["migrater", "migration", "generate", "mongo", "--app-root", "./service"], "./service")]
fn generate_mongo_parses_the_app_root(#[case] args: &[&str], #[case] expected: &str) {
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Some(Commands::Migration {
            migration_command: MigrationCmd::Generate { generate_command: GenerateCmd::Mongo(args) },
        }) => assert_eq!(args.app_root, PathBuf::from(expected)),
        other => panic!("Unexpected command: {:?}", other),
    }
}

#[rstest]
#[case::missing_kind(&["migrater", "migration", "generate"])]
#[case::unknown_kind(&["migrater", "migration", "generate", "postgres"])]
#[case::unknown_command(&["migrater", "up"])]
fn invalid_commands_are_rejected(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn status_builds_the_mongo_config_from_flags() {
    let cli = Cli::try_parse_from([
        "migrater",
        "status",
        "--mongodb-connection-url",
        "mongodb://db:27017",
        "--mongodb-database-name",
        "shop",
        "--mongodb-migrations-collection",
        "schema_changes",
        "--mongodb-skip-indexes",
    ])
    .unwrap();

    let Some(Commands::Status { status_command }) = cli.command else {
        panic!("Expected the status command");
    };
    let config = MongoConfig::from(status_command.mongodb_args);

    assert_eq!(
        config,
        MongoConfig {
            connection_url: "mongodb://db:27017".to_string(),
            database_name: "shop".to_string(),
            collection_name: "schema_changes".to_string(),
            ensure_indexes: false,
        }
    );
}

#[test]
fn mongo_config_defaults() {
    let config = MongoConfig::default();

    assert_eq!(config.connection_url, "mongodb://localhost:27017");
    assert_eq!(config.database_name, "migrater");
    assert_eq!(config.collection_name, "migrations");
    assert!(config.ensure_indexes);
}

#[test]
fn mongo_config_deserializes_with_defaults() {
    let config: MongoConfig = serde_json::from_str(r#"{ "database_name": "shop" }"#).unwrap();

    assert_eq!(config, MongoConfig::new("mongodb://localhost:27017", "shop"));
}

#[test]
fn mongo_config_with_collection() {
    let config = MongoConfig::new("mongodb://db:27017", "shop").with_collection("schema_changes");

    assert_eq!(config.collection_name, "schema_changes");
    assert!(config.ensure_indexes);
}
