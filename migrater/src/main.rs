use clap::{CommandFactory, Parser as _};
use dotenvy::dotenv;
use migrater::cli::{Cli, Commands, GenerateCmd, MigrationCmd, StatusCmd};
use migrater::core::client::{MigrationStore, MongoMigrationStore};
use migrater::generator::generate_mongo_migration;
use migrater::types::params::MongoConfig;
use migrater::utils::logging::init_logging;
use migrater::{MigraterError, MigraterResult};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        None => Cli::command().print_help().map_err(|e| MigraterError::CommandError(e.to_string())),
        Some(Commands::Migration { migration_command }) => run_migration_command(migration_command),
        Some(Commands::Status { status_command }) => show_status(status_command).await,
    };

    if let Err(e) = result {
        error!(error = %e, error_chain = ?e, "Migrater command failed");
        std::process::exit(1);
    }
}

fn run_migration_command(migration_cmd: MigrationCmd) -> MigraterResult<()> {
    match migration_cmd {
        MigrationCmd::Generate { generate_command: GenerateCmd::Mongo(args) } => {
            let path = generate_mongo_migration(&args.app_root)?;
            info!(path = %path.display(), "Migration file generated");
            Ok(())
        }
    }
}

/// show_status - Lists the migrations recorded as applied in the configured collection
async fn show_status(status_cmd: StatusCmd) -> MigraterResult<()> {
    let config = MongoConfig::from(status_cmd.mongodb_args);
    let store = MongoMigrationStore::new(&config).await?;
    let records = store.list().await?;

    if records.is_empty() {
        info!(collection = %config.collection_name, "No migration has been applied");
    }
    for record in records {
        info!(
            identifier = %record.identifier,
            applied_at = %record.applied_at,
            "{} ({})",
            record.identifier,
            record.description
        );
    }
    Ok(())
}
