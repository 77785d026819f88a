use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod database;

#[derive(Parser, Debug)]
#[command(
    name = "migrater",
    version,
    about = "A package to handle MongoDB migrations written in Rust",
    after_help = "Examples:\n  \
    migrater migration generate mongo\n  \
    migrater migration generate mongo --app-root ./service\n  \
    migrater status --mongodb-database-name my_app"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage migration files
    Migration {
        #[command(subcommand)]
        migration_command: MigrationCmd,
    },
    /// List the migrations recorded as applied
    Status {
        #[command(flatten)]
        status_command: StatusCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum MigrationCmd {
    /// Add migration file
    #[command(subcommand_required = true, arg_required_else_help = true)]
    Generate {
        #[command(subcommand)]
        generate_command: GenerateCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum GenerateCmd {
    /// Add mongo migration file
    Mongo(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Application root; the file is written to `<app-root>/migrations/<timestamp>.rs`
    #[arg(long, value_name = "PATH", default_value = "app")]
    pub app_root: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct StatusCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,
}
