use clap::Args;

/// Parameters used to config MongoDB.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server.
    #[arg(env = "MIGRATER_MONGODB_CONNECTION_URL", long, default_value = "mongodb://localhost:27017")]
    pub mongodb_connection_url: String,

    /// The name of the database.
    #[arg(env = "MIGRATER_DATABASE_NAME", long, default_value = "migrater")]
    pub mongodb_database_name: String,

    /// The collection holding applied migration records.
    #[arg(env = "MIGRATER_MIGRATIONS_COLLECTION", long, default_value = "migrations")]
    pub mongodb_migrations_collection: String,

    /// Do not create the unique index on the migration identifier.
    #[arg(long)]
    pub mongodb_skip_indexes: bool,
}
