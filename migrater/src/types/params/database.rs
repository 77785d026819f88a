use serde::Deserialize;

use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::core::client::database::constant::MIGRATIONS_COLLECTION;

fn default_connection_url() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "migrater".to_string()
}

fn default_collection_name() -> String {
    MIGRATIONS_COLLECTION.to_string()
}

fn default_ensure_indexes() -> bool {
    true
}

/// Validated MongoDB parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    /// Example: "mongodb://localhost:27017"
    #[serde(default = "default_connection_url")]
    pub connection_url: String,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Collection holding one record per applied migration
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Create the unique index on `identifier` when connecting
    #[serde(default = "default_ensure_indexes")]
    pub ensure_indexes: bool,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            connection_url: default_connection_url(),
            database_name: default_database_name(),
            collection_name: default_collection_name(),
            ensure_indexes: default_ensure_indexes(),
        }
    }
}

impl MongoConfig {
    pub fn new(connection_url: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self { connection_url: connection_url.into(), database_name: database_name.into(), ..Default::default() }
    }

    pub fn with_collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = collection_name.into();
        self
    }
}

impl From<MongoDBCliArgs> for MongoConfig {
    fn from(args: MongoDBCliArgs) -> Self {
        Self {
            connection_url: args.mongodb_connection_url,
            database_name: args.mongodb_database_name,
            collection_name: args.mongodb_migrations_collection,
            ensure_indexes: !args.mongodb_skip_indexes,
        }
    }
}
