use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, warn};

use super::constant::{DUPLICATE_KEY_ERROR_CODE, IDENTIFIER_INDEX};
use super::error::DatabaseError;
use super::MigrationStore;
use crate::types::migration::{MigrationIdentifier, MigrationRecord};
use crate::types::params::MongoConfig;

/// MongoDB-backed record store
pub struct MongoMigrationStore {
    database: Database,
    collection_name: String,
}

impl MongoMigrationStore {
    /// Connects to MongoDB and, unless disabled in `config`, provisions the unique index.
    pub async fn new(config: &MongoConfig) -> Result<Self, DatabaseError> {
        let client = Client::with_uri_str(&config.connection_url).await?;
        let database = client.database(&config.database_name);
        let store = Self::from_database(database, &config.collection_name);
        if config.ensure_indexes {
            store.ensure_indexes().await?;
        }
        Ok(store)
    }

    /// Store over `collection_name` in an already connected database.
    pub fn from_database(database: Database, collection_name: &str) -> Self {
        Self { database, collection_name: collection_name.to_string() }
    }

    /// Handle passed to migration actions
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn collection(&self) -> Collection<MigrationRecord> {
        self.database.collection(&self.collection_name)
    }

    fn identifier_filter(identifier: MigrationIdentifier) -> Result<Document, DatabaseError> {
        Ok(doc! { "identifier": bson::to_bson(&identifier)? })
    }
}

pub(crate) fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_ERROR_CODE,
        _ => false,
    }
}

#[async_trait]
impl MigrationStore for MongoMigrationStore {
    async fn exists(&self, identifier: MigrationIdentifier) -> Result<bool, DatabaseError> {
        let filter = Self::identifier_filter(identifier)?;
        let record = self.collection().find_one(filter, None).await?;
        debug!(%identifier, found = record.is_some(), "Looked up migration record");
        Ok(record.is_some())
    }

    async fn save(&self, record: MigrationRecord) -> Result<(), DatabaseError> {
        let identifier = record.identifier;
        match self.collection().insert_one(record, None).await {
            Ok(_) => {
                debug!(%identifier, "Saved migration record");
                Ok(())
            }
            Err(err) if is_duplicate_key_error(&err) => {
                warn!(%identifier, error = %err, "Migration record violates a unique index");
                Err(DatabaseError::ItemAlreadyExists(format!("Migration record {} already exists: {}", identifier, err)))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, identifier: MigrationIdentifier) -> Result<(), DatabaseError> {
        let filter = Self::identifier_filter(identifier)?;
        let result = self.collection().delete_one(filter, None).await?;
        if result.deleted_count == 0 {
            warn!(%identifier, "No migration record to delete");
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MigrationRecord>, DatabaseError> {
        let options = FindOptions::builder().sort(doc! { "identifier": 1 }).build();
        let cursor = self.collection().find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        let index = IndexModel::builder()
            .keys(doc! { "identifier": 1 })
            .options(IndexOptions::builder().unique(true).name(IDENTIFIER_INDEX.to_string()).build())
            .build();
        self.collection().create_index(index, None).await?;
        debug!(collection = %self.collection_name, "Ensured unique index on migration identifier");
        Ok(())
    }
}
