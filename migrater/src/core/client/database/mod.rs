pub mod constant;
pub mod error;
pub mod mongodb;

use async_trait::async_trait;
pub use error::DatabaseError;

use crate::types::migration::{MigrationIdentifier, MigrationRecord};

/// Record store tracking which migrations are applied.
///
/// The presence of a record is the only source of truth for "this migration has run".
/// Implementations must report lookup failures as errors: an unreachable store is never
/// the same thing as "not applied".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// exists - `Ok(true)` if a record for `identifier` is present, `Ok(false)` if not
    async fn exists(&self, identifier: MigrationIdentifier) -> Result<bool, DatabaseError>;

    /// save - Insert a new record. A duplicate key is reported as `DatabaseError::ItemAlreadyExists`
    async fn save(&self, record: MigrationRecord) -> Result<(), DatabaseError>;

    /// delete - Remove the record for `identifier`. Removing a missing record is not an error
    async fn delete(&self, identifier: MigrationIdentifier) -> Result<(), DatabaseError>;

    /// list - All records, sorted by identifier
    async fn list(&self) -> Result<Vec<MigrationRecord>, DatabaseError>;

    /// ensure_indexes - Create the unique index on the identifier field
    async fn ensure_indexes(&self) -> Result<(), DatabaseError>;
}
