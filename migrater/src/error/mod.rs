pub mod other;

use thiserror::Error;

use crate::core::client::database::DatabaseError;
use crate::generator::GeneratorError;
use crate::types::migration::{Direction, MigrationIdentifier};
pub use other::OtherError;

/// Result type for top level migrater operations
pub type MigraterResult<T> = Result<T, MigraterError>;

/// Errors surfaced by `Migrator::run` and `Migrator::rollback`.
///
/// The engine stops at the first error; it never aggregates failures from one call.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// A rollback selector does not name a registered migration. Raised before any action runs.
    #[error("Migration with timestamp `{0}` does not exist or has not been added to the registry")]
    UnknownIdentifier(String),

    /// A registered identifier is above `MigrationIdentifier::MAX`. Raised before any action runs.
    #[error("Migration identifier {0} does not fit in a record, the largest allowed is {max}", max = MigrationIdentifier::MAX)]
    IdentifierOutOfRange(MigrationIdentifier),

    #[error("Migration {identifier} failed while running {direction}: {source}")]
    ActionFailed {
        identifier: MigrationIdentifier,
        direction: Direction,
        #[source]
        source: OtherError,
    },

    /// The action has already run, but the record could not be saved or deleted.
    #[error("Migration {identifier} ran but its record could not be updated: {source}")]
    PersistenceFailed {
        identifier: MigrationIdentifier,
        #[source]
        source: DatabaseError,
    },

    #[error("Failed to look up the record of migration {identifier}: {source}")]
    LookupFailed {
        identifier: MigrationIdentifier,
        #[source]
        source: DatabaseError,
    },
}

/// Error types for the migrater binary and library entry points
#[derive(Error, Debug)]
pub enum MigraterError {
    #[error("Migration error: {0}")]
    MigrationError(#[from] MigrationError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Generator error: {0}")]
    GeneratorError(#[from] GeneratorError),

    #[error("Command error: {0}")]
    CommandError(String),
}
