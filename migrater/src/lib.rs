pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod generator;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod tests;

// Re-export commonly used item
pub use engine::registry::Registry;
pub use engine::Migrator;
pub use error::{MigraterError, MigraterResult, MigrationError};
pub use types::migration::{Direction, Migration, MigrationIdentifier, MigrationRecord};
