pub mod database;

pub use database::mongodb::MongoMigrationStore;
pub use database::{DatabaseError, MigrationStore};
