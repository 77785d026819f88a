use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use color_eyre::eyre::eyre;
use futures::FutureExt;
use rstest::*;

use crate::core::client::database::{DatabaseError, MigrationStore};
use crate::types::migration::{Migration, MigrationIdentifier, MigrationRecord};

/// Persistence handle that journals every action invoked against it
#[derive(Debug, Default)]
pub struct TestHandle {
    journal: Mutex<Vec<String>>,
}

impl TestHandle {
    pub fn record(&self, entry: impl Into<String>) {
        self.journal.lock().expect("journal lock poisoned").push(entry.into());
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().expect("journal lock poisoned").clone()
    }
}

/// Record store kept in memory; clones share the same records
#[derive(Clone, Default)]
pub struct InMemoryMigrationStore {
    records: Arc<Mutex<BTreeMap<MigrationIdentifier, MigrationRecord>>>,
    unique_descriptions: bool,
}

impl InMemoryMigrationStore {
    /// Rejects a record whose description is already recorded, like a unique index on it would
    pub fn with_unique_descriptions() -> Self {
        Self { unique_descriptions: true, ..Default::default() }
    }

    pub fn insert(&self, record: MigrationRecord) {
        self.records.lock().expect("records lock poisoned").insert(record.identifier, record);
    }

    pub fn identifiers(&self) -> Vec<u64> {
        self.records.lock().expect("records lock poisoned").keys().map(|id| id.as_u64()).collect()
    }

    pub fn contains(&self, timestamp: u64) -> bool {
        self.records.lock().expect("records lock poisoned").contains_key(&MigrationIdentifier::new(timestamp))
    }
}

#[async_trait]
impl MigrationStore for InMemoryMigrationStore {
    async fn exists(&self, identifier: MigrationIdentifier) -> Result<bool, DatabaseError> {
        Ok(self.records.lock().expect("records lock poisoned").contains_key(&identifier))
    }

    async fn save(&self, record: MigrationRecord) -> Result<(), DatabaseError> {
        let mut records = self.records.lock().expect("records lock poisoned");
        if records.contains_key(&record.identifier) {
            return Err(DatabaseError::ItemAlreadyExists(format!("identifier {}", record.identifier)));
        }
        if self.unique_descriptions && records.values().any(|r| r.description == record.description) {
            return Err(DatabaseError::ItemAlreadyExists(format!("description {}", record.description)));
        }
        records.insert(record.identifier, record);
        Ok(())
    }

    async fn delete(&self, identifier: MigrationIdentifier) -> Result<(), DatabaseError> {
        self.records.lock().expect("records lock poisoned").remove(&identifier);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MigrationRecord>, DatabaseError> {
        Ok(self.records.lock().expect("records lock poisoned").values().cloned().collect())
    }

    async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Migration whose actions journal `up:<timestamp>` and `down:<timestamp>`
pub fn journaled_migration(timestamp: u64) -> Migration<TestHandle> {
    Migration::new(timestamp, format!("migration {}", timestamp))
        .up(move |handle: &TestHandle| {
            async move {
                handle.record(format!("up:{}", timestamp));
                Ok(())
            }
            .boxed()
        })
        .down(move |handle: &TestHandle| {
            async move {
                handle.record(format!("down:{}", timestamp));
                Ok(())
            }
            .boxed()
        })
}

/// Migration whose `up` journals its attempt and then fails
pub fn failing_up_migration(timestamp: u64) -> Migration<TestHandle> {
    journaled_migration(timestamp).up(move |handle: &TestHandle| {
        async move {
            handle.record(format!("up:{}", timestamp));
            Err(eyre!("Testing purpose error"))
        }
        .boxed()
    })
}

/// Migration whose `down` journals its attempt and then fails
pub fn failing_down_migration(timestamp: u64) -> Migration<TestHandle> {
    journaled_migration(timestamp).down(move |handle: &TestHandle| {
        async move {
            handle.record(format!("down:{}", timestamp));
            Err(eyre!("Testing purpose error"))
        }
        .boxed()
    })
}

pub fn applied_record(timestamp: u64) -> MigrationRecord {
    MigrationRecord::new(MigrationIdentifier::new(timestamp), format!("migration {}", timestamp))
}

/// Error a store reports when MongoDB cannot be reached
pub fn store_unreachable() -> DatabaseError {
    DatabaseError::MongoError(
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into(),
    )
}

#[fixture]
pub fn store() -> InMemoryMigrationStore {
    InMemoryMigrationStore::default()
}
