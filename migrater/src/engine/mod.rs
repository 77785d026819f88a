pub mod registry;

use mongodb::Database;
use tracing::{debug, info, warn};

use crate::core::client::database::{DatabaseError, MigrationStore};
use crate::core::client::MongoMigrationStore;
use crate::error::MigrationError;
use crate::types::migration::{Direction, Migration, MigrationIdentifier};
use registry::Registry;

/// Applies and rolls back the migrations of a [`Registry`].
///
/// One `Migrator` is meant to be driven by a single runner: `run` and `rollback` take
/// `&mut self`, so calls against the same instance are sequential. Several processes
/// sharing one record collection still race on check-then-insert; the unique index on
/// the identifier turns that race into a duplicate-key error, which `run` treats as
/// "already applied".
pub struct Migrator<H> {
    registry: Registry<H>,
    store: Box<dyn MigrationStore>,
    handle: H,
    counter: u64,
}

impl Migrator<Database> {
    /// Pairs a MongoDB record store with its database as the handle passed to actions.
    pub fn with_mongo(store: MongoMigrationStore) -> Self {
        let database = store.database().clone();
        Self::new(database, Box::new(store))
    }
}

impl<H: Send + Sync> Migrator<H> {
    pub fn new(handle: H, store: Box<dyn MigrationStore>) -> Self {
        Self { registry: Registry::new(), store, handle, counter: 0 }
    }

    pub fn with_registry(mut self, registry: Registry<H>) -> Self {
        self.registry = registry;
        self
    }

    /// Registers `migration`, replacing any definition with the same identifier.
    pub fn add(&mut self, migration: Migration<H>) -> &mut Self {
        if let Some(replaced) = self.registry.add(migration) {
            debug!(identifier = %replaced.identifier(), "Replaced registered migration");
        }
        self
    }

    pub fn registry(&self) -> &Registry<H> {
        &self.registry
    }

    pub fn store(&self) -> &dyn MigrationStore {
        self.store.as_ref()
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Number of actions that succeeded since this `Migrator` was built, across all calls.
    ///
    /// When a call fails, this still counts the migrations it got through before the failure.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Applies every registered migration that has no record yet, in ascending identifier order.
    ///
    /// Fails before any action runs if a registered identifier is above `MigrationIdentifier::MAX`.
    /// Otherwise stops at the first failure. If the `up` action succeeded but its record could not be
    /// saved, the migration is left applied-but-unrecorded and the next `run` invokes `up` again.
    ///
    /// Returns the number of migrations applied by this call.
    #[tracing::instrument(skip_all, fields(registered = self.registry.len()))]
    pub async fn run(&mut self) -> Result<usize, MigrationError> {
        self.registry.check_storable()?;
        let mut applied = 0;

        for migration in self.registry.iter() {
            let identifier = migration.identifier();
            if is_applied(self.store.as_ref(), identifier).await? {
                debug!(%identifier, "Migration already applied, skipping");
                continue;
            }

            migration.execute(Direction::Up, &self.handle).await.map_err(|e| MigrationError::ActionFailed {
                identifier,
                direction: Direction::Up,
                source: e.into(),
            })?;
            self.counter += 1;
            applied += 1;

            match self.store.save(migration.to_record()).await {
                Ok(()) => {}
                Err(DatabaseError::ItemAlreadyExists(reason)) => {
                    // Another runner may have recorded the same migration in the meantime.
                    if !matches!(self.store.exists(identifier).await, Ok(true)) {
                        return Err(MigrationError::PersistenceFailed {
                            identifier,
                            source: DatabaseError::ItemAlreadyExists(reason),
                        });
                    }
                    warn!(%identifier, "Migration was recorded concurrently by another runner");
                }
                Err(source) => return Err(MigrationError::PersistenceFailed { identifier, source }),
            }

            info!(
                %identifier,
                description = migration.description(),
                "Migration {} ({}) succeeded",
                identifier,
                migration.description()
            );
        }

        if applied == 0 {
            info!("There was nothing to migrate");
        }
        Ok(applied)
    }

    /// Rolls back every applied migration among the candidates.
    ///
    /// With `selectors`, the candidates are exactly the named migrations in the order given,
    /// and an unknown selector fails the call before any `down` action runs. Without
    /// selectors, every registered migration is a candidate, most recent first. The registry
    /// itself is left as is, so later calls still see every migration.
    ///
    /// Returns the number of migrations rolled back by this call.
    #[tracing::instrument(skip_all, fields(selectors = selectors.len()))]
    pub async fn rollback<S: AsRef<str> + Sync>(&mut self, selectors: &[S]) -> Result<usize, MigrationError> {
        self.registry.check_storable()?;
        let candidates: Vec<&Migration<H>> =
            if selectors.is_empty() { self.registry.iter().rev().collect() } else { self.registry.select(selectors)? };

        let mut rolled_back = 0;

        for migration in candidates {
            let identifier = migration.identifier();
            if !is_applied(self.store.as_ref(), identifier).await? {
                debug!(%identifier, "Migration not applied, nothing to roll back");
                continue;
            }

            migration.execute(Direction::Down, &self.handle).await.map_err(|e| MigrationError::ActionFailed {
                identifier,
                direction: Direction::Down,
                source: e.into(),
            })?;
            self.counter += 1;
            rolled_back += 1;

            self.store
                .delete(identifier)
                .await
                .map_err(|source| MigrationError::PersistenceFailed { identifier, source })?;

            info!(
                %identifier,
                description = migration.description(),
                "Rollback migration {} ({}) succeeded",
                identifier,
                migration.description()
            );
        }

        if rolled_back == 0 {
            info!("There was nothing to rollback");
        }
        Ok(rolled_back)
    }
}

async fn is_applied(store: &dyn MigrationStore, identifier: MigrationIdentifier) -> Result<bool, MigrationError> {
    store.exists(identifier).await.map_err(|source| MigrationError::LookupFailed { identifier, source })
}
