use std::collections::{BTreeMap, HashSet};

use crate::error::MigrationError;
use crate::types::migration::{Migration, MigrationIdentifier};

/// Migrations keyed by identifier, enumerated in ascending identifier order.
///
/// Adding a migration under an identifier that is already registered replaces the
/// previous definition.
pub struct Registry<H> {
    migrations: BTreeMap<MigrationIdentifier, Migration<H>>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self { migrations: BTreeMap::new() }
    }
}

impl<H> Registry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `migration`, returning the definition it replaced, if any.
    pub fn add(&mut self, migration: Migration<H>) -> Option<Migration<H>> {
        self.migrations.insert(migration.identifier(), migration)
    }

    pub fn get(&self, identifier: MigrationIdentifier) -> Option<&Migration<H>> {
        self.migrations.get(&identifier)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Migration<H>> {
        self.migrations.values()
    }

    /// Fails with `IdentifierOutOfRange` if a registered identifier cannot be stored in a record.
    pub fn check_storable(&self) -> Result<(), MigrationError> {
        match self.migrations.keys().next_back() {
            Some(last) if !last.is_storable() => Err(MigrationError::IdentifierOutOfRange(*last)),
            _ => Ok(()),
        }
    }

    /// Selects the migrations named by `selectors`, in the order they were supplied.
    ///
    /// Selectors are canonical identifier strings. An empty slice selects every registered
    /// migration. Fails with `UnknownIdentifier` on the first selector that matches nothing.
    /// A selector repeated within one call is selected once.
    pub fn select<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<&Migration<H>>, MigrationError> {
        if selectors.is_empty() {
            return Ok(self.iter().collect());
        }

        let mut seen = HashSet::with_capacity(selectors.len());
        let mut selected = Vec::with_capacity(selectors.len());
        for selector in selectors {
            let selector = selector.as_ref();
            let migration = selector
                .parse::<MigrationIdentifier>()
                .ok()
                .and_then(|identifier| self.get(identifier))
                .ok_or_else(|| MigrationError::UnknownIdentifier(selector.to_string()))?;
            if seen.insert(migration.identifier()) {
                selected.push(migration);
            }
        }
        Ok(selected)
    }
}

impl<H> FromIterator<Migration<H>> for Registry<H> {
    fn from_iter<I: IntoIterator<Item = Migration<H>>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl<H> Extend<Migration<H>> for Registry<H> {
    fn extend<I: IntoIterator<Item = Migration<H>>>(&mut self, iter: I) {
        for migration in iter {
            self.add(migration);
        }
    }
}
