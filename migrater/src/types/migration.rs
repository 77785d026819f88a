use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use futures::future::BoxFuture;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::types::error::TypeError;

/// Identifier of a migration, the unix timestamp (in seconds) at which it was created.
///
/// The canonical string form is the plain decimal rendering, which is what callers
/// pass as rollback selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationIdentifier(u64);

impl MigrationIdentifier {
    /// Largest identifier a record can hold, BSON integers being signed 64-bit.
    pub const MAX: Self = Self(i64::MAX as u64);

    pub const fn new(timestamp: u64) -> Self {
        Self(timestamp)
    }

    /// Identifier for a migration created right now.
    pub fn now() -> Self {
        Self(Utc::now().timestamp().max(0) as u64)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub const fn is_storable(&self) -> bool {
        self.0 <= Self::MAX.0
    }
}

impl fmt::Display for MigrationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MigrationIdentifier {
    type Err = TypeError;

    /// Only the canonical form of a storable identifier is accepted: "0100" or "+100" do not
    /// name migration 100.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let timestamp: u64 = s.parse().map_err(|_| TypeError::InvalidIdentifier(s.to_string()))?;
        if timestamp.to_string() != s || !Self(timestamp).is_storable() {
            return Err(TypeError::InvalidIdentifier(s.to_string()));
        }
        Ok(Self(timestamp))
    }
}

/// Which half of a migration is being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

pub type ActionFuture<'a> = BoxFuture<'a, color_eyre::Result<()>>;

/// A unit of work executed against the persistence handle `H`.
pub type Action<H> = Arc<dyn for<'a> Fn(&'a H) -> ActionFuture<'a> + Send + Sync>;

fn noop<H>(_handle: &H) -> ActionFuture<'_> {
    Box::pin(async { Ok(()) })
}

/// A reversible change: an `up` action, the `down` action undoing it, and a description.
///
/// Both actions default to no-ops, the same shape the stub generator writes out.
pub struct Migration<H> {
    identifier: MigrationIdentifier,
    description: String,
    up: Action<H>,
    down: Action<H>,
}

impl<H> Clone for Migration<H> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier,
            description: self.description.clone(),
            up: Arc::clone(&self.up),
            down: Arc::clone(&self.down),
        }
    }
}

impl<H> fmt::Debug for Migration<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("identifier", &self.identifier)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<H: Send + Sync + 'static> Migration<H> {
    /// New migration identified by `timestamp`, with no-op actions.
    pub fn new(timestamp: u64, description: impl Into<String>) -> Self {
        Self {
            identifier: MigrationIdentifier::new(timestamp),
            description: description.into(),
            up: Arc::new(noop::<H>),
            down: Arc::new(noop::<H>),
        }
    }

    /// Sets the forward action.
    ///
    /// ```ignore
    /// Migration::new(1700000000, "create users index")
    ///     .up(|db: &Database| async move { /* ... */ Ok(()) }.boxed())
    /// ```
    pub fn up<F>(mut self, action: F) -> Self
    where
        F: for<'a> Fn(&'a H) -> ActionFuture<'a> + Send + Sync + 'static,
    {
        self.up = Arc::new(action);
        self
    }

    /// Sets the backward action.
    pub fn down<F>(mut self, action: F) -> Self
    where
        F: for<'a> Fn(&'a H) -> ActionFuture<'a> + Send + Sync + 'static,
    {
        self.down = Arc::new(action);
        self
    }
}

impl<H> Migration<H> {
    pub fn identifier(&self) -> MigrationIdentifier {
        self.identifier
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) async fn execute(&self, direction: Direction, handle: &H) -> color_eyre::Result<()> {
        match direction {
            Direction::Up => (self.up)(handle).await,
            Direction::Down => (self.down)(handle).await,
        }
    }

    /// Record persisted once the `up` action has succeeded.
    pub fn to_record(&self) -> MigrationRecord {
        MigrationRecord::new(self.identifier, self.description.clone())
    }
}

/// Persisted proof that a migration has been applied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub identifier: MigrationIdentifier,
    pub description: String,
    #[serde(rename = "appliedAt", with = "chrono_datetime_as_bson_datetime")]
    pub applied_at: DateTime<Utc>,
}

impl MigrationRecord {
    pub fn new(identifier: MigrationIdentifier, description: String) -> Self {
        // BSON datetimes only keep milliseconds
        Self { id: None, identifier, description, applied_at: Utc::now().trunc_subsecs(3) }
    }
}
