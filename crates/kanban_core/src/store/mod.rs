//! Card store boundary: one ordered card document per column.
//!
//! # Responsibility
//! - Define the async contract the persistence adapter writes through.
//! - Provide SQLite and in-memory implementations of that contract.
//!
//! # Invariants
//! - A document is addressed only by its `ColumnId`.
//! - Card order inside a document is preserved exactly by every backend.
//! - `revision` grows by one on every committed write to a document.
//! - `run_transaction` isolates its read-modify-write from every other
//!   writer of the same document.

use crate::db::DbError;
use crate::model::card::Card;
use crate::model::column::ColumnId;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCardStore;
pub use sqlite::SqliteCardStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Callback run inside a single-document transaction.
///
/// Receives the current stored sequence. Returning `true` commits the
/// (possibly modified) sequence; `false` aborts without writing.
pub type ColumnTransaction<'a> = &'a mut (dyn FnMut(&mut Vec<Card>) -> bool + Send);

/// Errors raised by card store backends.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Stored `cards` payload could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Stored data is structurally invalid.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Backend refused or could not serve the request.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid cards payload: {err}"),
            Self::InvalidData(message) => write!(f, "invalid column document: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "card store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Unavailable(message) => write!(f, "card store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Stored state of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDocument {
    pub column: ColumnId,
    pub cards: Vec<Card>,
    pub revision: u64,
}

/// How a `run_transaction` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Callback asked to write; the document now has `revision`.
    Committed { revision: u64 },
    /// Callback declined; nothing was written.
    Aborted,
}

/// Async document store holding one card sequence per column.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Fetches one column document. `None` when it was never written.
    async fn get(&self, column: ColumnId) -> StoreResult<Option<ColumnDocument>>;

    /// Replaces (or creates) the stored sequence for one column.
    async fn set(&self, column: ColumnId, cards: &[Card]) -> StoreResult<()>;

    /// Runs `apply` against one column's current sequence under write
    /// isolation and commits the result when `apply` returns `true`.
    ///
    /// A missing document is presented to `apply` as an empty sequence.
    async fn run_transaction(
        &self,
        column: ColumnId,
        apply: ColumnTransaction<'_>,
    ) -> StoreResult<TransactionOutcome>;
}

#[async_trait]
impl<T: CardStore + ?Sized> CardStore for Arc<T> {
    async fn get(&self, column: ColumnId) -> StoreResult<Option<ColumnDocument>> {
        (**self).get(column).await
    }

    async fn set(&self, column: ColumnId, cards: &[Card]) -> StoreResult<()> {
        (**self).set(column, cards).await
    }

    async fn run_transaction(
        &self,
        column: ColumnId,
        apply: ColumnTransaction<'_>,
    ) -> StoreResult<TransactionOutcome> {
        (**self).run_transaction(column, apply).await
    }
}
