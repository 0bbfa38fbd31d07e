//! Synchronous key-value substrate and the document persistence adapter.
//!
//! # Responsibility
//! - Define the port the host binds to its durable key-value storage.
//! - Provide in-memory and SQLite-backed bindings.
//! - Load and save the whole tracker document under one key.
//!
//! # Invariants
//! - Every substrate call is synchronous; nothing suspends or spawns.
//! - One `set` writes one complete value; there are no partial writes.

mod adapter;
mod memory;
mod sqlite;

pub use adapter::PersistenceAdapter;
pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Substrate failure surfaced to the persistence adapter.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Host binding refused or failed the operation.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Host-provided durable string storage.
///
/// Implementations are shared between every store attached in a context,
/// and possibly between contexts, so they take `&self`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}
