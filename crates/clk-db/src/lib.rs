//! Storage layer for the work-hour tracker.
//!
//! Two [`RecordStore`](clk_core::RecordStore) implementations:
//! - [`Database`]: a single SQLite file, table `days`
//! - [`JsonStore`]: a directory with one `<year>.json` document per year
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A single writer is assumed for both stores; there is no file locking.
//!
//! # Record Layout
//!
//! Both stores share one layout per day, keyed by the ISO date (`2022-01-10`):
//! - `absence`: the numeric code of the absence kind
//! - `begin`, `end`: `HH:MM:SS` or null
//! - `pause`: `HH:MM:SS`

mod json;
mod row;
mod sqlite;

use std::path::PathBuf;

use clk_core::StoreError;
use thiserror::Error;

pub use json::JsonStore;
pub use sqlite::Database;

/// Storage errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Reading or writing a store file failed.
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A JSON document could not be encoded or decoded.
    #[error("invalid json document: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored day has values that do not form a valid record.
    #[error("invalid stored day {id}: {message}")]
    InvalidRow { id: String, message: String },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidRow { id, message } => Self::Corrupt { id, message },
            other => Self::backend(other),
        }
    }
}
