//! Staging-table backends.
//!
//! The loader only needs four primitives from storage, captured by [`StagingStore`]. Two
//! implementations ship with the crate:
//!
//! - [`mysql::MySqlStore`]: the real staging table, via `sqlx`
//! - [`memory::MemoryStore`]: an in-process table for dry runs and tests

pub mod memory;
pub mod mysql;

use thiserror::Error;

use crate::types::{DestinationRow, INSERT_COLUMNS};

pub use memory::MemoryStore;
pub use mysql::{open_connection, MySqlStore};

/// Placeholder limit of a single MySQL prepared statement.
pub const MAX_PLACEHOLDERS: usize = u16::MAX as usize;

/// Most staging rows one `INSERT` statement can bind (`4681`).
pub const MAX_ROWS_PER_INSERT: usize = MAX_PLACEHOLDERS / INSERT_COLUMNS.len();

/// Low-level storage failure.
///
/// The loader maps these onto [`crate::ImportError`] and keeps the detail out of operator-facing
/// messages.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error reported by the MySQL driver.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store refused the operation (e.g. missing privilege).
    #[error("operation rejected: {0}")]
    Rejected(String),
}

/// Write access to the staging table.
///
/// Calls block until the backend answers. Implementations must make [`Self::insert_chunk`]
/// all-or-nothing.
pub trait StagingStore {
    /// Empty the table with truncate semantics (resets auto-increment, not row-logged).
    fn truncate(&mut self) -> Result<(), StoreError>;

    /// Empty the table row by row; used when truncate is not permitted.
    fn delete_all(&mut self) -> Result<(), StoreError>;

    /// Insert `rows` as one atomic unit.
    fn insert_chunk(&mut self, rows: &[DestinationRow]) -> Result<(), StoreError>;

    /// Number of rows currently in the table.
    fn row_count(&mut self) -> Result<u64, StoreError>;
}

impl<S: StagingStore + ?Sized> StagingStore for &mut S {
    fn truncate(&mut self) -> Result<(), StoreError> {
        (**self).truncate()
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        (**self).delete_all()
    }

    fn insert_chunk(&mut self, rows: &[DestinationRow]) -> Result<(), StoreError> {
        (**self).insert_chunk(rows)
    }

    fn row_count(&mut self) -> Result<u64, StoreError> {
        (**self).row_count()
    }
}
