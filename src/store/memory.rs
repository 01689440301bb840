use crate::types::DestinationRow;

use super::{StagingStore, StoreError};

/// In-process staging table.
///
/// Backs `--dry-run` and the test suite. Chunks are appended whole, so inserts are trivially
/// atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<DestinationRow>,
    truncate_allowed: bool,
    truncates: usize,
    deletes: usize,
}

impl MemoryStore {
    /// An empty table that accepts truncate.
    pub fn new() -> Self {
        Self {
            truncate_allowed: true,
            ..Default::default()
        }
    }

    /// Pre-populate the table, e.g. with the previous import.
    pub fn with_rows(rows: Vec<DestinationRow>) -> Self {
        Self {
            rows,
            ..Self::new()
        }
    }

    /// Reject truncate, like a MySQL user without the `DROP` privilege.
    pub fn without_truncate(mut self) -> Self {
        self.truncate_allowed = false;
        self
    }

    /// Current contents, in insert order.
    pub fn rows(&self) -> &[DestinationRow] {
        &self.rows
    }

    /// How many times the table was truncated / deleted from.
    pub fn clear_counts(&self) -> (usize, usize) {
        (self.truncates, self.deletes)
    }
}

impl StagingStore for MemoryStore {
    fn truncate(&mut self) -> Result<(), StoreError> {
        if !self.truncate_allowed {
            return Err(StoreError::Rejected("TRUNCATE command denied".to_string()));
        }
        self.truncates += 1;
        self.rows.clear();
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.deletes += 1;
        self.rows.clear();
        Ok(())
    }

    fn insert_chunk(&mut self, rows: &[DestinationRow]) -> Result<(), StoreError> {
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    fn row_count(&mut self) -> Result<u64, StoreError> {
        Ok(self.rows.len() as u64)
    }
}
