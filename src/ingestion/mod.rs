//! Upload readers.
//!
//! Most callers should use [`parse_table`] (from [`unified`]) which:
//!
//! - picks CSV or spreadsheet parsing from the filename
//! - reads the bytes into an in-memory [`crate::types::Table`]
//! - normalizes column names so later checks are case/whitespace-insensitive
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - [`excel`]

pub mod csv;
pub mod excel;
pub mod unified;

pub use unified::{parse_table, parse_table_as, TableFormat};

/// Canonical form of a header cell: trimmed, lowercased, spaces replaced by underscores.
///
/// Blank headers get a positional placeholder (`unnamed:_3`) so they never collide with a real
/// column name.
pub fn normalize_column_name(raw: &str, index: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return format!("unnamed:_{index}");
    }
    trimmed.to_lowercase().replace(' ', "_")
}
