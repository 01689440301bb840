//! Unified reader entrypoint.
//!
//! Most callers should use [`parse_table`], which reads an uploaded file into a [`Table`] with
//! normalized column names. The format is chosen from the filename: `.csv` selects the CSV
//! reader and anything else is treated as a spreadsheet workbook.

use std::fmt;

use tracing::{debug, instrument};

use crate::error::ImportResult;
use crate::types::Table;

use super::{csv, excel};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (`.xlsx`, `.xls`, `.ods`, ...).
    Spreadsheet,
}

impl TableFormat {
    /// Pick a format from a filename (case-insensitive).
    ///
    /// Only a `.csv` suffix selects [`TableFormat::Csv`]; every other name, including one with no
    /// extension at all, defaults to [`TableFormat::Spreadsheet`].
    pub fn from_filename(filename: &str) -> Self {
        if filename.trim().to_lowercase().ends_with(".csv") {
            Self::Csv
        } else {
            Self::Spreadsheet
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// Parse an uploaded file into a normalized [`Table`].
///
/// Fails with [`crate::ImportError::MalformedInput`] when the bytes cannot be read in the
/// selected format. The error carries a readable summary only; parser details go to the `debug`
/// log.
///
/// ```no_run
/// use importador_redacoes::ingestion::parse_table;
///
/// # fn main() -> Result<(), importador_redacoes::ImportError> {
/// let bytes = std::fs::read("redacoes.xlsx").unwrap_or_default();
/// let table = parse_table(&bytes, "redacoes.xlsx")?;
/// println!("columns={:?} rows={}", table.columns, table.row_count());
/// # Ok(())
/// # }
/// ```
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn parse_table(bytes: &[u8], filename: &str) -> ImportResult<Table> {
    parse_table_as(bytes, TableFormat::from_filename(filename))
}

/// Parse bytes with an explicit format, bypassing filename inference.
pub fn parse_table_as(bytes: &[u8], format: TableFormat) -> ImportResult<Table> {
    let table = match format {
        TableFormat::Csv => csv::read_csv(bytes)?,
        TableFormat::Spreadsheet => excel::read_excel(bytes)?,
    };
    debug!(
        %format,
        columns = table.columns.len(),
        rows = table.row_count(),
        "parsed upload"
    );
    Ok(table)
}
