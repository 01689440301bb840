//! Spreadsheet reader (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`).

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::types::{Table, Value};

use super::normalize_column_name;

/// Read a workbook held in memory into a [`Table`].
///
/// Behavior:
/// - The workbook format is sniffed from the bytes, not the filename
/// - Only the first sheet is read
/// - The first non-empty row is the header row
/// - Cells keep their type; empty and error cells become [`Value::Null`]
/// - An empty first sheet yields an empty table, so validation reports the missing columns
pub fn read_excel(bytes: &[u8]) -> ImportResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| {
        debug!(error = %e, "workbook open failed");
        ImportError::MalformedInput {
            message: "the file is not a readable spreadsheet (expected .xlsx, .xls or .csv)"
                .to_string(),
        }
    })?;

    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::MalformedInput {
            message: "the workbook has no sheets".to_string(),
        })?;

    let range = workbook.worksheet_range(&first).map_err(|e| {
        debug!(sheet = %first, error = %e, "worksheet read failed");
        ImportError::MalformedInput {
            message: format!("sheet '{first}' could not be read"),
        }
    })?;

    Ok(sheet_to_table(&range))
}

fn sheet_to_table(range: &Range<Data>) -> Table {
    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let Some(header) = rows_iter.next() else {
        return Table::default();
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, c)| normalize_column_name(&cell_to_string(c), idx))
        .collect();

    let rows = rows_iter
        .map(|row| {
            (0..columns.len())
                .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    Table::new(columns, rows)
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
