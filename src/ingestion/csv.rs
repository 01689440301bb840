//! CSV reader.

use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::types::{Table, Value};

use super::normalize_column_name;

/// Cell contents read as missing, matching what spreadsheet tools export for empty values.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read CSV bytes into a [`Table`].
///
/// Rules:
///
/// - The first record is the header row; column names are normalized.
/// - Rows shorter than the header are padded with nulls; extra trailing cells are ignored.
/// - Cells that are exactly an NA marker (empty cell, `NA`, `NULL`, `NaN`, ...) become
///   [`Value::Null`]; every other cell, whitespace-only ones included, is kept as text. Type
///   coercion happens during validation.
pub fn read_csv(bytes: &[u8]) -> ImportResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    read_csv_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ImportResult<Table> {
    let headers = rdr.headers().map_err(malformed)?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::MalformedInput {
            message: "the CSV file has no header row".to_string(),
        });
    }

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| normalize_column_name(h, idx))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(malformed)?;
        let row = (0..columns.len())
            .map(|idx| csv_cell(record.get(idx).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn csv_cell(raw: &str) -> Value {
    if NA_MARKERS.contains(&raw) {
        Value::Null
    } else {
        Value::Utf8(raw.to_owned())
    }
}

fn malformed(err: csv::Error) -> ImportError {
    debug!(error = %err, "csv parse failed");
    let message = match err.kind() {
        csv::ErrorKind::Utf8 { pos, .. } => match pos {
            Some(p) => format!("the CSV file is not valid UTF-8 (around line {})", p.line()),
            None => "the CSV file is not valid UTF-8".to_string(),
        },
        _ => "the CSV file could not be parsed; check the format and contents".to_string(),
    };
    ImportError::MalformedInput { message }
}
