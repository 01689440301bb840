//! Validation and normalization of a parsed [`Table`] into an [`ImportBatch`].

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::error::{ImportError, ImportResult};
use crate::types::{
    DestinationRow, ImportBatch, SourceRow, Table, ValidationReport, Value, REQUIRED_COLUMNS,
};

use super::coerce::{to_i64, to_text};

/// Column positions of the required fields inside a [`Table`].
struct Projection {
    redacao_id: usize,
    arquivo_nome_armazenamento: usize,
    tema: usize,
    redacao_texto: usize,
    co_redacao_grade_id: usize,
}

impl Projection {
    /// Resolve every required column, or report all of the missing ones at once.
    fn resolve(table: &Table) -> ImportResult<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| table.index_of(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns { missing });
        }

        let idx = |name: &str| table.index_of(name).unwrap_or_default();
        Ok(Self {
            redacao_id: idx("redacao_id"),
            arquivo_nome_armazenamento: idx("arquivo_nome_armazenamento"),
            tema: idx("tema"),
            redacao_texto: idx("redacao_texto"),
            co_redacao_grade_id: idx("co_redacao_grade_id"),
        })
    }
}

/// Validate a parsed table and project it into the staging shape.
///
/// Steps, in order:
///
/// 1. every column in [`REQUIRED_COLUMNS`] must exist, otherwise
///    [`ImportError::MissingColumns`] lists all of the absent ones
/// 2. rows with a blank `redacao_id` are dropped
/// 3. `redacao_id` is coerced to an integer; rows where that fails are dropped
/// 4. `redacao_texto`, `tema` and `arquivo_nome_armazenamento` become text, null as `""`
/// 5. `co_redacao_grade_id` is coerced to an integer, or null when it can't be
/// 6. rows sharing a `redacao_id` collapse to the last one in file order
/// 7. and 8. each survivor goes through [`DestinationRow::from_source`]
///
/// An empty batch is a valid result; callers treat it as "nothing to import".
#[instrument(skip_all, fields(rows = table.row_count()))]
pub fn validate_and_normalize(table: &Table) -> ImportResult<ImportBatch> {
    let proj = Projection::resolve(table)?;

    let mut report = ValidationReport {
        rows_read: table.row_count(),
        ..Default::default()
    };

    let mut sources: Vec<SourceRow> = Vec::with_capacity(table.row_count());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).unwrap_or(&Value::Null);

        let raw_id = cell(proj.redacao_id);
        if raw_id.is_blank() {
            report.dropped_blank_id += 1;
            continue;
        }
        let Some(redacao_id) = to_i64(raw_id) else {
            debug!(row = row_idx + 2, value = ?raw_id, "dropping row with non-integer redacao_id");
            report.dropped_invalid_id += 1;
            continue;
        };

        sources.push(SourceRow {
            redacao_id,
            arquivo_nome_armazenamento: to_text(cell(proj.arquivo_nome_armazenamento)),
            tema: to_text(cell(proj.tema)),
            redacao_texto: to_text(cell(proj.redacao_texto)),
            co_redacao_grade_id: to_i64(cell(proj.co_redacao_grade_id)),
        });
    }

    let before_dedup = sources.len();
    let rows: Vec<DestinationRow> = keep_last_by_id(sources)
        .into_iter()
        .map(DestinationRow::from_source)
        .collect();

    report.duplicates_removed = before_dedup - rows.len();
    report.rows_kept = rows.len();

    info!(
        rows_read = report.rows_read,
        dropped_blank_id = report.dropped_blank_id,
        dropped_invalid_id = report.dropped_invalid_id,
        duplicates_removed = report.duplicates_removed,
        rows_kept = report.rows_kept,
        "validated upload"
    );

    Ok(ImportBatch { rows, report })
}

/// Keep only the last row for each `redacao_id`.
///
/// Survivors stay in the file order of their last occurrence, so a later correction in the same
/// upload replaces the earlier row instead of being inserted next to it.
fn keep_last_by_id(rows: Vec<SourceRow>) -> Vec<SourceRow> {
    let last_seen: HashMap<i64, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, r)| (r.redacao_id, idx))
        .collect();

    rows.into_iter()
        .enumerate()
        .filter(|(idx, r)| last_seen.get(&r.redacao_id) == Some(idx))
        .map(|(_, r)| r)
        .collect()
}
