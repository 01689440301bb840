//! Core data model types for an import.
//!
//! The reader produces a loosely typed [`Table`]; validation turns it into an [`ImportBatch`] of
//! [`DestinationRow`]s shaped exactly like the staging table.

use serde::Serialize;

/// Staging table that holds essays awaiting automated grading.
pub const DESTINATION_TABLE: &str = "temp_analise_correcao_humano";

/// Columns the uploaded file must provide (after name normalization).
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "redacao_id",
    "arquivo_nome_armazenamento",
    "tema",
    "redacao_texto",
    "co_redacao_grade_id",
];

/// Destination columns, in insert order.
pub const INSERT_COLUMNS: [&str; 14] = [
    "redacao_id",
    "corretor",
    "situacao_nota_zero",
    "nota_c1",
    "nota_c2",
    "nota_c3",
    "nota_c4",
    "nota_c5",
    "arquivo_nome_armazenamento",
    "tema",
    "redacao_texto",
    "co_redacao_grade_id",
    "ocr_confianca",
    "arquivo_anonimo_nome_armazenamento",
];

/// Marks a staged essay as pending automated correction.
pub const AUTOMATED_GRADER: &str = "IA";

/// A single cell value as read from the uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for [`Value::Null`] and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// In-memory table produced by the reader.
///
/// Column names are already normalized. Rows are stored as `Vec<Vec<Value>>` in the same order
/// as `columns`; every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Normalized column names, in file order.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    ///
    /// When a name appears more than once the first occurrence wins.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One essay record as it exists in the uploaded file, after coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub redacao_id: i64,
    pub arquivo_nome_armazenamento: String,
    pub tema: String,
    pub redacao_texto: String,
    pub co_redacao_grade_id: Option<i64>,
}

/// A row shaped like [`DESTINATION_TABLE`].
///
/// Build these with [`DestinationRow::from_source`], which applies the fixed grading defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationRow {
    pub redacao_id: i64,
    pub corretor: &'static str,
    pub situacao_nota_zero: Option<String>,
    pub nota_c1: i32,
    pub nota_c2: i32,
    pub nota_c3: i32,
    pub nota_c4: i32,
    pub nota_c5: i32,
    pub arquivo_nome_armazenamento: String,
    pub tema: String,
    pub redacao_texto: String,
    pub co_redacao_grade_id: Option<i64>,
    pub ocr_confianca: Option<f64>,
    pub arquivo_anonimo_nome_armazenamento: Option<String>,
}

impl DestinationRow {
    /// Project a source row into the staging shape: `corretor = "IA"`, every criterion score
    /// zero, and the grading-side fields unset.
    pub fn from_source(src: SourceRow) -> Self {
        Self {
            redacao_id: src.redacao_id,
            corretor: AUTOMATED_GRADER,
            situacao_nota_zero: None,
            nota_c1: 0,
            nota_c2: 0,
            nota_c3: 0,
            nota_c4: 0,
            nota_c5: 0,
            arquivo_nome_armazenamento: src.arquivo_nome_armazenamento,
            tema: src.tema,
            redacao_texto: src.redacao_texto,
            co_redacao_grade_id: src.co_redacao_grade_id,
            ocr_confianca: None,
            arquivo_anonimo_nome_armazenamento: None,
        }
    }

    /// The five criterion scores, `nota_c1..nota_c5`.
    pub fn scores(&self) -> [i32; 5] {
        [self.nota_c1, self.nota_c2, self.nota_c3, self.nota_c4, self.nota_c5]
    }
}

/// Per-step counters collected while validating a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Rows present in the parsed table.
    pub rows_read: usize,
    /// Rows dropped because `redacao_id` was empty.
    pub dropped_blank_id: usize,
    /// Rows dropped because `redacao_id` was not an integer.
    pub dropped_invalid_id: usize,
    /// Earlier occurrences discarded in favor of a later row with the same id.
    pub duplicates_removed: usize,
    /// Rows in the resulting batch.
    pub rows_kept: usize,
}

/// The normalized rows from one uploaded file, ready for a single load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportBatch {
    /// Rows in insert order.
    pub rows: Vec<DestinationRow>,
    /// What validation dropped along the way.
    pub report: ValidationReport,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
