//! One-call import: parse → validate → load.
//!
//! Callers that don't need to inspect the intermediate table use [`run_import`]. It reports the
//! outcome to an optional [`ImportObserver`] and returns [`ImportOutcome::NothingToImport`]
//! without touching the store when validation leaves no rows.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ImportResult;
use crate::ingestion::{parse_table, TableFormat};
use crate::loader::{load, LoadObserver, LoadOptions, LoadSummary, DEFAULT_CHUNK_SIZE};
use crate::observability::{ImportContext, ImportObserver, ImportSeverity, ImportStats};
use crate::processing::validate_and_normalize;
use crate::store::StagingStore;
use crate::types::ValidationReport;

/// Options controlling [`run_import`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// Rows per atomic insert.
    pub chunk_size: usize,
    /// Receives per-chunk progress during the load.
    pub load_observer: Option<Arc<dyn LoadObserver>>,
    /// Receives the final outcome.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("chunk_size", &self.chunk_size)
            .field("load_observer_set", &self.load_observer.is_some())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            load_observer: None,
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Final summary of an import that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub filename: String,
    pub validation: ValidationReport,
    /// `None` when there was nothing to import.
    pub load: Option<LoadSummary>,
}

impl ImportSummary {
    /// Rows written to the staging table.
    pub fn rows_inserted(&self) -> usize {
        self.load.as_ref().map_or(0, |l| l.inserted)
    }
}

/// How an import ended, when it didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The batch was loaded and the table now holds exactly its rows.
    Imported(ImportSummary),
    /// Validation left no rows; the table was not touched.
    NothingToImport(ImportSummary),
}

impl ImportOutcome {
    pub fn summary(&self) -> &ImportSummary {
        match self {
            Self::Imported(s) | Self::NothingToImport(s) => s,
        }
    }
}

/// Parse, validate and load one uploaded file.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` for [`ImportOutcome::Imported`] and [`ImportOutcome::NothingToImport`]
/// - `on_failure` on failure, with the error's severity
/// - `on_alert` on failure when that severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use importador_redacoes::config::DbConfig;
/// use importador_redacoes::observability::TracingObserver;
/// use importador_redacoes::pipeline::{run_import, ImportOptions, ImportOutcome};
/// use importador_redacoes::store::open_connection;
///
/// # fn main() -> Result<(), importador_redacoes::ImportError> {
/// let mut store = open_connection(&DbConfig::from_env()?)?;
/// let bytes = std::fs::read("redacoes.csv").unwrap_or_default();
/// let opts = ImportOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// match run_import(&mut store, &bytes, "redacoes.csv", &opts)? {
///     ImportOutcome::Imported(s) => println!("{} row(s) inserted", s.rows_inserted()),
///     ImportOutcome::NothingToImport(_) => println!("nothing to import"),
/// }
/// # Ok(())
/// # }
/// ```
#[instrument(skip(store, bytes, options))]
pub fn run_import<S>(
    store: &mut S,
    bytes: &[u8],
    filename: &str,
    options: &ImportOptions,
) -> ImportResult<ImportOutcome>
where
    S: StagingStore + ?Sized,
{
    let ctx = ImportContext {
        filename: filename.to_string(),
        format: TableFormat::from_filename(filename),
    };

    let result = import_inner(store, bytes, filename, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(outcome) => {
                let summary = outcome.summary();
                obs.on_success(
                    &ctx,
                    ImportStats {
                        rows_read: summary.validation.rows_read,
                        rows_inserted: summary.rows_inserted(),
                    },
                );
            }
            Err(e) => {
                let sev = e.severity();
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn import_inner<S>(
    store: &mut S,
    bytes: &[u8],
    filename: &str,
    options: &ImportOptions,
) -> ImportResult<ImportOutcome>
where
    S: StagingStore + ?Sized,
{
    let table = parse_table(bytes, filename)?;
    let batch = validate_and_normalize(&table)?;

    let mut summary = ImportSummary {
        filename: filename.to_string(),
        validation: batch.report,
        load: None,
    };

    if batch.is_empty() {
        info!("nothing to import after validation");
        return Ok(ImportOutcome::NothingToImport(summary));
    }

    let load_opts = LoadOptions {
        chunk_size: options.chunk_size,
        observer: options.load_observer.clone(),
    };
    summary.load = Some(load(store, &batch, &load_opts)?);
    Ok(ImportOutcome::Imported(summary))
}
