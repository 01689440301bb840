//! Import outcome reporting.
//!
//! [`crate::pipeline::run_import`] reports each attempt to an optional [`ImportObserver`]:
//! success with summary stats, or failure with a severity. Failures at or above the configured
//! threshold are also raised through [`ImportObserver::on_alert`].

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::ImportError;
use crate::ingestion::TableFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the import failed on its input or settings).
    Error,
    /// Critical error (the database failed or was left partially loaded).
    Critical,
}

impl ImportError {
    /// Severity of this failure.
    ///
    /// Anything that involved the database is `Critical`: connectivity loss, a table that could
    /// not be cleared, or a partial load. Problems with the file or settings are `Error`.
    pub fn severity(&self) -> ImportSeverity {
        match self {
            ImportError::Connectivity
            | ImportError::ClearFailed
            | ImportError::InsertFailed { .. } => ImportSeverity::Critical,
            ImportError::Configuration { .. }
            | ImportError::MalformedInput { .. }
            | ImportError::MissingColumns { .. } => ImportSeverity::Error,
        }
    }
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// Name of the uploaded file.
    pub filename: String,
    /// Format chosen for the upload.
    pub format: TableFormat,
}

/// Stats reported on a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Rows parsed from the file.
    pub rows_read: usize,
    /// Rows written to the staging table.
    pub rows_inserted: usize,
}

/// Observer interface for import outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ImportObserver: Send + Sync {
    /// Called when the import finishes, including the nothing-to-import case.
    fn on_success(&self, _ctx: &ImportContext, _stats: ImportStats) {}

    /// Called when the import fails.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs import outcomes through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        info!(
            file = %ctx.filename,
            format = %ctx.format,
            rows_read = stats.rows_read,
            rows_inserted = stats.rows_inserted,
            "import finished"
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        warn!(
            file = %ctx.filename,
            format = %ctx.format,
            ?severity,
            %error,
            "import failed"
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        error!(
            file = %ctx.filename,
            format = %ctx.format,
            ?severity,
            %error,
            "ALERT: import failed"
        );
    }
}
