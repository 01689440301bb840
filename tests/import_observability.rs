use std::sync::{Arc, Mutex};

use importador_redacoes::ingestion::TableFormat;
use importador_redacoes::observability::{
    CompositeObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats,
};
use importador_redacoes::pipeline::{run_import, ImportOptions};
use importador_redacoes::store::{MemoryStore, StagingStore, StoreError};
use importador_redacoes::types::DestinationRow;
use importador_redacoes::ImportError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<ImportStats>>,
    failures: Mutex<Vec<ImportSeverity>>,
    alerts: Mutex<Vec<ImportSeverity>>,
    formats: Mutex<Vec<TableFormat>>,
}

impl ImportObserver for RecordingObserver {
    fn on_success(&self, ctx: &ImportContext, stats: ImportStats) {
        self.formats.lock().unwrap().push(ctx.format);
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, _error: &ImportError) {
        self.formats.lock().unwrap().push(ctx.format);
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ImportContext, severity: ImportSeverity, _error: &ImportError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

/// Store where neither truncate nor delete is permitted.
struct LockedStore;

impl StagingStore for LockedStore {
    fn truncate(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Rejected("TRUNCATE command denied".to_string()))
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Rejected("DELETE command denied".to_string()))
    }

    fn insert_chunk(&mut self, _rows: &[DestinationRow]) -> Result<(), StoreError> {
        panic!("insert after a failed clear");
    }

    fn row_count(&mut self) -> Result<u64, StoreError> {
        Ok(0)
    }
}

fn options_with(obs: Arc<RecordingObserver>) -> ImportOptions {
    ImportOptions {
        observer: Some(obs),
        alert_at_or_above: ImportSeverity::Critical,
        ..Default::default()
    }
}

fn fixture() -> Vec<u8> {
    std::fs::read("tests/fixtures/redacoes.csv").unwrap()
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let mut store = MemoryStore::new();
    run_import(&mut store, &fixture(), "redacoes.csv", &options_with(obs.clone())).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![ImportStats {
            rows_read: 3,
            rows_inserted: 2,
        }]
    );
    assert_eq!(obs.formats.lock().unwrap().clone(), vec![TableFormat::Csv]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn clear_failure_is_critical_and_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let mut store = LockedStore;
    let err = run_import(&mut store, &fixture(), "redacoes.csv", &options_with(obs.clone()))
        .unwrap_err();

    assert_eq!(err, ImportError::ClearFailed);
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ImportSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![ImportSeverity::Critical]);
}

#[test]
fn input_errors_do_not_alert_at_critical_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let mut store = MemoryStore::new();
    let _ = run_import(&mut store, b"tema\nx\n", "lote.csv", &options_with(obs.clone())).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![ImportSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![a.clone() as Arc<dyn ImportObserver>, b.clone()]);

    let opts = ImportOptions {
        observer: Some(Arc::new(composite)),
        alert_at_or_above: ImportSeverity::Error,
        ..Default::default()
    };
    let mut store = MemoryStore::new();
    let _ = run_import(&mut store, b"not a workbook", "lote.xlsx", &opts).unwrap_err();

    for obs in [&a, &b] {
        assert_eq!(obs.failures.lock().unwrap().clone(), vec![ImportSeverity::Error]);
        assert_eq!(obs.alerts.lock().unwrap().clone(), vec![ImportSeverity::Error]);
        assert_eq!(obs.formats.lock().unwrap().clone(), vec![TableFormat::Spreadsheet]);
    }
}
