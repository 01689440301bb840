use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

/// Lifecycle of one load.
///
/// `Idle → Clearing → Inserting → Done`; `Failed` is reachable from `Clearing` and `Inserting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    Idle,
    Clearing,
    Inserting,
    Done,
    Failed,
}

/// How the destination table was emptied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearMethod {
    /// Fast full-table truncate.
    Truncate,
    /// Row-by-row delete, used when truncate was refused.
    DeleteAll,
}

impl fmt::Display for ClearMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncate => f.write_str("truncate"),
            Self::DeleteAll => f.write_str("delete"),
        }
    }
}

/// Rows committed so far out of the batch total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadProgress {
    pub inserted: usize,
    pub total: usize,
}

impl LoadProgress {
    /// Whole-number percentage, rounded half to even; `100` for an empty total.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.inserted as f64 * 100.0 / self.total as f64).round_ties_even();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Events emitted by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    StateChanged { state: LoadState },
    Cleared { method: ClearMethod },
    ChunkCommitted { chunk: usize, progress: LoadProgress },
}

/// Observer hook for load events.
///
/// Progress UIs implement this to render percentage-complete after each committed chunk.
pub trait LoadObserver: Send + Sync {
    fn on_event(&self, event: &LoadEvent);
}

impl<F> LoadObserver for F
where
    F: Fn(&LoadEvent) + Send + Sync,
{
    fn on_event(&self, event: &LoadEvent) {
        self(event)
    }
}

/// Logs load events through `tracing`.
#[derive(Debug, Default)]
pub struct TracingLoadObserver;

impl LoadObserver for TracingLoadObserver {
    fn on_event(&self, event: &LoadEvent) {
        match event {
            LoadEvent::StateChanged { state: LoadState::Failed } => warn!("load failed"),
            LoadEvent::StateChanged { state } => debug!(?state, "load state"),
            LoadEvent::Cleared { method } => info!(%method, "destination table cleared"),
            LoadEvent::ChunkCommitted { chunk, progress } => info!(
                chunk,
                inserted = progress.inserted,
                total = progress.total,
                percent = progress.percent(),
                "chunk committed"
            ),
        }
    }
}
