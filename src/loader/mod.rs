//! Bulk loader: replace the staging table's contents with one [`ImportBatch`].
//!
//! This module sits "above" [`crate::store`] and provides:
//!
//! - the clear-then-insert protocol (truncate, falling back to delete)
//! - chunked inserts, each chunk one atomic unit
//! - progress events after every committed chunk, via [`LoadObserver`]

mod observer;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ImportError, ImportResult};
use crate::store::StagingStore;
use crate::types::ImportBatch;

pub use observer::{
    ClearMethod, LoadEvent, LoadObserver, LoadProgress, LoadState, TracingLoadObserver,
};

/// Rows per insert chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Configuration for [`load`].
#[derive(Clone)]
pub struct LoadOptions {
    /// Number of rows per atomic insert. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Receives state changes and per-chunk progress.
    pub observer: Option<Arc<dyn LoadObserver>>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            observer: None,
        }
    }
}

impl std::fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOptions")
            .field("chunk_size", &self.chunk_size)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Result of a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// `Done` after a load, `Idle` when an empty batch left the table alone.
    pub state: LoadState,
    /// Rows inserted; equals `total` on success.
    pub inserted: usize,
    pub total: usize,
    /// `None` when the batch was empty and the table was left alone.
    pub clear_method: Option<ClearMethod>,
    pub chunks: usize,
    pub elapsed: Duration,
}

/// Replace the contents of the staging table with `batch`.
///
/// The table is cleared first; if that fails nothing is inserted and
/// [`ImportError::ClearFailed`] is returned. Rows then go in chunks of `options.chunk_size`, each
/// chunk all-or-nothing. A failing chunk stops the load with [`ImportError::InsertFailed`]
/// carrying the rows committed by earlier chunks, which stay in the table.
///
/// An empty batch is a no-op: the store is not touched.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use importador_redacoes::loader::{load, LoadEvent, LoadOptions};
/// use importador_redacoes::store::MemoryStore;
/// use importador_redacoes::types::{DestinationRow, ImportBatch, SourceRow};
///
/// let rows = (1..=3)
///     .map(|id| {
///         DestinationRow::from_source(SourceRow {
///             redacao_id: id,
///             arquivo_nome_armazenamento: format!("{id}.png"),
///             tema: "Tema".to_string(),
///             redacao_texto: "Texto".to_string(),
///             co_redacao_grade_id: None,
///         })
///     })
///     .collect();
/// let batch = ImportBatch { rows, ..Default::default() };
///
/// let opts = LoadOptions {
///     chunk_size: 2,
///     observer: Some(Arc::new(|event: &LoadEvent| {
///         if let LoadEvent::ChunkCommitted { progress, .. } = event {
///             println!("{}%", progress.percent());
///         }
///     })),
/// };
///
/// let mut store = MemoryStore::new();
/// let summary = load(&mut store, &batch, &opts).unwrap();
/// assert_eq!(summary.inserted, 3);
/// assert_eq!(summary.chunks, 2);
/// ```
#[instrument(skip_all, fields(total = batch.len(), chunk_size = options.chunk_size))]
pub fn load<S>(store: &mut S, batch: &ImportBatch, options: &LoadOptions) -> ImportResult<LoadSummary>
where
    S: StagingStore + ?Sized,
{
    let start = Instant::now();
    let total = batch.len();
    if batch.is_empty() {
        debug!("empty batch; leaving destination table untouched");
        return Ok(LoadSummary {
            state: LoadState::Idle,
            inserted: 0,
            total: 0,
            clear_method: None,
            chunks: 0,
            elapsed: start.elapsed(),
        });
    }

    let emit = |event: LoadEvent| {
        if let Some(obs) = options.observer.as_ref() {
            obs.on_event(&event);
        }
    };

    emit(LoadEvent::StateChanged { state: LoadState::Clearing });
    let clear_method = match clear(store) {
        Ok(method) => method,
        Err(err) => {
            emit(LoadEvent::StateChanged { state: LoadState::Failed });
            return Err(err);
        }
    };
    emit(LoadEvent::Cleared { method: clear_method });

    emit(LoadEvent::StateChanged { state: LoadState::Inserting });
    let chunk_size = options.chunk_size.max(1);
    let mut inserted = 0usize;
    let mut chunks = 0usize;
    for (idx, chunk) in batch.rows.chunks(chunk_size).enumerate() {
        if let Err(e) = store.insert_chunk(chunk) {
            debug!(error = %e, chunk = idx + 1, "chunk insert failed");
            error!(inserted, total, chunk = idx + 1, "insert failed; stopping load");
            emit(LoadEvent::StateChanged { state: LoadState::Failed });
            return Err(ImportError::InsertFailed { inserted, total });
        }
        inserted += chunk.len();
        chunks += 1;
        emit(LoadEvent::ChunkCommitted {
            chunk: chunks,
            progress: LoadProgress { inserted, total },
        });
    }

    emit(LoadEvent::StateChanged { state: LoadState::Done });
    let elapsed = start.elapsed();
    info!(inserted, chunks, %clear_method, ?elapsed, "load finished");

    Ok(LoadSummary {
        state: LoadState::Done,
        inserted,
        total,
        clear_method: Some(clear_method),
        chunks,
        elapsed,
    })
}

/// Empty the table: truncate, or delete-all when truncate is refused.
fn clear<S>(store: &mut S) -> ImportResult<ClearMethod>
where
    S: StagingStore + ?Sized,
{
    match store.truncate() {
        Ok(()) => Ok(ClearMethod::Truncate),
        Err(truncate_err) => {
            warn!("truncate refused; falling back to DELETE");
            debug!(error = %truncate_err, "truncate failed");
            match store.delete_all() {
                Ok(()) => Ok(ClearMethod::DeleteAll),
                Err(delete_err) => {
                    debug!(error = %delete_err, "delete failed");
                    error!("could not clear destination table; nothing inserted");
                    Err(ImportError::ClearFailed)
                }
            }
        }
    }
}
