//! Batched playlist transfers.
//!
//! Large reference lists are moved in fixed-size batches, one round trip at a
//! time, so neither the server nor the page has to handle thousands of items
//! in one request. A failed batch is recorded and skipped; the remaining
//! batches still run.

use crate::api::backend::{IndexBackend, PlaylistBackend};
use crate::api::models::Track;
use crate::config::{ClientConfig, DEFAULT_BATCH_SIZE};
use crate::diagnostics::{log_perf, perf_start};
use crate::error::{Error, Result};
use futures_util::future::{select, Either};
use std::future::Future;
use std::pin::pin;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A batch the server did not accept, kept so callers can retry or report it.
#[derive(Debug)]
pub struct BatchFailure {
    /// Zero-based batch number within the transfer
    pub index: usize,
    pub refs: Vec<String>,
    pub error: Error,
}

#[derive(Debug)]
pub struct LoadReport<T> {
    /// Resolved records in input order
    pub records: Vec<T>,
    pub failures: Vec<BatchFailure>,
}

impl<T> LoadReport<T> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SaveReport {
    /// Batches the server accepted
    pub batches_sent: usize,
    pub failures: Vec<BatchFailure>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Batch sizes for loads and saves. Cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedTransferEngine {
    pub load_batch_size: usize,
    pub save_batch_size: usize,
}

impl Default for ChunkedTransferEngine {
    fn default() -> Self {
        Self {
            load_batch_size: DEFAULT_BATCH_SIZE,
            save_batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl From<&ClientConfig> for ChunkedTransferEngine {
    fn from(config: &ClientConfig) -> Self {
        Self {
            load_batch_size: config.load_batch_size,
            save_batch_size: config.save_batch_size,
        }
    }
}

impl ChunkedTransferEngine {
    /// Resolve `refs` to full tracks through the index.
    pub async fn load_tracks<B: IndexBackend>(
        &self,
        backend: &B,
        refs: &[String],
        cancel: &CancellationToken,
    ) -> Result<LoadReport<Track>> {
        load_in_batches(refs, self.load_batch_size, cancel, |batch| async move {
            backend.resolve_items_by_reference(&batch).await
        })
        .await
    }

    /// Write `refs` to a saved playlist, replacing its contents first when
    /// `clear_first`.
    pub async fn save_refs<B: PlaylistBackend>(
        &self,
        backend: &B,
        playlist_id: &str,
        refs: &[String],
        clear_first: bool,
        cancel: &CancellationToken,
    ) -> Result<SaveReport> {
        save_in_batches(
            refs,
            self.save_batch_size,
            clear_first,
            cancel,
            |batch, clear| async move {
                backend.push_playlist_items(playlist_id, &batch, clear).await
            },
        )
        .await
    }
}

/// Runs `call` unless `cancel` fires first.
async fn run_cancellable<F: Future>(cancel: &CancellationToken, call: F) -> Result<F::Output> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let call = pin!(call);
    let cancelled = pin!(cancel.cancelled());
    match select(call, cancelled).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(Error::Cancelled),
    }
}

/// Resolve `refs` in batches of `batch_size`, front to back.
///
/// Records come back in input order; within a batch the order the resolver
/// returned is kept. Fails only when `cancel` fires.
pub async fn load_in_batches<T, F, Fut>(
    refs: &[String],
    batch_size: usize,
    cancel: &CancellationToken,
    mut resolve_batch: F,
) -> Result<LoadReport<T>>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let batch_size = batch_size.max(1);
    let transfer_id = Uuid::new_v4();
    let started_at = perf_start();
    let mut report = LoadReport {
        records: Vec::with_capacity(refs.len()),
        failures: Vec::new(),
    };

    debug!(%transfer_id, refs = refs.len(), batch_size, "load started");

    for (index, chunk) in refs.chunks(batch_size).enumerate() {
        let batch = chunk.to_vec();
        match run_cancellable(cancel, resolve_batch(batch)).await {
            Ok(Ok(records)) => report.records.extend(records),
            Ok(Err(error)) => {
                warn!(%transfer_id, batch = index, "load batch failed: {error}");
                report.failures.push(BatchFailure {
                    index,
                    refs: chunk.to_vec(),
                    error,
                });
            }
            Err(cancelled) => {
                info!(%transfer_id, batch = index, "load cancelled");
                return Err(cancelled);
            }
        }
    }

    log_perf(
        "transfer::load_in_batches",
        started_at,
        &format!(
            "records={} failures={}",
            report.records.len(),
            report.failures.len()
        ),
    );
    Ok(report)
}

/// Push `refs` in batches of `batch_size`. Only the first batch carries
/// `clear_first`; with nothing to push and `clear_first` set, a single empty
/// batch is sent so the target still gets cleared.
pub async fn save_in_batches<F, Fut>(
    refs: &[String],
    batch_size: usize,
    clear_first: bool,
    cancel: &CancellationToken,
    mut push_batch: F,
) -> Result<SaveReport>
where
    F: FnMut(Vec<String>, bool) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let batch_size = batch_size.max(1);
    let transfer_id = Uuid::new_v4();
    let started_at = perf_start();
    let mut report = SaveReport::default();

    debug!(%transfer_id, refs = refs.len(), batch_size, clear_first, "save started");

    let batches: Vec<&[String]> = if refs.is_empty() && clear_first {
        vec![refs]
    } else {
        refs.chunks(batch_size).collect()
    };

    for (index, chunk) in batches.into_iter().enumerate() {
        let clear = clear_first && index == 0;
        match run_cancellable(cancel, push_batch(chunk.to_vec(), clear)).await {
            Ok(Ok(())) => report.batches_sent += 1,
            Ok(Err(error)) => {
                warn!(%transfer_id, batch = index, "save batch failed: {error}");
                report.failures.push(BatchFailure {
                    index,
                    refs: chunk.to_vec(),
                    error,
                });
            }
            Err(cancelled) => {
                info!(%transfer_id, batch = index, "save cancelled");
                return Err(cancelled);
            }
        }
    }

    log_perf(
        "transfer::save_in_batches",
        started_at,
        &format!(
            "batches={} failures={}",
            report.batches_sent,
            report.failures.len()
        ),
    );
    Ok(report)
}
