//! Bounded-concurrency batch processing.
//!
//! Documents are processed on tokio's blocking pool, at most `max_workers`
//! at a time. A failure in one document never affects the others, and
//! results come back in input order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::processor::{DocumentInput, DocumentResult, LabelProcessor};

/// Process every input and return one result per input, in input order.
///
/// Must be called from within a tokio runtime.
pub async fn process_batch(
    processor: Arc<LabelProcessor>,
    inputs: Vec<DocumentInput>,
    max_workers: usize,
) -> Vec<DocumentResult> {
    let workers = max_workers.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));
    let total = inputs.len();
    let mut pending: Vec<(String, Option<JoinHandle<DocumentResult>>)> = Vec::with_capacity(total);

    debug!("Processing batch of {} documents with {} workers", total, workers);

    for input in inputs {
        let key = input.key.clone();
        // The semaphore is never closed, so acquisition only fails if that changes.
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            pending.push((key, None));
            continue;
        };

        let processor = Arc::clone(&processor);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            processor.process(input)
        });
        pending.push((key, Some(handle)));
    }

    let mut results = Vec::with_capacity(total);
    for (key, handle) in pending {
        let result = match handle {
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Worker for {} did not finish: {}", key, e);
                    DocumentResult::failed(key, format!("worker failed: {}", e))
                }
            },
            None => DocumentResult::failed(key, "worker pool closed"),
        };
        results.push(result);
    }

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    info!("Batch complete: {}/{} documents extracted", succeeded, total);

    results
}
