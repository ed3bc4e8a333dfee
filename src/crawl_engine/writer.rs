//! Batched append of finished posts to the store

use log::{error, info};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::host_limiter::HostLimiter;
use crate::post_store::{PostRecord, PostStore, StoreError};

/// Spawn the single task that appends to the store
///
/// Records are buffered and appended every `batch_size` posts; the remainder is
/// flushed once every sender is gone. On a store failure the request limiter
/// is closed so in-flight crawling winds down. Resolves to the number of rows
/// written.
pub fn spawn_store_writer(
    store: Arc<PostStore>,
    batch_size: usize,
    limiter: Arc<HostLimiter>,
) -> (mpsc::Sender<PostRecord>, JoinHandle<Result<usize, StoreError>>) {
    let batch_size = batch_size.max(1);
    let (tx, mut rx) = mpsc::channel::<PostRecord>(batch_size * 4);

    let handle = tokio::spawn(async move {
        let mut batch = Vec::with_capacity(batch_size);
        let mut written = 0usize;

        while let Some(record) = rx.recv().await {
            batch.push(record);
            if batch.len() >= batch_size {
                written += flush(&store, &mut batch, &limiter).await?;
            }
        }

        if !batch.is_empty() {
            written += flush(&store, &mut batch, &limiter).await?;
        }
        Ok(written)
    });

    (tx, handle)
}

async fn flush(
    store: &PostStore,
    batch: &mut Vec<PostRecord>,
    limiter: &HostLimiter,
) -> Result<usize, StoreError> {
    match store.append(batch).await {
        Ok(outcome) => {
            info!(
                "Flushed {} posts to {}",
                outcome.written,
                store.path().display()
            );
            batch.clear();
            Ok(outcome.written)
        }
        Err(e) => {
            error!("Failed to append to post store: {e}");
            limiter.close();
            Err(e)
        }
    }
}
