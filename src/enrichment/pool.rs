//! Bounded-concurrency task runner
//!
//! Tasks are spawned under a semaphore and collected as they finish; results
//! are written back by originating index so callers always see input order.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use log::{error, info};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

use super::client::TextIntelligence;
use crate::config::EnrichConfig;

/// Monotonic count of finished tasks, for reporting only
#[derive(Debug, Default)]
pub struct TaskCounter {
    completed: AtomicUsize,
}

impl TaskCounter {
    fn increment(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[must_use]
    pub fn get(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Run `task` over every input with at most `limit` in flight
///
/// No task is cancelled once dispatched. A panicking task yields
/// `R::default()` for its slot. Every `log_every` completions a progress line
/// is logged under `label`.
pub async fn run_bounded<T, R, F, Fut>(
    inputs: Vec<T>,
    limit: usize,
    counter: &TaskCounter,
    label: &str,
    log_every: usize,
    task: F,
) -> Vec<R>
where
    T: Send + 'static,
    R: Default + Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = inputs.len();
    let log_every = log_every.max(1);
    let start_time = Instant::now();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut results: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut active: FuturesUnordered<BoxFuture<'static, (usize, Result<R, JoinError>)>> =
        FuturesUnordered::new();
    let mut finished = 0usize;

    let mut on_done = |index: usize, outcome: Result<R, JoinError>| {
        let value = outcome.unwrap_or_else(|e| {
            error!("{label} task {index} panicked: {e}");
            R::default()
        });
        results[index] = Some(value);
        counter.increment();
        finished += 1;
        if finished % log_every == 0 {
            info!(
                "{label}: {finished}/{total} tasks done (Elapsed: {:.2}s)",
                start_time.elapsed().as_secs_f64()
            );
        }
    };

    for (index, input) in inputs.into_iter().enumerate() {
        // Drain whatever already finished so results do not pile up in handles
        while let Some(Some((done, outcome))) = active.next().now_or_never() {
            on_done(done, outcome);
        }

        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            error!("{label} semaphore closed unexpectedly");
            break;
        };
        let fut = task(input);
        let handle = tokio::spawn(async move {
            let _permit = permit; // Hold until task completes
            fut.await
        });
        active.push(handle.map(move |outcome| (index, outcome)).boxed());
    }

    while let Some((done, outcome)) = active.next().await {
        on_done(done, outcome);
    }

    results.into_iter().map(Option::unwrap_or_default).collect()
}

/// Worker pools and the text-intelligence client shared by both enrichment phases
pub struct EnrichmentPool {
    pub(crate) client: Arc<dyn TextIntelligence>,
    pub(crate) relevance_workers: usize,
    pub(crate) summary_workers: usize,
    pub(crate) counter: Arc<TaskCounter>,
}

impl EnrichmentPool {
    #[must_use]
    pub fn new(client: Arc<dyn TextIntelligence>, relevance_workers: usize, summary_workers: usize) -> Self {
        Self {
            client,
            relevance_workers: relevance_workers.max(1),
            summary_workers: summary_workers.max(1),
            counter: Arc::new(TaskCounter::default()),
        }
    }

    #[must_use]
    pub fn from_config(client: Arc<dyn TextIntelligence>, config: &EnrichConfig) -> Self {
        Self::new(client, config.relevance_workers, config.summary_workers)
    }

    /// Tasks finished so far across both phases
    #[must_use]
    pub fn completed_tasks(&self) -> usize {
        self.counter.get()
    }

    #[must_use]
    pub fn counter(&self) -> Arc<TaskCounter> {
        Arc::clone(&self.counter)
    }
}
