//! Request concurrency limiting
//!
//! Every platform request holds two permits for its whole lifetime: one from the
//! crawl-wide pool and one from the pool of the target host.

use dashmap::DashMap;
use log::error;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::crawl_types::{CrawlError, CrawlResult};
use crate::utils::extract_host;

/// Permits for one in-flight request; released on drop
pub struct RequestPermit {
    _global: OwnedSemaphorePermit,
    _host: OwnedSemaphorePermit,
}

/// Global plus per-host concurrency limiter using lock-free `DashMap`
///
/// Host semaphores are created lazily on first request to that host.
pub struct HostLimiter {
    global: Arc<Semaphore>,
    host_semaphores: DashMap<String, Arc<Semaphore>>,
    max_per_host: usize,
}

impl HostLimiter {
    #[must_use]
    pub fn new(max_total: usize, max_per_host: usize) -> Self {
        Self {
            global: Arc::new(Semaphore::new(max_total)),
            host_semaphores: DashMap::new(),
            max_per_host,
        }
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        self.host_semaphores
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_host)))
            .clone()
    }

    /// Wait for a global and a per-host permit for `url`
    ///
    /// The host permit is taken first so a saturated host does not pin global
    /// permits that other hosts could use.
    pub async fn acquire(&self, url: &str) -> CrawlResult<RequestPermit> {
        let host = extract_host(url)
            .ok_or_else(|| CrawlError::Network(format!("no host in request URL {url}")))?;

        let host_permit = self
            .host_semaphore(&host)
            .acquire_owned()
            .await
            .map_err(|_| {
                error!("Semaphore for host '{host}' was closed unexpectedly");
                CrawlError::Cancelled
            })?;

        let global_permit = self.global.clone().acquire_owned().await.map_err(|_| {
            error!("Global request semaphore was closed unexpectedly");
            CrawlError::Cancelled
        })?;

        Ok(RequestPermit {
            _global: global_permit,
            _host: host_permit,
        })
    }

    /// Stop handing out permits; pending and future acquisitions fail
    pub fn close(&self) {
        self.global.close();
        for entry in &self.host_semaphores {
            entry.value().close();
        }
    }

    #[must_use]
    pub fn available_global(&self) -> usize {
        self.global.available_permits()
    }
}
