//! Session pool: bounds concurrent store queries and applies the per-query
//! timeout.
//!
//! Each in-flight query holds one permit for its whole lifetime, so no
//! backend session is ever shared by two queries at once.

use crate::error::QueryFailure;
use ontofacet_store::StoreError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct SessionPool {
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl SessionPool {
    /// A pool of `max_sessions` permits (at least one).
    pub fn new(max_sessions: usize, timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_sessions.max(1))),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Permits not currently held by a query.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run one store query under a session permit. The timeout covers the
    /// query only, not the wait for a permit.
    pub async fn run<T, F>(&self, query: F) -> Result<T, QueryFailure>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| QueryFailure::PoolClosed)?;

        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(QueryFailure::Store),
            Err(_) => Err(QueryFailure::Timeout(self.timeout)),
        }
    }
}
