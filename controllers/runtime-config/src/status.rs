//! Status update poller.
//!
//! Status sub-resource writes race with the spec writers and with other
//! status writers (per-node failure reporters run concurrently across
//! nodes), so every attempt re-fetches the resource and applies the
//! mutation to a fresh copy before persisting. The persist carries the
//! fetched resourceVersion, turning a stale base into a conflict instead of
//! a silent overwrite. Attempts repeat on a fixed interval until a fixed
//! deadline; deadline expiry is a hard failure, never a hang.

use crate::error::ControllerError;
use cluster_store::{ClusterStore, StoreError};
use crds::{FailedNode, RuntimeConfigStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Delay between status persist attempts.
pub const STATUS_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Total budget for one status update before giving up.
pub const STATUS_RETRY_DEADLINE: Duration = Duration::from_secs(120);

/// Applies status mutations with bounded fetch-mutate-persist retry.
pub struct StatusPoller {
    store: Arc<dyn ClusterStore>,
    interval: Duration,
    deadline: Duration,
}

impl StatusPoller {
    /// Creates a poller with the default interval and deadline.
    pub fn new(store: Arc<dyn ClusterStore>) -> Self {
        Self::with_timing(store, STATUS_RETRY_INTERVAL, STATUS_RETRY_DEADLINE)
    }

    /// Creates a poller with explicit timing (used by tests).
    #[allow(dead_code)] // Test constructor
    pub fn with_timing(store: Arc<dyn ClusterStore>, interval: Duration, deadline: Duration) -> Self {
        Self {
            store,
            interval,
            deadline,
        }
    }

    /// Apply `mutate` to the status of the RuntimeConfig named `owner` and
    /// persist it. Any error, including a write conflict or the resource
    /// being momentarily absent, retries the full fetch-mutate-persist
    /// cycle after the interval. Returns the last error wrapped in
    /// `StatusTimeout` once the deadline is spent.
    pub async fn update<F>(&self, owner: &str, mutate: F) -> Result<(), ControllerError>
    where
        F: Fn(&mut RuntimeConfigStatus) + Send + Sync,
    {
        let started = Instant::now();
        let mut last_error: Option<String> = None;

        loop {
            match self.attempt(owner, &mutate).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("Status update attempt for {} failed: {}", owner, e);
                    last_error = Some(e.to_string());
                }
            }

            if started.elapsed() + self.interval >= self.deadline {
                let reason = last_error.unwrap_or_else(|| "no attempt completed".to_string());
                warn!(
                    "Giving up on status update for {} after {:?}: {}",
                    owner, self.deadline, reason
                );
                return Err(ControllerError::StatusTimeout(reason));
            }

            sleep(self.interval).await;
        }
    }

    /// One fetch-mutate-persist cycle.
    async fn attempt<F>(&self, owner: &str, mutate: &F) -> Result<(), StoreError>
    where
        F: Fn(&mut RuntimeConfigStatus) + Send + Sync,
    {
        let mut config = self.store.get_runtime_config(owner).await?;
        let mut status = config.status.take().unwrap_or_default();
        mutate(&mut status);
        config.status = Some(status);
        self.store.update_runtime_config_status(&config).await?;
        Ok(())
    }

    /// Append a per-node failure record to the owner's status. Records are
    /// only ever appended here; an identical (node, message) pair is not
    /// appended twice.
    #[allow(dead_code)] // Entry point for per-node failure reporters
    pub async fn record_node_failure(
        &self,
        owner: &str,
        node: &str,
        message: &str,
    ) -> Result<(), ControllerError> {
        let node = node.to_string();
        let message = message.to_string();
        self.update(owner, move |status| {
            let record = FailedNode {
                name: node.clone(),
                error: message.clone(),
            };
            if !status.failed_nodes.contains(&record) {
                status.failed_nodes.push(record);
            }
        })
        .await
    }
}
