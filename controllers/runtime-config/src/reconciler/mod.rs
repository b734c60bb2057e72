//! Reconciliation logic for RuntimeConfig resources.
//!
//! One reconcile cycle runs the full chain: resolve feature gates,
//! synthesize the desired NodeConfig artifact, converge it onto the
//! cluster, persist the outcome to the owner's status. Everything is
//! recomputed from the cluster on every cycle; the resolved artifact is a
//! plain value threaded through the call chain, never process-wide state,
//! so concurrent reconciles of unrelated owners cannot observe each other.

pub mod converge;
pub mod feature_gates;
pub mod synthesize;
#[cfg(test)]
mod feature_gates_test;
#[cfg(test)]
mod synthesize_test;

use crate::backoff::FibonacciBackoff;
use crate::error::ControllerError;
use crate::status::StatusPoller;
use cluster_store::ClusterStore;
use crds::{RuntimeConfig, RuntimeState};
use feature_gates::FeatureGates;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Backoff state for a resource
#[derive(Debug, Clone)]
struct BackoffState {
    backoff: FibonacciBackoff,
    error_count: u32,
}

impl BackoffState {
    fn new() -> Self {
        Self {
            backoff: FibonacciBackoff::new(30, 600), // 30 seconds min, 10 minutes max
            error_count: 0,
        }
    }

    fn increment_error(&mut self) {
        self.error_count += 1;
    }

    fn reset(&mut self) {
        self.error_count = 0;
        self.backoff.reset();
    }
}

/// Switch position of a feature gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureGateState {
    Enabled,
    Disabled,
}

/// Reconciles RuntimeConfig resources.
pub struct Reconciler {
    pub(crate) store: Arc<dyn ClusterStore>,
    pub(crate) gates: FeatureGates,
    pub(crate) status: StatusPoller,
    /// Error count tracking per resource (name -> BackoffState)
    backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(store: Arc<dyn ClusterStore>) -> Self {
        Self {
            gates: FeatureGates::new(store.clone()),
            status: StatusPoller::new(store.clone()),
            store,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Runs one reconcile cycle for a RuntimeConfig.
    pub async fn reconcile_runtime_config(
        &self,
        config: &RuntimeConfig,
    ) -> Result<(), ControllerError> {
        let name = config.metadata.name.as_deref().ok_or_else(|| {
            ControllerError::InvalidConfig("RuntimeConfig missing name".to_string())
        })?;

        info!("Reconciling RuntimeConfig {}", name);

        self.process_feature_gates().await;

        let desired = match self
            .desired_node_config(name, &config.spec.machine_pool)
            .await
        {
            Ok(desired) => desired,
            Err(e) => {
                error!("Failed to synthesize NodeConfig for {}: {}", name, e);
                self.record_failure(name, &e).await;
                return Err(e);
            }
        };

        let outcome = match self.converge(name, &desired).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to converge NodeConfig for {}: {}", name, e);
                self.record_failure(name, &e).await;
                return Err(e);
            }
        };

        if outcome.created {
            info!(
                "Created NodeConfig {} for RuntimeConfig {}",
                outcome.node_config, name
            );
        } else {
            debug!(
                "NodeConfig {} already in place for RuntimeConfig {}",
                outcome.node_config, name
            );
        }

        let node_config = outcome.node_config.clone();
        self.status
            .update(name, move |status| {
                status.state = RuntimeState::Created;
                status.node_config_name = Some(node_config.clone());
                status.error = None;
            })
            .await?;

        // Reset error count on success
        self.reset_error(name);
        Ok(())
    }

    /// Best-effort Failed status write. The reconcile error still surfaces
    /// to the caller even when the status write itself fails.
    async fn record_failure(&self, name: &str, err: &ControllerError) {
        let message = err.to_string();
        let result = self
            .status
            .update(name, move |status| {
                status.state = RuntimeState::Failed;
                status.error = Some(message.clone());
            })
            .await;
        if let Err(status_err) = result {
            error!("Failed to record error status for {}: {}", name, status_err);
        }
    }

    /// Check which feature gates are enabled and dispatch their handlers.
    /// Gates with parameters are resolved again at the point of use; this
    /// pass only drives the boolean on/off actions.
    pub async fn process_feature_gates(&self) {
        if self.gates.is_enabled(feature_gates::TIME_TRAVEL).await {
            info!("Feature gate is enabled: {}", feature_gates::TIME_TRAVEL);
            self.handle_time_travel(FeatureGateState::Enabled);
        } else {
            info!("Feature gate is disabled: {}", feature_gates::TIME_TRAVEL);
            self.handle_time_travel(FeatureGateState::Disabled);
        }
    }

    fn handle_time_travel(&self, state: FeatureGateState) {
        match state {
            FeatureGateState::Enabled => info!("Starting TimeTravel"),
            FeatureGateState::Disabled => info!("Stopping TimeTravel"),
        }
    }

    /// List all RuntimeConfig resources (used by the ConfigMap watcher to
    /// fan a gate change out to every owner).
    pub(crate) async fn list_runtime_configs(&self) -> Result<Vec<RuntimeConfig>, ControllerError> {
        Ok(self.store.list_runtime_configs().await?)
    }

    /// Get the Fibonacci backoff duration for a resource based on its error count
    ///
    /// Returns (backoff_seconds, error_count)
    pub fn backoff_for_resource(&self, resource_key: &str) -> (u64, u32) {
        match self.backoff_states.lock() {
            Ok(mut states) => {
                let state = states
                    .entry(resource_key.to_string())
                    .or_insert_with(BackoffState::new);
                let backoff_seconds = state.backoff.next_backoff_seconds();
                let error_count = state.error_count;
                (backoff_seconds, error_count)
            }
            Err(e) => {
                warn!("Failed to lock backoff_states: {}, using default backoff", e);
                (60, 0) // 60 seconds default
            }
        }
    }

    /// Increment error count for a resource
    pub fn increment_error(&self, resource_key: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            let state = states
                .entry(resource_key.to_string())
                .or_insert_with(BackoffState::new);
            state.increment_error();
        }
    }

    /// Reset error count for a resource (on successful reconciliation)
    pub fn reset_error(&self, resource_key: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            if let Some(state) = states.get_mut(resource_key) {
                state.reset();
            }
        }
    }
}
