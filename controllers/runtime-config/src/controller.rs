//! Main controller implementation.
//!
//! This module contains the `Controller` struct that orchestrates
//! reconciliation and resource watching for the runtime-config controller.
//!
//! Two watchers run in background tasks:
//! - RuntimeConfig: the owning custom resources
//! - ConfigMap: the feature-gate configuration in the operator namespace

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use cluster_store::{ClusterStore, KubeStore};
use crds::RuntimeConfig;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for RuntimeConfig management.
pub struct Controller {
    runtime_config_watcher: JoinHandle<Result<(), ControllerError>>,
    feature_gate_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(namespace: String) -> Result<Self, ControllerError> {
        info!("Initializing runtime-config controller");

        // Create Kubernetes client
        let kube_client = Client::try_default().await.map_err(ControllerError::Kube)?;

        // The store is the only path to cluster objects; the reconciler is
        // written against the trait so tests can swap in the mock
        let store: Arc<dyn ClusterStore> =
            Arc::new(KubeStore::new(kube_client.clone(), &namespace));
        let reconciler = Arc::new(Reconciler::new(store));

        let runtime_config_api: Api<RuntimeConfig> = Api::all(kube_client.clone());
        let config_map_api: Api<ConfigMap> = Api::namespaced(kube_client, &namespace);

        let watcher_instance = Arc::new(Watcher::new(
            reconciler,
            runtime_config_api,
            config_map_api,
        ));

        // Start all watchers in background tasks
        let runtime_config_watcher = {
            let watcher = watcher_instance.clone();
            tokio::spawn(async move { watcher.watch_runtime_configs().await })
        };

        let feature_gate_watcher = {
            let watcher = watcher_instance;
            tokio::spawn(async move { watcher.watch_feature_gate_config_maps().await })
        };

        Ok(Self {
            runtime_config_watcher,
            feature_gate_watcher,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("runtime-config controller running");

        // Wait for any watcher to exit (they should run forever)
        tokio::select! {
            result = &mut self.runtime_config_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("RuntimeConfig watcher panicked: {}", e)))??;
            }
            result = &mut self.feature_gate_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("ConfigMap watcher panicked: {}", e)))??;
            }
        }

        Ok(())
    }
}
