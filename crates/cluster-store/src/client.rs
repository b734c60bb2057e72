//! kube::Api-backed ClusterStore implementation

use crate::error::StoreError;
use crate::store_trait::ClusterStore;
use crds::{NodeConfig, RuntimeConfig};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{ListParams, PostParams};
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::debug;

/// Cluster store backed by the Kubernetes API.
///
/// ConfigMap reads are scoped to the operator namespace given at
/// construction; NodeConfig and RuntimeConfig are cluster-scoped.
#[derive(Clone)]
pub struct KubeStore {
    config_maps: Api<ConfigMap>,
    node_configs: Api<NodeConfig>,
    runtime_configs: Api<RuntimeConfig>,
}

impl KubeStore {
    /// Creates a store reading ConfigMaps from `namespace`.
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            config_maps: Api::namespaced(client.clone(), namespace),
            node_configs: Api::all(client.clone()),
            runtime_configs: Api::all(client),
        }
    }
}

/// Classify a kube error into the store error cases callers branch on.
fn classify(err: kube::Error, what: &str) -> StoreError {
    match &err {
        // 410 Gone counts as not-found for the pre-create probe
        kube::Error::Api(resp) if resp.code == 404 || resp.code == 410 => {
            StoreError::NotFound(what.to_string())
        }
        kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
            StoreError::AlreadyExists(what.to_string())
        }
        kube::Error::Api(resp) if resp.code == 409 => StoreError::Conflict(what.to_string()),
        _ => StoreError::Api(err.to_string()),
    }
}

#[async_trait::async_trait]
impl ClusterStore for KubeStore {
    async fn config_map_data(&self, name: &str) -> Result<BTreeMap<String, String>, StoreError> {
        let cm = self
            .config_maps
            .get(name)
            .await
            .map_err(|e| classify(e, name))?;
        Ok(cm.data.unwrap_or_default())
    }

    async fn get_node_config(&self, name: &str) -> Result<NodeConfig, StoreError> {
        self.node_configs
            .get(name)
            .await
            .map_err(|e| classify(e, name))
    }

    async fn list_node_configs(&self) -> Result<Vec<NodeConfig>, StoreError> {
        let list = self
            .node_configs
            .list(&ListParams::default())
            .await
            .map_err(|e| classify(e, "NodeConfig list"))?;
        Ok(list.items)
    }

    async fn create_node_config(&self, config: &NodeConfig) -> Result<NodeConfig, StoreError> {
        let name = config.metadata.name.as_deref().unwrap_or("<unnamed>");
        debug!("Creating NodeConfig {}", name);
        self.node_configs
            .create(&PostParams::default(), config)
            .await
            .map_err(|e| classify(e, name))
    }

    async fn get_runtime_config(&self, name: &str) -> Result<RuntimeConfig, StoreError> {
        self.runtime_configs
            .get(name)
            .await
            .map_err(|e| classify(e, name))
    }

    async fn list_runtime_configs(&self) -> Result<Vec<RuntimeConfig>, StoreError> {
        let list = self
            .runtime_configs
            .list(&ListParams::default())
            .await
            .map_err(|e| classify(e, "RuntimeConfig list"))?;
        Ok(list.items)
    }

    async fn update_runtime_config_status(
        &self,
        config: &RuntimeConfig,
    ) -> Result<RuntimeConfig, StoreError> {
        let name = config
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| StoreError::Api("RuntimeConfig missing name".to_string()))?;
        let data = serde_json::to_vec(config).map_err(|e| StoreError::Api(e.to_string()))?;
        self.runtime_configs
            .replace_status(name, &PostParams::default(), data)
            .await
            .map_err(|e| classify(e, name))
    }
}
