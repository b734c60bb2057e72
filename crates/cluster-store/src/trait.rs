//! ClusterStore trait for mocking
//!
//! This trait abstracts the cluster object repository to enable mocking in
//! unit tests. The concrete `KubeStore` implements it against the
//! Kubernetes API; tests use the in-memory `MockStore`.

use crate::error::StoreError;
use crds::{NodeConfig, RuntimeConfig};
use std::collections::BTreeMap;

/// Trait for cluster object-repository operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing
/// runtime.
#[async_trait::async_trait]
pub trait ClusterStore: Send + Sync {
    /// Read the key/value data of a ConfigMap in the operator namespace.
    async fn config_map_data(&self, name: &str) -> Result<BTreeMap<String, String>, StoreError>;

    /// Fetch a NodeConfig by its fixed name.
    async fn get_node_config(&self, name: &str) -> Result<NodeConfig, StoreError>;

    /// List all NodeConfig objects in the cluster.
    async fn list_node_configs(&self) -> Result<Vec<NodeConfig>, StoreError>;

    /// Create a NodeConfig. Fails with `AlreadyExists` when another actor
    /// created an object of the same name first.
    async fn create_node_config(&self, config: &NodeConfig) -> Result<NodeConfig, StoreError>;

    /// Fetch a RuntimeConfig by name.
    async fn get_runtime_config(&self, name: &str) -> Result<RuntimeConfig, StoreError>;

    /// List all RuntimeConfig objects in the cluster.
    async fn list_runtime_configs(&self) -> Result<Vec<RuntimeConfig>, StoreError>;

    /// Persist the status sub-resource of a RuntimeConfig. The object's
    /// resourceVersion rides along, so a concurrent writer surfaces as
    /// `Conflict` rather than a silent overwrite.
    async fn update_runtime_config_status(
        &self,
        config: &RuntimeConfig,
    ) -> Result<RuntimeConfig, StoreError>;
}
