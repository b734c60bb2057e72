//! Mock ClusterStore for unit testing
//!
//! In-memory implementation of `ClusterStore` that can be configured to
//! return specific failures, so reconciler tests run without a cluster.

use crate::error::StoreError;
use crate::store_trait::ClusterStore;
use crds::{NodeConfig, RuntimeConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Mock cluster store for testing
///
/// Stores objects in memory, counts writes, and can inject the failure
/// modes the reconciler has to tolerate: a ConfigMap read outage, a bounded
/// number of status-write conflicts, and stale reads that hide an artifact
/// another actor just created.
#[derive(Clone, Default)]
pub struct MockStore {
    config_maps: Arc<Mutex<HashMap<String, BTreeMap<String, String>>>>,
    node_configs: Arc<Mutex<HashMap<String, NodeConfig>>>,
    runtime_configs: Arc<Mutex<HashMap<String, RuntimeConfig>>>,
    node_config_creates: Arc<Mutex<u32>>,
    status_updates: Arc<Mutex<u32>>,
    config_map_outage: Arc<Mutex<bool>>,
    stale_reads: Arc<Mutex<bool>>,
    status_failures_remaining: Arc<Mutex<u32>>,
}

impl MockStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ConfigMap to the mock store (for test setup)
    pub fn add_config_map(&self, name: &str, entries: &[(&str, &str)]) {
        let data = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.config_maps
            .lock()
            .unwrap()
            .insert(name.to_string(), data);
    }

    /// Add a NodeConfig to the mock store (for test setup)
    pub fn add_node_config(&self, config: NodeConfig) {
        let name = config.metadata.name.clone().unwrap_or_default();
        self.node_configs.lock().unwrap().insert(name, config);
    }

    /// Add a RuntimeConfig to the mock store (for test setup)
    pub fn add_runtime_config(&self, config: RuntimeConfig) {
        let name = config.metadata.name.clone().unwrap_or_default();
        self.runtime_configs.lock().unwrap().insert(name, config);
    }

    /// Make every ConfigMap read fail with an api error
    pub fn set_config_map_outage(&self, outage: bool) {
        *self.config_map_outage.lock().unwrap() = outage;
    }

    /// Make NodeConfig reads (get/list) miss objects that are present,
    /// simulating a concurrent creator the lister hasn't observed yet.
    /// Creates still collide with the hidden objects.
    pub fn set_stale_reads(&self, stale: bool) {
        *self.stale_reads.lock().unwrap() = stale;
    }

    /// Fail the next `n` status updates with a write conflict
    pub fn fail_status_updates(&self, n: u32) {
        *self.status_failures_remaining.lock().unwrap() = n;
    }

    /// Number of NodeConfig creates performed
    pub fn node_config_creates(&self) -> u32 {
        *self.node_config_creates.lock().unwrap()
    }

    /// Number of status persist attempts (including failed ones)
    pub fn status_updates(&self) -> u32 {
        *self.status_updates.lock().unwrap()
    }

    /// Fetch a stored NodeConfig (test assertions)
    pub fn node_config(&self, name: &str) -> Option<NodeConfig> {
        self.node_configs.lock().unwrap().get(name).cloned()
    }

    /// Fetch a stored RuntimeConfig (test assertions)
    pub fn runtime_config(&self, name: &str) -> Option<RuntimeConfig> {
        self.runtime_configs.lock().unwrap().get(name).cloned()
    }
}

#[async_trait::async_trait]
impl ClusterStore for MockStore {
    async fn config_map_data(&self, name: &str) -> Result<BTreeMap<String, String>, StoreError> {
        if *self.config_map_outage.lock().unwrap() {
            return Err(StoreError::Api("simulated ConfigMap outage".to_string()));
        }
        self.config_maps
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn get_node_config(&self, name: &str) -> Result<NodeConfig, StoreError> {
        if *self.stale_reads.lock().unwrap() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.node_configs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn list_node_configs(&self) -> Result<Vec<NodeConfig>, StoreError> {
        if *self.stale_reads.lock().unwrap() {
            return Ok(Vec::new());
        }
        Ok(self.node_configs.lock().unwrap().values().cloned().collect())
    }

    async fn create_node_config(&self, config: &NodeConfig) -> Result<NodeConfig, StoreError> {
        let name = config.metadata.name.clone().unwrap_or_default();
        let mut configs = self.node_configs.lock().unwrap();
        if configs.contains_key(&name) {
            return Err(StoreError::AlreadyExists(name));
        }
        *self.node_config_creates.lock().unwrap() += 1;
        configs.insert(name, config.clone());
        Ok(config.clone())
    }

    async fn get_runtime_config(&self, name: &str) -> Result<RuntimeConfig, StoreError> {
        self.runtime_configs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn list_runtime_configs(&self) -> Result<Vec<RuntimeConfig>, StoreError> {
        Ok(self
            .runtime_configs
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect())
    }

    async fn update_runtime_config_status(
        &self,
        config: &RuntimeConfig,
    ) -> Result<RuntimeConfig, StoreError> {
        *self.status_updates.lock().unwrap() += 1;

        let mut failures = self.status_failures_remaining.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(StoreError::Conflict("simulated status conflict".to_string()));
        }
        drop(failures);

        let name = config.metadata.name.clone().unwrap_or_default();
        let mut configs = self.runtime_configs.lock().unwrap();
        match configs.get_mut(&name) {
            Some(stored) => {
                stored.status = config.status.clone();
                Ok(stored.clone())
            }
            None => Err(StoreError::NotFound(name)),
        }
    }
}
