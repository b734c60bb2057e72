//! Test utilities for unit testing reconcilers
//!
//! Helpers for creating test fixtures and wiring the reconciler to the
//! in-memory mock store.

#![allow(dead_code)] // Not every test module uses every helper

use crate::reconciler::Reconciler;
use crate::reconciler::feature_gates::{
    FEATURE_GATES_CONFIG_MAP, FeatureGates, IMAGE_BASED_DEPLOYMENT, IMAGE_DEPLOY_CONFIG_MAP,
};
use cluster_store::MockStore;
use crds::{
    NodeConfig, NodeConfigSpec, OWNER_LABEL, POOL_ROLE_LABEL, RuntimeConfig, RuntimeConfigSpec,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Reconciler wired to a clone of the given mock store.
pub fn test_reconciler(store: &MockStore) -> Reconciler {
    Reconciler::new(Arc::new(store.clone()))
}

/// Gate resolver wired to a clone of the given mock store.
pub fn test_feature_gates(store: &MockStore) -> FeatureGates {
    FeatureGates::new(Arc::new(store.clone()))
}

/// RuntimeConfig fixture.
pub fn test_runtime_config(name: &str, machine_pool: &str) -> RuntimeConfig {
    RuntimeConfig::new(
        name,
        RuntimeConfigSpec {
            machine_pool: machine_pool.to_string(),
        },
    )
}

/// NodeConfig fixture carrying the identity labels the converger matches.
pub fn test_node_config(name: &str, owner: &str, machine_pool: &str) -> NodeConfig {
    let mut config = NodeConfig::new(
        name,
        NodeConfigSpec {
            os_image_url: None,
            kernel_arguments: Vec::new(),
            extensions: Vec::new(),
            config: serde_json::json!({ "version": "1.0.0" }),
        },
    );
    config.metadata.labels = Some(BTreeMap::from([
        (OWNER_LABEL.to_string(), owner.to_string()),
        (POOL_ROLE_LABEL.to_string(), machine_pool.to_string()),
    ]));
    config
}

/// Enable the image-deployment gate and populate its parameter ConfigMap.
pub fn enable_image_gate(store: &MockStore, params: &[(&str, &str)]) {
    store.add_config_map(FEATURE_GATES_CONFIG_MAP, &[(IMAGE_BASED_DEPLOYMENT, "true")]);
    store.add_config_map(IMAGE_DEPLOY_CONFIG_MAP, params);
}
