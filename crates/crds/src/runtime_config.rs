//! RuntimeConfig CRD
//!
//! Cluster-scoped resource describing the desired sandboxed-runtime
//! deployment mode for a pool of machines. One RuntimeConfig owns at most
//! one NodeConfig artifact at a time.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "runtime.microscaler.io",
    version = "v1alpha1",
    kind = "RuntimeConfig",
    status = "RuntimeConfigStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfigSpec {
    /// Machine pool role the node configuration targets (e.g. "worker").
    /// Attached to the NodeConfig artifact as its pool-role label.
    #[serde(default = "default_machine_pool")]
    pub machine_pool: String,
}

fn default_machine_pool() -> String {
    "worker".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfigStatus {
    /// Convergence state of the node-configuration artifact
    pub state: RuntimeState,

    /// Name of the NodeConfig artifact in force for this resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_config_name: Option<String>,

    /// Error message if the last reconcile failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Per-node failure records reported by node agents.
    /// Entries are only ever appended here; clearing them is owned by the
    /// status-reset path, not by the convergence engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_nodes: Vec<FailedNode>,
}

/// Convergence state of the owned NodeConfig artifact.
///
/// There is no `Updating` variant: a NodeConfig is created at most once
/// and never rewritten, since replacing a node configuration reboots
/// every machine in the pool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum RuntimeState {
    /// No artifact converged yet
    #[default]
    #[serde(alias = "pending")] // Backward compatibility: accept lowercase
    Pending,
    /// Artifact present in the cluster (created by us or pre-existing)
    #[serde(alias = "created")] // Backward compatibility: accept lowercase
    Created,
    /// Last reconcile failed
    #[serde(alias = "failed")] // Backward compatibility: accept lowercase
    Failed,
}

/// Failure record for a single node, reported through the status poller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailedNode {
    /// Node name
    pub name: String,

    /// Error message observed on that node
    pub error: String,
}
