//! runtime-ops CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the runtime-config controller:
//! - RuntimeConfig: the operator-facing resource describing the desired
//!   runtime deployment mode for a machine pool
//! - NodeConfig: the node-configuration artifact the controller converges
//!   onto the cluster (extension install or OS image swap)

pub mod node_config;
pub mod runtime_config;

pub use node_config::*;
pub use runtime_config::*;
