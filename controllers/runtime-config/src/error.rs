//! Controller-specific error types.
//!
//! This module defines error types specific to the runtime-config
//! controller that are not covered by upstream library errors.

use cluster_store::StoreError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the runtime-config controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Cluster object repository error
    #[error("cluster store error: {0}")]
    Store(#[from] StoreError),

    /// A mandatory parameter is absent for an enabled feature gate
    #[error("missing required parameter '{parameter}' for feature gate '{gate}'")]
    MissingParameter {
        /// The enabled gate whose parameters were incomplete
        gate: String,
        /// The absent parameter key
        parameter: String,
    },

    /// Status update retry budget exhausted
    #[error("status update deadline exceeded: {0}")]
    StatusTimeout(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
