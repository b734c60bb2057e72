//! NodeConfig CRD
//!
//! The node-configuration artifact the controller converges onto the
//! cluster. Exactly one of two mutually exclusive variants is populated:
//! an OS extension install, or an OS image swap with kernel arguments.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed name of the extension-variant NodeConfig.
pub const EXTENSION_NODE_CONFIG_NAME: &str = "50-enable-sandboxed-runtime-extension";

/// Fixed name of the image-variant NodeConfig.
pub const IMAGE_NODE_CONFIG_NAME: &str = "50-enable-sandboxed-runtime-image";

/// Label carrying the machine pool role the artifact targets.
pub const POOL_ROLE_LABEL: &str = "nodeconfiguration.runtime.microscaler.io/role";

/// Label binding the artifact to its owning RuntimeConfig by name.
pub const OWNER_LABEL: &str = "app";

/// The two fixed names a converged artifact may carry, regardless of which
/// variant is currently desired.
pub const NODE_CONFIG_NAMES: [&str; 2] = [EXTENSION_NODE_CONFIG_NAME, IMAGE_NODE_CONFIG_NAME];

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "runtime.microscaler.io",
    version = "v1alpha1",
    kind = "NodeConfig"
)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfigSpec {
    /// OS image reference URL (image variant only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_image_url: Option<String>,

    /// Ordered kernel arguments applied with the image (image variant only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kernel_arguments: Vec<String>,

    /// OS extension identifiers to install (extension variant only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,

    /// Versioned base configuration document. Opaque payload carried
    /// verbatim; the controller never interprets it.
    pub config: serde_json::Value,
}
