//! Desired NodeConfig synthesis.
//!
//! Builds exactly one node-configuration artifact from the resolved
//! feature state: the OS image variant when the image-based deployment
//! gate is enabled, otherwise the OS extension variant. The two variants
//! are mutually exclusive; an artifact never carries both an extension
//! identifier and an image URL.

use super::Reconciler;
use super::feature_gates::IMAGE_BASED_DEPLOYMENT;
use crate::error::ControllerError;
use crds::{
    EXTENSION_NODE_CONFIG_NAME, IMAGE_NODE_CONFIG_NAME, NodeConfig, NodeConfigSpec, OWNER_LABEL,
    POOL_ROLE_LABEL,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Mandatory parameter carrying the OS image reference.
pub const OS_IMAGE_URL_PARAM: &str = "osImageURL";

/// Optional parameter carrying kernel arguments as one
/// whitespace-separated string.
pub const KERNEL_ARGUMENTS_PARAM: &str = "kernelArguments";

/// Version of the embedded base configuration document.
const BASE_DOCUMENT_VERSION: &str = "1.0.0";

/// Empty versioned base document embedded in both variants. Opaque
/// payload; nodes interpret it, this controller never does.
#[derive(Debug, Serialize)]
struct BaseDocument {
    version: &'static str,
}

fn base_document() -> Result<serde_json::Value, ControllerError> {
    serde_json::to_value(BaseDocument {
        version: BASE_DOCUMENT_VERSION,
    })
    .map_err(|e| ControllerError::InvalidConfig(format!("base document serialization: {e}")))
}

/// Resolve the OS extension identifier for the current platform.
fn extension_name() -> String {
    // Single identifier on every supported architecture today; the
    // per-platform split happens on the node side.
    "sandboxed-runtime".to_string()
}

fn identity_labels(owner: &str, machine_pool: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (POOL_ROLE_LABEL.to_string(), machine_pool.to_string()),
        (OWNER_LABEL.to_string(), owner.to_string()),
    ])
}

impl Reconciler {
    /// Synthesize the NodeConfig the resolved feature state selects,
    /// labeled with the owner and the machine pool it targets.
    pub(crate) async fn desired_node_config(
        &self,
        owner: &str,
        machine_pool: &str,
    ) -> Result<NodeConfig, ControllerError> {
        if self.gates.is_enabled(IMAGE_BASED_DEPLOYMENT).await {
            debug!("{} is enabled, synthesizing image NodeConfig", IMAGE_BASED_DEPLOYMENT);
            self.image_node_config(owner, machine_pool).await
        } else {
            debug!("{} is disabled, synthesizing extension NodeConfig", IMAGE_BASED_DEPLOYMENT);
            Self::extension_node_config(owner, machine_pool)
        }
    }

    /// Build the extension variant.
    fn extension_node_config(
        owner: &str,
        machine_pool: &str,
    ) -> Result<NodeConfig, ControllerError> {
        let mut config = NodeConfig::new(
            EXTENSION_NODE_CONFIG_NAME,
            NodeConfigSpec {
                os_image_url: None,
                kernel_arguments: Vec::new(),
                extensions: vec![extension_name()],
                config: base_document()?,
            },
        );
        config.metadata.labels = Some(identity_labels(owner, machine_pool));
        Ok(config)
    }

    /// Build the image variant from the gate's parameter ConfigMap.
    async fn image_node_config(
        &self,
        owner: &str,
        machine_pool: &str,
    ) -> Result<NodeConfig, ControllerError> {
        let params = self.gates.gate_params(IMAGE_BASED_DEPLOYMENT).await;

        // osImageURL is mandatory for the image variant
        let os_image_url =
            params
                .get(OS_IMAGE_URL_PARAM)
                .cloned()
                .ok_or_else(|| ControllerError::MissingParameter {
                    gate: IMAGE_BASED_DEPLOYMENT.to_string(),
                    parameter: OS_IMAGE_URL_PARAM.to_string(),
                })?;

        // Kernel arguments are stored as a single string, e.g. "a=b c=d",
        // split here into individual arguments. An absent or empty value
        // yields an empty argument list.
        let kernel_arguments = params
            .get(KERNEL_ARGUMENTS_PARAM)
            .map(String::as_str)
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let mut config = NodeConfig::new(
            IMAGE_NODE_CONFIG_NAME,
            NodeConfigSpec {
                os_image_url: Some(os_image_url),
                kernel_arguments,
                extensions: Vec::new(),
                config: base_document()?,
            },
        );
        config.metadata.labels = Some(identity_labels(owner, machine_pool));
        Ok(config)
    }
}
