//! Feature gate resolution.
//!
//! Gates are simple booleans for experimental features, read from a shared
//! ConfigMap in the operator namespace. Any configuration specific to one
//! gate lives in that gate's own ConfigMap, looked up through a static
//! name table. When a feature stabilizes it moves into RuntimeConfig.spec
//! and its gate is retired.
//!
//! Resolution never fails the caller: a missing ConfigMap, a missing key
//! or a read outage falls through to the compiled-in defaults, and a gate
//! unknown to both sources resolves to disabled.

use cluster_store::ClusterStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Gate for the experimental time-travel feature.
pub const TIME_TRAVEL: &str = "timeTravel";

/// Gate selecting the image-based NodeConfig variant.
pub const IMAGE_BASED_DEPLOYMENT: &str = "imageBasedDeployment";

/// Gate for registering extra runtime classes. Resolves like any other
/// gate but carries no parameters and no handler yet; extension point.
pub const ADDITIONAL_RUNTIME_CLASSES: &str = "additionalRuntimeClasses";

/// Shared ConfigMap holding the on/off state of every gate.
pub const FEATURE_GATES_CONFIG_MAP: &str = "runtime-feature-gates";

/// Parameter ConfigMap for the image-based deployment gate.
pub const IMAGE_DEPLOY_CONFIG_MAP: &str = "runtime-feature-gate-image-deploy-config";

/// Compiled-in defaults applied when the shared ConfigMap is missing or
/// does not define a gate.
fn default_for(feature: &str) -> Option<bool> {
    match feature {
        TIME_TRAVEL | IMAGE_BASED_DEPLOYMENT | ADDITIONAL_RUNTIME_CLASSES => Some(false),
        _ => None,
    }
}

/// Get the parameter ConfigMap name for a feature gate. Gates without
/// parameters have no entry.
pub fn gate_config_map_name(feature: &str) -> Option<&'static str> {
    match feature {
        IMAGE_BASED_DEPLOYMENT => Some(IMAGE_DEPLOY_CONFIG_MAP),
        _ => None,
    }
}

/// True when `name` is one of the ConfigMaps feeding gate resolution.
pub fn is_feature_gate_config_map(name: &str) -> bool {
    matches!(name, FEATURE_GATES_CONFIG_MAP | IMAGE_DEPLOY_CONFIG_MAP)
}

/// Resolves feature gate state from cluster configuration.
pub struct FeatureGates {
    store: Arc<dyn ClusterStore>,
}

impl FeatureGates {
    /// Creates a resolver reading through the given store.
    pub fn new(store: Arc<dyn ClusterStore>) -> Self {
        Self { store }
    }

    /// Resolve a gate to a definite boolean.
    ///
    /// Resolution order: explicit key in the shared ConfigMap (compared
    /// case-sensitively against the literal string "true"), then the
    /// default table, then disabled.
    pub async fn is_enabled(&self, feature: &str) -> bool {
        match self.store.config_map_data(FEATURE_GATES_CONFIG_MAP).await {
            Ok(data) => {
                if let Some(value) = data.get(feature) {
                    return value == "true";
                }
            }
            Err(e) => warn!("Error fetching feature gates: {}", e),
        }

        default_for(feature).unwrap_or(false)
    }

    /// Full key/value parameter data for a gate, or an empty map when the
    /// gate has no parameter ConfigMap or the read fails.
    pub async fn gate_params(&self, feature: &str) -> BTreeMap<String, String> {
        let Some(name) = gate_config_map_name(feature) else {
            return BTreeMap::new();
        };

        match self.store.config_map_data(name).await {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Error fetching parameters for feature gate {}: {}",
                    feature, e
                );
                BTreeMap::new()
            }
        }
    }
}
