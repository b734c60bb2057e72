//! NodeConfig convergence.
//!
//! Strictly create-only: the desired artifact is created when no artifact
//! exists for the owner, and an existing artifact wins unconditionally,
//! even when it is not the variant the gates currently select. There is no
//! update path: rewriting a node configuration reboots every machine in
//! the pool, so an artifact is created at most once and never churned by
//! later feature-gate flips.

use super::Reconciler;
use crate::error::ControllerError;
use crds::{NODE_CONFIG_NAMES, NodeConfig, OWNER_LABEL};
use kube::ResourceExt;
use tracing::{debug, info, warn};

/// Result of a convergence pass.
#[derive(Debug)]
pub(crate) struct ConvergeOutcome {
    /// True only when this call performed the creation
    pub created: bool,
    /// Name of the artifact now authoritative for the owner
    pub node_config: String,
}

impl Reconciler {
    /// Converge the desired NodeConfig for `owner`.
    ///
    /// A "not found" on the pre-create probe is the expected path to
    /// creation; a create that collides with a concurrent creator counts
    /// as success without a creation. Any other repository error aborts
    /// the cycle.
    pub(crate) async fn converge(
        &self,
        owner: &str,
        desired: &NodeConfig,
    ) -> Result<ConvergeOutcome, ControllerError> {
        if let Some(existing) = self.existing_node_config(owner).await? {
            let existing_name = existing.name_any();
            info!(
                "NodeConfig {} is already present. No changes will be done",
                existing_name
            );
            return Ok(ConvergeOutcome {
                created: false,
                node_config: existing_name,
            });
        }

        let name = desired.name_any();
        match self.store.get_node_config(&name).await {
            Ok(_) => {
                // Appeared between the list and the probe
                debug!("NodeConfig {} appeared before creation", name);
                Ok(ConvergeOutcome {
                    created: false,
                    node_config: name,
                })
            }
            Err(e) if e.is_not_found() => {
                info!("Creating NodeConfig {}", name);
                match self.store.create_node_config(desired).await {
                    Ok(_) => {
                        info!("NodeConfig successfully created: {}", name);
                        Ok(ConvergeOutcome {
                            created: true,
                            node_config: name,
                        })
                    }
                    Err(e) if e.is_already_exists() => {
                        // Lost the creation race to another actor
                        warn!("NodeConfig {} was created concurrently", name);
                        Ok(ConvergeOutcome {
                            created: false,
                            node_config: name,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find any NodeConfig carrying the owner label under one of the two
    /// fixed variant names, regardless of which variant is currently
    /// desired. At most one such object is expected.
    async fn existing_node_config(
        &self,
        owner: &str,
    ) -> Result<Option<NodeConfig>, ControllerError> {
        debug!("Looking for existing NodeConfigs owned by {}", owner);

        let matches: Vec<NodeConfig> = self
            .store
            .list_node_configs()
            .await?
            .into_iter()
            .filter(|config| {
                let owned = config
                    .metadata
                    .labels
                    .as_ref()
                    .and_then(|labels| labels.get(OWNER_LABEL))
                    .is_some_and(|value| value == owner);
                owned && NODE_CONFIG_NAMES.contains(&config.name_any().as_str())
            })
            .collect();

        if matches.len() > 1 {
            warn!(
                "Found {} NodeConfigs owned by {}, expected at most one",
                matches.len(),
                owner
            );
        }

        Ok(matches.into_iter().next())
    }
}
