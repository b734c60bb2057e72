//! Kubernetes resource watchers.
//!
//! Watches RuntimeConfig resources and the feature-gate ConfigMaps and
//! triggers reconciliation using kube_runtime::Controller.
//!
//! Both watchers go through a generic `watch_resource()` helper that
//! handles the reconcile loop with automatic reconnection and per-resource
//! backoff on errors.

use crate::error::ControllerError;
use crate::reconciler::{Reconciler, feature_gates};
use crds::RuntimeConfig;
use futures::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, ResourceExt};
use kube_runtime::{
    Controller,
    controller::{Action, Config as ControllerConfig},
    watcher,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Delay before a successfully reconciled RuntimeConfig is reconciled
/// again. Periodic re-reconciliation is what recovers owners whose status
/// update timed out.
const RESYNC_INTERVAL: Duration = Duration::from_secs(600);

/// Generic watcher helper over kube_runtime::Controller.
///
/// - Handles automatic reconnection and watch restarts
/// - Debounces event bursts and bounds concurrent reconciles
/// - Requeues failed resources with their Fibonacci backoff
async fn watch_resource<K, F>(
    api: Api<K>,
    reconciler: Arc<Reconciler>,
    reconcile_fn: F,
    resource_name: &str,
) -> Result<(), ControllerError>
where
    K: kube::Resource + Clone + Send + Sync + 'static + std::fmt::Debug + serde::de::DeserializeOwned,
    K::DynamicType: Default + std::cmp::Eq + std::hash::Hash + Clone + std::fmt::Debug + Unpin,
    F: Fn(Arc<Reconciler>, Arc<K>) -> Pin<Box<dyn Future<Output = Result<Action, ControllerError>> + Send>>
        + Send
        + Sync
        + Clone
        + 'static,
{
    info!("Starting {} watcher", resource_name);

    // Error policy: requeue with the resource's backoff so repeated
    // failures slow down instead of hot-looping
    let error_policy = {
        let resource_name = resource_name.to_string();
        move |obj: Arc<K>, error: &ControllerError, ctx: Arc<Reconciler>| {
            let key = obj.name_any();
            error!("Reconciliation error for {} {}: {}", resource_name, key, error);
            ctx.increment_error(&key);
            let (backoff_seconds, error_count) = ctx.backoff_for_resource(&key);
            debug!(
                "Requeueing {} {} in {}s (error #{})",
                resource_name, key, backoff_seconds, error_count
            );
            Action::requeue(Duration::from_secs(backoff_seconds))
        }
    };

    // Reconcile function: wraps the reconciler call with debug logging
    let reconcile = {
        let resource_name = resource_name.to_string();
        move |obj: Arc<K>, ctx: Arc<Reconciler>| {
            let reconcile_fn = reconcile_fn.clone();
            let resource_name = resource_name.clone();
            async move {
                debug!("Reconciling {} {}", resource_name, obj.name_any());
                reconcile_fn(ctx, obj).await
            }
        }
    };

    // Debounce batches bursts of events (e.g. spec write immediately
    // followed by a status write); concurrency bounds parallel reconciles
    // per watcher
    let controller_config = ControllerConfig::default()
        .debounce(Duration::from_secs(5))
        .concurrency(3);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .run(reconcile, error_policy, reconciler)
        .for_each(|res| async move {
            if let Err(e) = res {
                error!("Controller error: {}", e);
            }
        })
        .await;

    Ok(())
}

/// Watches cluster resources for changes.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    runtime_config_api: Api<RuntimeConfig>,
    config_map_api: Api<ConfigMap>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        reconciler: Arc<Reconciler>,
        runtime_config_api: Api<RuntimeConfig>,
        config_map_api: Api<ConfigMap>,
    ) -> Self {
        Self {
            reconciler,
            runtime_config_api,
            config_map_api,
        }
    }

    /// Watches RuntimeConfig resources and reconciles them on change.
    pub async fn watch_runtime_configs(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.runtime_config_api.clone(),
            self.reconciler.clone(),
            |ctx, obj: Arc<RuntimeConfig>| {
                Box::pin(async move {
                    ctx.reconcile_runtime_config(&obj).await?;
                    Ok(Action::requeue(RESYNC_INTERVAL))
                })
            },
            "RuntimeConfig",
        )
        .await
    }

    /// Watches ConfigMaps in the operator namespace. A change to one of
    /// the feature-gate ConfigMaps re-reconciles every RuntimeConfig,
    /// since gates are global and any owner may be affected.
    pub async fn watch_feature_gate_config_maps(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.config_map_api.clone(),
            self.reconciler.clone(),
            |ctx, obj: Arc<ConfigMap>| {
                Box::pin(async move {
                    let name = obj.name_any();
                    if !feature_gates::is_feature_gate_config_map(&name) {
                        return Ok(Action::await_change());
                    }

                    info!(
                        "Feature gate ConfigMap {} changed, re-reconciling RuntimeConfigs",
                        name
                    );
                    for config in ctx.list_runtime_configs().await? {
                        if let Err(e) = ctx.reconcile_runtime_config(&config).await {
                            error!(
                                "Failed to reconcile RuntimeConfig {} after ConfigMap change: {}",
                                config.name_any(),
                                e
                            );
                        }
                    }
                    Ok(Action::await_change())
                })
            },
            "ConfigMap",
        )
        .await
    }
}
