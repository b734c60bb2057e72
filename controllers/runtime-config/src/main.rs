//! runtime-config controller
//!
//! Converges RuntimeConfig resources into node-configuration artifacts:
//! - Resolves operator feature gates from ConfigMaps with compiled-in
//!   default fallback
//! - Synthesizes exactly one NodeConfig variant (OS extension install or
//!   OS image swap with kernel arguments)
//! - Creates the artifact in the cluster at most once; an existing artifact
//!   is never rewritten
//! - Persists outcomes to the RuntimeConfig status with bounded retry

mod backoff;
mod controller;
mod error;
mod reconciler;
mod status;
mod watcher;
#[cfg(test)]
mod test_utils;

use crate::error::ControllerError;
use controller::Controller;
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting runtime-config controller");

    // Load configuration from environment variables
    let namespace =
        env::var("OPERATOR_NAMESPACE").unwrap_or_else(|_| "runtime-ops-system".to_string());

    info!("Configuration:");
    info!("  Operator namespace: {}", namespace);

    // Initialize and run controller
    let controller = Controller::new(namespace).await?;
    controller.run().await?;

    Ok(())
}
