//! Prints the CRD manifests for all runtime-ops kinds to stdout.
//!
//! Usage: `cargo run --bin crdgen > config/crd/runtime-ops.yaml`

use anyhow::Result;
use crds::{NodeConfig, RuntimeConfig};
use kube::CustomResourceExt;

fn main() -> Result<()> {
    print!("{}", serde_yaml::to_string(&RuntimeConfig::crd())?);
    println!("---");
    print!("{}", serde_yaml::to_string(&NodeConfig::crd())?);
    Ok(())
}
