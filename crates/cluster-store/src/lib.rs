//! Cluster Object Repository Client
//!
//! A typed get/list/create/update-status interface over the cluster objects
//! the runtime-config controller works with: feature-gate ConfigMaps,
//! NodeConfig artifacts and RuntimeConfig owners.
//!
//! The `ClusterStore` trait is the seam the reconciler is written against;
//! `KubeStore` is the kube::Api-backed implementation and `MockStore`
//! (behind the `test-util` feature) is the in-memory double used by the
//! controller's unit tests.
//!
//! Errors are classified into the cases callers branch on: `NotFound` for
//! the converger's pre-create probe, `AlreadyExists` for the idempotent
//! duplicate-create race, and `Conflict` for optimistic-concurrency
//! failures during status writes.

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod store_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeStore;
pub use error::StoreError;
pub use store_trait::ClusterStore;
#[cfg(feature = "test-util")]
pub use mock::MockStore;
