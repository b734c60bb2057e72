//! Cluster store errors

use thiserror::Error;

/// Errors that can occur when reading or writing cluster objects.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Create collided with an object that already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Write lost an optimistic-concurrency race; re-fetch and retry
    #[error("write conflict: {0}")]
    Conflict(String),

    /// Any other repository failure (transport, auth, serialization)
    #[error("api error: {0}")]
    Api(String),
}

impl StoreError {
    /// True if this is a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// True if a create failed because the object already exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }

    /// True if a write lost an optimistic-concurrency race.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}
