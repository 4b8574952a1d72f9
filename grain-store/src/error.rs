//! Errors reported by storage operations.
//!
//! Every failure leaves the storage unchanged. Outcomes that are normal
//! for the model (nothing to take, nothing to remove) are plain return
//! values, not errors.

use thiserror::Error;

use crate::cereal::Cereal;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Negative or NaN amount, or capacities that break the storage invariants
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocating one more container would overrun the storage capacity
    #[error(
        "no room for a {cereal} container: {containers} allocated x {container_capacity} per container, storage holds {storage_capacity}"
    )]
    CapacityExceeded {
        cereal: Cereal,
        containers: usize,
        container_capacity: f64,
        storage_capacity: f64,
    },

    /// No container is allocated for this cereal
    #[error("no container allocated for {0}")]
    NotFound(Cereal),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
