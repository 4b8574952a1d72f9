use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::storage::Quantity;

/// Fixed capacities a storage is built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Maximum amount a single container holds.
    pub container_capacity: Quantity,
    /// Total capacity shared by all containers.
    pub storage_capacity: Quantity,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            container_capacity: 10.0,
            storage_capacity: 20.0,
        }
    }
}

impl StorageConfig {
    pub fn new(container_capacity: Quantity, storage_capacity: Quantity) -> Self {
        Self {
            container_capacity,
            storage_capacity,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: StorageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Written as negations so NaN fails too
        if !(self.container_capacity >= 0.0) {
            return Err(StorageError::invalid(format!(
                "container capacity must be non-negative, got {}",
                self.container_capacity
            )));
        }
        if !(self.storage_capacity >= self.container_capacity) {
            return Err(StorageError::invalid(format!(
                "storage capacity {} is less than container capacity {}",
                self.storage_capacity, self.container_capacity
            )));
        }
        if !self.storage_capacity.is_finite() {
            return Err(StorageError::invalid(format!(
                "storage capacity must be finite, got {}",
                self.storage_capacity
            )));
        }
        Ok(())
    }

    /// How many containers fit before the storage capacity is reached.
    /// Zero-capacity containers take no room, so there is no limit.
    pub fn max_containers(&self) -> usize {
        if self.container_capacity > 0.0 {
            (self.storage_capacity / self.container_capacity).floor() as usize
        } else {
            usize::MAX
        }
    }
}
