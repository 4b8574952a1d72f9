// Container bookkeeping for a grain store

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cereal::Cereal;
use crate::config::StorageConfig;
use crate::error::{Result, StorageError};

pub type Quantity = f64;

/// Listing returned by `describe` when no container is allocated.
pub const EMPTY_STORAGE: &str = "Storage is empty";

/// A store of equally sized containers, at most one per cereal.
///
/// A cereal with no entry has no container. An entry holding 0 is an
/// allocated but empty container: `add_good(c, 0.0)` creates one and
/// `remove_container` frees it. Any `take_good` that leaves a container at
/// zero frees it on the spot.
#[derive(Debug, Clone)]
pub struct Storage {
    container_capacity: Quantity,
    storage_capacity: Quantity,
    fill_levels: HashMap<Cereal, Quantity>,
}

impl Storage {
    pub fn new(container_capacity: Quantity, storage_capacity: Quantity) -> Result<Self> {
        Self::from_config(&StorageConfig::new(container_capacity, storage_capacity))
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            container_capacity: config.container_capacity,
            storage_capacity: config.storage_capacity,
            fill_levels: HashMap::new(),
        })
    }

    pub fn container_capacity(&self) -> Quantity {
        self.container_capacity
    }

    pub fn storage_capacity(&self) -> Quantity {
        self.storage_capacity
    }

    pub fn config(&self) -> StorageConfig {
        StorageConfig::new(self.container_capacity, self.storage_capacity)
    }

    // === Mutations ===

    /// Pour `amount` of `cereal` into its container, allocating the container
    /// if there is none yet. Returns the part that did not fit.
    pub fn add_good(&mut self, cereal: Cereal, amount: Quantity) -> Result<Quantity> {
        check_amount(amount)?;

        let allocating = !self.fill_levels.contains_key(&cereal);
        if allocating {
            let containers = self.fill_levels.len();
            if (containers + 1) as Quantity * self.container_capacity > self.storage_capacity {
                #[cfg(feature = "instrument")]
                tracing::info!(
                    target: "storage_rejected",
                    cereal = %cereal,
                    amount = amount,
                    containers = containers as u64,
                );
                return Err(StorageError::CapacityExceeded {
                    cereal,
                    containers,
                    container_capacity: self.container_capacity,
                    storage_capacity: self.storage_capacity,
                });
            }
        }

        let new_amount = self.current_amount(cereal) + amount;
        let stored = new_amount.min(self.container_capacity);
        let remainder = (new_amount - self.container_capacity).max(0.0);
        self.fill_levels.insert(cereal, stored);

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "storage_add",
            cereal = %cereal,
            amount = amount,
            stored = stored,
            remainder = remainder,
            allocated = allocating,
            containers = self.fill_levels.len() as u64,
        );

        Ok(remainder)
    }

    /// Withdraw up to `amount` of `cereal`. Returns what was actually taken,
    /// 0 if there is no container. A container drained to zero is freed.
    pub fn take_good(&mut self, cereal: Cereal, amount: Quantity) -> Result<Quantity> {
        check_amount(amount)?;

        let current = self.current_amount(cereal);
        let taken = current.min(amount);
        let left = current - taken;

        #[cfg(feature = "instrument")]
        let released = left <= 0.0 && self.fill_levels.contains_key(&cereal);

        if left > 0.0 {
            self.fill_levels.insert(cereal, left);
        } else {
            self.fill_levels.remove(&cereal);
        }

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "storage_take",
            cereal = %cereal,
            requested = amount,
            taken = taken,
            left = left,
            released = released,
        );

        Ok(taken)
    }

    /// Free the container for `cereal`, only if it exists and is empty.
    pub fn remove_container(&mut self, cereal: Cereal) -> bool {
        let removed = match self.fill_levels.get(&cereal) {
            Some(&amount) if amount == 0.0 => {
                self.fill_levels.remove(&cereal);
                true
            }
            _ => false,
        };

        #[cfg(feature = "instrument")]
        tracing::info!(target: "storage_remove", cereal = %cereal, removed = removed);

        removed
    }

    // === Queries ===

    /// Current fill level, 0 when no container exists.
    pub fn current_amount(&self, cereal: Cereal) -> Quantity {
        self.fill_levels.get(&cereal).copied().unwrap_or(0.0)
    }

    /// Room left in the container for `cereal`.
    pub fn available_space(&self, cereal: Cereal) -> Result<Quantity> {
        let current = self
            .fill_levels
            .get(&cereal)
            .ok_or(StorageError::NotFound(cereal))?;
        Ok(self.container_capacity - current)
    }

    pub fn contains(&self, cereal: Cereal) -> bool {
        self.fill_levels.contains_key(&cereal)
    }

    pub fn container_count(&self) -> usize {
        self.fill_levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fill_levels.is_empty()
    }

    pub fn total_amount(&self) -> Quantity {
        self.fill_levels.values().sum()
    }

    /// Allocated containers and their fill levels, in map order.
    pub fn iter(&self) -> impl Iterator<Item = (Cereal, Quantity)> + '_ {
        self.fill_levels.iter().map(|(&c, &q)| (c, q))
    }

    /// One line per allocated container: `"{label}: {amount} of {capacity}"`.
    pub fn describe(&self) -> String {
        if self.fill_levels.is_empty() {
            return EMPTY_STORAGE.to_string();
        }

        self.fill_levels
            .iter()
            .map(|(cereal, amount)| {
                format!(
                    "{}: {} of {}",
                    cereal.label(),
                    amount,
                    self.container_capacity
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn snapshot(&self) -> StorageSnapshot {
        let mut entries: Vec<SnapshotEntry> = self
            .iter()
            .map(|(cereal, amount)| SnapshotEntry { cereal, amount })
            .collect();
        entries.sort_by_key(|e| e.cereal);

        StorageSnapshot {
            container_capacity: self.container_capacity,
            storage_capacity: self.storage_capacity,
            entries,
        }
    }
}

impl TryFrom<StorageConfig> for Storage {
    type Error = StorageError;

    fn try_from(config: StorageConfig) -> Result<Self> {
        Self::from_config(&config)
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn check_amount(amount: Quantity) -> Result<()> {
    if amount >= 0.0 {
        Ok(())
    } else {
        Err(StorageError::invalid(format!(
            "amount must be non-negative, got {amount}"
        )))
    }
}

// === Snapshot ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub cereal: Cereal,
    pub amount: Quantity,
}

/// Serializable view of a storage, entries ordered by cereal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSnapshot {
    pub container_capacity: Quantity,
    pub storage_capacity: Quantity,
    pub entries: Vec<SnapshotEntry>,
}
