//! Bookkeeping for a grain store: a fixed number of equally sized
//! containers, each holding a single kind of cereal.

pub mod cereal;
pub mod config;
pub mod error;
pub mod storage;

pub use cereal::Cereal;
pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use storage::{EMPTY_STORAGE, Quantity, SnapshotEntry, Storage, StorageSnapshot};

#[cfg(feature = "instrument")]
pub use instrument;
