//! Persistent fjall backend for the car park registry.
//!
//! Load `FjallModule` into `StorageManager::builder()` to keep the registry in
//! an LSM-tree keyspace on disk instead of in memory.

mod config;
mod error;
mod module;
mod store;
mod version;

pub use config::*;
pub use error::FjallStoreError;
pub use module::*;
pub use store::FjallStore;
