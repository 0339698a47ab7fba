//! Key-value storage backends and abstractions.
//!
//! The registry persists every collection as one JSON text value under a fixed
//! key. The backend holding those values is pluggable:
//!
//! - **In-Memory Store**: `InMemoryStoreModule`, for tests and throwaway sessions
//! - **Fjall Store**: `carpark-fjall-adapter`, persistent LSM-based storage
//!
//! Backends implement `KeyValueStoreProvider` and are handed to the storage
//! manager through a `StoreModule`.

pub mod memory;
mod kv_store;
mod store_module;

pub use kv_store::*;
pub use store_module::*;
