use crate::errors::CarparkResult;
use crate::store::KeyValueStore;

/// Factory for the key-value backend a storage manager is opened on.
pub trait StoreModule {
    fn get_store(&self) -> CarparkResult<KeyValueStore>;
}
