use crate::errors::CarparkResult;
use std::ops::Deref;
use std::sync::Arc;

/// Contract every key-value backend must follow.
///
/// Values are opaque text (the registry stores JSON documents). Operations are
/// synchronous and run to completion before returning.
///
/// # Implementations
/// - `InMemoryStore`: process-local storage for tests and temporary use
/// - `FjallStore`: persistent storage using the Fjall backend
///
/// # Thread Safety
/// Implementers must be `Send + Sync` so one store can back a shared manager.
pub trait KeyValueStoreProvider: Send + Sync {
    /// Opens or creates the underlying storage.
    ///
    /// Must be called before any other operation. Calling it on an already
    /// open store is a no-op.
    fn open_or_create(&self) -> CarparkResult<()>;

    /// Checks if the store has been closed.
    fn is_closed(&self) -> CarparkResult<bool>;

    /// Reads the value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists
    /// * `Ok(None)` if it does not
    /// * `Err(CarparkError)` if the backend fails
    fn get_item(&self, key: &str) -> CarparkResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> CarparkResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> CarparkResult<()>;

    /// Checks whether a value exists under `key`.
    fn has_item(&self, key: &str) -> CarparkResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }

    /// Flushes pending writes to durable storage.
    ///
    /// For in-memory stores this is a no-op.
    fn commit(&self) -> CarparkResult<()> {
        Ok(())
    }

    /// Closes the store. Further operations fail with `StoreAlreadyClosed`.
    fn close(&self) -> CarparkResult<()>;

    /// Returns a human-readable backend name and version.
    fn store_version(&self) -> CarparkResult<String>;
}

/// Cheap-to-clone handle to a key-value backend.
///
/// Wraps any `KeyValueStoreProvider` in an `Arc` and dereferences to it, so
/// clones share the same backend.
#[derive(Clone)]
pub struct KeyValueStore {
    inner: Arc<dyn KeyValueStoreProvider>,
}

impl KeyValueStore {
    pub fn new<T: KeyValueStoreProvider + 'static>(inner: T) -> Self {
        KeyValueStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for KeyValueStore {
    type Target = Arc<dyn KeyValueStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
