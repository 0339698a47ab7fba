use crate::errors::{CarparkError, CarparkResult, ErrorKind};
use crate::store::KeyValueStoreProvider;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory key-value store.
///
/// # Purpose
/// `InMemoryStore` keeps every value in a concurrent map. It is the backend of
/// choice for unit tests and for sessions that do not need persistence, and it
/// honours the same contract as the persistent backends so code exercised
/// against it behaves identically elsewhere.
///
/// # Characteristics
/// - **Thread-Safe**: Clones share the same map
/// - **No Persistence**: All data is lost when the last clone is dropped
///
/// # Usage
/// ```text
/// let store = InMemoryStore::new();
/// store.set_item("carpark_guests", "[]").unwrap();
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new()),
        }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.inner.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.is_empty()
    }
}

impl KeyValueStoreProvider for InMemoryStore {
    fn open_or_create(&self) -> CarparkResult<()> {
        self.inner.ensure_open()
    }

    fn is_closed(&self) -> CarparkResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn get_item(&self, key: &str) -> CarparkResult<Option<String>> {
        self.inner.ensure_open()?;
        Ok(self.inner.items.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> CarparkResult<()> {
        self.inner.ensure_open()?;
        self.inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CarparkResult<()> {
        self.inner.ensure_open()?;
        self.inner.items.remove(key);
        Ok(())
    }

    fn close(&self) -> CarparkResult<()> {
        self.inner.closed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn store_version(&self) -> CarparkResult<String> {
        Ok(format!("InMemory/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[derive(Default)]
struct InMemoryStoreInner {
    items: DashMap<String, String>,
    closed: AtomicBool,
}

impl InMemoryStoreInner {
    fn new() -> InMemoryStoreInner {
        InMemoryStoreInner {
            items: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    #[inline]
    fn ensure_open(&self) -> CarparkResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("In-memory store is already closed");
            return Err(CarparkError::new(
                "Store is already closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }
}
