use crate::errors::CarparkResult;
use crate::store::memory::InMemoryStore;
use crate::store::{KeyValueStore, KeyValueStoreProvider, StoreModule};

/// Store module producing a fresh `InMemoryStore` for every manager opened on it.
#[derive(Default)]
pub struct InMemoryStoreModule {
    seed: Vec<(String, String)>,
}

impl InMemoryStoreModule {
    pub fn new() -> InMemoryStoreModule {
        InMemoryStoreModule { seed: Vec::new() }
    }

    pub fn with_config() -> InMemoryStoreModuleBuilder {
        InMemoryStoreModuleBuilder::new()
    }
}

impl StoreModule for InMemoryStoreModule {
    fn get_store(&self) -> CarparkResult<KeyValueStore> {
        let store = InMemoryStore::new();
        for (key, value) in &self.seed {
            store.set_item(key, value)?;
        }
        Ok(KeyValueStore::new(store))
    }
}

#[derive(Default)]
pub struct InMemoryStoreModuleBuilder {
    seed: Vec<(String, String)>,
}

impl InMemoryStoreModuleBuilder {
    pub fn new() -> InMemoryStoreModuleBuilder {
        InMemoryStoreModuleBuilder { seed: Vec::new() }
    }

    /// Pre-populates `key` with `value` in every store the module produces.
    pub fn seed(mut self, key: &str, value: &str) -> Self {
        self.seed.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> InMemoryStoreModule {
        InMemoryStoreModule { seed: self.seed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_module_get_store() {
        let module = InMemoryStoreModule::new();
        let store = module.get_store().unwrap();
        assert!(!store.is_closed().unwrap());
        assert_eq!(store.get_item("carpark_guests").unwrap(), None);
    }

    #[test]
    fn test_each_store_is_independent() {
        let module = InMemoryStoreModule::new();
        let first = module.get_store().unwrap();
        let second = module.get_store().unwrap();
        first.set_item("k", "v").unwrap();
        assert_eq!(second.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_builder_seeds_entries() {
        let module = InMemoryStoreModule::with_config()
            .seed("carpark_guests", "not json")
            .seed("carpark_emails", "[]")
            .build();
        let store = module.get_store().unwrap();
        assert_eq!(store.get_item("carpark_guests").unwrap().as_deref(), Some("not json"));
        assert_eq!(store.get_item("carpark_emails").unwrap().as_deref(), Some("[]"));
    }
}
