use crate::carpark_config::CarparkConfig;
use crate::errors::{CarparkError, CarparkResult};
use crate::manager::{CsvKeyMapping, StorageManager};
use crate::model::Settings;
use crate::store::StoreModule;

/// Builder for opening a `StorageManager`.
///
/// Configuration errors are captured as they happen and the first one is
/// returned from `open()`, so calls can be chained without checking each.
///
/// # Examples
///
/// ```rust,ignore
/// use carpark::manager::StorageManager;
/// use carpark_fjall_adapter::FjallModule;
///
/// let manager = StorageManager::builder()
///     .load_module(FjallModule::with_config().db_path("/tmp/carpark").build())
///     .revenue_per_guest(30)
///     .open()?;
/// ```
#[derive(Default)]
pub struct StorageManagerBuilder {
    error: Option<CarparkError>,
    config: CarparkConfig,
}

impl StorageManagerBuilder {
    /// A builder with default configuration and no backend. Without a loaded
    /// module the manager opens on a fresh in-memory store.
    pub fn new() -> Self {
        StorageManagerBuilder {
            error: None,
            config: CarparkConfig::new(),
        }
    }

    /// Loads the module providing the key-value backend.
    pub fn load_module<T: StoreModule + 'static>(mut self, module: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.load_module(module) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn revenue_per_guest(mut self, amount: u64) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_revenue_per_guest(amount) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Must be greater than zero.
    pub fn top_recipients_limit(mut self, limit: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_top_recipients_limit(limit) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn csv_key_mapping(mut self, mapping: CsvKeyMapping) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_csv_key_mapping(mapping) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn default_settings(mut self, settings: Settings) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_default_settings(settings) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn commit_on_close(mut self, commit: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_commit_on_close(commit) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens the backend and initializes any missing collections.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error captured by the builder, or the
    /// backend error if the store cannot be opened or initialized.
    pub fn open(self) -> CarparkResult<StorageManager> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let store = self.config.initialize()?;
        let manager = StorageManager::new(self.config, store);
        manager.initialize_storage()?;
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CarparkResult, ErrorKind};
    use crate::store::memory::InMemoryStoreModule;
    use crate::store::KeyValueStore;

    struct FailingModule;

    impl StoreModule for FailingModule {
        fn get_store(&self) -> CarparkResult<KeyValueStore> {
            Err(CarparkError::new("disk unavailable", ErrorKind::IOError))
        }
    }

    #[test]
    fn test_open_with_defaults() {
        let manager = StorageManagerBuilder::new().open().unwrap();
        assert_eq!(manager.config().revenue_per_guest(), 25);
        assert!(manager.get_guests().unwrap().is_empty());
    }

    #[test]
    fn test_open_applies_configuration() {
        let manager = StorageManagerBuilder::new()
            .load_module(InMemoryStoreModule::new())
            .revenue_per_guest(10)
            .top_recipients_limit(2)
            .csv_key_mapping(CsvKeyMapping::Derived)
            .commit_on_close(false)
            .open()
            .unwrap();
        let config = manager.config();
        assert_eq!(config.revenue_per_guest(), 10);
        assert_eq!(config.top_recipients_limit(), 2);
        assert_eq!(config.csv_key_mapping(), CsvKeyMapping::Derived);
        assert!(!config.commit_on_close());
    }

    #[test]
    fn test_first_error_is_reported() {
        let result = StorageManagerBuilder::new()
            .top_recipients_limit(0)
            .load_module(FailingModule)
            .open();
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::ConfigError);
    }

    #[test]
    fn test_module_error_is_reported() {
        let result = StorageManagerBuilder::new().load_module(FailingModule).open();
        assert_eq!(result.err().unwrap().kind(), &ErrorKind::IOError);
    }

    #[test]
    fn test_default_settings_are_written() {
        let settings = Settings {
            hotel_name: "Harbour Inn".to_string(),
            ..Settings::default()
        };
        let manager = StorageManagerBuilder::new()
            .default_settings(settings.clone())
            .open()
            .unwrap();
        assert_eq!(manager.get_settings().unwrap(), settings);
    }
}
