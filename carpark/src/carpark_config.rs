//! Configuration of a storage manager.

use crate::common::{
    atomic, Atomic, ReadExecutor, WriteExecutor, DEFAULT_REVENUE_PER_GUEST, DEFAULT_TOP_RECIPIENTS,
};
use crate::errors::{CarparkError, CarparkResult, ErrorKind};
use crate::manager::CsvKeyMapping;
use crate::model::Settings;
use crate::store::memory::InMemoryStoreModule;
use crate::store::{KeyValueStore, StoreModule};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared configuration of a storage manager.
///
/// Values are set through `StorageManagerBuilder` and frozen once the manager
/// is opened; every setter fails with `InvalidOperation` afterwards.
///
/// # Examples
///
/// ```rust,ignore
/// use carpark::manager::StorageManager;
///
/// let manager = StorageManager::builder()
///     .revenue_per_guest(40)
///     .top_recipients_limit(10)
///     .open()?;
/// assert_eq!(manager.config().revenue_per_guest(), 40);
/// ```
#[derive(Clone)]
pub struct CarparkConfig {
    inner: Arc<CarparkConfigInner>,
}

impl Default for CarparkConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CarparkConfig {
    pub fn new() -> Self {
        CarparkConfig {
            inner: Arc::new(CarparkConfigInner::new()),
        }
    }

    /// Amount each registered guest contributes to `totalRevenueImpact`.
    pub fn revenue_per_guest(&self) -> u64 {
        self.inner.revenue_per_guest.load(Ordering::Relaxed)
    }

    pub fn set_revenue_per_guest(&self, amount: u64) -> CarparkResult<()> {
        self.inner.ensure_not_configured("revenue per guest")?;
        self.inner.revenue_per_guest.store(amount, Ordering::Relaxed);
        Ok(())
    }

    /// Number of entries analytics report in `topRecipients`.
    pub fn top_recipients_limit(&self) -> usize {
        self.inner.top_recipients_limit.load(Ordering::Relaxed)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if `limit` is zero.
    pub fn set_top_recipients_limit(&self, limit: usize) -> CarparkResult<()> {
        self.inner.ensure_not_configured("top recipients limit")?;
        if limit == 0 {
            log::error!("Top recipients limit must be greater than zero");
            return Err(CarparkError::new(
                "Top recipients limit must be greater than zero",
                ErrorKind::ConfigError,
            ));
        }
        self.inner
            .top_recipients_limit
            .store(limit, Ordering::Relaxed);
        Ok(())
    }

    pub fn csv_key_mapping(&self) -> CsvKeyMapping {
        self.inner.csv_key_mapping.read_with(|it| *it)
    }

    pub fn set_csv_key_mapping(&self, mapping: CsvKeyMapping) -> CarparkResult<()> {
        self.inner.ensure_not_configured("CSV key mapping")?;
        self.inner.csv_key_mapping.write_with(|it| *it = mapping);
        Ok(())
    }

    /// Settings written when the settings record is absent or reset.
    pub fn default_settings(&self) -> Settings {
        self.inner.default_settings.read_with(|it| it.clone())
    }

    pub fn set_default_settings(&self, settings: Settings) -> CarparkResult<()> {
        self.inner.ensure_not_configured("default settings")?;
        self.inner.default_settings.write_with(|it| *it = settings);
        Ok(())
    }

    /// Whether `close()` flushes the backend before closing it.
    pub fn commit_on_close(&self) -> bool {
        self.inner.commit_on_close.load(Ordering::Relaxed)
    }

    pub fn set_commit_on_close(&self, commit: bool) -> CarparkResult<()> {
        self.inner.ensure_not_configured("commit on close")?;
        self.inner.commit_on_close.store(commit, Ordering::Relaxed);
        Ok(())
    }

    /// Loads the backend produced by `module`. Only one module may be loaded.
    pub fn load_module<T: StoreModule + 'static>(&self, module: T) -> CarparkResult<()> {
        self.inner.load_module(module)
    }

    /// The loaded backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreNotInitialized` before a module is loaded.
    pub fn store(&self) -> CarparkResult<KeyValueStore> {
        self.inner.store()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    /// Freezes the configuration, falls back to the in-memory backend when no
    /// module was loaded and opens the backend.
    pub(crate) fn initialize(&self) -> CarparkResult<KeyValueStore> {
        self.inner.initialize()
    }
}

struct CarparkConfigInner {
    configured: AtomicBool,
    revenue_per_guest: AtomicU64,
    top_recipients_limit: AtomicUsize,
    csv_key_mapping: Atomic<CsvKeyMapping>,
    default_settings: Atomic<Settings>,
    commit_on_close: AtomicBool,
    store: OnceLock<KeyValueStore>,
}

impl CarparkConfigInner {
    fn new() -> Self {
        CarparkConfigInner {
            configured: AtomicBool::new(false),
            revenue_per_guest: AtomicU64::new(DEFAULT_REVENUE_PER_GUEST),
            top_recipients_limit: AtomicUsize::new(DEFAULT_TOP_RECIPIENTS),
            csv_key_mapping: atomic(CsvKeyMapping::default()),
            default_settings: atomic(Settings::default()),
            commit_on_close: AtomicBool::new(true),
            store: OnceLock::new(),
        }
    }

    fn ensure_not_configured(&self, what: &str) -> CarparkResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("Cannot change {} after the manager is opened", what);
            return Err(CarparkError::new(
                &format!("Cannot change {} after the manager is opened", what),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn load_module<T: StoreModule + 'static>(&self, module: T) -> CarparkResult<()> {
        self.ensure_not_configured("the store module")?;
        if self.store.get().is_some() {
            log::error!("A store module is already loaded");
            return Err(CarparkError::new(
                "A store module is already loaded",
                ErrorKind::InvalidOperation,
            ));
        }

        let store = module.get_store()?;
        self.store.get_or_init(|| store);
        Ok(())
    }

    fn store(&self) -> CarparkResult<KeyValueStore> {
        match self.store.get() {
            Some(store) => Ok(store.clone()),
            None => {
                log::error!("No store module is loaded");
                Err(CarparkError::new(
                    "No store module is loaded",
                    ErrorKind::StoreNotInitialized,
                ))
            }
        }
    }

    fn initialize(&self) -> CarparkResult<KeyValueStore> {
        if self.configured.swap(true, Ordering::Relaxed) {
            log::error!("Configuration is already initialized");
            return Err(CarparkError::new(
                "Configuration is already initialized",
                ErrorKind::InvalidOperation,
            ));
        }

        if self.store.get().is_none() {
            log::debug!("No store module loaded, using the in-memory store");
            let store = InMemoryStoreModule::new().get_store()?;
            self.store.get_or_init(|| store);
        }

        let store = self.store()?;
        store.open_or_create()?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarparkConfig::new();
        assert_eq!(config.revenue_per_guest(), 25);
        assert_eq!(config.top_recipients_limit(), 5);
        assert_eq!(config.csv_key_mapping(), CsvKeyMapping::Explicit);
        assert_eq!(config.default_settings(), Settings::default());
        assert!(config.commit_on_close());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_setters() {
        let config = CarparkConfig::new();
        config.set_revenue_per_guest(40).unwrap();
        config.set_top_recipients_limit(3).unwrap();
        config.set_csv_key_mapping(CsvKeyMapping::Derived).unwrap();
        config.set_commit_on_close(false).unwrap();

        assert_eq!(config.revenue_per_guest(), 40);
        assert_eq!(config.top_recipients_limit(), 3);
        assert_eq!(config.csv_key_mapping(), CsvKeyMapping::Derived);
        assert!(!config.commit_on_close());
    }

    #[test]
    fn test_zero_top_recipients_rejected() {
        let config = CarparkConfig::new();
        let err = config.set_top_recipients_limit(0).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConfigError);
        assert_eq!(config.top_recipients_limit(), 5);
    }

    #[test]
    fn test_store_before_load_fails() {
        let config = CarparkConfig::new();
        let err = config.store().err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::StoreNotInitialized);
    }

    #[test]
    fn test_second_module_rejected() {
        let config = CarparkConfig::new();
        config.load_module(InMemoryStoreModule::new()).unwrap();
        let err = config.load_module(InMemoryStoreModule::new()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_initialize_falls_back_to_memory() {
        let config = CarparkConfig::new();
        let store = config.initialize().unwrap();
        assert!(store.store_version().unwrap().starts_with("InMemory/"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_frozen_after_initialize() {
        let config = CarparkConfig::new();
        config.initialize().unwrap();
        assert!(config.set_revenue_per_guest(1).is_err());
        assert!(config.set_default_settings(Settings::default()).is_err());
        assert!(config.load_module(InMemoryStoreModule::new()).is_err());
        assert!(config.initialize().is_err());
    }

    #[test]
    fn test_clones_share_values() {
        let config = CarparkConfig::new();
        let clone = config.clone();
        clone.set_revenue_per_guest(99).unwrap();
        assert_eq!(config.revenue_per_guest(), 99);
    }
}
