use crate::config::FjallConfig;
use crate::store::FjallStore;
use carpark::errors::CarparkResult;
use carpark::store::{KeyValueStore, StoreModule};
use fjall::CompressionType;

/// Store module keeping the registry in a fjall keyspace on disk.
///
/// Load it into the storage manager builder before opening the manager.
///
/// # Examples
///
/// ```rust,ignore
/// use carpark::manager::StorageManager;
/// use carpark_fjall_adapter::FjallModule;
///
/// let manager = StorageManager::builder()
///     .load_module(
///         FjallModule::with_config()
///             .db_path("/var/lib/carpark")
///             .build(),
///     )
///     .open()?;
/// ```
///
/// # Configuration Presets
///
/// - `production_preset()` - periodic fsync and a larger cache
/// - `low_memory_preset()` - single workers and small buffers
pub struct FjallModule {
    store_config: FjallConfig,
}

impl FjallModule {
    #[inline]
    pub fn with_config() -> FjallModuleBuilder {
        FjallModuleBuilder::new()
    }

    pub fn config(&self) -> FjallConfig {
        self.store_config.clone()
    }
}

impl StoreModule for FjallModule {
    fn get_store(&self) -> CarparkResult<KeyValueStore> {
        let store = FjallStore::new(self.store_config.clone());
        Ok(KeyValueStore::new(store))
    }
}

/// Fluent builder for `FjallModule`.
pub struct FjallModuleBuilder {
    store_config: FjallConfig,
}

impl Default for FjallModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FjallModuleBuilder {
    #[inline]
    pub fn new() -> FjallModuleBuilder {
        FjallModuleBuilder {
            store_config: FjallConfig::new(),
        }
    }

    /// Durable settings for a front desk that must not lose registrations:
    /// - 64 MB block cache
    /// - fsync every 100ms
    /// - LZ4 compression with bloom filters
    #[inline]
    pub fn production_preset(self) -> Self {
        let cpus = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(4);

        self.cache_capacity(64 * 1024 * 1024)
            .max_write_buffer_size(64 * 1024 * 1024)
            .max_memtable_size(16 * 1024 * 1024)
            .flush_workers((cpus / 2).max(1))
            .compaction_workers((cpus / 2).max(1))
            .bloom_filter_bits(10)
            .fsync_frequency(100)
            .commit_before_close(true)
            .compression_type(CompressionType::Lz4)
    }

    /// Minimal footprint for kiosks and development machines.
    #[inline]
    pub fn low_memory_preset(self) -> Self {
        self.cache_capacity(4 * 1024 * 1024)
            .max_write_buffer_size(8 * 1024 * 1024)
            .max_memtable_size(2 * 1024 * 1024)
            .max_journaling_size(16 * 1024 * 1024)
            .flush_workers(1)
            .compaction_workers(1)
            .bloom_filter_bits(10)
    }

    #[inline]
    pub fn db_path(self, db_path: &str) -> Self {
        self.store_config.set_db_path(db_path);
        self
    }

    #[inline]
    pub fn partition_name(self, partition_name: &str) -> Self {
        self.store_config.set_partition_name(partition_name);
        self
    }

    #[inline]
    pub fn manual_journal_persist(self, manual_journal_persist: bool) -> Self {
        self.store_config
            .set_manual_journal_persist(manual_journal_persist);
        self
    }

    #[inline]
    pub fn flush_workers(self, flush_workers_count: usize) -> Self {
        self.store_config.set_flush_workers(flush_workers_count);
        self
    }

    #[inline]
    pub fn compaction_workers(self, compaction_workers_count: usize) -> Self {
        self.store_config
            .set_compaction_workers(compaction_workers_count);
        self
    }

    #[inline]
    pub fn cache_capacity(self, cache_capacity: u64) -> Self {
        self.store_config.set_cache_capacity(cache_capacity);
        self
    }

    #[inline]
    pub fn max_journaling_size(self, max_journaling_size: u64) -> Self {
        self.store_config.set_max_journaling_size(max_journaling_size);
        self
    }

    #[inline]
    pub fn max_write_buffer_size(self, max_write_buffer_size: u64) -> Self {
        self.store_config
            .set_max_write_buffer_size(max_write_buffer_size);
        self
    }

    #[inline]
    pub fn fsync_frequency(self, fsync_frequency: u16) -> Self {
        self.store_config.set_fsync_frequency(fsync_frequency);
        self
    }

    #[inline]
    pub fn commit_before_close(self, commit_before_close: bool) -> Self {
        self.store_config.set_commit_before_close(commit_before_close);
        self
    }

    #[inline]
    pub fn bloom_filter_bits(self, bloom_filter_bits: u8) -> Self {
        self.store_config
            .set_bloom_filter_bits(bloom_filter_bits.min(i8::MAX as u8) as i8);
        self
    }

    #[inline]
    pub fn disable_bloom_filter(self) -> Self {
        self.store_config.set_bloom_filter_bits(-1);
        self
    }

    #[inline]
    pub fn compression_type(self, compression_type: CompressionType) -> Self {
        self.store_config.set_compression_type(compression_type);
        self
    }

    #[inline]
    pub fn max_memtable_size(self, max_memtable_size: u32) -> Self {
        self.store_config.set_max_memtable_size(max_memtable_size);
        self
    }

    #[inline]
    pub fn build(self) -> FjallModule {
        FjallModule {
            store_config: self.store_config,
        }
    }
}
