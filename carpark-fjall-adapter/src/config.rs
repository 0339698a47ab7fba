use carpark::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use fjall::{CompressionType, Config, PartitionCreateOptions};
use std::sync::atomic::{AtomicBool, AtomicI8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Settings of a fjall-backed registry store.
///
/// Cloneable and thread-safe: clones share one `Arc<FjallConfigInner>` and
/// every value is held in an atomic. Values are set through
/// `FjallModuleBuilder` and read when the store is opened.
///
/// The registry keeps four small JSON values, so the defaults are modest
/// compared to a general purpose database.
#[derive(Clone)]
pub struct FjallConfig {
    inner: Arc<FjallConfigInner>,
}

impl Default for FjallConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FjallConfig {
    #[inline]
    pub fn new() -> FjallConfig {
        FjallConfig {
            inner: Arc::new(FjallConfigInner::new()),
        }
    }

    /// Translates the settings into fjall's keyspace configuration.
    pub(crate) fn keyspace_config(&self) -> Config {
        let mut config = Config::new(self.db_path())
            .manual_journal_persist(self.manual_journal_persist())
            .flush_workers(self.flush_workers())
            .compaction_workers(self.compaction_workers())
            .cache_size(self.cache_capacity())
            .max_journaling_size(self.max_journaling_size())
            .max_write_buffer_size(self.max_write_buffer_size());

        if self.fsync_frequency() > 0 {
            config = config.fsync_ms(Some(self.fsync_frequency()));
        }
        config
    }

    /// Translates the settings into the options of the registry partition.
    pub(crate) fn partition_config(&self) -> PartitionCreateOptions {
        let bloom_filter_bits = match self.bloom_filter_bits() {
            bits if bits < 0 => None,
            bits => Some(bits as u8),
        };
        PartitionCreateOptions::default()
            .bloom_filter_bits(bloom_filter_bits)
            .compression(self.compression_type())
            .max_memtable_size(self.max_memtable_size())
    }

    #[inline]
    pub fn db_path(&self) -> String {
        self.inner.db_path.read_with(|it| it.clone())
    }

    #[inline]
    pub(crate) fn set_db_path(&self, db_path: &str) {
        self.inner.db_path.write_with(|it| *it = db_path.to_string())
    }

    /// Name of the fjall partition the registry keys live in.
    #[inline]
    pub fn partition_name(&self) -> String {
        self.inner.partition_name.read_with(|it| it.clone())
    }

    #[inline]
    pub(crate) fn set_partition_name(&self, name: &str) {
        self.inner.partition_name.write_with(|it| *it = name.to_string())
    }

    #[inline]
    pub fn manual_journal_persist(&self) -> bool {
        self.inner.manual_journal_persist.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_manual_journal_persist(&self, value: bool) {
        self.inner
            .manual_journal_persist
            .store(value, Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_workers(&self) -> usize {
        self.inner.flush_workers.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_flush_workers(&self, count: usize) {
        self.inner.flush_workers.store(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn compaction_workers(&self) -> usize {
        self.inner.compaction_workers.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_compaction_workers(&self, count: usize) {
        self.inner.compaction_workers.store(count, Ordering::Relaxed)
    }

    /// Block cache size in bytes.
    #[inline]
    pub fn cache_capacity(&self) -> u64 {
        self.inner.cache_capacity.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_cache_capacity(&self, bytes: u64) {
        self.inner.cache_capacity.store(bytes, Ordering::Relaxed)
    }

    #[inline]
    pub fn max_journaling_size(&self) -> u64 {
        self.inner.max_journaling_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_max_journaling_size(&self, bytes: u64) {
        self.inner.max_journaling_size.store(bytes, Ordering::Relaxed)
    }

    #[inline]
    pub fn max_write_buffer_size(&self) -> u64 {
        self.inner.max_write_buffer_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_max_write_buffer_size(&self, bytes: u64) {
        self.inner.max_write_buffer_size.store(bytes, Ordering::Relaxed)
    }

    /// Background fsync interval in milliseconds; 0 leaves syncing to commits.
    #[inline]
    pub fn fsync_frequency(&self) -> u16 {
        self.inner.fsync_frequency.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_fsync_frequency(&self, millis: u16) {
        self.inner.fsync_frequency.store(millis, Ordering::Relaxed)
    }

    /// Whether closing (or dropping) the store persists the journal first.
    #[inline]
    pub fn commit_before_close(&self) -> bool {
        self.inner.commit_before_close.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_commit_before_close(&self, value: bool) {
        self.inner.commit_before_close.store(value, Ordering::Relaxed)
    }

    /// Bloom filter bits per key; negative disables the filter.
    #[inline]
    pub fn bloom_filter_bits(&self) -> i8 {
        self.inner.bloom_filter_bits.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_bloom_filter_bits(&self, bits: i8) {
        self.inner.bloom_filter_bits.store(bits, Ordering::Relaxed)
    }

    #[inline]
    pub fn compression_type(&self) -> CompressionType {
        self.inner.compression_type.read_with(|it| it.clone())
    }

    #[inline]
    pub(crate) fn set_compression_type(&self, compression_type: CompressionType) {
        self.inner
            .compression_type
            .write_with(|it| *it = compression_type)
    }

    #[inline]
    pub fn max_memtable_size(&self) -> u32 {
        self.inner.max_memtable_size.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_max_memtable_size(&self, bytes: u32) {
        self.inner.max_memtable_size.store(bytes, Ordering::Relaxed)
    }
}

struct FjallConfigInner {
    db_path: Atomic<String>,
    partition_name: Atomic<String>,
    manual_journal_persist: AtomicBool,
    flush_workers: AtomicUsize,
    compaction_workers: AtomicUsize,
    cache_capacity: AtomicU64,
    max_journaling_size: AtomicU64,
    max_write_buffer_size: AtomicU64,
    fsync_frequency: AtomicU16,
    commit_before_close: AtomicBool,
    bloom_filter_bits: AtomicI8,
    compression_type: Atomic<CompressionType>,
    max_memtable_size: AtomicU32,
}

impl FjallConfigInner {
    pub const DEFAULT_PARTITION: &'static str = "carpark";
    pub const DEFAULT_CACHE_MB: u64 = 16;
    pub const DEFAULT_WRITE_BUFFER_MB: u64 = 32;
    pub const DEFAULT_MAX_JOURNALING_MB: u64 = 64;
    pub const DEFAULT_MEMTABLE_MB: u32 = 8;

    fn new() -> FjallConfigInner {
        let cpus = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(2);

        FjallConfigInner {
            db_path: atomic(String::new()),
            partition_name: atomic(Self::DEFAULT_PARTITION.to_string()),
            manual_journal_persist: AtomicBool::new(false),
            flush_workers: AtomicUsize::new((cpus / 2).max(1)),
            compaction_workers: AtomicUsize::new((cpus / 2).max(1)),
            cache_capacity: AtomicU64::new(Self::DEFAULT_CACHE_MB * 1_024 * 1_024),
            max_journaling_size: AtomicU64::new(Self::DEFAULT_MAX_JOURNALING_MB * 1_024 * 1_024),
            max_write_buffer_size: AtomicU64::new(Self::DEFAULT_WRITE_BUFFER_MB * 1_024 * 1_024),
            fsync_frequency: AtomicU16::new(0),
            commit_before_close: AtomicBool::new(true),
            bloom_filter_bits: AtomicI8::new(10),
            compression_type: atomic(CompressionType::Lz4),
            max_memtable_size: AtomicU32::new(Self::DEFAULT_MEMTABLE_MB * 1_024 * 1_024),
        }
    }
}
