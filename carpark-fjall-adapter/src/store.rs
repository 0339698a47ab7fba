use crate::config::FjallConfig;
use crate::error::{FjallStoreError, FjallStoreResult};
use crate::version::fjall_version;
use carpark::errors::{CarparkError, CarparkResult, ErrorKind};
use carpark::store::KeyValueStoreProvider;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Persistent key-value store on a fjall keyspace.
///
/// Every registry key is stored in a single partition of the keyspace at
/// the configured path. Clones share the keyspace through
/// `Arc<FjallStoreInner>`.
///
/// The keyspace is opened by `open_or_create()` and released by `close()`,
/// which persists the journal first unless `commit_before_close` is off. A
/// store that was never closed is committed when its last clone is dropped.
#[derive(Clone)]
pub struct FjallStore {
    inner: Arc<FjallStoreInner>,
}

impl FjallStore {
    pub fn new(config: FjallConfig) -> FjallStore {
        FjallStore {
            inner: Arc::new(FjallStoreInner::new(config)),
        }
    }

    pub fn config(&self) -> FjallConfig {
        self.inner.config.clone()
    }
}

impl KeyValueStoreProvider for FjallStore {
    fn open_or_create(&self) -> CarparkResult<()> {
        Ok(self.inner.open_or_create()?)
    }

    fn is_closed(&self) -> CarparkResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn get_item(&self, key: &str) -> CarparkResult<Option<String>> {
        Ok(self.inner.get_item(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> CarparkResult<()> {
        Ok(self.inner.set_item(key, value)?)
    }

    fn remove_item(&self, key: &str) -> CarparkResult<()> {
        Ok(self.inner.remove_item(key)?)
    }

    fn has_item(&self, key: &str) -> CarparkResult<bool> {
        Ok(self.inner.has_item(key)?)
    }

    fn commit(&self) -> CarparkResult<()> {
        Ok(self.inner.commit()?)
    }

    fn close(&self) -> CarparkResult<()> {
        Ok(self.inner.close()?)
    }

    fn store_version(&self) -> CarparkResult<String> {
        let version = fjall_version()
            .map_err(|message| CarparkError::new(&message, ErrorKind::BackendError))?;
        Ok(format!("Fjall/{}", version))
    }
}

struct FjallHandles {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

struct FjallStoreInner {
    config: FjallConfig,
    handles: RwLock<Option<FjallHandles>>,
    closed: AtomicBool,
}

impl FjallStoreInner {
    fn new(config: FjallConfig) -> FjallStoreInner {
        FjallStoreInner {
            config,
            handles: RwLock::new(None),
            closed: AtomicBool::new(false),
        }
    }

    fn open_or_create(&self) -> FjallStoreResult<()> {
        self.ensure_open()?;

        let mut handles = self.handles.write();
        if handles.is_some() {
            return Ok(());
        }

        if self.config.db_path().is_empty() {
            log::error!("Cannot open fjall store without a database path");
            return Err(FjallStoreError::MissingDbPath);
        }

        let partition_name = self.config.partition_name();
        if !is_valid_partition_name(&partition_name) {
            log::error!("Invalid fjall partition name {}", partition_name);
            return Err(FjallStoreError::InvalidPartitionName(partition_name));
        }

        let keyspace = Keyspace::open(self.config.keyspace_config()).map_err(|err| {
            log::error!("Failed to open or create keyspace: {}", err);
            err
        })?;
        let partition = keyspace
            .open_partition(&partition_name, self.config.partition_config())
            .map_err(|err| {
                log::error!("Failed to open partition {}: {}", partition_name, err);
                err
            })?;

        log::debug!(
            "Opened fjall store at {} (partition {})",
            self.config.db_path(),
            partition_name
        );
        *handles = Some(FjallHandles {
            keyspace,
            partition,
        });
        Ok(())
    }

    #[inline]
    fn ensure_open(&self) -> FjallStoreResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Fjall store is already closed");
            return Err(FjallStoreError::Closed);
        }
        Ok(())
    }

    fn partition(&self) -> FjallStoreResult<PartitionHandle> {
        self.ensure_open()?;
        match self.handles.read().as_ref() {
            Some(handles) => Ok(handles.partition.clone()),
            None => Err(FjallStoreError::NotOpened),
        }
    }

    fn get_item(&self, key: &str) -> FjallStoreResult<Option<String>> {
        let partition = self.partition()?;
        match partition.get(key)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| FjallStoreError::InvalidUtf8 {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn has_item(&self, key: &str) -> FjallStoreResult<bool> {
        let partition = self.partition()?;
        Ok(partition.contains_key(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> FjallStoreResult<()> {
        let partition = self.partition()?;
        partition.insert(key, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> FjallStoreResult<()> {
        let partition = self.partition()?;
        partition.remove(key)?;
        Ok(())
    }

    fn commit(&self) -> FjallStoreResult<()> {
        self.ensure_open()?;
        self.persist()
    }

    fn persist(&self) -> FjallStoreResult<()> {
        if let Some(handles) = self.handles.read().as_ref() {
            handles
                .keyspace
                .persist(PersistMode::SyncAll)
                .map_err(|err| {
                    log::error!("Failed to commit keyspace: {}", err);
                    err
                })?;
        }
        Ok(())
    }

    fn close(&self) -> FjallStoreResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        if self.config.commit_before_close() {
            self.persist()?;
        }
        // dropping the handles releases the keyspace
        let released = self.handles.write().take();
        drop(released);
        log::debug!("Closed fjall store at {}", self.config.db_path());
        Ok(())
    }
}

impl Drop for FjallStoreInner {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Relaxed) && self.config.commit_before_close() {
            match self.persist() {
                Ok(_) => log::debug!("Committed keyspace during drop"),
                Err(e) => log::error!("Failed to commit keyspace: {}", e),
            }
        }
    }
}

// fjall accepts 1 to 255 characters from a-z, A-Z, 0-9 and _-.#$
fn is_valid_partition_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-.#$".contains(c))
}
