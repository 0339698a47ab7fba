use crate::common::{current_time, EMAILS_KEY, GUESTS_KEY, SCHEDULED_KEY, SETTINGS_KEY};
use crate::errors::{CarparkError, CarparkResult, ErrorKind};
use crate::manager::StorageManager;
use crate::model::{Backup, BackupData, BackupSource};
use std::fs;
use std::path::{Path, PathBuf};

impl StorageManager {
    /// Snapshot of all three collections and the settings record.
    pub fn create_backup(&self) -> CarparkResult<Backup> {
        let data = BackupData {
            guests: self.get_guests()?,
            emails: self.get_emails()?,
            scheduled: self.get_scheduled_emails()?,
            settings: self.get_settings()?,
        };
        Ok(Backup::new(current_time(), data))
    }

    /// Writes a fresh backup, pretty-printed, to `carpark-backup-<millis>.json`
    /// inside `dir` and returns the file's path.
    pub fn export_backup(&self, dir: impl AsRef<Path>) -> CarparkResult<PathBuf> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            log::error!("Backup directory {} does not exist", dir.display());
            return Err(CarparkError::new(
                &format!("Backup directory {} does not exist", dir.display()),
                ErrorKind::FileNotFound,
            ));
        }

        let backup = self.create_backup()?;
        let path = dir.join(backup.file_name());
        fs::write(&path, backup.to_pretty_json()?).map_err(|err| {
            log::error!("Failed to write backup {}: {}", path.display(), err);
            CarparkError::from(err)
        })?;
        log::info!("Backup written to {}", path.display());
        Ok(path)
    }

    /// Replaces all stored data with the contents of a backup.
    ///
    /// The whole source is parsed and validated before anything is written.
    /// Returns `Ok(false)` without touching the store when the source is
    /// malformed or has no `data` section. Backend failures while writing are
    /// returned as errors.
    pub fn restore_backup(&self, source: impl Into<BackupSource>) -> CarparkResult<bool> {
        let data = match source.into().into_data() {
            Ok(Some(data)) => data,
            Ok(None) => {
                log::error!("Error restoring backup: the document has no data section");
                return Ok(false);
            }
            Err(err) => {
                log::error!("Error restoring backup: {}", err);
                return Ok(false);
            }
        };

        let _guard = self.lock();
        self.write_value(GUESTS_KEY, &data.guests)?;
        self.write_value(EMAILS_KEY, &data.emails)?;
        self.write_value(SCHEDULED_KEY, &data.scheduled)?;
        self.write_value(SETTINGS_KEY, &data.settings)?;
        log::info!(
            "Backup restored: {} guests, {} e-mails, {} scheduled e-mails",
            data.guests.len(),
            data.emails.len(),
            data.scheduled.len()
        );
        Ok(true)
    }

    /// Restores the backup file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. Malformed contents yield
    /// `Ok(false)` as in `restore_backup`.
    pub fn import_backup(&self, path: impl AsRef<Path>) -> CarparkResult<bool> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            log::error!("Failed to read backup {}: {}", path.display(), err);
            CarparkError::from(err)
        })?;
        self.restore_backup(text)
    }
}
