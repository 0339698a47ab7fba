use crate::common::{timestamp, BACKUP_FILE_EXTENSION, BACKUP_FILE_PREFIX};
use crate::errors::CarparkResult;
use crate::model::{null_as_default, Email, Guest, ScheduledEmail, Settings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of every collection and the settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub data: BackupData,
}

impl Backup {
    pub fn new(timestamp: DateTime<Utc>, data: BackupData) -> Backup {
        Backup { timestamp, data }
    }

    /// Suggested file name, e.g. `carpark-backup-1714555800000.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}.{}",
            BACKUP_FILE_PREFIX,
            self.timestamp.timestamp_millis(),
            BACKUP_FILE_EXTENSION
        )
    }

    /// Pretty-printed document with two-space indentation.
    pub fn to_pretty_json(&self) -> CarparkResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Contents of a backup. A collection missing from restored input is empty
/// and missing settings fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub guests: Vec<Guest>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: Vec<Email>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scheduled: Vec<ScheduledEmail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: Settings,
}

/// Input accepted by a restore: raw document text, an already parsed JSON
/// value or a typed backup.
#[derive(Debug, Clone)]
pub enum BackupSource {
    Text(String),
    Json(Value),
    Backup(Backup),
}

impl BackupSource {
    /// Parses and validates the whole source.
    ///
    /// `Ok(None)` means the document parsed but carries no `data` section.
    pub fn into_data(self) -> CarparkResult<Option<BackupData>> {
        match self {
            BackupSource::Text(text) => {
                let raw: LooseBackup = serde_json::from_str(&text)?;
                Ok(raw.data)
            }
            BackupSource::Json(value) => {
                let raw: LooseBackup = serde_json::from_value(value)?;
                Ok(raw.data)
            }
            BackupSource::Backup(backup) => Ok(Some(backup.data)),
        }
    }
}

impl From<&str> for BackupSource {
    fn from(text: &str) -> Self {
        BackupSource::Text(text.to_string())
    }
}

impl From<String> for BackupSource {
    fn from(text: String) -> Self {
        BackupSource::Text(text)
    }
}

impl From<Value> for BackupSource {
    fn from(value: Value) -> Self {
        BackupSource::Json(value)
    }
}

impl From<Backup> for BackupSource {
    fn from(backup: Backup) -> Self {
        BackupSource::Backup(backup)
    }
}

// restore input; the timestamp is informational and not checked
#[derive(Deserialize)]
struct LooseBackup {
    #[serde(default)]
    data: Option<BackupData>,
}
