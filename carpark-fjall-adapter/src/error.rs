use carpark::errors::{CarparkError, ErrorKind};
use thiserror::Error;

/// Failures of the fjall-backed store.
#[derive(Error, Debug)]
pub enum FjallStoreError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),
    #[error("Stored value under '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },
    #[error("Invalid partition name '{0}': only a-z, A-Z, 0-9 and _-.#$ are allowed")]
    InvalidPartitionName(String),
    #[error("Database path is not set")]
    MissingDbPath,
    #[error("Store is not opened")]
    NotOpened,
    #[error("Store is already closed")]
    Closed,
}

impl From<FjallStoreError> for CarparkError {
    fn from(err: FjallStoreError) -> Self {
        let error_kind = match &err {
            FjallStoreError::Fjall(inner) => fjall_error_kind(inner),
            FjallStoreError::InvalidUtf8 { .. } => ErrorKind::EncodingError,
            FjallStoreError::InvalidPartitionName(_) | FjallStoreError::MissingDbPath => {
                ErrorKind::ConfigError
            }
            FjallStoreError::NotOpened => ErrorKind::StoreNotInitialized,
            FjallStoreError::Closed => ErrorKind::StoreAlreadyClosed,
        };
        CarparkError::new(&err.to_string(), error_kind)
    }
}

fn fjall_error_kind(error: &fjall::Error) -> ErrorKind {
    let message = error.to_string().to_lowercase();
    if message.contains("permission") {
        ErrorKind::PermissionDenied
    } else if message.contains("deleted") {
        ErrorKind::StoreNotInitialized
    } else {
        ErrorKind::BackendError
    }
}

pub(crate) type FjallStoreResult<T> = Result<T, FjallStoreError>;
