use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for registry operations.
///
/// Each kind describes one category of failure so callers can decide how to
/// surface it (e.g. "error saving guest").
///
/// # Examples
///
/// ```rust,ignore
/// use carpark::errors::{CarparkError, CarparkResult, ErrorKind};
///
/// fn example() -> CarparkResult<()> {
///     Err(CarparkError::new("Unknown export type", ErrorKind::InvalidOperation))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The requested record or resource was not found
    NotFound,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// A configuration value was rejected
    ConfigError,
    /// Generic validation error
    ValidationError,

    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,

    /// Error encoding or decoding text
    EncodingError,
    /// Error mapping a record to or from its JSON form
    ObjectMappingError,

    /// Error from the key-value backend
    BackendError,
    /// The store has not been opened yet
    StoreNotInitialized,
    /// The store has already been closed
    StoreAlreadyClosed,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ConfigError => write!(f, "Configuration error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::StoreNotInitialized => write!(f, "Store not initialized"),
            ErrorKind::StoreAlreadyClosed => write!(f, "Store already closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the registry.
///
/// `CarparkError` carries a message, a kind, an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust,ignore
/// use carpark::errors::{CarparkError, ErrorKind};
///
/// let cause = CarparkError::new("disk unavailable", ErrorKind::IOError);
/// let err = CarparkError::new_with_cause("Failed to persist guests", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct CarparkError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<CarparkError>>,
    backtrace: Atomic<Backtrace>,
}

impl CarparkError {
    /// Creates a new `CarparkError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        CarparkError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `CarparkError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: CarparkError) -> Self {
        CarparkError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&CarparkError> {
        self.cause.as_deref()
    }
}

impl Display for CarparkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for CarparkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // message with stack trace, or the cause chain when there is one
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for CarparkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for registry operations.
pub type CarparkResult<T> = Result<T, CarparkError>;

impl de::Error for CarparkError {
    fn custom<T: Display>(msg: T) -> Self {
        CarparkError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl ser::Error for CarparkError {
    fn custom<T: Display>(msg: T) -> Self {
        CarparkError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<std::io::Error> for CarparkError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        CarparkError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for CarparkError {
    fn from(err: serde_json::Error) -> Self {
        let error_kind = if err.is_io() {
            ErrorKind::IOError
        } else {
            ErrorKind::ObjectMappingError
        };
        CarparkError::new(&format!("JSON error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for CarparkError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CarparkError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for CarparkError {
    fn from(msg: String) -> Self {
        CarparkError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for CarparkError {
    fn from(msg: &str) -> Self {
        CarparkError::new(msg, ErrorKind::InternalError)
    }
}
