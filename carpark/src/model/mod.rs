//! Records persisted by the registry and the reports derived from them.
//!
//! Every record serializes to a JSON object with camelCase field names; the
//! persisted collections and the backup document use exactly this form.

// Defines a string-backed status with known values and a verbatim fallback.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// Any other caller-assigned value, kept verbatim.
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(text) => text.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                match text.as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Other(text),
                }
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                $name::from(text.to_string())
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> Self {
                match status {
                    $name::Other(text) => text,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

mod backup;
mod email;
mod field_utils;
mod guest;
mod report;
mod scheduled;
mod settings;

pub use backup::*;
pub use email::*;
pub use guest::*;
pub use report::*;
pub use scheduled::*;
pub use settings::*;

pub(crate) use field_utils::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record kept in one of the registry's collections.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Partial update merged onto the record field by field.
    type Update;

    fn id(&self) -> &str;

    /// Overwrites every field present in `update`; absent fields keep their value.
    fn merge(&mut self, update: Self::Update);
}
