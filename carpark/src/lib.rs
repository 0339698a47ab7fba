//! # Carpark - Guest and Vehicle Registry Storage
//!
//! Storage layer of a hotel car-park registry. Guests and their vehicles are
//! registered, sent and scheduled e-mails are recorded and a single settings
//! record is kept. On top of the stored collections the registry computes
//! statistics, time-windowed analytics, search results, CSV exports and
//! whole-database backups.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use carpark::manager::StorageManager;
//! use carpark::model::{ExportKind, NewGuest, Period};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = StorageManager::builder().open()?;
//!
//! manager.add_guest(NewGuest {
//!     name: Some("Jane Doe".into()),
//!     vehicle_reg: Some("XYZ1".into()),
//!     ..NewGuest::default()
//! })?;
//!
//! let stats = manager.get_stats()?;
//! let analytics = manager.get_analytics(Period::Week)?;
//! let csv = manager.export_to_csv(ExportKind::Guests)?;
//! manager.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage
//!
//! Each collection is one JSON array stored under a fixed key of a pluggable
//! key-value backend (see [`store`]). The in-memory backend is used unless a
//! store module is loaded through the builder; `carpark-fjall-adapter`
//! provides a persistent one.
//!
//! ## Module Organization
//!
//! - [`common`] - Constants, time helpers, identifier generation
//! - [`errors`] - Error types and result definitions
//! - [`model`] - Records, partial updates and reports
//! - [`store`] - Key-value backend abstractions and the in-memory backend
//! - [`manager`] - The storage manager and its operations
//! - [`carpark_builder`] - Builder opening a storage manager
//! - [`carpark_config`] - Storage manager configuration

pub mod carpark_builder;
pub mod carpark_config;
pub mod common;
pub mod errors;
pub mod manager;
pub mod model;
pub mod store;

pub use carpark_builder::StorageManagerBuilder;
pub use carpark_config::CarparkConfig;
pub use errors::{CarparkError, CarparkResult, ErrorKind};
pub use manager::{CsvKeyMapping, StorageManager};
