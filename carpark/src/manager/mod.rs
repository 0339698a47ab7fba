//! The storage manager and the operations built on its collections.
//!
//! - `storage_manager`: lifecycle, initialization, CRUD and settings
//! - `insights`: statistics, time-windowed analytics and guest search
//! - `csv_export`: CSV rendering of the guest and e-mail collections
//! - `backup`: whole-database backup, export, restore and import

mod backup;
mod csv_export;
mod insights;
mod storage_manager;

pub use csv_export::CsvKeyMapping;
pub use storage_manager::*;
