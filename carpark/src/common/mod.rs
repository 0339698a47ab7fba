//! Shared constants and helpers used across the registry.

mod constants;
mod date_utils;
mod id_generator;
mod type_utils;

pub use constants::*;
pub use date_utils::*;
pub use id_generator::*;
pub use type_utils::*;
