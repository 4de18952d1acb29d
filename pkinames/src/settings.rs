//! Configuration of name parsing, rendering and name constraints processing

pub mod name_settings;

pub use crate::settings::name_settings::*;
