//! Basic utility functionality supporting name processing

pub mod error;
pub mod logging;

pub use crate::{util::error::*, util::logging::*};
