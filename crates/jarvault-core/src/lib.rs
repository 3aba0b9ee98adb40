//! Core types shared by the Jarvault binary and library.
//!
//! Errors and their CLI help text, dependency coordinates and the specifier
//! grammar, platform paths, and version comparison.

pub mod coordinate;
pub mod core;

pub use coordinate::{Coordinate, LATEST};
pub use core::error::{JarvaultError, JarvaultResult};
pub use core::error_help::{format_error_with_help, ErrorHelp};
