//! Jarvault: project-local JAR dependency management.
//!
//! This crate provides the main Jarvault library, re-exporting core types
//! from `jarvault-core` and organizing the resolution, download, cache and
//! manifest machinery used by the `jarvault` binary.

pub use jarvault_core::{format_error_with_help, Coordinate, ErrorHelp, JarvaultError, JarvaultResult};

/// Core module re-exported from jarvault-core.
pub mod core {
    pub use jarvault_core::core::*;
    pub use jarvault_core::{coordinate, format_error_with_help, Coordinate, ErrorHelp, LATEST};
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Cancellation and deadlines for long-running operations.
pub mod cancel;

/// Advisory lock files.
pub mod lock;

/// Package index client and repository layout.
pub mod index;

/// Coordinate resolution.
pub mod resolver;

/// Shared artifact cache.
pub mod cache;

/// Download, install, manifest and report machinery.
pub mod package;
