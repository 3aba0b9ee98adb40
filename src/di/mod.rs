//! Dependency injection infrastructure for Jarvault
//!
//! External collaborators (the package index, descriptor parsing, progress
//! observers) sit behind traits so that workflows can be exercised against
//! in-memory implementations.
//!
//! # Example (Production)
//! ```no_run
//! use jarvault::config::Config;
//! use jarvault::di::ServiceContainer;
//!
//! # fn example() -> jarvault::core::JarvaultResult<()> {
//! let container = ServiceContainer::new(Config::load()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use jarvault::config::Config;
//! use jarvault::di::{ServiceContainer, mocks::MockPackageIndex};
//! use jarvault::package::descriptor::PomParser;
//! use std::sync::Arc;
//!
//! # fn example() -> jarvault::core::JarvaultResult<()> {
//! let index = Arc::new(MockPackageIndex::new());
//! let container = ServiceContainer::with_providers(Config::default(), index, Arc::new(PomParser))?;
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{DescriptorParser, PackageIndex, ProgressReporter};
