//! Trait definitions for dependency injection

use crate::cancel::Cancellation;
use crate::core::{Coordinate, JarvaultResult};
use crate::index::{IndexQuery, IndexRecord};
use async_trait::async_trait;

/// Trait for package index search
///
/// Implementations return candidates in the index's own relevance order.
/// Callers take the first one; no further disambiguation happens here.
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// Run a query against the index
    async fn search(
        &self,
        query: &IndexQuery,
        cancel: &Cancellation,
    ) -> JarvaultResult<Vec<IndexRecord>>;
}

/// Trait for reading dependency declarations out of a descriptor document
///
/// The contract is deliberately shallow: only dependencies declared directly
/// by the document are returned. Property references are not interpolated
/// and declared dependencies' own descriptors are not followed.
pub trait DescriptorParser: Send + Sync {
    fn extract_declared_dependencies(&self, document: &str) -> JarvaultResult<Vec<Coordinate>>;
}

/// Observer for download progress
///
/// Receives discrete notifications. `total` and `percent` are `None` when
/// the server did not announce a content length.
pub trait ProgressReporter: Send + Sync {
    fn on_progress(&self, loaded: u64, total: Option<u64>, percent: Option<u8>);
}
