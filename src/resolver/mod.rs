//! Turning partial coordinates into concrete, downloadable artifacts.

use crate::cancel::Cancellation;
use crate::core::{Coordinate, JarvaultError, JarvaultResult};
use crate::di::PackageIndex;
use crate::index::{IndexQuery, IndexRecord, Repository};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A coordinate with a concrete version and its download location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedArtifact {
    coordinate: Coordinate,
    download_url: String,
    packaging: String,
    description: String,
}

impl ResolvedArtifact {
    pub fn new(
        coordinate: Coordinate,
        download_url: String,
        packaging: String,
        description: String,
    ) -> Self {
        Self {
            coordinate,
            download_url,
            packaging,
            description,
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Resolves coordinates against the package index
#[derive(Clone)]
pub struct Resolver {
    index: Arc<dyn PackageIndex>,
    repository: Repository,
}

impl Resolver {
    pub fn new(index: Arc<dyn PackageIndex>, repository: Repository) -> Self {
        Self { index, repository }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Resolve a coordinate.
    ///
    /// The first candidate returned by the index wins. A `latest` version is
    /// replaced by the candidate's latest version; any other version is kept
    /// as given, without checking that the index knows it.
    pub async fn resolve(
        &self,
        coordinate: &Coordinate,
        cancel: &Cancellation,
    ) -> JarvaultResult<ResolvedArtifact> {
        let query = IndexQuery::for_coordinate(coordinate);
        let candidates = self.index.search(&query, cancel).await?;

        let candidate = candidates.into_iter().next().ok_or_else(|| {
            JarvaultError::NotFound(format!("No artifact in the package index matches {}", query))
        })?;

        let resolved = self.build(coordinate, &candidate)?;
        debug!(
            requested = %coordinate,
            resolved = %resolved.coordinate,
            "resolved coordinate"
        );
        if coordinate.is_latest() {
            info!("{} resolved to {}", coordinate, resolved.coordinate.version);
        }
        Ok(resolved)
    }

    /// Raw index search, for interactive lookups
    pub async fn search(
        &self,
        query: &IndexQuery,
        cancel: &Cancellation,
    ) -> JarvaultResult<Vec<IndexRecord>> {
        self.index.search(query, cancel).await
    }

    fn build(
        &self,
        requested: &Coordinate,
        candidate: &IndexRecord,
    ) -> JarvaultResult<ResolvedArtifact> {
        let version = if requested.is_latest() {
            if candidate.latest_version.is_empty() {
                return Err(JarvaultError::NotFound(format!(
                    "The package index reports no version for {}:{}",
                    candidate.group_id, candidate.artifact_id
                )));
            }
            candidate.latest_version.clone()
        } else {
            requested.version.clone()
        };

        let group_id = requested
            .group_id
            .clone()
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| candidate.group_id.clone());

        let coordinate = Coordinate {
            group_id: Some(group_id),
            artifact_id: requested.artifact_id.clone(),
            version,
            classifier: requested.classifier.clone(),
        };
        let download_url = self.repository.artifact_url(&coordinate)?;

        Ok(ResolvedArtifact {
            description: format!(
                "{}:{} ({})",
                candidate.group_id, candidate.artifact_id, candidate.packaging
            ),
            packaging: candidate.packaging.clone(),
            download_url,
            coordinate,
        })
    }
}
