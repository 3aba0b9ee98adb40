//! Fetching an artifact together with the dependencies its descriptor declares.

use crate::cache::ContentCache;
use crate::cancel::Cancellation;
use crate::core::path::ensure_dir;
use crate::core::{Coordinate, JarvaultResult};
use crate::di::{DescriptorParser, ServiceContainer};
use crate::package::downloader::Downloader;
use crate::package::warnings::Warning;
use crate::resolver::{ResolvedArtifact, Resolver};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of fetching one artifact into a destination directory
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    pub requested: Coordinate,
    pub resolved: Option<Coordinate>,
    pub path: Option<PathBuf>,
    pub from_cache: bool,
    pub warnings: Vec<Warning>,
    pub error: Option<String>,
}

impl DownloadResult {
    fn failed(requested: &Coordinate, error: String) -> Self {
        Self {
            requested: requested.clone(),
            resolved: None,
            path: None,
            from_cache: false,
            warnings: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The main artifact and one result per declared dependency
#[derive(Debug, Clone, Serialize)]
pub struct TransitiveResult {
    pub main: DownloadResult,
    pub dependencies: Vec<DownloadResult>,
}

impl TransitiveResult {
    pub fn all(&self) -> impl Iterator<Item = &DownloadResult> {
        std::iter::once(&self.main).chain(self.dependencies.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DownloadResult> {
        self.all().filter(|r| !r.is_success())
    }
}

/// One-level dependency fetcher.
///
/// Declared dependencies are read from the main artifact's descriptor only;
/// their own descriptors are not followed. Items are fetched one after
/// another and a failing item never stops the rest.
pub struct TransitiveFetcher {
    resolver: Resolver,
    cache: ContentCache,
    downloader: Downloader,
    parser: Arc<dyn DescriptorParser>,
}

impl TransitiveFetcher {
    pub fn new(
        resolver: Resolver,
        cache: ContentCache,
        downloader: Downloader,
        parser: Arc<dyn DescriptorParser>,
    ) -> Self {
        Self {
            resolver,
            cache,
            downloader,
            parser,
        }
    }

    pub fn from_container(container: &ServiceContainer) -> Self {
        Self::new(
            container.resolver(),
            container.cache.clone(),
            container.downloader.clone(),
            container.descriptor_parser.clone(),
        )
    }

    /// Fetch `coordinate` and its declared dependencies into `destination`.
    ///
    /// Only cancellation (or an unusable destination) fails the call; every
    /// other problem is recorded on the affected [`DownloadResult`].
    pub async fn fetch_with_transitives(
        &self,
        coordinate: &Coordinate,
        destination: &Path,
        cancel: &Cancellation,
    ) -> JarvaultResult<TransitiveResult> {
        ensure_dir(destination)?;

        let (main, resolved) = self.fetch_item(coordinate, destination, cancel).await?;
        let declared = match resolved {
            Some(ref resolved) => self.declared_dependencies(resolved, cancel).await?,
            None => Vec::new(),
        };
        info!("{} declares {} dependencies", coordinate, declared.len());

        let mut dependencies = Vec::with_capacity(declared.len());
        for dependency in &declared {
            let (result, _) = self.fetch_item(dependency, destination, cancel).await?;
            dependencies.push(result);
        }

        Ok(TransitiveResult { main, dependencies })
    }

    /// Fetch a single artifact into `destination`
    pub async fn fetch_artifact(
        &self,
        coordinate: &Coordinate,
        destination: &Path,
        cancel: &Cancellation,
    ) -> JarvaultResult<DownloadResult> {
        ensure_dir(destination)?;
        Ok(self.fetch_item(coordinate, destination, cancel).await?.0)
    }

    async fn fetch_item(
        &self,
        coordinate: &Coordinate,
        destination: &Path,
        cancel: &Cancellation,
    ) -> JarvaultResult<(DownloadResult, Option<ResolvedArtifact>)> {
        match self.try_fetch(coordinate, destination, cancel).await {
            Ok(done) => Ok(done),
            Err(e) if e.is_cancellation() => Err(e),
            Err(e) => {
                warn!(coordinate = %coordinate, error = %e, "fetch failed");
                Ok((DownloadResult::failed(coordinate, e.to_string()), None))
            }
        }
    }

    async fn try_fetch(
        &self,
        coordinate: &Coordinate,
        destination: &Path,
        cancel: &Cancellation,
    ) -> JarvaultResult<(DownloadResult, Option<ResolvedArtifact>)> {
        let resolved = self.resolver.resolve(coordinate, cancel).await?;
        let cached = self
            .cache
            .fetch_with_cache(&resolved, &self.downloader, cancel)
            .await?;
        let (entry, hit) = cached.value;

        let target = destination.join(resolved.coordinate().file_name("jar"));
        fs::copy(&entry.local_path, &target)?;

        let result = DownloadResult {
            requested: coordinate.clone(),
            resolved: Some(resolved.coordinate().clone()),
            path: Some(target),
            from_cache: hit,
            warnings: cached.warnings,
            error: None,
        };
        Ok((result, Some(resolved)))
    }

    /// Dependencies declared by the resolved artifact's descriptor; empty when
    /// the descriptor cannot be fetched or read
    async fn declared_dependencies(
        &self,
        resolved: &ResolvedArtifact,
        cancel: &Cancellation,
    ) -> JarvaultResult<Vec<Coordinate>> {
        let url = self
            .resolver
            .repository()
            .descriptor_url(resolved.coordinate())?;

        let document = match self.downloader.fetch_text(&url, cancel).await {
            Ok(document) => document,
            Err(e) if e.is_cancellation() => return Err(e),
            Err(e) => {
                debug!(url = %url, error = %e, "descriptor unavailable");
                return Ok(Vec::new());
            }
        };

        match self.parser.extract_declared_dependencies(&document) {
            Ok(declared) => Ok(declared),
            Err(e) => {
                debug!(url = %url, error = %e, "descriptor unreadable");
                Ok(Vec::new())
            }
        }
    }
}
