//! Service container for dependency injection

use super::traits::{DescriptorParser, PackageIndex};
use crate::cache::ContentCache;
use crate::config::Config;
use crate::core::JarvaultResult;
use crate::index::{Repository, SearchAPI};
use crate::lock::LockOptions;
use crate::package::descriptor::PomParser;
use crate::package::downloader::Downloader;
use crate::resolver::Resolver;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration, the trait-object collaborators and the concrete
/// services built from them. Cloning is cheap; every workflow takes a
/// container (or pieces of it) instead of reaching for globals.
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<Config>,
    pub index: Arc<dyn PackageIndex>,
    pub descriptor_parser: Arc<dyn DescriptorParser>,
    pub cache: ContentCache,
    pub downloader: Downloader,
}

impl ServiceContainer {
    /// Create a container with production implementations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP clients cannot be built
    /// - The cache directory cannot be created
    /// - The configured checksum algorithm is unknown
    pub fn new(config: Config) -> JarvaultResult<Self> {
        let index = Arc::new(SearchAPI::new(&config)?);
        Self::with_providers(config, index, Arc::new(PomParser))
    }

    /// Create a container around custom collaborators
    ///
    /// The cache and downloader are still derived from `config`, so tests
    /// point `cache_dir` and `repository_url` at temporary locations.
    pub fn with_providers(
        config: Config,
        index: Arc<dyn PackageIndex>,
        descriptor_parser: Arc<dyn DescriptorParser>,
    ) -> JarvaultResult<Self> {
        let cache = ContentCache::new(config.get_cache_dir()?, Self::lock_options_for(&config))?
            .with_algorithm(config.checksum_algorithm()?);
        let downloader = Downloader::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            index,
            descriptor_parser,
            cache,
            downloader,
        })
    }

    /// Replace the downloader, e.g. to attach a progress bar
    pub fn with_downloader(mut self, downloader: Downloader) -> Self {
        self.downloader = downloader;
        self
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    /// Artifact repository layout for the configured base URL
    pub fn repository(&self) -> Repository {
        Repository::new(&self.config.repository_url)
    }

    /// Resolver over the configured index and repository
    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.index.clone(), self.repository())
    }

    /// Lock timing derived from the configuration
    pub fn lock_options(&self) -> LockOptions {
        Self::lock_options_for(&self.config)
    }

    fn lock_options_for(config: &Config) -> LockOptions {
        LockOptions {
            timeout: config.lock_timeout(),
            stale_after: config.stale_lock_age(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::MockPackageIndex;
    use tempfile::TempDir;

    #[test]
    fn test_with_providers_uses_config() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            cache_dir: Some(temp.path().join("cache").to_string_lossy().to_string()),
            repository_url: "https://repo.example.com/maven2/".to_string(),
            lock_timeout_secs: Some(7),
            ..Default::default()
        };

        let container =
            ServiceContainer::with_providers(config, Arc::new(MockPackageIndex::new()), Arc::new(PomParser))
                .unwrap();

        assert_eq!(container.repository().base_url(), "https://repo.example.com/maven2");
        assert_eq!(container.cache.root(), temp.path().join("cache").as_path());
        assert_eq!(container.lock_options().timeout.as_secs(), 7);
    }
}
