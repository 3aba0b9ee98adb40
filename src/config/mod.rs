use crate::core::path::{config_file, ensure_dir};
use crate::core::{JarvaultError, JarvaultResult};
use crate::package::checksum::ChecksumAlgorithm;
use crate::package::retry::{LinearBackoff, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Jarvault configuration.
///
/// Every component receives the values it needs from this struct through its
/// constructor; nothing reads the environment behind the caller's back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Maven2-layout artifact repository
    #[serde(default = "default_repository_url")]
    pub repository_url: String,

    /// Package index search endpoint (Solr-style `select`)
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Number of candidate rows requested from the index
    #[serde(default = "default_search_rows")]
    pub search_rows: u32,

    /// Cache directory (defaults to platform-specific cache directory)
    ///
    /// Default locations:
    /// - Windows: %LOCALAPPDATA%\jarvault
    /// - Linux: ~/.cache/jarvault
    /// - macOS: ~/Library/Caches/jarvault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    /// Project-relative directory that installed artifacts are copied into
    #[serde(default = "default_lib_dir")]
    pub lib_dir: String,

    /// Total number of download attempts per artifact
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for linear backoff; attempt `n` waits `n * base`
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Ceiling for a single HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to compare downloads against published `.sha1` sidecars
    #[serde(default = "default_true")]
    pub verify_checksums: bool,

    /// Content hash algorithm for cache entries and the lock file
    /// - "blake3": BLAKE3 (default)
    /// - "sha256": SHA-256
    #[serde(default = "default_checksum_algorithm")]
    pub checksum_algorithm: String,

    /// How long to wait for a cache or manifest lock held by another writer.
    /// Unset means long enough for the holder's worst-case download, see
    /// [`Config::lock_timeout`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_timeout_secs: Option<u64>,

    /// Age after which a lock file is considered abandoned
    #[serde(default = "default_stale_lock_secs")]
    pub stale_lock_secs: u64,
}

fn default_repository_url() -> String {
    "https://repo1.maven.org/maven2".to_string()
}

fn default_search_url() -> String {
    "https://search.maven.org/solrsearch/select".to_string()
}

fn default_search_rows() -> u32 {
    20
}

fn default_lib_dir() -> String {
    "lib".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_checksum_algorithm() -> String {
    "blake3".to_string()
}

fn default_stale_lock_secs() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository_url: default_repository_url(),
            search_url: default_search_url(),
            search_rows: default_search_rows(),
            cache_dir: None,
            lib_dir: default_lib_dir(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            verify_checksums: true,
            checksum_algorithm: default_checksum_algorithm(),
            lock_timeout_secs: None,
            stale_lock_secs: default_stale_lock_secs(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating the
    /// default file if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\jarvault\config.yaml
    /// - Linux: ~/.config/jarvault/config.yaml
    /// - macOS: ~/Library/Application Support/jarvault/config.yaml
    pub fn load() -> JarvaultResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> JarvaultResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| JarvaultError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save config to the platform-specific config directory
    pub fn save(&self) -> JarvaultResult<()> {
        self.save_to(&config_file()?)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> JarvaultResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| JarvaultError::Path("Invalid config path".to_string()))?;
        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| JarvaultError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the cache directory path
    pub fn get_cache_dir(&self) -> JarvaultResult<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            Ok(PathBuf::from(dir))
        } else {
            crate::core::path::cache_dir()
        }
    }

    /// Parsed content hash algorithm
    pub fn checksum_algorithm(&self) -> JarvaultResult<ChecksumAlgorithm> {
        self.checksum_algorithm.parse()
    }

    /// Retry policy built from `max_retries` and `retry_base_delay_ms`
    pub fn retry_policy(&self) -> LinearBackoff {
        LinearBackoff::new(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `lock_timeout_secs` when set. Otherwise a cache lock holder may need
    /// every attempt to time out, the backoff between attempts and one
    /// sidecar request, plus a second of slack.
    pub fn lock_timeout(&self) -> Duration {
        if let Some(secs) = self.lock_timeout_secs {
            return Duration::from_secs(secs);
        }

        let policy = self.retry_policy();
        let attempts = policy.max_attempts().max(1);
        let backoff: Duration = (1..attempts).map(|n| policy.delay(n)).sum();
        let requests = attempts + u32::from(self.verify_checksums);
        self.request_timeout().saturating_mul(requests) + backoff + Duration::from_secs(1)
    }

    pub fn stale_lock_age(&self) -> Duration {
        Duration::from_secs(self.stale_lock_secs)
    }
}
