//! Content-addressed artifact cache shared by every project on the machine.
//!
//! Layout under the cache root:
//!
//! ```text
//! artifacts/{key}/{artifact}-{version}[-{classifier}].jar
//! artifacts/{key}/entry.json
//! locks/{key}.lock
//! ```
//!
//! `key` is the first 16 bytes (hex) of the SHA-256 of the coordinate's
//! normalized key. Entries are written once and only ever removed by
//! [`ContentCache::clean`].

use crate::cancel::Cancellation;
use crate::core::path::ensure_dir;
use crate::core::{Coordinate, JarvaultError, JarvaultResult};
use crate::lock::{FileLock, LockOptions};
use crate::package::checksum::{checksum_bytes, ChecksumAlgorithm};
use crate::package::downloader::Downloader;
use crate::package::warnings::Outcome;
use crate::resolver::ResolvedArtifact;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const ENTRY_FILE: &str = "entry.json";

/// Metadata for one cached artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub cache_key: String,
    pub local_path: PathBuf,
    pub size_bytes: u64,
    pub content_hash: String,
}

/// What [`ContentCache::clean`] removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCleanResult {
    pub entries_removed: usize,
    pub bytes_freed: u64,
}

/// Size of the cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

/// Artifact cache rooted at a directory
#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
    lock_options: LockOptions,
    algorithm: ChecksumAlgorithm,
}

impl ContentCache {
    /// Open (creating if needed) the cache at `root`
    pub fn new(root: PathBuf, lock_options: LockOptions) -> JarvaultResult<Self> {
        ensure_dir(&root)?;
        Ok(Self {
            root,
            lock_options,
            algorithm: ChecksumAlgorithm::default(),
        })
    }

    /// Hash algorithm used for `content_hash` of entries stored with [`put`](Self::put)
    pub fn with_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifacts_dir(&self) -> PathBuf {
        self.root.join("artifacts")
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.artifacts_dir().join(key)
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.root.join("locks").join(format!("{}.lock", key))
    }

    /// Cache key for a coordinate
    pub fn cache_key(coordinate: &Coordinate) -> String {
        let mut hasher = Sha256::new();
        hasher.update(coordinate.normalized_key().as_bytes());
        let hash = hasher.finalize();
        hex::encode(&hash[..16])
    }

    /// Where the blob for `coordinate` lives (whether or not it is cached yet)
    pub fn artifact_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.entry_dir(&Self::cache_key(coordinate))
            .join(coordinate.file_name("jar"))
    }

    /// Look up a cached artifact.
    ///
    /// A stored entry is trusted as-is. An unreadable entry, or one whose
    /// blob has gone missing, counts as a miss.
    pub fn get(&self, coordinate: &Coordinate) -> JarvaultResult<Option<CacheEntry>> {
        let key = Self::cache_key(coordinate);
        let entry_file = self.entry_dir(&key).join(ENTRY_FILE);
        if !entry_file.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&entry_file)?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(entry = %entry_file.display(), error = %e, "ignoring unreadable cache entry");
                return Ok(None);
            }
        };

        if !entry.local_path.exists() {
            debug!(key = %key, "cache entry without blob, treating as miss");
            return Ok(None);
        }
        Ok(Some(entry))
    }

    /// Store bytes for `coordinate`, replacing whatever was there
    pub fn put(&self, coordinate: &Coordinate, data: &[u8]) -> JarvaultResult<CacheEntry> {
        let key = Self::cache_key(coordinate);
        let _lock = FileLock::acquire_blocking(&self.lock_path(&key), &self.lock_options)?;

        let path = self.artifact_path(coordinate);
        let partial = partial_path(&path);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        fs::write(&partial, data).map_err(|e| {
            let _ = fs::remove_file(&partial);
            JarvaultError::Cache(format!("Failed to write {}: {}", partial.display(), e))
        })?;
        fs::rename(&partial, &path)?;

        let entry = CacheEntry {
            cache_key: key,
            local_path: path,
            size_bytes: data.len() as u64,
            content_hash: checksum_bytes(data, self.algorithm).content_hash,
        };
        self.write_entry(&entry)?;
        Ok(entry)
    }

    /// Take the writer lock for a cache key
    pub async fn lock(&self, key: &str, cancel: &Cancellation) -> JarvaultResult<FileLock> {
        FileLock::acquire(&self.lock_path(key), &self.lock_options, cancel).await
    }

    /// Return the cached entry for a resolved artifact, downloading it on a miss.
    ///
    /// The boolean is `true` for a cache hit. Misses are serialized per key:
    /// after taking the key's lock the cache is consulted again, so a writer
    /// that finished in the meantime is reused instead of downloading twice.
    pub async fn fetch_with_cache(
        &self,
        resolved: &ResolvedArtifact,
        downloader: &Downloader,
        cancel: &Cancellation,
    ) -> JarvaultResult<Outcome<(CacheEntry, bool)>> {
        let coordinate = resolved.coordinate();
        if let Some(entry) = self.get(coordinate)? {
            debug!(coordinate = %coordinate, "cache hit");
            return Ok(Outcome::new((entry, true)));
        }

        let key = Self::cache_key(coordinate);
        let _lock = self.lock(&key, cancel).await?;

        if let Some(entry) = self.get(coordinate)? {
            debug!(coordinate = %coordinate, "cache filled by another writer");
            return Ok(Outcome::new((entry, true)));
        }

        let path = self.artifact_path(coordinate);
        let partial = partial_path(&path);
        info!("Downloading {}", resolved.download_url());
        let fetched = downloader
            .fetch(resolved.download_url(), &partial, cancel)
            .await?;
        fs::rename(&partial, &path)?;

        let entry = CacheEntry {
            cache_key: key,
            local_path: path,
            size_bytes: fetched.value.size_bytes,
            content_hash: fetched.value.content_hash.clone(),
        };
        self.write_entry(&entry)?;
        Ok(Outcome::with_warnings((entry, false), fetched.warnings))
    }

    /// Entry count and total bytes on disk
    pub fn stats(&self) -> JarvaultResult<CacheStats> {
        let mut stats = CacheStats::default();
        for dir in self.entry_dirs()? {
            stats.entries += 1;
            stats.total_bytes += dir_size(&dir)?;
        }
        Ok(stats)
    }

    /// Remove every cached entry
    pub fn clean(&self) -> JarvaultResult<CacheCleanResult> {
        let mut result = CacheCleanResult::default();
        for dir in self.entry_dirs()? {
            result.bytes_freed += dir_size(&dir)?;
            fs::remove_dir_all(&dir).map_err(|e| {
                JarvaultError::Cache(format!("Failed to remove {}: {}", dir.display(), e))
            })?;
            result.entries_removed += 1;
        }
        info!(
            entries = result.entries_removed,
            bytes = result.bytes_freed,
            "cache cleaned"
        );
        Ok(result)
    }

    fn entry_dirs(&self) -> JarvaultResult<Vec<PathBuf>> {
        let artifacts = self.artifacts_dir();
        if !artifacts.exists() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for item in fs::read_dir(&artifacts)? {
            let item = item?;
            if item.file_type()?.is_dir() {
                dirs.push(item.path());
            }
        }
        Ok(dirs)
    }

    fn write_entry(&self, entry: &CacheEntry) -> JarvaultResult<()> {
        let dir = self.entry_dir(&entry.cache_key);
        ensure_dir(&dir)?;
        let content = serde_json::to_string_pretty(entry)?;
        fs::write(dir.join(ENTRY_FILE), content)?;
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn dir_size(dir: &Path) -> JarvaultResult<u64> {
    let mut total = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    Ok(total)
}
