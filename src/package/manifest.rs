//! Per-project record of installed artifacts (`jarvault.json`).
//!
//! The manifest is a convenience record, not a source of truth that must
//! never be lost: an unreadable or unwritable file produces a
//! [`Warning::ConfigIo`] and the operation carries on with an empty list.

use crate::config::Config;
use crate::core::path::{ensure_dir, lock_file, manifest_file, relative_display};
use crate::core::{Coordinate, JarvaultError, JarvaultResult};
use crate::lock::{FileLock, LockOptions};
use crate::package::checksum::{checksum_file, ChecksumAlgorithm};
use crate::package::filename::split_versioned_name;
use crate::package::lockfile::{LockEntry, Lockfile};
use crate::package::warnings::{Outcome, Warning};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Version recorded for installed files whose name carries none
pub const UNKNOWN_VERSION: &str = "unknown";

/// An installed artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Empty when the artifact was discovered on disk rather than installed
    #[serde(default)]
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    pub name: String,
    /// Path of the installed file relative to the project root
    #[serde(rename = "path")]
    pub relative_path: String,
    #[serde(rename = "added")]
    pub added_at: DateTime<Utc>,
}

impl ManifestEntry {
    /// Entry for a resolved coordinate installed at `relative_path`
    pub fn new(coordinate: &Coordinate, relative_path: &str) -> Self {
        Self {
            group_id: coordinate.group().to_string(),
            artifact_id: coordinate.artifact_id.clone(),
            version: coordinate.version.clone(),
            classifier: coordinate.classifier.clone(),
            name: coordinate.artifact_id.clone(),
            relative_path: relative_path.to_string(),
            added_at: Utc::now(),
        }
    }

    /// Uniqueness key within a manifest
    pub fn key(&self) -> (&str, &str) {
        (&self.group_id, &self.artifact_id)
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate_at(&self.version)
    }

    /// This entry's coordinate (classifier included) at another version
    pub fn coordinate_at(&self, version: &str) -> Coordinate {
        with_classifier(
            Coordinate::new(self.group(), &self.artifact_id, version),
            self.classifier.as_deref(),
        )
    }

    fn group(&self) -> Option<&str> {
        (!self.group_id.is_empty()).then_some(self.group_id.as_str())
    }
}

fn with_classifier(coordinate: Coordinate, classifier: Option<&str>) -> Coordinate {
    match classifier {
        Some(classifier) => coordinate.with_classifier(classifier),
        None => coordinate,
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    dependencies: Vec<ManifestEntry>,
}

/// A dependency as it appears in an export file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDependency {
    #[serde(default)]
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl ExportedDependency {
    pub fn coordinate(&self) -> Coordinate {
        let group = (!self.group_id.is_empty()).then_some(self.group_id.as_str());
        with_classifier(
            Coordinate::new(group, &self.artifact_id, &self.version),
            self.classifier.as_deref(),
        )
    }
}

impl From<&ManifestEntry> for ExportedDependency {
    fn from(entry: &ManifestEntry) -> Self {
        Self {
            group_id: entry.group_id.clone(),
            artifact_id: entry.artifact_id.clone(),
            version: entry.version.clone(),
            classifier: entry.classifier.clone(),
            name: entry.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ExportFile {
    project: String,
    exported: DateTime<Utc>,
    #[serde(default)]
    dependencies: Vec<ExportedDependency>,
}

/// Manifest, lock file and installed-artifact directory of one project
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    root: PathBuf,
    lib_dir: String,
    algorithm: ChecksumAlgorithm,
    lock_options: LockOptions,
}

impl ProjectManifest {
    pub fn new(root: &Path, lib_dir: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            lib_dir: lib_dir.to_string(),
            algorithm: ChecksumAlgorithm::default(),
            lock_options: LockOptions::default(),
        }
    }

    /// Manifest for `root` using the configured lib dir, hash algorithm and
    /// lock timing
    pub fn from_config(root: &Path, config: &Config) -> JarvaultResult<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            lib_dir: config.lib_dir.clone(),
            algorithm: config.checksum_algorithm()?,
            lock_options: LockOptions {
                timeout: config.lock_timeout(),
                stale_after: config.stale_lock_age(),
            },
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_file(&self.root)
    }

    pub fn lock_path(&self) -> PathBuf {
        lock_file(&self.root)
    }

    /// Directory installed artifacts are copied into
    pub fn lib_path(&self) -> PathBuf {
        self.root.join(&self.lib_dir)
    }

    /// Project-relative path for an installed file name, with `/` separators
    pub fn relative_path_for(&self, file_name: &str) -> String {
        relative_display(&self.lib_path().join(file_name), &self.root)
    }

    /// Absolute path of an entry's installed file
    pub fn installed_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.root.join(&entry.relative_path)
    }

    /// Project name used in export and lock files
    pub fn project_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Insert or replace the entry with the same `(group_id, artifact_id)`
    pub fn add(&self, entry: ManifestEntry) -> JarvaultResult<Outcome<()>> {
        let _lock = self.writer_lock()?;
        let mut outcome = Outcome::new(());
        let mut entries = self.load().drain_into(&mut outcome.warnings).unwrap_or_default();

        match entries.iter_mut().find(|e| e.key() == entry.key()) {
            Some(existing) => {
                debug!(artifact = %entry.artifact_id, version = %entry.version, "replacing manifest entry");
                *existing = entry;
            }
            None => entries.push(entry),
        }

        if let Some(warning) = self.save(&entries) {
            outcome.warn(warning);
        }
        Ok(outcome)
    }

    /// Remove the entry for `(group_id, artifact_id)`, returning it if present
    pub fn remove(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> JarvaultResult<Outcome<Option<ManifestEntry>>> {
        let _lock = self.writer_lock()?;
        let mut outcome = Outcome::new(None);
        let mut entries = self.load().drain_into(&mut outcome.warnings).unwrap_or_default();

        let Some(position) = entries.iter().position(|e| e.key() == (group_id, artifact_id)) else {
            return Ok(outcome);
        };
        let removed = entries.remove(position);

        if let Some(warning) = self.save(&entries) {
            outcome.warn(warning);
        }
        outcome.value = Some(removed);
        Ok(outcome)
    }

    /// Installed artifacts.
    ///
    /// Without a manifest file the lib directory is scanned instead.
    pub fn list(&self) -> Outcome<Vec<ManifestEntry>> {
        let mut warnings = Vec::new();
        let entries = match self.load().drain_into(&mut warnings) {
            Some(entries) => entries,
            None => self.scan_installed(),
        };
        Outcome::with_warnings(entries, warnings)
    }

    /// Entries inferred from `*.jar` files in the lib directory, by file name
    pub fn scan_installed(&self) -> Vec<ManifestEntry> {
        let lib = self.lib_path();
        let Ok(read_dir) = fs::read_dir(&lib) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|item| item.ok())
            .map(|item| item.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "jar"))
            .collect();
        files.sort();

        files
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                let (name, version) = split_versioned_name(&file_name);
                let added_at = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                Some(ManifestEntry {
                    group_id: String::new(),
                    artifact_id: name.clone(),
                    version: version.unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
                    classifier: None,
                    name,
                    relative_path: relative_display(&path, &self.root),
                    added_at,
                })
            })
            .collect()
    }

    /// Write every installed dependency to an export file; returns how many
    pub fn export(&self, path: &Path) -> JarvaultResult<usize> {
        let entries = self.list().value;
        let export = ExportFile {
            project: self.project_name(),
            exported: Utc::now(),
            dependencies: entries.iter().map(ExportedDependency::from).collect(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&export)?)?;
        Ok(export.dependencies.len())
    }

    /// Read an export file and return the dependencies to install.
    ///
    /// With `overwrite == false`, dependencies already in this project (by
    /// `(group_id, artifact_id)`) are skipped.
    pub fn import(
        &self,
        path: &Path,
        overwrite: bool,
    ) -> JarvaultResult<Outcome<Vec<ExportedDependency>>> {
        let content = fs::read_to_string(path).map_err(|e| {
            JarvaultError::Manifest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let export: ExportFile = serde_json::from_str(&content).map_err(|e| {
            JarvaultError::Manifest(format!("Invalid export file {}: {}", path.display(), e))
        })?;

        if overwrite {
            return Ok(Outcome::new(export.dependencies));
        }

        let current = self.list();
        let present: HashSet<(String, String)> = current
            .value
            .iter()
            .map(|e| (e.group_id.clone(), e.artifact_id.clone()))
            .collect();
        let wanted = export
            .dependencies
            .into_iter()
            .filter(|d| {
                let keep = !present.contains(&(d.group_id.clone(), d.artifact_id.clone()));
                if !keep {
                    debug!(artifact = %d.artifact_id, "already installed, skipping");
                }
                keep
            })
            .collect();
        Ok(Outcome::with_warnings(wanted, current.warnings))
    }

    /// Checksum every installed file and write the lock file
    pub fn write_lock(&self) -> JarvaultResult<Outcome<Vec<LockEntry>>> {
        let _lock = self.writer_lock()?;
        let mut outcome = Outcome::new(Vec::new());
        let entries = self.list().drain_into(&mut outcome.warnings);

        for entry in &entries {
            let path = self.installed_path(entry);
            let checksum = if path.exists() {
                Some(checksum_file(&path, self.algorithm)?)
            } else {
                warn!(path = %path.display(), "installed file missing, locking without checksum");
                None
            };
            outcome.value.push(LockEntry {
                name: entry.name.clone(),
                group_id: entry.group_id.clone(),
                artifact_id: entry.artifact_id.clone(),
                version: entry.version.clone(),
                checksum,
            });
        }

        let lockfile = Lockfile::new(&self.project_name(), outcome.value.clone());
        if let Err(e) = lockfile.save(&self.lock_path()) {
            outcome.warn(self.io_warning(&self.lock_path(), &e));
        }
        Ok(outcome)
    }

    /// Run a manifest operation on tokio's blocking pool.
    ///
    /// Writers wait for the project lock with a blocking poll, which must not
    /// occupy an async worker.
    pub async fn run_blocking<T, F>(&self, operation: F) -> JarvaultResult<T>
    where
        F: FnOnce(&ProjectManifest) -> JarvaultResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let manifest = self.clone();
        tokio::task::spawn_blocking(move || operation(&manifest))
            .await
            .map_err(|e| JarvaultError::Manifest(format!("Manifest task failed: {}", e)))?
    }

    fn writer_lock(&self) -> JarvaultResult<FileLock> {
        let mut name = self.manifest_path().into_os_string();
        name.push(".lock");
        FileLock::acquire_blocking(Path::new(&name), &self.lock_options)
    }

    /// `None` when no manifest file exists yet
    fn load(&self) -> Outcome<Option<Vec<ManifestEntry>>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Outcome::new(None);
        }

        let parsed = fs::read_to_string(&path)
            .map_err(JarvaultError::from)
            .and_then(|content| {
                serde_json::from_str::<ManifestFile>(&content).map_err(JarvaultError::from)
            });

        match parsed {
            Ok(file) => Outcome::new(Some(file.dependencies)),
            Err(e) => {
                let warning = self.io_warning(&path, &e);
                Outcome::with_warnings(Some(Vec::new()), vec![warning])
            }
        }
    }

    fn save(&self, entries: &[ManifestEntry]) -> Option<Warning> {
        let path = self.manifest_path();
        let file = ManifestFile {
            dependencies: entries.to_vec(),
        };
        let written = serde_json::to_string_pretty(&file)
            .map_err(JarvaultError::from)
            .and_then(|content| fs::write(&path, content).map_err(JarvaultError::from));

        written.err().map(|e| self.io_warning(&path, &e))
    }

    fn io_warning(&self, path: &Path, error: &JarvaultError) -> Warning {
        warn!(path = %path.display(), error = %error, "manifest file unusable, continuing with defaults");
        Warning::ConfigIo {
            path: path.to_path_buf(),
            message: error.to_string(),
        }
    }
}
