//! Installing artifacts into a project and keeping its manifest in step.

use crate::cancel::Cancellation;
use crate::core::path::ensure_dir;
use crate::core::{Coordinate, JarvaultError, JarvaultResult};
use crate::di::ServiceContainer;
use crate::package::manifest::{ManifestEntry, ProjectManifest};
use crate::package::transitive::TransitiveFetcher;
use crate::package::update_checker::UpdateChecker;
use crate::package::warnings::{Outcome, Warning};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of a sequence of installs
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub installed: Vec<ManifestEntry>,
    /// `(what, error)` per failed item
    pub failed: Vec<(String, String)>,
    pub warnings: Vec<Warning>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Installs artifacts into one project's lib directory
pub struct Installer {
    container: ServiceContainer,
    manifest: ProjectManifest,
}

impl Installer {
    pub fn new(container: ServiceContainer, project_root: &Path) -> JarvaultResult<Self> {
        let manifest = ProjectManifest::from_config(project_root, container.config())?;
        Ok(Self {
            container,
            manifest,
        })
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Parse, resolve, fetch (through the cache) and install one dependency
    pub async fn add_dependency(
        &self,
        spec: &str,
        cancel: &Cancellation,
    ) -> JarvaultResult<Outcome<ManifestEntry>> {
        let coordinate = Coordinate::parse(spec)?;
        self.install(&coordinate, cancel).await
    }

    /// Install a coordinate, replacing any installed version of the same artifact
    pub async fn install(
        &self,
        coordinate: &Coordinate,
        cancel: &Cancellation,
    ) -> JarvaultResult<Outcome<ManifestEntry>> {
        let mut warnings = Vec::new();
        let resolved = self.container.resolver().resolve(coordinate, cancel).await?;
        let (cached, hit) = self
            .container
            .cache
            .fetch_with_cache(&resolved, &self.container.downloader, cancel)
            .await?
            .drain_into(&mut warnings);
        debug!(coordinate = %resolved.coordinate(), cache_hit = hit, "artifact available");

        let file_name = resolved.coordinate().file_name("jar");
        ensure_dir(&self.manifest.lib_path())?;
        fs::copy(&cached.local_path, self.manifest.lib_path().join(&file_name))?;

        let entry = ManifestEntry::new(resolved.coordinate(), &self.manifest.relative_path_for(&file_name));
        self.remove_superseded_file(&entry, &mut warnings);
        self.add_to_manifest(&entry).await?.drain_into(&mut warnings);

        info!("Installed {}", resolved.coordinate());
        Ok(Outcome::with_warnings(entry, warnings))
    }

    /// Install a dependency and whatever its descriptor declares
    pub async fn add_with_transitives(
        &self,
        spec: &str,
        cancel: &Cancellation,
    ) -> JarvaultResult<BatchReport> {
        let coordinate = Coordinate::parse(spec)?;
        let fetcher = TransitiveFetcher::from_container(&self.container);
        let result = fetcher
            .fetch_with_transitives(&coordinate, &self.manifest.lib_path(), cancel)
            .await?;

        let mut report = BatchReport::default();
        for item in result.all() {
            report.warnings.extend(item.warnings.iter().cloned());
            match (&item.resolved, &item.path, &item.error) {
                (Some(resolved), Some(path), None) => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| resolved.file_name("jar"));
                    let entry =
                        ManifestEntry::new(resolved, &self.manifest.relative_path_for(&file_name));
                    self.remove_superseded_file(&entry, &mut report.warnings);
                    self.add_to_manifest(&entry)
                        .await?
                        .drain_into(&mut report.warnings);
                    report.installed.push(entry);
                }
                (_, _, error) => report.failed.push((
                    item.requested.to_string(),
                    error.clone().unwrap_or_else(|| "unknown error".to_string()),
                )),
            }
        }
        Ok(report)
    }

    /// Remove an installed dependency and its file.
    ///
    /// `spec` needs only the artifact id. A group narrows the match only in
    /// the three-field `group:artifact:version` form, since `g:a` reads as an
    /// artifact id and version.
    pub async fn remove_dependency(&self, spec: &str) -> JarvaultResult<Outcome<ManifestEntry>> {
        let coordinate = Coordinate::parse(spec)?;
        let mut warnings = Vec::new();

        let installed = self.manifest.list().drain_into(&mut warnings);
        let entry = installed
            .into_iter()
            .find(|e| {
                e.artifact_id == coordinate.artifact_id
                    && coordinate
                        .group_id
                        .as_deref()
                        .map_or(true, |g| g == e.group_id)
            })
            .ok_or_else(|| {
                JarvaultError::NotFound(format!("'{}' is not installed in this project", spec))
            })?;

        let (group_id, artifact_id) = (entry.group_id.clone(), entry.artifact_id.clone());
        self.manifest
            .run_blocking(move |manifest| manifest.remove(&group_id, &artifact_id))
            .await?
            .drain_into(&mut warnings);

        let path = self.manifest.installed_path(&entry);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        info!("Removed {} {}", entry.name, entry.version);
        Ok(Outcome::with_warnings(entry, warnings))
    }

    /// Install every dependency listed in an export file, one at a time
    pub async fn import(
        &self,
        path: &Path,
        overwrite: bool,
        cancel: &Cancellation,
    ) -> JarvaultResult<BatchReport> {
        let mut report = BatchReport::default();
        let wanted = self
            .manifest
            .import(path, overwrite)?
            .drain_into(&mut report.warnings);

        for dependency in wanted {
            let coordinate = dependency.coordinate();
            self.record(&mut report, &coordinate, self.install(&coordinate, cancel).await)?;
        }
        Ok(report)
    }

    /// Install the latest version of every dependency with an update available
    pub async fn update_all(&self, cancel: &Cancellation) -> JarvaultResult<BatchReport> {
        let mut report = BatchReport::default();
        let entries = self.manifest.list().drain_into(&mut report.warnings);

        let checker = UpdateChecker::new(self.container.resolver());
        let updates = checker.check_updates(&entries, cancel).await?;
        report.failed.extend(updates.failures.iter().cloned());

        for status in updates.available() {
            let Some(entry) = entries.iter().find(|e| {
                e.artifact_id == status.artifact_id
                    && (e.group_id.is_empty() || e.group_id == status.group_id)
            }) else {
                continue;
            };
            let mut coordinate = entry.coordinate_at(&status.latest);
            if coordinate.group_id.is_none() && !status.group_id.is_empty() {
                coordinate.group_id = Some(status.group_id.clone());
            }
            info!("Updating {} {} -> {}", status.name, status.current, status.latest);
            self.record(&mut report, &coordinate, self.install(&coordinate, cancel).await)?;
        }
        Ok(report)
    }

    async fn add_to_manifest(&self, entry: &ManifestEntry) -> JarvaultResult<Outcome<()>> {
        let entry = entry.clone();
        self.manifest
            .run_blocking(move |manifest| manifest.add(entry))
            .await
    }

    fn record(
        &self,
        report: &mut BatchReport,
        coordinate: &Coordinate,
        result: JarvaultResult<Outcome<ManifestEntry>>,
    ) -> JarvaultResult<()> {
        match result {
            Ok(outcome) => {
                let entry = outcome.drain_into(&mut report.warnings);
                report.installed.push(entry);
                Ok(())
            }
            Err(e) if e.is_cancellation() => Err(e),
            Err(e) => {
                warn!(coordinate = %coordinate, error = %e, "install failed");
                report.failed.push((coordinate.to_string(), e.to_string()));
                Ok(())
            }
        }
    }

    /// Delete the previously installed file of the same artifact when the
    /// new version lands under a different name
    fn remove_superseded_file(&self, entry: &ManifestEntry, warnings: &mut Vec<Warning>) {
        let previous = self.manifest.list().drain_into(warnings);
        let Some(old) = previous
            .iter()
            .find(|e| e.key() == entry.key() && e.relative_path != entry.relative_path)
        else {
            return;
        };

        let old_path = self.manifest.installed_path(old);
        if old_path.exists() {
            match fs::remove_file(&old_path) {
                Ok(()) => debug!(path = %old_path.display(), "removed superseded file"),
                Err(e) => warn!(path = %old_path.display(), error = %e, "could not remove superseded file"),
            }
        }
    }
}
