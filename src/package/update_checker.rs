use crate::cancel::Cancellation;
use crate::core::version::compare_versions;
use crate::core::{Coordinate, JarvaultResult};
use crate::package::manifest::ManifestEntry;
use crate::resolver::Resolver;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Installed vs. index-reported version of one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub current: String,
    pub latest: String,
    /// Any difference between `latest` and `current`
    pub update_available: bool,
    /// `latest` compares greater than `current` component by component
    pub newer: bool,
}

/// Result of checking every installed artifact
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub updates: Vec<UpdateStatus>,
    /// `(name, error)` for entries that could not be resolved
    pub failures: Vec<(String, String)>,
}

impl UpdateReport {
    /// Entries with an update available
    pub fn available(&self) -> impl Iterator<Item = &UpdateStatus> {
        self.updates.iter().filter(|u| u.update_available)
    }
}

/// Compares installed versions with the latest version the index reports
pub struct UpdateChecker {
    resolver: Resolver,
}

impl UpdateChecker {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Check one entry
    pub async fn check_entry(
        &self,
        entry: &ManifestEntry,
        cancel: &Cancellation,
    ) -> JarvaultResult<UpdateStatus> {
        let group = (!entry.group_id.is_empty()).then_some(entry.group_id.as_str());
        let resolved = self
            .resolver
            .resolve(&Coordinate::latest(group, &entry.artifact_id), cancel)
            .await?;
        let latest = resolved.coordinate().version.clone();

        Ok(UpdateStatus {
            name: entry.name.clone(),
            group_id: resolved.coordinate().group().to_string(),
            artifact_id: entry.artifact_id.clone(),
            update_available: latest != entry.version,
            newer: compare_versions(&latest, &entry.version) == Ordering::Greater,
            current: entry.version.clone(),
            latest,
        })
    }

    /// Check every entry in order.
    ///
    /// A failing entry is recorded in `failures` and the rest are still
    /// checked. Cancellation stops the whole run.
    pub async fn check_updates(
        &self,
        entries: &[ManifestEntry],
        cancel: &Cancellation,
    ) -> JarvaultResult<UpdateReport> {
        let mut report = UpdateReport::default();

        for entry in entries {
            match self.check_entry(entry, cancel).await {
                Ok(status) => {
                    debug!(
                        artifact = %status.artifact_id,
                        current = %status.current,
                        latest = %status.latest,
                        "checked for update"
                    );
                    report.updates.push(status);
                }
                Err(e) if e.is_cancellation() => return Err(e),
                Err(e) => {
                    warn!(artifact = %entry.artifact_id, error = %e, "update check failed");
                    report.failures.push((entry.name.clone(), e.to_string()));
                }
            }
        }

        Ok(report)
    }
}
