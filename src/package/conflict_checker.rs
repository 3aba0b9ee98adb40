use crate::package::filename::artifact_name;
use crate::package::manifest::ManifestEntry;
use crate::package::warnings::Warning;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

/// Artifact pairs that should not be installed side by side
const INCOMPATIBLE_PAIRS: &[(&str, &str, &str)] = &[
    (
        "okhttp",
        "httpclient",
        "alternative HTTP client libraries; pick one",
    ),
    (
        "logback-classic",
        "slf4j-simple",
        "both bind SLF4J; only one binding may be on the classpath",
    ),
    (
        "logback-classic",
        "slf4j-log4j12",
        "both bind SLF4J; only one binding may be on the classpath",
    ),
    (
        "logback-classic",
        "log4j-slf4j-impl",
        "both bind SLF4J; only one binding may be on the classpath",
    ),
    (
        "log4j",
        "log4j-core",
        "Log4j 1.x and Log4j 2.x are separate frameworks with overlapping configuration",
    ),
];

/// One artifact installed in more than one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub artifact_name: String,
    pub versions: BTreeSet<String>,
    pub files: Vec<String>,
}

/// Two installed artifacts known not to work together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incompatibility {
    pub first: String,
    pub second: String,
    pub reason: String,
}

/// Result of a full installation check
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallationReport {
    /// False only when `errors` is non-empty
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<Warning>,
    pub conflicts: Vec<ConflictRecord>,
    pub incompatibilities: Vec<Incompatibility>,
}

/// Checks installed artifacts for duplicate versions and known-bad pairs
pub struct ConflictDetector;

impl ConflictDetector {
    /// Artifact name used for grouping: the installed file name with its
    /// version stripped, or the artifact id when there is no file name
    pub fn normalized_name(entry: &ManifestEntry) -> String {
        if entry.relative_path.is_empty() {
            return entry.artifact_id.clone();
        }
        artifact_name(Path::new(&entry.relative_path))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| entry.artifact_id.clone())
    }

    /// Artifacts present in more than one distinct version, sorted by name.
    ///
    /// Several files with the same version are not a conflict.
    pub fn detect_conflicts(entries: &[ManifestEntry]) -> Vec<ConflictRecord> {
        let mut groups: BTreeMap<String, ConflictRecord> = BTreeMap::new();

        for entry in entries {
            let name = Self::normalized_name(entry);
            let record = groups.entry(name.clone()).or_insert_with(|| ConflictRecord {
                artifact_name: name,
                versions: BTreeSet::new(),
                files: Vec::new(),
            });
            record.versions.insert(entry.version.clone());
            record.files.push(entry.relative_path.clone());
        }

        groups
            .into_values()
            .filter(|record| record.versions.len() > 1)
            .collect()
    }

    /// Pairs from the incompatibility table that are both installed
    pub fn detect_incompatibilities(entries: &[ManifestEntry]) -> Vec<Incompatibility> {
        let installed: HashSet<String> = entries
            .iter()
            .flat_map(|e| [Self::normalized_name(e), e.artifact_id.clone()])
            .collect();

        INCOMPATIBLE_PAIRS
            .iter()
            .filter(|(first, second, _)| installed.contains(*first) && installed.contains(*second))
            .map(|(first, second, reason)| Incompatibility {
                first: first.to_string(),
                second: second.to_string(),
                reason: reason.to_string(),
            })
            .collect()
    }

    /// Dependency cycles among installed artifacts.
    ///
    /// Not implemented: the manifest records no edges between artifacts, so
    /// this always returns an empty list. An empty result is not a guarantee
    /// that no cycle exists.
    pub fn detect_circular_dependencies(_entries: &[ManifestEntry]) -> Vec<Vec<String>> {
        Vec::new()
    }

    /// Full check of a project's installed artifacts.
    ///
    /// Missing files are errors. Conflicts and incompatibilities are reported
    /// as warnings and never make the report invalid.
    pub fn check(entries: &[ManifestEntry], project_root: &Path) -> InstallationReport {
        let errors: Vec<String> = entries
            .iter()
            .filter(|e| !e.relative_path.is_empty() && !project_root.join(&e.relative_path).exists())
            .map(|e| format!("{} {} is missing its file {}", e.name, e.version, e.relative_path))
            .collect();

        let conflicts = Self::detect_conflicts(entries);
        let incompatibilities = Self::detect_incompatibilities(entries);

        let mut warnings: Vec<Warning> = conflicts
            .iter()
            .map(|c| Warning::Conflict {
                artifact: c.artifact_name.clone(),
                versions: c.versions.clone(),
            })
            .collect();
        warnings.extend(incompatibilities.iter().map(|i| Warning::Incompatibility {
            first: i.first.clone(),
            second: i.second.clone(),
            reason: i.reason.clone(),
        }));

        InstallationReport {
            valid: errors.is_empty(),
            errors,
            warnings,
            conflicts,
            incompatibilities,
        }
    }
}
