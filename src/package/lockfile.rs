//! Reproducibility lock file (`jarvault.lock.json`).

use crate::core::JarvaultResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One installed artifact pinned with the checksum of its file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEntry {
    pub name: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// `None` when the installed file was missing at lock time
    pub checksum: Option<String>,
}

/// Contents of the lock file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    pub generated: DateTime<Utc>,
    pub project: String,
    #[serde(default)]
    pub dependencies: Vec<LockEntry>,
}

impl Lockfile {
    pub fn new(project: &str, dependencies: Vec<LockEntry>) -> Self {
        Self {
            generated: Utc::now(),
            project: project.to_string(),
            dependencies,
        }
    }

    pub fn load(path: &Path) -> JarvaultResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> JarvaultResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
