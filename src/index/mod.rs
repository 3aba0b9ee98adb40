//! Remote package index and artifact repository layout.

pub mod repository;
pub mod search_api;

pub use repository::Repository;
pub use search_api::{IndexQuery, SearchAPI};

use serde::{Deserialize, Serialize};

/// One candidate returned by the package index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    #[serde(rename = "g")]
    pub group_id: String,
    #[serde(rename = "a")]
    pub artifact_id: String,
    #[serde(rename = "latestVersion", default)]
    pub latest_version: String,
    #[serde(rename = "p", default = "default_packaging")]
    pub packaging: String,
}

fn default_packaging() -> String {
    "jar".to_string()
}
