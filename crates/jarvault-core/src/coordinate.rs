//! Dependency coordinates and the specifier grammar.
//!
//! A specifier is one to four colon-separated fields:
//!
//! | Spec | Result |
//! |------|--------|
//! | `gson` | artifact `gson`, version `latest` |
//! | `gson:2.8.9` | artifact `gson`, version `2.8.9` |
//! | `com.google.code.gson:gson:2.8.9` | group, artifact, version |
//! | `org.lwjgl:lwjgl:3.3.1:natives-linux` | group, artifact, version, classifier |

use crate::core::error::{JarvaultError, JarvaultResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version sentinel meaning "ask the index for the newest release"
pub const LATEST: &str = "latest";

/// A `(groupId, artifactId, version[, classifier])` tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl Coordinate {
    /// Build a coordinate from its parts
    pub fn new(group_id: Option<&str>, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.map(str::to_string),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            classifier: None,
        }
    }

    /// Same coordinate with the version replaced by `latest`
    pub fn latest(group_id: Option<&str>, artifact_id: &str) -> Self {
        Self::new(group_id, artifact_id, LATEST)
    }

    /// Add a classifier
    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    /// Parse a dependency specifier
    ///
    /// Only an empty first field is rejected. Characters and casing are not
    /// validated.
    pub fn parse(spec: &str) -> JarvaultResult<Self> {
        let spec = spec.trim();
        let parts: Vec<&str> = spec.split(':').collect();

        if parts[0].is_empty() {
            return Err(JarvaultError::InvalidSpec(spec.to_string()));
        }

        let coordinate = match parts.as_slice() {
            [artifact] => Self::latest(None, artifact),
            [artifact, version] => Self::new(None, artifact, version),
            [group, artifact, version, rest @ ..] => {
                let mut coordinate = Self::new(Some(group), artifact, version);
                coordinate.classifier = rest
                    .first()
                    .filter(|c| !c.is_empty())
                    .map(|c| c.to_string());
                coordinate
            }
            [] => unreachable!("str::split always yields at least one item"),
        };

        Ok(coordinate)
    }

    /// True while the version is still the `latest` sentinel
    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }

    /// Group id, or an empty string when unknown
    pub fn group(&self) -> &str {
        self.group_id.as_deref().unwrap_or("")
    }

    /// `groupId:artifactId:version`, plus `:classifier` when one is set.
    ///
    /// This string is what cache keys are derived from.
    pub fn normalized_key(&self) -> String {
        let mut key = format!("{}:{}:{}", self.group(), self.artifact_id, self.version);
        if let Some(ref classifier) = self.classifier {
            key.push(':');
            key.push_str(classifier);
        }
        key
    }

    /// Conventional file name: `{artifact}-{version}[-{classifier}].{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        match self.classifier {
            Some(ref classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, classifier, extension
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, extension),
        }
    }
}

impl FromStr for Coordinate {
    type Err = JarvaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref group) = self.group_id {
            write!(f, "{}:", group)?;
        }
        write!(f, "{}:{}", self.artifact_id, self.version)?;
        if let Some(ref classifier) = self.classifier {
            write!(f, ":{}", classifier)?;
        }
        Ok(())
    }
}
