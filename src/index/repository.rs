use crate::core::{Coordinate, JarvaultError, JarvaultResult};

/// URL layout of a Maven2-style artifact repository
///
/// `{base}/{group/as/path}/{artifact}/{version}/{artifact}-{version}[-{classifier}].{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    base_url: String,
}

impl Repository {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Directory URL holding every file of one coordinate
    fn version_dir(&self, coordinate: &Coordinate) -> JarvaultResult<String> {
        let group = coordinate
            .group_id
            .as_deref()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| {
                JarvaultError::InvalidSpec(format!(
                    "{} (a group id is required to build a download URL)",
                    coordinate
                ))
            })?;
        if coordinate.is_latest() {
            return Err(JarvaultError::InvalidSpec(format!(
                "{} (resolve 'latest' before building a download URL)",
                coordinate
            )));
        }

        Ok(format!(
            "{}/{}/{}/{}",
            self.base_url,
            group.replace('.', "/"),
            coordinate.artifact_id,
            coordinate.version
        ))
    }

    /// Download URL of the artifact's JAR
    pub fn artifact_url(&self, coordinate: &Coordinate) -> JarvaultResult<String> {
        Ok(format!(
            "{}/{}",
            self.version_dir(coordinate)?,
            coordinate.file_name("jar")
        ))
    }

    /// URL of the `.sha1` sidecar published next to an artifact
    pub fn checksum_url(artifact_url: &str) -> String {
        format!("{}.sha1", artifact_url)
    }

    /// URL of the artifact's POM descriptor (never classified)
    pub fn descriptor_url(&self, coordinate: &Coordinate) -> JarvaultResult<String> {
        Ok(format!(
            "{}/{}-{}.pom",
            self.version_dir(coordinate)?,
            coordinate.artifact_id,
            coordinate.version
        ))
    }
}
