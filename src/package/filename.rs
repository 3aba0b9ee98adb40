//! Name and version inference from installed JAR file names.
//!
//! `slf4j-api-2.0.9.jar` becomes `("slf4j-api", Some("2.0.9"))`: the version
//! starts at the first `-` followed by a digit. Qualifiers after the version
//! (`-jre`, `-natives-linux`) stay part of the version.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const VERSIONED_NAME: &str = r"^(?P<name>.+?)-(?P<version>\d[0-9A-Za-z.+_\-]*)$";

fn versioned_name() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(VERSIONED_NAME).ok()).as_ref()
}

/// Split a file name (with or without the `.jar` extension) into an
/// artifact name and, when one is recognizable, a version.
pub fn split_versioned_name(file_name: &str) -> (String, Option<String>) {
    let stem = file_name.strip_suffix(".jar").unwrap_or(file_name);

    if let Some(captures) = versioned_name().and_then(|re| re.captures(stem)) {
        return (
            captures["name"].to_string(),
            Some(captures["version"].to_string()),
        );
    }
    (stem.to_string(), None)
}

/// Artifact name of a path with its version stripped
pub fn artifact_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    Some(split_versioned_name(file_name).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        assert_eq!(
            split_versioned_name("foo-1.0.0.jar"),
            ("foo".to_string(), Some("1.0.0".to_string()))
        );
    }

    #[test]
    fn test_hyphenated_name() {
        assert_eq!(
            split_versioned_name("slf4j-api-2.0.9.jar"),
            ("slf4j-api".to_string(), Some("2.0.9".to_string()))
        );
        assert_eq!(
            split_versioned_name("commons-lang3-3.14.0.jar"),
            ("commons-lang3".to_string(), Some("3.14.0".to_string()))
        );
    }

    #[test]
    fn test_qualifier_stays_in_version() {
        assert_eq!(
            split_versioned_name("guava-32.1.3-jre.jar"),
            ("guava".to_string(), Some("32.1.3-jre".to_string()))
        );
        assert_eq!(
            split_versioned_name("lwjgl-3.3.3-natives-linux.jar"),
            ("lwjgl".to_string(), Some("3.3.3-natives-linux".to_string()))
        );
    }

    #[test]
    fn test_unversioned() {
        assert_eq!(split_versioned_name("tools.jar"), ("tools".to_string(), None));
        assert_eq!(split_versioned_name("my-lib"), ("my-lib".to_string(), None));
    }

    #[test]
    fn test_artifact_name_from_path() {
        assert_eq!(
            artifact_name(Path::new("lib/gson-2.10.1.jar")),
            Some("gson".to_string())
        );
    }
}
