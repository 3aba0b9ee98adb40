//! Non-fatal findings that travel alongside successful results.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Something the caller should see but that does not stop the workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Downloaded bytes do not match the published `.sha1` sidecar. The
    /// artifact was kept.
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },
    /// Manifest or lock file could not be read or written; in-memory
    /// defaults were used instead.
    ConfigIo { path: PathBuf, message: String },
    /// The same artifact is installed in more than one version.
    Conflict {
        artifact: String,
        versions: BTreeSet<String>,
    },
    /// Two artifacts that should not be used together are both installed.
    Incompatibility {
        first: String,
        second: String,
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ChecksumMismatch {
                url,
                expected,
                actual,
            } => write!(
                f,
                "checksum mismatch for {} (published {}, downloaded {})",
                url, expected, actual
            ),
            Warning::ConfigIo { path, message } => {
                write!(f, "could not use {}: {}", path.display(), message)
            }
            Warning::Conflict { artifact, versions } => write!(
                f,
                "'{}' is installed in multiple versions: {}",
                artifact,
                versions.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
            Warning::Incompatibility {
                first,
                second,
                reason,
            } => write!(f, "'{}' and '{}' are incompatible: {}", first, second, reason),
        }
    }
}

/// A successful result plus the warnings gathered while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Move this outcome's warnings into `sink` and return the bare value
    pub fn drain_into(self, sink: &mut Vec<Warning>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}
