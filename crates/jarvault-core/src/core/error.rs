use thiserror::Error;

pub type JarvaultResult<T> = Result<T, JarvaultError>;

#[derive(Error, Debug)]
pub enum JarvaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A dependency specifier could not be parsed.
    #[error("Invalid dependency spec '{0}'")]
    InvalidSpec(String),

    /// The package index returned no candidates, or a project record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Every download attempt failed. `cause` is the error from the last attempt.
    #[error("Download of {url} failed after {attempts} attempt(s): {cause}")]
    Download {
        url: String,
        attempts: u32,
        cause: String,
    },

    #[error("Cache error: {0}")]
    Cache(String),

    /// Manifest, lock or export file could not be read or written.
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Descriptor error: {0}")]
    Descriptor(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Package error: {0}")]
    Package(String),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl JarvaultError {
    /// True for errors raised because the caller gave up, not because the work failed.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, JarvaultError::Cancelled | JarvaultError::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_message_contains_cause() {
        let err = JarvaultError::Download {
            url: "https://repo.example/a.jar".to_string(),
            attempts: 3,
            cause: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("connection refused"));
        assert!(msg.contains("3 attempt"));
    }

    #[test]
    fn test_is_cancellation() {
        assert!(JarvaultError::Cancelled.is_cancellation());
        assert!(JarvaultError::DeadlineExceeded.is_cancellation());
        assert!(!JarvaultError::NotFound("x".to_string()).is_cancellation());
    }
}
