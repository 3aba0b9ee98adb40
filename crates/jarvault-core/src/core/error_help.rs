//! Human-oriented hints attached to errors when they are printed by the CLI.

use crate::core::error::JarvaultError;

/// Suggests a next step for an error.
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for JarvaultError {
    fn help(&self) -> Option<String> {
        match self {
            JarvaultError::InvalidSpec(_) => Some(
                "Use 'artifactId', 'artifactId:version' or 'groupId:artifactId:version[:classifier]'"
                    .to_string(),
            ),
            JarvaultError::NotFound(_) => Some(
                "Check the spelling, or give the full 'groupId:artifactId:version' coordinate"
                    .to_string(),
            ),
            JarvaultError::Download { .. } | JarvaultError::Http(_) => Some(
                "Check your network connection and the 'repository_url' in config.yaml"
                    .to_string(),
            ),
            JarvaultError::Cache(_) => {
                Some("Run 'jarvault cache clean' to reset the local cache".to_string())
            }
            JarvaultError::Lock(_) => Some(
                "Another jarvault process may be running. Remove stale '.lock' files if not"
                    .to_string(),
            ),
            JarvaultError::Config(_) | JarvaultError::Yaml(_) => {
                Some("Fix or delete config.yaml to regenerate the defaults".to_string())
            }
            JarvaultError::DeadlineExceeded => {
                Some("Increase --timeout or retry later".to_string())
            }
            _ => None,
        }
    }
}

/// Format an error for terminal output, with a hint when one applies.
pub fn format_error_with_help(error: &JarvaultError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_help() {
        let err = JarvaultError::InvalidSpec(":gson".to_string());
        let out = format_error_with_help(&err);
        assert!(out.starts_with("Error: Invalid dependency spec"));
        assert!(out.contains("help:"));
    }

    #[test]
    fn test_format_without_help() {
        let err = JarvaultError::Cancelled;
        assert_eq!(format_error_with_help(&err), "Error: Operation cancelled");
    }
}
