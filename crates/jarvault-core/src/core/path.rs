use crate::core::error::{JarvaultError, JarvaultResult};
use std::path::{Path, PathBuf};

/// File name of the per-project manifest
pub const MANIFEST_FILE: &str = "jarvault.json";

/// File name of the reproducibility lock file
pub const LOCK_FILE: &str = "jarvault.lock.json";

/// Get the Jarvault home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\jarvault
/// - Linux: ~/.config/jarvault
/// - macOS: ~/Library/Application Support/jarvault
pub fn jarvault_home() -> JarvaultResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| JarvaultError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("jarvault"))
}

/// Get the default cache directory
///
/// Platform-specific locations:
/// - Windows: %LOCALAPPDATA%\jarvault
/// - Linux: ~/.cache/jarvault
/// - macOS: ~/Library/Caches/jarvault
pub fn cache_dir() -> JarvaultResult<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| JarvaultError::Path("Could not determine cache directory".to_string()))?;
    Ok(cache_dir.join("jarvault"))
}

/// Get the config file path (`{jarvault_home}/config.yaml`)
pub fn config_file() -> JarvaultResult<PathBuf> {
    Ok(jarvault_home()?.join("config.yaml"))
}

/// Get the manifest path for a project
pub fn manifest_file(project_root: &Path) -> PathBuf {
    project_root.join(MANIFEST_FILE)
}

/// Get the lock file path for a project
pub fn lock_file(project_root: &Path) -> PathBuf {
    project_root.join(LOCK_FILE)
}

/// Find the project root by walking up from `start`.
///
/// A directory is a project root when it holds a manifest or an Ant
/// `build.xml`. If neither is found in any ancestor, `start` itself is the
/// root, so a fresh directory can receive its first dependency.
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();

    loop {
        if current.join(MANIFEST_FILE).exists() || current.join("build.xml").exists() {
            return current;
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return start.to_path_buf(),
        }
    }
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> JarvaultResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Render a path relative to `base` with forward slashes, for record files.
pub fn relative_display(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
