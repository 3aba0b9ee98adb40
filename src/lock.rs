//! Advisory lock files.
//!
//! A lock is a file created with `create_new`, so exactly one process (or
//! task) can hold it at a time. The holder's pid is written into the file for
//! diagnostics. Locks older than the configured stale age are assumed to
//! belong to a crashed process and are broken. Dropping the guard removes
//! the file.

use crate::cancel::Cancellation;
use crate::core::path::ensure_dir;
use crate::core::{JarvaultError, JarvaultResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Timing for lock acquisition
#[derive(Debug, Clone, Copy)]
pub struct LockOptions {
    /// Give up after waiting this long
    pub timeout: Duration,
    /// Break locks whose file is older than this
    pub stale_after: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            stale_after: Duration::from_secs(600),
        }
    }
}

/// Held lock; released on drop
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    /// Try once to take the lock
    pub fn try_acquire(path: &Path, options: &LockOptions) -> JarvaultResult<Option<Self>> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                let _ = writeln!(file, "{}", std::process::id());
                debug!(lock = %path.display(), "acquired lock");
                Ok(Some(Self {
                    path: path.to_path_buf(),
                }))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if is_stale(path, options.stale_after) {
                    warn!(lock = %path.display(), "breaking stale lock");
                    let _ = fs::remove_file(path);
                }
                Ok(None)
            }
            Err(e) => Err(JarvaultError::Lock(format!(
                "Failed to create lock {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Take the lock, blocking the current thread while another holder has it
    pub fn acquire_blocking(path: &Path, options: &LockOptions) -> JarvaultResult<Self> {
        let started = Instant::now();
        loop {
            if let Some(lock) = Self::try_acquire(path, options)? {
                return Ok(lock);
            }
            if started.elapsed() >= options.timeout {
                return Err(timed_out(path, options.timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Take the lock without blocking the runtime, honouring cancellation
    pub async fn acquire(
        path: &Path,
        options: &LockOptions,
        cancel: &Cancellation,
    ) -> JarvaultResult<Self> {
        let started = Instant::now();
        loop {
            cancel.check()?;
            if let Some(lock) = Self::try_acquire(path, options)? {
                return Ok(lock);
            }
            if started.elapsed() >= options.timeout {
                return Err(timed_out(path, options.timeout));
            }
            cancel.sleep(POLL_INTERVAL).await?;
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(lock = %self.path.display(), error = %e, "failed to release lock");
            }
        }
    }
}

fn is_stale(path: &Path, stale_after: Duration) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map(|age| age > stale_after)
        .unwrap_or(false)
}

fn timed_out(path: &Path, timeout: Duration) -> JarvaultError {
    JarvaultError::Lock(format!(
        "Timed out after {:?} waiting for {}",
        timeout,
        path.display()
    ))
}
