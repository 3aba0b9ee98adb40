pub mod add;
pub mod cache;
pub mod conflicts;
pub mod export;
pub mod fetch;
pub mod import;
pub mod list;
pub mod lock;
pub mod outdated;
pub mod remove;
pub mod resolve;
pub mod search;
pub mod update;

use jarvault::cancel::Cancellation;
use jarvault::config::Config;
use jarvault::core::path::find_project_root;
use jarvault::core::{JarvaultError, JarvaultResult};
use jarvault::di::ServiceContainer;
use jarvault::package::installer::BatchReport;
use jarvault::package::warnings::Warning;
use jarvault::package::{BarProgress, Installer};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Everything a command needs: where the project is, the loaded config and
/// the cancellation for the whole invocation
pub struct Context {
    pub project_root: PathBuf,
    pub config: Config,
    pub cancel: Cancellation,
}

impl Context {
    pub fn new(project: Option<PathBuf>, timeout_secs: Option<u64>) -> JarvaultResult<Self> {
        let project_root = match project {
            Some(dir) => dir,
            None => {
                let current_dir = env::current_dir().map_err(|e| {
                    JarvaultError::Path(format!("Failed to get current directory: {}", e))
                })?;
                find_project_root(&current_dir)
            }
        };

        let (handle, mut cancel) = Cancellation::new();
        if let Some(secs) = timeout_secs {
            cancel = cancel.with_timeout(Duration::from_secs(secs));
        }
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
        });

        Ok(Self {
            project_root,
            config: Config::load()?,
            cancel,
        })
    }

    pub fn container(&self) -> JarvaultResult<ServiceContainer> {
        ServiceContainer::new(self.config.clone())
    }

    /// Installer whose downloads draw a progress bar
    pub fn installer(&self, progress: &Arc<BarProgress>) -> JarvaultResult<Installer> {
        let container = self.container()?;
        let downloader = container.downloader.clone().with_progress(progress.clone());
        Installer::new(container.with_downloader(downloader), &self.project_root)
    }
}

pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        println!("  ⚠️  {}", warning);
    }
}

pub fn print_batch(report: &BatchReport) {
    for entry in &report.installed {
        println!("  ✓ {}:{}:{}", entry.group_id, entry.artifact_id, entry.version);
    }
    for (what, error) in &report.failed {
        println!("  ❌ {}: {}", what, error);
    }
    print_warnings(&report.warnings);
}
