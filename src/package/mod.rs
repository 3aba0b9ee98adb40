pub mod checksum;
pub mod conflict_checker;
pub mod descriptor;
pub mod downloader;
pub mod filename;
pub mod installer;
pub mod lockfile;
pub mod manifest;
pub mod retry;
pub mod transitive;
pub mod update_checker;
pub mod warnings;

pub use checksum::ChecksumAlgorithm;
pub use conflict_checker::{ConflictDetector, ConflictRecord, Incompatibility, InstallationReport};
pub use descriptor::PomParser;
pub use downloader::{BarProgress, Downloader, FetchedFile};
pub use installer::{BatchReport, Installer};
pub use lockfile::{LockEntry, Lockfile};
pub use manifest::{ExportedDependency, ManifestEntry, ProjectManifest};
pub use retry::{LinearBackoff, RetryPolicy};
pub use transitive::{DownloadResult, TransitiveFetcher, TransitiveResult};
pub use update_checker::{UpdateChecker, UpdateReport, UpdateStatus};
pub use warnings::{Outcome, Warning};
