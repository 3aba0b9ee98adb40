use crate::cancel::Cancellation;
use crate::config::Config;
use crate::core::{JarvaultError, JarvaultResult};
use crate::di::ProgressReporter;
use crate::index::Repository;
use crate::package::checksum::{parse_sha1_sidecar, ChecksumAlgorithm, StreamingChecksum};
use crate::package::retry::RetryPolicy;
use crate::package::warnings::{Outcome, Warning};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Report progress without a known length every this many bytes
const UNSIZED_PROGRESS_STEP: u64 = 1024 * 1024;

/// Size and digests of a file written by [`Downloader::fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub size_bytes: u64,
    /// Content hash with the configured algorithm, `algo:hex`
    pub content_hash: String,
    /// SHA-1 hex, as published in `.sha1` sidecars
    pub sha1: String,
}

/// Fetches artifacts over HTTP with retries, hashing and sidecar checks
#[derive(Clone)]
pub struct Downloader {
    client: Client,
    retry: Arc<dyn RetryPolicy>,
    algorithm: ChecksumAlgorithm,
    verify_checksums: bool,
    progress: Option<Arc<dyn ProgressReporter>>,
}

impl Downloader {
    /// Create a downloader from config: timeout per request, retry policy,
    /// hash algorithm and checksum verification switch
    pub fn new(config: &Config) -> JarvaultResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("jarvault/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            retry: Arc::new(config.retry_policy()),
            algorithm: config.checksum_algorithm()?,
            verify_checksums: config.verify_checksums,
            progress: None,
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: Arc<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a progress observer
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Download `url` into `destination`.
    ///
    /// Failed attempts are retried according to the retry policy. A failed
    /// attempt never leaves a partial file behind. When checksum verification
    /// is enabled and a `.sha1` sidecar is published, a mismatch is reported
    /// as a warning and the file is kept.
    pub async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        cancel: &Cancellation,
    ) -> JarvaultResult<Outcome<FetchedFile>> {
        let fetched = self
            .with_retries(url, cancel, || self.attempt_to_file(url, destination))
            .await;

        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                remove_partial(destination).await;
                return Err(e);
            }
        };

        let mut outcome = Outcome::new(fetched);
        if self.verify_checksums {
            if let Some(warning) = self.verify_sidecar(url, &outcome.value, cancel).await? {
                outcome.warn(warning);
            }
        }
        Ok(outcome)
    }

    /// Download a small text document (descriptors) with the same retry policy
    pub async fn fetch_text(&self, url: &str, cancel: &Cancellation) -> JarvaultResult<String> {
        self.with_retries(url, cancel, || async {
            let response = self.get(url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    async fn with_retries<T, F, Fut>(
        &self,
        url: &str,
        cancel: &Cancellation,
        mut attempt: F,
    ) -> JarvaultResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = JarvaultResult<T>>,
    {
        let max_attempts = self.retry.max_attempts();
        let mut last_cause = String::new();

        for number in 1..=max_attempts {
            cancel.check()?;
            debug!(url, attempt = number, max_attempts, "download attempt started");

            match cancel.run(attempt()).await {
                Ok(value) => {
                    debug!(url, attempt = number, "download attempt succeeded");
                    return Ok(value);
                }
                Err(e) if e.is_cancellation() => return Err(e),
                Err(e) => {
                    warn!(
                        url,
                        attempt = number,
                        max_attempts,
                        error = %e,
                        "download attempt failed"
                    );
                    last_cause = e.to_string();
                    if number < max_attempts {
                        cancel.sleep(self.retry.delay(number)).await?;
                    }
                }
            }
        }

        Err(JarvaultError::Download {
            url: url.to_string(),
            attempts: max_attempts,
            cause: last_cause,
        })
    }

    async fn get(&self, url: &str) -> JarvaultResult<Response> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(JarvaultError::Package(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }
        Ok(response)
    }

    async fn attempt_to_file(&self, url: &str, destination: &Path) -> JarvaultResult<FetchedFile> {
        let response = self.get(url).await?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await?;
        }

        match self.stream_to_file(response, destination).await {
            Ok(fetched) => Ok(fetched),
            Err(e) => {
                remove_partial(destination).await;
                Err(e)
            }
        }
    }

    async fn stream_to_file(
        &self,
        mut response: Response,
        destination: &Path,
    ) -> JarvaultResult<FetchedFile> {
        let mut file = fs::File::create(destination).await?;
        let mut hasher = StreamingChecksum::new(self.algorithm);
        let mut tracker = ProgressTracker::new(response.content_length());

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            hasher.update(&chunk);
            if let Some((loaded, total, percent)) = tracker.advance(chunk.len() as u64) {
                self.report(loaded, total, percent);
            }
        }
        file.flush().await?;
        file.sync_all().await?;

        let (loaded, total, percent) = tracker.finish();
        self.report(loaded, total, percent);

        let digests = hasher.finish();
        Ok(FetchedFile {
            size_bytes: loaded,
            content_hash: digests.content_hash,
            sha1: digests.sha1,
        })
    }

    async fn verify_sidecar(
        &self,
        url: &str,
        fetched: &FetchedFile,
        cancel: &Cancellation,
    ) -> JarvaultResult<Option<Warning>> {
        let sidecar_url = Repository::checksum_url(url);
        let body = cancel
            .run(async {
                let response = self.get(&sidecar_url).await?;
                Ok(response.text().await?)
            })
            .await;

        let published = match body {
            Ok(body) => parse_sha1_sidecar(&body),
            Err(e) if e.is_cancellation() => return Err(e),
            Err(e) => {
                debug!(url = %sidecar_url, error = %e, "no checksum sidecar");
                None
            }
        };

        match published {
            Some(expected) if expected != fetched.sha1 => {
                warn!(
                    url,
                    expected = %expected,
                    actual = %fetched.sha1,
                    "checksum mismatch, keeping artifact"
                );
                Ok(Some(Warning::ChecksumMismatch {
                    url: url.to_string(),
                    expected,
                    actual: fetched.sha1.clone(),
                }))
            }
            Some(_) => {
                debug!(url, "checksum verified");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn report(&self, loaded: u64, total: Option<u64>, percent: Option<u8>) {
        if let Some(ref progress) = self.progress {
            progress.on_progress(loaded, total, percent);
        }
    }
}

async fn remove_partial(destination: &Path) {
    match fs::remove_file(destination).await {
        Ok(()) => debug!(path = %destination.display(), "removed partial download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %destination.display(), error = %e, "failed to remove partial download"),
    }
}

/// Turns a byte stream into discrete progress notifications: one per whole
/// percent when the length is known, one per mebibyte otherwise.
struct ProgressTracker {
    loaded: u64,
    total: Option<u64>,
    last_mark: u64,
}

impl ProgressTracker {
    fn new(total: Option<u64>) -> Self {
        Self {
            loaded: 0,
            total: total.filter(|t| *t > 0),
            last_mark: 0,
        }
    }

    fn percent(&self) -> Option<u8> {
        self.total
            .map(|total| ((self.loaded.min(total) * 100) / total) as u8)
    }

    fn advance(&mut self, bytes: u64) -> Option<(u64, Option<u64>, Option<u8>)> {
        self.loaded += bytes;
        let mark = match self.percent() {
            Some(percent) => percent as u64,
            None => self.loaded / UNSIZED_PROGRESS_STEP,
        };
        // 100% is left for finish()
        if mark > self.last_mark && self.percent() != Some(100) {
            self.last_mark = mark;
            Some((self.loaded, self.total, self.percent()))
        } else {
            None
        }
    }

    fn finish(&self) -> (u64, Option<u64>, Option<u8>) {
        let percent = self.total.map(|_| 100);
        (self.loaded, self.total, percent)
    }
}

/// Terminal progress bar for interactive downloads
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn on_progress(&self, loaded: u64, total: Option<u64>, _percent: Option<u8>) {
        if let Some(total) = total {
            self.bar.set_length(total);
        }
        self.bar.set_position(loaded);
    }
}
