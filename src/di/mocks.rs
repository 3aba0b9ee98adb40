//! Mock implementations of service traits for testing

use super::traits::{PackageIndex, ProgressReporter};
use crate::cancel::Cancellation;
use crate::core::{JarvaultError, JarvaultResult};
use crate::index::{IndexQuery, IndexRecord};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory package index
///
/// Field queries match on artifact id (and group id when given); text
/// queries match any record whose artifact id contains the text. Every
/// query string is recorded.
///
/// # Example
///
/// ```
/// use jarvault::di::mocks::MockPackageIndex;
///
/// let index = MockPackageIndex::new();
/// index.add_record("com.google.code.gson", "gson", "2.10.1");
/// assert!(index.queries().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockPackageIndex {
    records: Arc<Mutex<Vec<IndexRecord>>>,
    queries: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockPackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate record
    pub fn add_record(&self, group_id: &str, artifact_id: &str, latest_version: &str) {
        self.records.lock().unwrap().push(IndexRecord {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            latest_version: latest_version.to_string(),
            packaging: "jar".to_string(),
        });
    }

    /// Change the latest version reported for an artifact
    pub fn set_latest(&self, artifact_id: &str, latest_version: &str) {
        for record in self.records.lock().unwrap().iter_mut() {
            if record.artifact_id == artifact_id {
                record.latest_version = latest_version.to_string();
            }
        }
    }

    /// Make every subsequent search fail with this message
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Query strings received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PackageIndex for MockPackageIndex {
    async fn search(
        &self,
        query: &IndexQuery,
        cancel: &Cancellation,
    ) -> JarvaultResult<Vec<IndexRecord>> {
        cancel.check()?;
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(JarvaultError::Package(message));
        }

        let records = self.records.lock().unwrap();
        let matches = records
            .iter()
            .filter(|record| match query {
                IndexQuery::Fields {
                    group_id,
                    artifact_id,
                } => {
                    record.artifact_id == *artifact_id
                        && group_id.as_ref().map_or(true, |g| record.group_id == *g)
                }
                IndexQuery::Text(text) => record.artifact_id.contains(text.as_str()),
            })
            .cloned()
            .collect();
        Ok(matches)
    }
}

/// Progress observer that keeps every notification
#[derive(Clone, Default)]
pub struct RecordingProgress {
    events: Arc<Mutex<Vec<(u64, Option<u64>, Option<u8>)>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(u64, Option<u64>, Option<u8>)> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn on_progress(&self, loaded: u64, total: Option<u64>, percent: Option<u8>) {
        self.events.lock().unwrap().push((loaded, total, percent));
    }
}
