//! Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use zotbridge::attachments::{AttachmentFetcher, HttpConfig};
use zotbridge::library::{DocumentStore, LibraryIdentity, StoreError};
use zotbridge::mapping::{FieldMapper, NormalizedRecord};
use zotbridge::observability::Metrics;
use zotbridge::pipeline::ImportPipeline;

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";
pub const HTML_BYTES: &[u8] = b"<!DOCTYPE html><html><body>Paywall</body></html>";

/// What a [`RecordingStore`] saw for one `add` call
#[derive(Debug, Clone)]
pub struct AddedDocument {
    pub record: NormalizedRecord,
    pub paths: Vec<PathBuf>,
    pub contents: Vec<Vec<u8>>,
}

/// In-memory document store that keeps every added record.
///
/// File contents are read during `add`, the staged files are gone afterwards.
#[derive(Default)]
pub struct RecordingStore {
    added: Mutex<Vec<AddedDocument>>,
    reject_title: Option<String>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store that refuses records whose title equals `title`
    pub fn rejecting(title: &str) -> Arc<Self> {
        Arc::new(Self {
            added: Mutex::new(Vec::new()),
            reject_title: Some(title.to_string()),
        })
    }

    pub fn added(&self) -> Vec<AddedDocument> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn add(&self, files: &[PathBuf], record: NormalizedRecord) -> Result<String, StoreError> {
        if self.reject_title.is_some() && record.get_str("title") == self.reject_title.as_deref() {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }

        let mut contents = Vec::new();
        for path in files {
            let bytes = std::fs::read(path).map_err(|source| StoreError::ReadAttachment {
                path: path.clone(),
                source,
            })?;
            contents.push(bytes);
        }

        let mut added = self.added.lock().unwrap();
        added.push(AddedDocument {
            record,
            paths: files.to_vec(),
            contents,
        });
        Ok(format!("doc-{}", added.len()))
    }
}

impl LibraryIdentity for RecordingStore {
    fn library_name(&self) -> &str {
        "test-library"
    }
}

/// Fetcher without retries so failing hosts answer immediately
pub fn test_fetcher() -> AttachmentFetcher {
    AttachmentFetcher::new(HttpConfig {
        max_retries: 0,
        backoff: Duration::from_millis(10),
        request_timeout: Duration::from_secs(5),
        ..HttpConfig::default()
    })
    .unwrap()
}

pub fn test_pipeline(store: Arc<RecordingStore>) -> ImportPipeline {
    let store: Arc<dyn DocumentStore> = store;
    ImportPipeline::new(
        test_fetcher(),
        FieldMapper::offline(),
        store,
        Arc::new(Metrics::new()),
    )
}
