//! Library backed by the Apache Arrow `object_store` crate
//!
//! Layout, one folder per document:
//!
//! ```text
//! <uuid-v7>/document.pdf
//! <uuid-v7>/document-2.pdf
//! <uuid-v7>/info.json      <- written last
//! ```

use async_trait::async_trait;
use object_store::{ObjectStore, local::LocalFileSystem, memory::InMemory, path::Path as StoragePath};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{DocumentStore, LibraryIdentity, Result, StoreError};
use crate::mapping::NormalizedRecord;

const INFO_FILE: &str = "info.json";
const FILES_KEY: &str = "files";
const TIME_ADDED_KEY: &str = "time-added";
const TIME_ADDED_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

#[derive(Clone)]
pub struct ObjectLibrary {
    store: Arc<dyn ObjectStore>,
    name: String,
}

impl ObjectLibrary {
    /// Create a library over any object_store backend
    pub fn new(store: Arc<dyn ObjectStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    /// In-memory library for tests and dry runs
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), name)
    }

    /// Library rooted at a local directory, created if missing
    pub fn local(name: impl Into<String>, root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        info!(root = %root.display(), "Opened local library");
        Ok(Self::new(Arc::new(store), name))
    }

    /// Read back the stored record of a document
    pub async fn record(&self, id: &str) -> Result<Map<String, Value>> {
        let bytes = self.get(&format!("{id}/{INFO_FILE}")).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Read one stored file of a document
    pub async fn file(&self, id: &str, name: &str) -> Result<Vec<u8>> {
        self.get(&format!("{id}/{name}")).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = StoragePath::from(key);
        match self.store.get(&path).await {
            Ok(result) => Ok(result.bytes().await?.to_vec()),
            Err(object_store::Error::NotFound { .. }) => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> Result<()> {
        let size = data.len();
        self.store.put(&StoragePath::from(key), data.into()).await?;
        tracing::debug!(key, size, "Uploaded to library");
        Ok(())
    }

    /// Best-effort removal of a partially written document
    async fn discard(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.store.delete(&StoragePath::from(key.as_str())).await {
                warn!(key, error = %e, "Failed to remove partial upload");
            }
        }
    }

    async fn write_document(
        &self,
        id: &str,
        files: &[PathBuf],
        mut record: NormalizedRecord,
        written: &mut Vec<String>,
    ) -> Result<()> {
        let mut names = Vec::with_capacity(files.len());

        for (index, file) in files.iter().enumerate() {
            let data = tokio::fs::read(file)
                .await
                .map_err(|e| StoreError::ReadAttachment {
                    path: file.clone(),
                    source: e,
                })?;

            let name = stored_file_name(index);
            let key = format!("{id}/{name}");
            self.put(&key, data).await?;
            written.push(key);
            names.push(Value::String(name));
        }

        record
            .fields
            .insert(FILES_KEY.to_string(), Value::Array(names));
        record
            .fields
            .entry(TIME_ADDED_KEY)
            .or_insert_with(|| Value::String(chrono::Local::now().format(TIME_ADDED_FORMAT).to_string()));

        let info = serde_json::to_vec_pretty(&record)?;
        self.put(&format!("{id}/{INFO_FILE}"), info).await
    }
}

fn stored_file_name(index: usize) -> String {
    match index {
        0 => "document.pdf".to_string(),
        n => format!("document-{}.pdf", n + 1),
    }
}

impl std::fmt::Debug for ObjectLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectLibrary")
            .field("name", &self.name)
            .field("store", &self.store.to_string())
            .finish()
    }
}

#[async_trait]
impl DocumentStore for ObjectLibrary {
    async fn add(&self, files: &[PathBuf], record: NormalizedRecord) -> Result<String> {
        let id = Uuid::now_v7().to_string();
        let mut written = Vec::new();

        match self.write_document(&id, files, record, &mut written).await {
            Ok(()) => {
                info!(library = %self.name, document = %id, files = files.len(), "Added document");
                Ok(id)
            }
            Err(e) => {
                self.discard(&written).await;
                Err(e)
            }
        }
    }
}

impl LibraryIdentity for ObjectLibrary {
    fn library_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: Value) -> NormalizedRecord {
        match value {
            Value::Object(fields) => NormalizedRecord { fields },
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_add_record_without_files() {
        let library = ObjectLibrary::in_memory("papers");

        let id = library
            .add(&[], record(json!({"title": "T", "tags": "x"})))
            .await
            .unwrap();

        let stored = library.record(&id).await.unwrap();
        assert_eq!(stored["title"], "T");
        assert_eq!(stored["tags"], "x");
        assert_eq!(stored["files"], json!([]));
        assert!(stored["time-added"].is_string());
    }

    #[tokio::test]
    async fn test_add_copies_files() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.pdf");
        let second = temp_dir.path().join("b.pdf");
        std::fs::write(&first, b"%PDF-1.4 first").unwrap();
        std::fs::write(&second, b"%PDF-1.4 second").unwrap();

        let library = ObjectLibrary::in_memory("papers");
        let id = library
            .add(&[first, second], record(json!({"title": "T"})))
            .await
            .unwrap();

        let stored = library.record(&id).await.unwrap();
        assert_eq!(stored["files"], json!(["document.pdf", "document-2.pdf"]));
        assert_eq!(
            library.file(&id, "document-2.pdf").await.unwrap(),
            b"%PDF-1.4 second"
        );
    }

    #[tokio::test]
    async fn test_unreadable_file_fails_add() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("a.pdf");
        std::fs::write(&present, b"%PDF-1.4").unwrap();
        let missing = temp_dir.path().join("gone.pdf");

        let library = ObjectLibrary::in_memory("papers");
        let result = library
            .add(&[present, missing], record(json!({"title": "T"})))
            .await;

        assert!(matches!(result, Err(StoreError::ReadAttachment { .. })));
    }

    #[tokio::test]
    async fn test_discard_removes_written_keys() {
        let library = ObjectLibrary::in_memory("papers");
        library.put("doc/document.pdf", b"%PDF".to_vec()).await.unwrap();

        library.discard(&["doc/document.pdf".to_string()]).await;

        assert!(matches!(
            library.file("doc", "document.pdf").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_library_writes_to_disk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("library");

        let library = ObjectLibrary::local("thesis", &root).unwrap();
        assert_eq!(library.library_name(), "thesis");

        let id = library.add(&[], record(json!({"title": "T"}))).await.unwrap();
        assert!(root.join(&id).join("info.json").exists());
    }

    #[test]
    fn test_stored_file_names() {
        assert_eq!(stored_file_name(0), "document.pdf");
        assert_eq!(stored_file_name(1), "document-2.pdf");
        assert_eq!(stored_file_name(4), "document-5.pdf");
    }
}
