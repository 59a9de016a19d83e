//! Document library the connector imports into
//!
//! The pipeline only needs two things from a library: its display name and an
//! atomic "add this record with these files" operation. [`ObjectLibrary`]
//! provides both on top of the `object_store` crate.

mod object;

pub use object::ObjectLibrary;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::mapping::NormalizedRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read attachment {path}: {source}")]
    ReadAttachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persists imported documents.
///
/// `add` must either store the record together with all files or store
/// nothing. It may be called concurrently for different items.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the id of the new document
    async fn add(&self, files: &[PathBuf], record: NormalizedRecord) -> Result<String>;
}

/// Name of the library reported to the connector
pub trait LibraryIdentity: Send + Sync {
    fn library_name(&self) -> &str;
}
