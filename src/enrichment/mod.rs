//! DOI metadata lookup used to enrich imported records

mod crossref;

pub use crossref::CrossrefLookup;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Request(String),

    #[error("no metadata found for DOI {0}")]
    NotFound(String),

    #[error("lookup service returned HTTP {0}")]
    Status(u16),

    #[error("unexpected lookup response: {0}")]
    InvalidResponse(String),
}

/// Resolves a DOI into library fields.
///
/// Implementations return keys in the library schema (`author`, `journal`,
/// `year`, ...). Callers treat every error as "nothing to add".
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup(&self, doi: &str) -> Result<Map<String, Value>, LookupError>;
}
