//! Attachment download and PDF staging
//!
//! [`AttachmentFetcher`] downloads a URL, writes the body to a `.pdf` temp
//! file and checks the PDF signature. A successful fetch yields a
//! [`StagedPdf`] that owns the temp file until it is dropped.

mod http;
mod staging;

pub use http::{AttachmentFetcher, HttpConfig};
pub use staging::{PDF_MAGIC, StagedPdf, has_pdf_signature};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Connection timeout")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("attachment exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("downloaded file is not a PDF")]
    NotAPdf,

    #[error("staging failed: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Worth another attempt: timeouts, connection drops, 5xx and 429
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::Status(code) => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
