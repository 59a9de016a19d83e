//! Import pipeline: connector item -> library document
//!
//! For every item of a batch the pipeline
//! 1. downloads attachments whose declared type mentions PDF,
//! 2. maps the metadata into the library schema (with DOI enrichment),
//! 3. hands record + staged files to the [`DocumentStore`].
//!
//! Items are independent. A dead PDF link drops that attachment only, and a
//! failing item never stops the rest of the batch; every item ends up as an
//! [`ItemOutcome`] in the [`BatchReport`].

mod report;

pub use report::{BatchReport, ItemOutcome};

use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span, warn};

use crate::attachments::{AttachmentFetcher, FetchError, StagedPdf};
use crate::library::{DocumentStore, StoreError};
use crate::mapping::{AttachmentDescriptor, ConnectorItem, FieldMapper};
use crate::observability::Metrics;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("library rejected item: {0}")]
    Store(#[from] StoreError),
}

pub struct ImportPipeline {
    fetcher: AttachmentFetcher,
    mapper: FieldMapper,
    store: Arc<dyn DocumentStore>,
    metrics: Arc<Metrics>,
    max_concurrent_items: usize,
}

impl ImportPipeline {
    /// Sequential pipeline; see [`ImportPipeline::with_concurrency`]
    pub fn new(
        fetcher: AttachmentFetcher,
        mapper: FieldMapper,
        store: Arc<dyn DocumentStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            fetcher,
            mapper,
            store,
            metrics,
            max_concurrent_items: 1,
        }
    }

    /// Process up to `limit` items of a batch at the same time
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent_items = limit.max(1);
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Import every item of a `saveItems` batch.
    ///
    /// Items start in array order and the report keeps that order.
    pub async fn import_batch(&self, items: Vec<Value>) -> BatchReport {
        let outcomes = stream::iter(items.into_iter().enumerate())
            .map(|(index, value)| self.import_value(index, value))
            .buffered(self.max_concurrent_items)
            .collect::<Vec<_>>()
            .await;

        BatchReport::new(outcomes)
    }

    async fn import_value(&self, index: usize, value: Value) -> ItemOutcome {
        let span = info_span!("item", index);

        async move {
            let result = match ConnectorItem::try_from(value) {
                Ok(item) => self.import_item(item).await,
                Err(e) => Err(PipelineError::InvalidItem(e.to_string())),
            };

            match &result {
                Ok(document) => {
                    self.metrics.item_imported();
                    info!(%document, "Item imported");
                }
                Err(e) => {
                    self.metrics.item_failed();
                    error!(error = %e, "Item import failed, continuing with batch");
                }
            }

            ItemOutcome { index, result }
        }
        .instrument(span)
        .await
    }

    /// Import a single item; returns the new document id
    pub async fn import_item(&self, item: ConnectorItem) -> Result<String, PipelineError> {
        if let Some(id) = &item.external_id {
            info!(external_id = %id, "Importing connector item");
        }

        // Staged files live until the end of this function, past `add`.
        let staged = self.fetch_attachments(&item.attachments).await;
        let record = self.mapper.map(item.fields).await;

        let files: Vec<PathBuf> = staged.iter().map(|pdf| pdf.path().to_path_buf()).collect();
        info!(files = files.len(), "Adding document to library");

        Ok(self.store.add(&files, record).await?)
    }

    async fn fetch_attachments(&self, attachments: &[AttachmentDescriptor]) -> Vec<StagedPdf> {
        if attachments.is_empty() {
            info!("Document has no attachments");
            return Vec::new();
        }

        let mut staged = Vec::new();

        for attachment in attachments {
            info!(mime = ?attachment.mime_type, "Checking attachment");
            if !attachment.is_pdf() {
                continue;
            }

            let Some(url) = attachment.url.as_deref() else {
                warn!("PDF attachment has no url, skipping");
                self.metrics.attachment_skipped();
                continue;
            };

            match self.fetcher.fetch_pdf(url).await {
                Ok(pdf) => {
                    self.metrics.attachment_fetched();
                    staged.push(pdf);
                }
                Err(FetchError::NotAPdf) => {
                    self.metrics.attachment_skipped();
                    error!(url, "File retrieved does not appear to be a PDF, skipping");
                }
                Err(e) => {
                    self.metrics.attachment_skipped();
                    error!(url, error = %e, "Error downloading PDF, skipping");
                }
            }
        }

        staged
    }
}

impl std::fmt::Debug for ImportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportPipeline")
            .field("mapper", &self.mapper)
            .field("max_concurrent_items", &self.max_concurrent_items)
            .finish_non_exhaustive()
    }
}
