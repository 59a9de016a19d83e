use std::sync::Arc;

use crate::attachments::{AttachmentFetcher, HttpConfig};
use crate::config::{Config, LibraryProvider};
use crate::enrichment::{CrossrefLookup, MetadataLookup};
use crate::library::{DocumentStore, LibraryIdentity, ObjectLibrary};
use crate::mapping::FieldMapper;
use crate::observability::Metrics;
use crate::pipeline::ImportPipeline;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<ImportPipeline>,
    pub library: Arc<dyn LibraryIdentity>,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: ImportPipeline,
        library: Arc<dyn LibraryIdentity>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            library,
        }
    }

    /// Wire up library, fetcher and enrichment from configuration
    pub fn from_config(config: Config) -> Result<Self, AnyError> {
        let library = match config.library.provider {
            LibraryProvider::Local => {
                ObjectLibrary::local(config.library.name.clone(), &config.library.root)?
            }
            LibraryProvider::Memory => ObjectLibrary::in_memory(config.library.name.clone()),
        };
        let library = Arc::new(library);

        let fetcher = AttachmentFetcher::new(HttpConfig::from(&config.fetch))?;

        let lookup: Option<Arc<dyn MetadataLookup>> = if config.enrichment.enabled {
            Some(Arc::new(CrossrefLookup::new(
                config.enrichment.crossref_url.clone(),
                config.enrichment.mailto.clone(),
                &config.fetch.user_agent,
                config.fetch.request_timeout(),
            )?))
        } else {
            None
        };

        let store: Arc<dyn DocumentStore> = library.clone();
        let pipeline = ImportPipeline::new(
            fetcher,
            FieldMapper::new(lookup),
            store,
            Arc::new(Metrics::new()),
        )
        .with_concurrency(config.pipeline.max_concurrent_items);

        Ok(Self::new(config, pipeline, library))
    }
}
