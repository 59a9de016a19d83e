use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

/// Connector server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Upper bound for a `saveItems` request body
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    // Port the Zotero desktop client listens on; connectors probe it directly.
    SocketAddr::from(([127, 0, 0, 1], 23119))
}

fn default_max_payload_bytes() -> ByteSize {
    ByteSize::mib(32)
}

/// Where documents end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryProvider {
    #[default]
    Local,
    Memory,
}

/// Target library configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Display name reported by `getSelectedCollection`
    #[serde(default = "default_library_name")]
    pub name: String,
    #[serde(default)]
    pub provider: LibraryProvider,
    #[serde(default = "default_library_root")]
    pub root: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: default_library_name(),
            provider: LibraryProvider::default(),
            root: default_library_root(),
        }
    }
}

fn default_library_name() -> String {
    "papers".to_string()
}

fn default_library_root() -> PathBuf {
    PathBuf::from("data/library")
}

/// Attachment download settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: ByteSize,
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
            max_attachment_bytes: default_max_attachment_bytes(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    format!("zotbridge/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_attachment_bytes() -> ByteSize {
    ByteSize::mib(256)
}

/// Batch import settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Items of one `saveItems` batch processed at the same time
    #[serde(default = "default_max_concurrent_items")]
    pub max_concurrent_items: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_items: default_max_concurrent_items(),
        }
    }
}

fn default_max_concurrent_items() -> usize {
    4
}

/// DOI metadata enrichment
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_enrichment_enabled")]
    pub enabled: bool,
    #[serde(default = "default_crossref_url")]
    pub crossref_url: String,
    /// Contact address for the Crossref polite pool
    pub mailto: Option<String>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enrichment_enabled(),
            crossref_url: default_crossref_url(),
            mailto: None,
        }
    }
}

fn default_enrichment_enabled() -> bool {
    true
}

fn default_crossref_url() -> String {
    "https://api.crossref.org".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:23119");
        assert_eq!(config.server.max_payload_bytes, ByteSize::mib(32));
        assert_eq!(config.library.name, "papers");
        assert_eq!(config.library.provider, LibraryProvider::Local);
        assert_eq!(config.fetch.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.pipeline.max_concurrent_items, 4);
        assert!(config.enrichment.enabled);
        assert!(config.enrichment.mailto.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[library]
name = "thesis"
provider = "memory"

[fetch]
max_attachment_bytes = "8MB"
            "#,
        )
        .unwrap();

        assert_eq!(config.library.name, "thesis");
        assert_eq!(config.library.provider, LibraryProvider::Memory);
        assert_eq!(config.fetch.max_attachment_bytes, ByteSize::mib(8));
        assert_eq!(config.fetch.connect_timeout_secs, 10);
        assert_eq!(config.server.bind_addr.port(), 23119);
    }
}
