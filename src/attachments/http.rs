//! HTTP client for attachment downloads

use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::{FetchError, Result, StagedPdf};
use crate::config::FetchConfig;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub user_agent: String,
    pub max_bytes: u64,
    /// First retry delay, doubled for every further attempt
    pub backoff: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for HttpConfig {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            max_retries: config.max_retries,
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_attachment_bytes.as_u64(),
            backoff: Duration::from_secs(1),
        }
    }
}

/// Downloads attachments and stages them as validated PDFs
#[derive(Debug, Clone)]
pub struct AttachmentFetcher {
    client: Client,
    config: HttpConfig,
}

impl AttachmentFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Download `url` and stage it as a PDF.
    ///
    /// The declared media type is not trusted; only the file signature is.
    pub async fn fetch_pdf(&self, url: &str) -> Result<StagedPdf> {
        info!(url, "Downloading PDF");
        let file = self.download(url).await?;

        let staged = tokio::task::spawn_blocking(move || StagedPdf::from_file(file))
            .await
            .map_err(|e| FetchError::Io(std::io::Error::other(e)))??;

        info!(url, path = %staged.path().display(), size = staged.size(), "Saved PDF");
        Ok(staged)
    }

    /// Download into a temp file, retrying transient failures
    pub async fn download(&self, url: &str) -> Result<NamedTempFile> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.download_once(url).await {
                Ok(file) => {
                    if attempt > 1 {
                        debug!(url, attempt, "Download succeeded after retry");
                    }
                    return Ok(file);
                }
                Err(e) if e.is_transient() && attempt <= self.config.max_retries => {
                    let backoff = backoff_delay(self.config.backoff, attempt);
                    warn!(url, attempt, error = %e, ?backoff, "Download failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn download_once(&self, url: &str) -> Result<NamedTempFile> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let limit = self.config.max_bytes;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(FetchError::TooLarge { limit });
        }

        // Dropping `file` on any error below removes the partial download.
        let file = StagedPdf::temp_file()?;
        let mut writer = BufWriter::new(tokio::fs::File::from_std(file.as_file().try_clone()?));
        let size = stream_to_file(&mut writer, response, limit).await?;
        writer.flush().await?;

        debug!(url, size, "Download completed");
        Ok(file)
    }
}

/// Copy the body chunk by chunk, failing as soon as it passes `limit` bytes
async fn stream_to_file(
    writer: &mut BufWriter<tokio::fs::File>,
    response: reqwest::Response,
    limit: u64,
) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(request_error)?;

        written += chunk.len() as u64;
        if written > limit {
            return Err(FetchError::TooLarge { limit });
        }

        writer.write_all(&chunk).await?;
    }

    Ok(written)
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}

/// `base` doubled per earlier attempt, saturating instead of overflowing
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}
