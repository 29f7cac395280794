//! Feed document sources.
//!
//! Fetching is kept apart from parsing so the parser can run on static
//! documents and the store can be driven by any source.

use async_trait::async_trait;
use orbit_core::config::FeedConfig;
use orbit_core::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Something that can produce the raw feed document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the full document. Every failure surfaces as [`Error::Parse`].
    async fn fetch(&self) -> Result<String>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// Build the source selected by the configuration (local file wins over URL).
pub fn from_config(config: &FeedConfig) -> Result<Arc<dyn FeedSource>> {
    match &config.path {
        Some(path) => Ok(Arc::new(FileFeedSource::new(path.clone()))),
        None => Ok(Arc::new(HttpFeedSource::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
    }
}

/// Fetches the document over HTTP(S) with a bounded timeout.
pub struct HttpFeedSource {
    url: String,
    client: reqwest::Client,
}

impl HttpFeedSource {
    /// Create a source for `url`; each fetch gives up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<String> {
        debug!(url = %self.url, "fetching feed");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            error!(url = %self.url, "failed to get data: {e}");
            Error::parse(format!("fetch {} failed: {e}", self.url))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %self.url, %status, "feed returned non-success status");
            return Err(Error::parse(format!("fetch {} returned {status}", self.url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::parse(format!("reading body of {} failed: {e}", self.url)))?;

        info!(url = %self.url, bytes = body.len(), "fetched feed");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the document from a local file.
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeedSource {
    async fn fetch(&self) -> Result<String> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!(path = %self.path.display(), "failed to read feed file: {e}");
            Error::parse(format!("read {} failed: {e}", self.path.display()))
        })?;
        info!(path = %self.path.display(), bytes = body.len(), "read feed file");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
