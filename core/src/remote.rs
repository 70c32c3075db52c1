//! Remote configuration fetching.
//!
//! The configuration document is fetched fresh for every runtime
//! message; there is no caching, retrying, or timeout beyond client
//! defaults. The source is a trait seam so sessions can run against
//! HTTP in production and an in-memory document in tests and offline
//! runs.

use placard_types::ConfigDocument;
use thiserror::Error;

/// Supplier of the configuration document.
pub trait ConfigSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<ConfigDocument, FetchError>> + Send;
}

/// HTTP source: `{base_url}{config_path}`, JSON body.
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: String,
}

impl HttpConfigSource {
    pub fn new(base_url: &str, config_path: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), config_path),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ConfigSource for HttpConfigSource {
    async fn fetch(&self) -> Result<ConfigDocument, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        serde_json::from_str(&body).map_err(FetchError::Decode)
    }
}

/// Fixed in-memory source for tests and file-driven runs.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    document: ConfigDocument,
}

impl StaticConfigSource {
    pub fn new(document: ConfigDocument) -> Self {
        Self { document }
    }
}

impl ConfigSource for StaticConfigSource {
    async fn fetch(&self) -> Result<ConfigDocument, FetchError> {
        Ok(self.document.clone())
    }
}

/// Errors fetching or decoding the configuration resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("configuration request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration document is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
