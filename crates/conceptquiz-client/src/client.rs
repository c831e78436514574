//! ConceptNet REST client with a URL-keyed response cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use conceptquiz_core::cache::MemoryCache;
use conceptquiz_core::error::{FetchError, QueryError};
use conceptquiz_core::query::{uri_url, QueryParams};
use conceptquiz_core::traits::{Fetcher, ResponseCache};

pub const DEFAULT_BASE_URL: &str = "http://api.conceptnet.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP access to the ConceptNet API.
///
/// Every successful body is stored in the cache under its exact URL, and a
/// cached URL is never requested again.
pub struct ConceptNetClient {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<dyn ResponseCache>,
    timeout_secs: u64,
}

impl ConceptNetClient {
    /// Client with a process-local cache and the default timeout.
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.trim_end_matches('/').to_string(),
            client,
            cache: Arc::new(MemoryCache::new()),
            timeout_secs,
        }
    }

    /// Replace the response cache.
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Resolve free text to a ConceptNet URI through the `/uri` endpoint,
    /// e.g. `("en", "ice cream")` → `/c/en/ice_cream`.
    #[instrument(skip(self))]
    pub async fn standardize_uri(&self, language: &str, text: &str) -> Result<String, QueryError> {
        let params = QueryParams::new()
            .with("language", language)
            .with("text", text);
        let body = self.fetch_json(&uri_url(&self.base_url, &params)).await?;

        body.get("@id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| QueryError::MalformedResponse("missing '@id' in /uri response".into()))
    }
}

#[async_trait]
impl Fetcher for ConceptNetClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        if let Some(body) = self.cache.get(url) {
            match serde_json::from_str(&body) {
                Ok(json) => {
                    debug!("cache hit");
                    return Ok(json);
                }
                Err(e) => warn!(error = %e, "ignoring unparseable cache entry"),
            }
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout_secs)
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Http { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let json = serde_json::from_str(&body).map_err(|e| FetchError::InvalidJson {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if let Err(e) = self.cache.put(url, &body) {
            warn!(error = %e, "failed to cache response");
        }
        debug!(status, bytes = body.len(), "fetched");

        Ok(json)
    }
}
