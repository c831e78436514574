//! Mock fetcher for testing pagination without a live API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::traits::Fetcher;

/// What the mock answers for one URL.
#[derive(Debug, Clone)]
enum MockReply {
    Json(Value),
    Status(u16),
}

/// A [`Fetcher`] that answers from a fixed URL → response table.
///
/// Unknown URLs answer HTTP 404. Every call is recorded so tests can assert
/// on the exact requests made.
pub struct MockFetcher {
    base_url: String,
    replies: Mutex<HashMap<String, MockReply>>,
    call_count: AtomicU32,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            replies: Mutex::new(HashMap::new()),
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer `url` with `body`.
    pub fn respond(&self, url: impl Into<String>, body: Value) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.into(), MockReply::Json(body));
        self
    }

    /// Answer `url` with an HTTP error status.
    pub fn fail(&self, url: impl Into<String>, status: u16) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.into(), MockReply::Status(status));
        self
    }

    /// Get the number of calls made to this fetcher.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every URL requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().unwrap().push(url.to_string());

        let reply = self.replies.lock().unwrap().get(url).cloned();
        match reply {
            Some(MockReply::Json(body)) => Ok(body),
            Some(MockReply::Status(status)) => Err(FetchError::Http {
                status,
                message: format!("mock status for {url}"),
            }),
            None => Err(FetchError::Http {
                status: 404,
                message: format!("no mock response for {url}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn answers_registered_urls() {
        let fetcher = MockFetcher::new("http://mock/");
        fetcher.respond("http://mock/query?a=1", json!({"edges": []}));

        let body = fetcher.fetch_json("http://mock/query?a=1").await.unwrap();
        assert_eq!(body, json!({"edges": []}));
        assert_eq!(fetcher.base_url(), "http://mock");
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_url_is_not_found() {
        let fetcher = MockFetcher::new("http://mock");
        fetcher.fail("http://mock/query?b=2", 500);

        let err = fetcher.fetch_json("http://mock/query?a=1").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        let err = fetcher.fetch_json("http://mock/query?b=2").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            fetcher.requests(),
            vec!["http://mock/query?a=1", "http://mock/query?b=2"]
        );
    }
}
