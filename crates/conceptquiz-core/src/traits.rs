//! Seams between the pagination core and its collaborators.
//!
//! `Fetcher` is implemented by the HTTP client in `conceptquiz-client`;
//! `ResponseCache` and `RelationStore` have in-memory and JSON-file
//! implementations in [`crate::cache`] and [`crate::store`].

use async_trait::async_trait;

use crate::error::{FetchError, StoreError};
use crate::model::Relation;

// ---------------------------------------------------------------------------
// Fetch layer
// ---------------------------------------------------------------------------

/// Issues GET requests against the ConceptNet API and returns parsed JSON.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Root of the API, e.g. `http://api.conceptnet.io`.
    fn base_url(&self) -> &str;

    /// GET `url` and parse its body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Raw response bodies keyed by the exact request URL.
pub trait ResponseCache: Send + Sync {
    fn get(&self, url: &str) -> Option<String>;

    fn put(&self, url: &str, body: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Relation persistence
// ---------------------------------------------------------------------------

/// Relations kept for the quiz modes, keyed by [`Relation::full_id`].
///
/// Saving a relation that is already stored replaces it, so repeated saves
/// never grow the store.
pub trait RelationStore {
    fn save(&mut self, relations: &[Relation]) -> Result<(), StoreError>;

    /// Every stored relation accepted by `filter`, in `full_id` order.
    fn load(&self, filter: &dyn Fn(&Relation) -> bool) -> Vec<Relation>;

    /// Every stored relation.
    fn load_all(&self) -> Vec<Relation> {
        self.load(&|_| true)
    }

    fn len(&self) -> usize {
        self.load_all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
