//! Cursor-based pagination over ConceptNet `/query` results.
//!
//! A [`Bookmark`] walks the pages of one query. A [`PaginatedQuery`] runs
//! several bookmarks in lockstep (the same concept in two languages, say)
//! and presents their merged, language-filtered results as fixed-size pages.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::QueryError;
use crate::model::{relation_uri, Concept, Relation};
use crate::query::{query_url, Cursor, QueryParams};
use crate::traits::Fetcher;

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    edges: Vec<serde_json::Value>,
    #[serde(default)]
    view: Option<QueryView>,
}

#[derive(Deserialize)]
struct QueryView {
    #[serde(rename = "nextPage", default)]
    next_page: Option<String>,
}

/// One fetched page of a bookmark, not yet applied to its cursor.
#[derive(Debug, Clone, Default)]
pub struct PageChunk {
    pub relations: Vec<Relation>,
    /// Server-confirmed cursor of the following page, if there is one.
    pub next: Option<Cursor>,
}

impl PageChunk {
    /// Parse a `/query` response body.
    pub fn from_response(body: serde_json::Value) -> Result<Self, QueryError> {
        let response = QueryResponse::deserialize(body)
            .map_err(|e| QueryError::MalformedResponse(e.to_string()))?;

        let relations = response
            .edges
            .iter()
            .map(Relation::from_api)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| QueryError::MalformedResponse(format!("invalid edge: {e}")))?;

        let next = response
            .view
            .and_then(|view| view.next_page)
            .map(|url| Cursor::from_next_page(&url))
            .transpose()?;

        Ok(Self { relations, next })
    }
}

/// Pagination cursor over a single query.
///
/// Starts active at offset 0. Once the server reports no further page the
/// bookmark is exhausted for good; build a new one to restart.
pub struct Bookmark {
    fetcher: Arc<dyn Fetcher>,
    params: Arc<QueryParams>,
    cursor: Cursor,
    has_more: bool,
}

impl Bookmark {
    pub fn new(fetcher: Arc<dyn Fetcher>, params: QueryParams, limit: u64) -> Self {
        Self {
            fetcher,
            params: Arc::new(params),
            cursor: Cursor::new(0, limit.max(1)),
            has_more: true,
        }
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// URL of the next page request.
    pub fn next_url(&self) -> String {
        let params = self.params.merged(&self.cursor.to_params());
        query_url(self.fetcher.base_url(), &params)
    }

    /// Fetch the next chunk and advance the cursor.
    ///
    /// An exhausted bookmark resolves to an empty chunk without any request.
    pub async fn get_more(&mut self) -> Result<Vec<Relation>, QueryError> {
        let chunk = self.fetch_next().await?;
        self.advance(chunk.next);
        Ok(chunk.relations)
    }

    /// Fetch the next chunk without touching the cursor.
    pub async fn fetch_next(&self) -> Result<PageChunk, QueryError> {
        if !self.has_more {
            return Ok(PageChunk::default());
        }

        let url = self.next_url();
        let body = self.fetcher.fetch_json(&url).await?;
        let chunk = PageChunk::from_response(body)?;
        debug!(
            %url,
            relations = chunk.relations.len(),
            next = ?chunk.next,
            "fetched chunk"
        );
        Ok(chunk)
    }

    /// Apply the cursor reported by a fetched chunk.
    ///
    /// The server's cursor is taken as is, except that a cursor whose offset
    /// does not move past the current one stops the bookmark (logged with
    /// `warn!`). No cursor at all also stops it.
    pub fn advance(&mut self, next: Option<Cursor>) {
        if !self.has_more {
            return;
        }
        match next {
            Some(cursor) if cursor.offset > self.cursor.offset => self.cursor = cursor,
            Some(cursor) => {
                warn!(
                    current = self.cursor.offset,
                    next = cursor.offset,
                    "next page cursor does not move forward, stopping"
                );
                self.has_more = false;
            }
            None => self.has_more = false,
        }
    }
}

/// Fixed-size pages over the merged results of several bookmarks.
///
/// Relations are fetched only as far as the requested page needs and are
/// never discarded, so moving back and forth between pages is stable.
pub struct PaginatedQuery {
    bookmarks: Vec<Bookmark>,
    relations: Vec<Relation>,
    results_per_page: usize,
    current_page: usize,
}

impl PaginatedQuery {
    /// One bookmark per alternate parameterization in `param_sets`.
    ///
    /// `results_per_page` below 1 is raised to 1.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        param_sets: Vec<QueryParams>,
        results_per_page: i64,
    ) -> Self {
        let results_per_page = results_per_page.max(1) as usize;
        let bookmarks = param_sets
            .into_iter()
            .map(|params| Bookmark::new(Arc::clone(&fetcher), params, results_per_page as u64))
            .collect();

        Self {
            bookmarks,
            relations: Vec::new(),
            results_per_page,
            current_page: 0,
        }
    }

    pub fn results_per_page(&self) -> usize {
        self.results_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Every relation accepted so far, in arrival order.
    pub fn accumulated(&self) -> &[Relation] {
        &self.relations
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.relations.len() > self.page_end() || self.any_has_more()
    }

    pub fn is_current_page_full(&self) -> bool {
        self.relations.len() >= self.page_end()
    }

    /// Resolve the current page, fetching rounds until it is full or every
    /// bookmark is exhausted. The last page may be short.
    ///
    /// A failed fetch aborts the round and leaves the query exactly as it
    /// was, so the call can simply be retried.
    #[instrument(skip(self), fields(page = self.current_page, per_page = self.results_per_page))]
    pub async fn get_current_page(&mut self) -> Result<Vec<Relation>, QueryError> {
        let mut rounds = 0u32;
        while !self.is_current_page_full() && self.any_has_more() {
            self.fill_round().await?;
            rounds += 1;
        }
        debug!(rounds, accumulated = self.relations.len(), "page resolved");

        let start = (self.current_page * self.results_per_page).min(self.relations.len());
        let end = self.page_end().min(self.relations.len());
        Ok(self.relations[start..end].to_vec())
    }

    /// Move forward one page if there is one, then resolve the current page.
    pub async fn go_to_next_page(&mut self) -> Result<Vec<Relation>, QueryError> {
        if self.has_next_page() {
            self.current_page += 1;
        }
        self.get_current_page().await
    }

    /// Move back one page if there is one, then resolve the current page.
    pub async fn go_to_previous_page(&mut self) -> Result<Vec<Relation>, QueryError> {
        if self.has_previous_page() {
            self.current_page -= 1;
        }
        self.get_current_page().await
    }

    fn page_end(&self) -> usize {
        (self.current_page + 1) * self.results_per_page
    }

    fn any_has_more(&self) -> bool {
        self.bookmarks.iter().any(Bookmark::has_more)
    }

    /// Fetch one chunk from every bookmark concurrently, then commit them
    /// all. Nothing is committed unless every fetch succeeds.
    async fn fill_round(&mut self) -> Result<(), QueryError> {
        let chunks = try_join_all(self.bookmarks.iter().map(|b| b.fetch_next())).await?;

        let before = self.relations.len();
        let mut fetched = 0usize;
        for (bookmark, chunk) in self.bookmarks.iter_mut().zip(chunks) {
            bookmark.advance(chunk.next);
            fetched += chunk.relations.len();
            self.relations
                .extend(chunk.relations.into_iter().filter(Relation::is_supported));
        }

        debug!(
            fetched,
            accepted = self.relations.len() - before,
            active = self.bookmarks.iter().filter(|b| b.has_more()).count(),
            "pagination round"
        );
        Ok(())
    }
}

/// Query parameters for `term` in each of `languages`, optionally restricted
/// to one relation type.
pub fn search_params(term: &str, relation: Option<&str>, languages: &[String]) -> Vec<QueryParams> {
    languages
        .iter()
        .map(|lang| {
            let mut params = QueryParams::new().with("node", Concept::from_term(term, lang).full_id());
            if let Some(rel) = relation.filter(|r| !r.is_empty()) {
                params.set("rel", relation_uri(rel));
            }
            params
        })
        .collect()
}
