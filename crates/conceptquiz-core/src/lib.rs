//! conceptquiz-core — domain model, query codec, and pagination.
//!
//! This crate defines the concept/relation model, the ConceptNet query
//! codec, the bookmark-based pagination engine, relation persistence, and
//! the quiz rounds that the rest of conceptquiz builds on.

pub mod cache;
pub mod error;
pub mod mock;
pub mod model;
pub mod pagination;
pub mod query;
pub mod quiz;
pub mod store;
pub mod traits;

pub use error::{DecodeError, FetchError, QueryError, StoreError};
pub use model::{Concept, Relation};
pub use pagination::{Bookmark, PaginatedQuery};
pub use query::{Cursor, QueryParams};
