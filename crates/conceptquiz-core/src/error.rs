//! Error types.
//!
//! Defined in `conceptquiz-core` so the pagination layer, the HTTP client,
//! and the CLI can classify failures without string matching.

use thiserror::Error;

/// A query string or next-page cursor that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A `&`-separated segment carried no `=`.
    #[error("malformed query segment '{0}': expected key=value")]
    MissingSeparator(String),

    /// A segment had an empty key.
    #[error("malformed query segment '{0}': empty key")]
    EmptyKey(String),

    /// A cursor is missing a required parameter.
    #[error("cursor '{cursor}' has no '{key}' parameter")]
    MissingParam { cursor: String, key: &'static str },

    /// A cursor parameter is not an unsigned integer.
    #[error("cursor parameter '{key}' is not a number: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

/// Errors that can occur when fetching JSON from the ConceptNet API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a status outside `200..300`.
    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The response body is not valid JSON.
    #[error("invalid JSON response from {url}: {message}")]
    InvalidJson { url: String, message: String },
}

impl FetchError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while walking paginated ConceptNet queries.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The JSON did not have the shape of a query response.
    #[error("malformed query response: {0}")]
    MalformedResponse(String),
}

/// Errors raised by the on-disk relation store and response cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
