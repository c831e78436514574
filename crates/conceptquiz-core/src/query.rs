//! Query-string codec for the ConceptNet REST API.
//!
//! The API tolerates unescaped URI-valued parameters (`node=/c/en/cat`), so
//! encoding is plain concatenation. Decoding is intentionally loose: only the
//! text between the first and second `=` of a segment is kept as its value.

use std::fmt;

use crate::error::DecodeError;

/// Ordered mapping of query parameter names to values.
///
/// Insertion order is kept so that encoding is stable, but equality ignores
/// order: two maps with the same pairs are the same query.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// A copy of these params with every pair of `overrides` applied on top.
    pub fn merged(&self, overrides: &QueryParams) -> QueryParams {
        let mut merged = self.clone();
        for (k, v) in overrides.iter() {
            merged.set(k, v);
        }
        merged
    }
}

impl PartialEq for QueryParams {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for QueryParams {}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Join `key=value` pairs with `&`, in insertion order.
pub fn encode(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse a query string, or a URL / path carrying one after `?`.
pub fn decode(input: &str) -> Result<QueryParams, DecodeError> {
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };

    let mut params = QueryParams::new();
    if query.is_empty() {
        return Ok(params);
    }

    for segment in query.split('&') {
        let mut parts = segment.split('=');
        let key = parts.next().unwrap_or_default();
        let Some(value) = parts.next() else {
            return Err(DecodeError::MissingSeparator(segment.to_string()));
        };
        if key.is_empty() {
            return Err(DecodeError::EmptyKey(segment.to_string()));
        }
        params.set(key, value);
    }

    Ok(params)
}

/// Server-confirmed position of the next page of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: u64,
    pub limit: u64,
}

impl Cursor {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Extract `offset` and `limit` from a `view.nextPage` URL such as
    /// `/query?node=/c/en/cat&offset=50&limit=50`.
    pub fn from_next_page(next_page: &str) -> Result<Self, DecodeError> {
        let params = decode(next_page)?;
        let number = |key: &'static str| -> Result<u64, DecodeError> {
            let value = params.get(key).ok_or_else(|| DecodeError::MissingParam {
                cursor: next_page.to_string(),
                key,
            })?;
            value.parse().map_err(|_| DecodeError::InvalidNumber {
                key,
                value: value.to_string(),
            })
        };

        Ok(Self {
            offset: number("offset")?,
            limit: number("limit")?,
        })
    }

    /// The cursor as `limit`/`offset` overrides for a request.
    pub fn to_params(self) -> QueryParams {
        QueryParams::new()
            .with("limit", self.limit)
            .with("offset", self.offset)
    }
}

/// URL of the `/query` endpoint for `params`.
pub fn query_url(base_url: &str, params: &QueryParams) -> String {
    endpoint_url(base_url, "query", params)
}

/// URL of the `/uri` endpoint for `params`.
pub fn uri_url(base_url: &str, params: &QueryParams) -> String {
    endpoint_url(base_url, "uri", params)
}

fn endpoint_url(base_url: &str, endpoint: &str, params: &QueryParams) -> String {
    format!(
        "{}/{endpoint}?{}",
        base_url.trim_end_matches('/'),
        encode(params)
    )
}
