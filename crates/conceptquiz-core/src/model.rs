//! Core data model: concepts and the directed relations between them.
//!
//! Values are parsed from two wire shapes: raw ConceptNet API edges
//! (`ApiEdge`) and the flat records kept by the relation store (the serde
//! representation of [`Concept`] and [`Relation`] themselves).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages whose concepts are surfaced to players.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "fr"];

/// A node of the knowledge graph, identified by language and slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Concept {
    /// The `example` part of `/c/en/example`.
    pub id: String,
    /// Language code, e.g. `en`.
    pub lang: String,
    /// Human-readable name, e.g. `blue cat` for `blue_cat`.
    #[serde(default)]
    pub name: String,
}

impl Concept {
    pub fn new(id: impl Into<String>, lang: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lang: lang.into(),
            name: name.into(),
        }
    }

    /// A concept for a search term, named after its slug.
    pub fn from_term(term: &str, lang: &str) -> Self {
        let id = term.trim().to_lowercase().replace(' ', "_");
        let name = id.replace('_', " ");
        Self::new(id, lang, name)
    }

    /// Globally unique id, `/c/{lang}/{id}`.
    pub fn full_id(&self) -> String {
        format!("/c/{}/{}", self.lang, self.id)
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_LANGUAGES.contains(&self.lang.as_str())
    }

    fn from_api(node: &ApiNode) -> Self {
        let uri = node.term.as_deref().unwrap_or(&node.id);
        let lang = node
            .language
            .clone()
            .or_else(|| concept_uri_segment(uri, 2).map(str::to_string))
            .unwrap_or_default();

        Self {
            id: concept_slug(uri).to_string(),
            lang,
            name: node.label.clone(),
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A directed, labeled edge between two concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation-type slug, e.g. `UsedFor`.
    pub id: String,
    /// Human-readable label, e.g. `used for`.
    #[serde(default)]
    pub name: String,
    pub start: Concept,
    pub end: Concept,
}

impl Relation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, start: Concept, end: Concept) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
        }
    }

    /// `/r/{id}`, the form the API expects in the `rel` parameter.
    pub fn short_id(&self) -> String {
        relation_uri(&self.id)
    }

    /// ConceptNet assertion URI: `/a/[/r/{id}/,{start}/,{end}/]`.
    pub fn full_id(&self) -> String {
        format!(
            "/a/[{}/,{}/,{}/]",
            self.short_id(),
            self.start.full_id(),
            self.end.full_id()
        )
    }

    /// Whether both endpoints are in a supported language.
    pub fn is_supported(&self) -> bool {
        self.start.is_supported() && self.end.is_supported()
    }

    /// Whether `concept` is either endpoint.
    pub fn touches(&self, concept: &Concept) -> bool {
        let full_id = concept.full_id();
        self.start.full_id() == full_id || self.end.full_id() == full_id
    }

    /// Parse an edge object of a `/query` response.
    pub fn from_api(edge: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let edge = ApiEdge::deserialize(edge)?;
        Ok(Self {
            id: last_segment(&edge.rel.id).to_string(),
            name: edge.rel.label,
            start: Concept::from_api(&edge.start),
            end: Concept::from_api(&edge.end),
        })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.start, self.name, self.end)
    }
}

/// `/r/{id}` for a relation slug.
pub fn relation_uri(id: &str) -> String {
    format!("/r/{id}")
}

#[derive(Deserialize)]
struct ApiEdge {
    rel: ApiRel,
    start: ApiNode,
    end: ApiNode,
}

#[derive(Deserialize)]
struct ApiRel {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    label: String,
}

#[derive(Deserialize)]
struct ApiNode {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    language: Option<String>,
}

/// The `n`-th `/`-separated segment of a `/c/{lang}/{slug}/...` URI.
fn concept_uri_segment(uri: &str, n: usize) -> Option<&str> {
    let mut segments = uri.split('/');
    if segments.next() != Some("") || segments.next() != Some("c") {
        return None;
    }
    segments.nth(n - 2).filter(|s| !s.is_empty())
}

fn concept_slug(uri: &str) -> &str {
    concept_uri_segment(uri, 3).unwrap_or_else(|| last_segment(uri))
}

fn last_segment(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}
