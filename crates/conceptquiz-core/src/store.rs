//! Relation persistence for the quiz modes.
//!
//! Both stores key relations by [`Relation::full_id`], so saving the same
//! page of search results twice leaves the store unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cache::write_json;
use crate::error::StoreError;
use crate::model::{Concept, Relation};
use crate::traits::RelationStore;

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    relations: BTreeMap<String, Relation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RelationStore for MemoryStore {
    fn save(&mut self, relations: &[Relation]) -> Result<(), StoreError> {
        for relation in relations {
            self.relations.insert(relation.full_id(), relation.clone());
        }
        Ok(())
    }

    fn load(&self, filter: &dyn Fn(&Relation) -> bool) -> Vec<Relation> {
        self.relations
            .values()
            .filter(|r| filter(r))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.relations.len()
    }
}

/// On-disk layout of [`JsonFileStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    relations: BTreeMap<String, Relation>,
}

/// Store persisted as a pretty-printed JSON file, rewritten on every save.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the file was last written, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.file.updated_at
    }
}

impl RelationStore for JsonFileStore {
    fn save(&mut self, relations: &[Relation]) -> Result<(), StoreError> {
        for relation in relations {
            self.file
                .relations
                .insert(relation.full_id(), relation.clone());
        }
        self.file.updated_at = Some(Utc::now());
        write_json(&self.path, &self.file)?;
        tracing::debug!(
            path = %self.path.display(),
            total = self.file.relations.len(),
            "saved relations"
        );
        Ok(())
    }

    fn load(&self, filter: &dyn Fn(&Relation) -> bool) -> Vec<Relation> {
        self.file
            .relations
            .values()
            .filter(|r| filter(r))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.file.relations.len()
    }
}

/// Every distinct endpoint of the stored relations accepted by `filter`.
pub fn load_concepts(
    store: &dyn RelationStore,
    filter: &dyn Fn(&Concept) -> bool,
) -> Vec<Concept> {
    let mut concepts = BTreeMap::new();
    for relation in store.load_all() {
        for concept in [relation.start, relation.end] {
            if filter(&concept) {
                concepts.insert(concept.full_id(), concept);
            }
        }
    }
    concepts.into_values().collect()
}

/// A uniformly chosen stored relation accepted by `filter`.
pub fn pick_random_relation<R: Rng + ?Sized>(
    store: &dyn RelationStore,
    filter: &dyn Fn(&Relation) -> bool,
    rng: &mut R,
) -> Option<Relation> {
    store.load(filter).choose(rng).cloned()
}

/// A uniformly chosen stored concept accepted by `filter`.
pub fn pick_random_concept<R: Rng + ?Sized>(
    store: &dyn RelationStore,
    filter: &dyn Fn(&Concept) -> bool,
    rng: &mut R,
) -> Option<Concept> {
    load_concepts(store, filter).choose(rng).cloned()
}
