//! Response caches for the fetch layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::StoreError;
use crate::traits::ResponseCache;

/// Process-local cache, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, url: &str) -> Option<String> {
        lock(&self.entries).get(url).cloned()
    }

    fn put(&self, url: &str, body: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(url.to_string(), body.to_string());
        Ok(())
    }
}

/// Durable cache: a JSON object mapping URL to raw body, rewritten on
/// every `put`.
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileCache {
    /// Open the cache at `path`. A missing or unparseable file is an empty
    /// cache; the next `put` replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "skipping malformed cache file");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for JsonFileCache {
    fn get(&self, url: &str) -> Option<String> {
        lock(&self.entries).get(url).cloned()
    }

    fn put(&self, url: &str, body: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        entries.insert(url.to_string(), body.to_string());
        write_json(&self.path, &*entries)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Serialize `value` as pretty JSON to `path`, creating parent directories.
///
/// The file is written next to `path` and renamed over it, so readers never
/// see a partial file.
pub(crate) fn write_json<T: serde::Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialization {
        path: path.display().to_string(),
        source,
    })?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut file = NamedTempFile::new_in(parent).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_cache_get_put() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("http://x/query?a=1"), None);
        cache.put("http://x/query?a=1", "{}").unwrap();
        assert_eq!(cache.get("http://x/query?a=1").as_deref(), Some("{}"));
        assert_eq!(cache.get("http://x/query?a=2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let cache = JsonFileCache::open(&path).unwrap();
        assert!(cache.is_empty());
        cache.put("http://x/query?node=/c/en/cat", r#"{"edges":[]}"#).unwrap();

        let reopened = JsonFileCache::open(&path).unwrap();
        assert_eq!(
            reopened.get("http://x/query?node=/c/en/cat").as_deref(),
            Some(r#"{"edges":[]}"#)
        );
    }

    #[test]
    fn truncated_file_opens_empty_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{truncated").unwrap();

        let cache = JsonFileCache::open(&path).unwrap();
        assert!(cache.is_empty());

        cache.put("http://x/query?a=1", "{}").unwrap();
        let on_disk: HashMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk["http://x/query?a=1"], "{}");
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = JsonFileCache::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn write_json_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = JsonFileCache::open(&path).unwrap();

        cache.put("http://x/query?a=1", "{}").unwrap();
        cache.put("http://x/query?a=2", "[]").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("cache.json")]);
    }
}
