//! Configuration loading and client factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use conceptquiz_core::cache::JsonFileCache;
use conceptquiz_core::store::JsonFileStore;

use crate::client::{ConceptNetClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level conceptquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Root of the ConceptNet API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Relations shown per search page.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: i64,
    /// Languages a search is fanned out to.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Durable HTTP response cache.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Relations saved for the quiz games.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_results_per_page() -> i64 {
    50
}
fn default_languages() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string()]
}
fn default_cache_path() -> PathBuf {
    PathBuf::from("./conceptquiz-data/http-cache.json")
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./conceptquiz-data/relations.json")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            results_per_page: default_results_per_page(),
            languages: default_languages(),
            cache_path: default_cache_path(),
            store_path: default_store_path(),
        }
    }
}

impl QuizConfig {
    /// Build the HTTP client, backed by the durable response cache.
    pub fn client(&self) -> Result<ConceptNetClient> {
        let cache = JsonFileCache::open(&self.cache_path)
            .with_context(|| format!("failed to open cache: {}", self.cache_path.display()))?;
        Ok(ConceptNetClient::with_timeout(&self.base_url, self.timeout_secs)
            .with_cache(Arc::new(cache)))
    }

    /// Open the relation store.
    pub fn store(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(&self.store_path).with_context(|| {
            format!(
                "failed to open relation store: {}",
                self.store_path.display()
            )
        })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `conceptquiz.toml` in the current directory
/// 2. `~/.config/conceptquiz/config.toml`
///
/// Environment variable override: `CONCEPTQUIZ_BASE_URL`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("conceptquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    if let Ok(url) = std::env::var("CONCEPTQUIZ_BASE_URL") {
        config.base_url = url;
    }

    config.base_url = resolve_env_vars(&config.base_url);
    config.cache_path = resolve_path(&config.cache_path);
    config.store_path = resolve_path(&config.store_path);

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// Parse and validate a TOML configuration document.
pub fn parse_config(content: &str) -> Result<QuizConfig> {
    let config: QuizConfig = toml::from_str(content)?;
    anyhow::ensure!(
        !config.languages.is_empty(),
        "at least one search language is required"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("conceptquiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CONCEPTQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CONCEPTQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CONCEPTQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_CONCEPTQUIZ_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.base_url, "http://api.conceptnet.io");
        assert_eq!(config.results_per_page, 50);
        assert_eq!(config.languages, vec!["en", "fr"]);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
base_url = "http://localhost:8084"
results_per_page = 10
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8084");
        assert_eq!(config.results_per_page, 10);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.languages.len(), 2);
    }

    #[test]
    fn empty_languages_rejected() {
        assert!(parse_config("languages = []").is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/conceptquiz.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conceptquiz.toml");
        std::fs::write(&path, "languages = [\"fr\"]\nstore_path = \"/tmp/x.json\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.languages, vec!["fr"]);
        assert_eq!(config.store_path, PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn client_opens_over_truncated_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("http-cache.json");
        std::fs::write(&cache_path, "{truncated").unwrap();

        let config = QuizConfig {
            cache_path,
            ..Default::default()
        };
        assert!(config.client().is_ok());
    }
}
