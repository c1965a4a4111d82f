// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "CATALOG_CONFIG_PATH";
/// Base address of the remote content service.
pub const ENV_CONTENT_API_URL: &str = "CONTENT_API_URL";
pub const ENV_CONTENT_API_TIMEOUT_SECS: &str = "CONTENT_API_TIMEOUT_SECS";

pub const DEFAULT_CONFIG_TOML: &str = "config/catalog.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/catalog.json";
pub const DEFAULT_POSTS_PATH: &str = "/blog/posts";
pub const DEFAULT_RELATED_LIMIT: usize = 3;

fn default_posts_path() -> String {
    DEFAULT_POSTS_PATH.to_string()
}

fn default_related_limit() -> usize {
    DEFAULT_RELATED_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// `None` disables the remote source (bundled only).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_posts_path")]
    pub posts_path: String,
    /// Transport deadline for the single remote call.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            posts_path: default_posts_path(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
    /// Replaces the embedded dataset when set.
    #[serde(default)]
    pub bundled_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            related_limit: default_related_limit(),
            bundled_path: None,
        }
    }
}

impl CatalogConfig {
    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading catalog config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $CATALOG_CONFIG_PATH
    /// 2) config/catalog.toml
    /// 3) config/catalog.json
    /// 4) defaults
    pub fn load_default() -> Result<Self> {
        let mut cfg = Self::load_file_default()?;
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    fn load_file_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let toml_p = PathBuf::from(DEFAULT_CONFIG_TOML);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from(DEFAULT_CONFIG_JSON);
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    /// Environment wins over file values.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_CONTENT_API_URL) {
            let url = url.trim();
            self.remote.base_url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Ok(raw) = std::env::var(ENV_CONTENT_API_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_CONTENT_API_TIMEOUT_SECS} must be whole seconds"))?;
            self.remote.timeout_secs = Some(secs);
        }
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        if self.related_limit == 0 {
            self.related_limit = DEFAULT_RELATED_LIMIT;
        }
        if self.remote.posts_path.trim().is_empty() {
            self.remote.posts_path = default_posts_path();
        }
        if self.remote.timeout_secs == Some(0) {
            self.remote.timeout_secs = None;
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<CatalogConfig> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    if hint_ext == "toml" {
        return Ok(toml::from_str(s)?);
    }
    // Unknown extension: JSON objects start with `{`, anything else is tried as TOML.
    if s.trim_start().starts_with('{') {
        Ok(serde_json::from_str(s)?)
    } else {
        Ok(toml::from_str(s)?)
    }
}
