//! Configuration for fetching and caching behavior.
//!
//! Settings load from a TOML file in the platform config directory and are
//! created with defaults when missing. Environment variables override the
//! file:
//!
//! - `SPARTAN_DOCS_CONFIG_DIR`: directory holding `config.toml`
//! - `SPARTAN_DOCS_DATA_DIR`: cache root (see [`crate::storage`])
//! - `SPARTAN_DOCS_FETCH_CACHE_TTL_MS`: ephemeral fetch-cache TTL
//! - `SPARTAN_DOCS_CACHE_TTL_HOURS`: disk-cache staleness TTL
//! - `SPARTAN_DOCS_BASE_URL`: documentation site origin

use crate::registry::DEFAULT_BASE_URL;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default ephemeral fetch-cache TTL: responses younger than this are served
/// without a network call.
pub const DEFAULT_FETCH_CACHE_TTL_MS: u64 = 300_000;

/// Default disk-cache TTL: entries older than this are flagged stale on
/// read, triggering caller-driven refresh.
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Global configuration for the docs cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network fetch settings.
    pub fetch: FetchConfig,
    /// Disk cache settings.
    pub cache: CacheConfig,
    /// Documentation site settings.
    pub site: SiteConfig,
}

/// Settings for the content fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Ephemeral response-cache TTL in milliseconds.
    pub cache_ttl_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_FETCH_CACHE_TTL_MS,
        }
    }
}

/// Settings for the version-partitioned disk cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Staleness TTL in hours. Stale entries are still served; the flag is
    /// advisory.
    pub ttl_hours: u64,
    /// Cache root directory. When unset, the platform data directory (or
    /// `SPARTAN_DOCS_DATA_DIR`) is used.
    pub root: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            root: None,
        }
    }
}

/// Settings for the scraped documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site origin all documentation URLs are built from.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location, falling back to
    /// defaults when no file exists, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Serializes the configuration to an explicit TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {e}")))?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;
        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("SPARTAN_DOCS_CONFIG_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed).join("config.toml"));
            }
        }

        directories::ProjectDirs::from("", "", "spartan-docs")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(ttl) = env_parse::<u64>("SPARTAN_DOCS_FETCH_CACHE_TTL_MS") {
            self.fetch.cache_ttl_ms = ttl;
        }
        if let Some(hours) = env_parse::<u64>("SPARTAN_DOCS_CACHE_TTL_HOURS") {
            self.cache.ttl_hours = hours;
        }
        if let Ok(url) = std::env::var("SPARTAN_DOCS_BASE_URL") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.site.base_url = trimmed.to_string();
            }
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch.cache_ttl_ms, 300_000);
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.site.base_url, "https://spartan.ng");
        assert!(config.cache.root.is_none());
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.fetch.cache_ttl_ms = 1_000;
        config.cache.ttl_hours = 48;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[cache]\nttl_hours = 6\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cache.ttl_hours, 6);
        assert_eq!(loaded.fetch.cache_ttl_ms, DEFAULT_FETCH_CACHE_TTL_MS);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not valid toml [[[").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
