//! Version-partitioned disk cache for extracted documentation data.
//!
//! Each version partition is an isolated directory tree:
//!
//! ```text
//! cache/{version}/metadata.json
//! cache/{version}/components/{key}.json
//! cache/{version}/docs/{topic}.json
//! ```
//!
//! Entry files are the source of truth for presence; `metadata.json` is an
//! index kept in lockstep by updating it immediately after every entry
//! write. Reads downgrade any problem (missing file, corrupt JSON) to a
//! cache miss; writes propagate failures. Staleness is advisory: entries
//! older than the TTL are still returned, flagged, and the caller decides
//! whether to refresh.
//!
//! The version string is an opaque partition key supplied by the caller.
//! There is no auto-detection of an installed library version; unversioned
//! use lands in the `"latest"` partition.

use crate::config::DEFAULT_CACHE_TTL_HOURS;
use crate::registry::normalize;
use crate::types::{
    CacheStats, ComponentEntry, ComponentHit, ComponentPayload, DocsEntry, DocsHit, EntryMeta,
    VersionMetadata, VersionStats,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Partition used when the caller does not name a version.
pub const DEFAULT_VERSION: &str = "latest";

/// Maximum allowed length for version strings and cache keys.
const MAX_KEY_LEN: usize = 64;

/// Outcome of a clear operation. Clearing never fails loudly; I/O problems
/// are reported here instead of thrown.
#[derive(Debug, Clone)]
pub struct ClearOutcome {
    /// Whether the partition was cleared and recreated.
    pub success: bool,
    /// Human-readable result description.
    pub message: String,
}

/// Outcome of clearing every version partition.
#[derive(Debug, Clone)]
pub struct ClearAllOutcome {
    /// Whether all partitions were cleared.
    pub success: bool,
    /// Human-readable result description.
    pub message: String,
    /// Names of the partitions that were removed.
    pub cleared: Vec<String>,
}

/// Local filesystem cache, partitioned by version.
pub struct Storage {
    root_dir: PathBuf,
    ttl_hours: u64,
    active_version: String,
    metadata: VersionMetadata,
}

impl Storage {
    /// Creates a storage instance rooted at the default cache directory.
    ///
    /// `SPARTAN_DOCS_DATA_DIR` overrides the root explicitly; otherwise the
    /// XDG data directory (or `~/.spartan-docs`) is used.
    pub fn new() -> Result<Self> {
        Self::with_root(Self::default_root()?)
    }

    /// Creates a storage instance with a custom cache root.
    pub fn with_root(root_dir: PathBuf) -> Result<Self> {
        Self::with_options(root_dir, DEFAULT_CACHE_TTL_HOURS)
    }

    /// Creates a storage instance with a custom root and staleness TTL.
    pub fn with_options(root_dir: PathBuf, ttl_hours: u64) -> Result<Self> {
        fs::create_dir_all(&root_dir)
            .map_err(|e| Error::Storage(format!("Failed to create cache root: {e}")))?;
        Ok(Self {
            root_dir,
            ttl_hours,
            active_version: DEFAULT_VERSION.to_string(),
            metadata: VersionMetadata::new(DEFAULT_VERSION),
        })
    }

    /// Creates a storage instance from configuration.
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        let root = match &config.cache.root {
            Some(root) => root.clone(),
            None => Self::default_root()?,
        };
        Self::with_options(root, config.cache.ttl_hours)
    }

    fn default_root() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("SPARTAN_DOCS_DATA_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            let trimmed = xdg.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join("spartan-docs").join("cache"));
            }
        }

        let base = directories::BaseDirs::new()
            .ok_or_else(|| Error::Storage("Failed to determine home directory".into()))?;
        Ok(base.home_dir().join(".spartan-docs").join("cache"))
    }

    /// Returns the cache root directory.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Returns the active version partition.
    #[must_use]
    pub fn active_version(&self) -> &str {
        &self.active_version
    }

    /// Returns the staleness TTL in hours.
    #[must_use]
    pub const fn ttl_hours(&self) -> u64 {
        self.ttl_hours
    }

    /// Sets the active version (default `"latest"`), ensures its directory
    /// tree exists, and loads or creates its metadata. Returns the version
    /// that became active.
    pub fn initialize(&mut self, version: Option<&str>) -> Result<String> {
        let version = version.unwrap_or(DEFAULT_VERSION);
        Self::validate_key(version)?;

        self.active_version = version.to_string();
        self.ensure_partition_dirs()?;

        self.metadata = match self.load_metadata(version) {
            Some(metadata) => metadata,
            None => {
                let metadata = VersionMetadata::new(version);
                Self::write_json_pretty(&self.metadata_path(version), &metadata)?;
                metadata
            },
        };

        info!("Initialized cache partition '{}'", version);
        Ok(self.active_version.clone())
    }

    /// Changes the active version pointer and ensures/loads that partition.
    ///
    /// O(1) plus directory-ensure cost; no other partition's data is
    /// touched.
    pub fn switch_version(&mut self, version: &str) -> Result<()> {
        self.initialize(Some(version))?;
        Ok(())
    }

    /// Reads a cached component under the active version.
    ///
    /// Returns `Ok(None)` on a miss, which includes missing and corrupt
    /// entry files. `field` projects a single top-level field of the entry;
    /// without it the whole entry object is returned.
    pub fn get_component(&self, key: &str, field: Option<&str>) -> Result<Option<ComponentHit>> {
        let key = Self::cache_key(key)?;
        let path = self.component_path(&key);

        let Some(value) = Self::read_json_value(&path) else {
            return Ok(None);
        };
        let Some(cached_at) = Self::entry_timestamp(&value) else {
            warn!("Entry for '{}' has no usable cachedAt; treating as miss", key);
            return Ok(None);
        };

        let data = match field {
            Some(field) => value.get(field).cloned().unwrap_or(serde_json::Value::Null),
            None => value,
        };

        Ok(Some(ComponentHit {
            data,
            stale: self.is_stale(cached_at),
            cached_at,
            version: self.active_version.clone(),
        }))
    }

    /// Writes a component payload under the active version and updates the
    /// partition metadata in lockstep.
    pub fn set_component(&mut self, key: &str, payload: &ComponentPayload) -> Result<()> {
        let key = Self::cache_key(key)?;
        self.ensure_partition_dirs()?;

        let now = Utc::now();
        let entry = ComponentEntry {
            payload: payload.clone(),
            component_name: key.clone(),
            version: self.active_version.clone(),
            cached_at: now,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        Self::write_atomic(&self.component_path(&key), &json)?;

        self.metadata.components.insert(
            key.clone(),
            EntryMeta {
                cached_at: now,
                size: json.len() as u64,
            },
        );
        self.metadata.last_updated = now;
        self.save_metadata()?;

        debug!("Cached component '{}' ({} bytes)", key, json.len());
        Ok(())
    }

    /// Reads a cached docs topic under the active version.
    pub fn get_docs(&self, topic: &str) -> Result<Option<DocsHit>> {
        let topic = Self::cache_key(topic)?;
        let path = self.docs_path(&topic);

        let Some(contents) = Self::read_file(&path) else {
            return Ok(None);
        };
        let entry: DocsEntry = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt docs entry for '{}': {}; treating as miss", topic, e);
                return Ok(None);
            },
        };

        Ok(Some(DocsHit {
            stale: self.is_stale(entry.cached_at),
            cached_at: entry.cached_at,
            content: entry.content,
            version: self.active_version.clone(),
        }))
    }

    /// Writes a docs topic under the active version and updates the
    /// partition metadata in lockstep.
    pub fn set_docs(&mut self, topic: &str, content: &str) -> Result<()> {
        let topic = Self::cache_key(topic)?;
        self.ensure_partition_dirs()?;

        let now = Utc::now();
        let entry = DocsEntry {
            topic: topic.clone(),
            content: content.to_string(),
            version: self.active_version.clone(),
            cached_at: now,
        };
        let json = serde_json::to_string_pretty(&entry)?;
        Self::write_atomic(&self.docs_path(&topic), &json)?;

        self.metadata.docs.insert(
            topic.clone(),
            EntryMeta {
                cached_at: now,
                size: json.len() as u64,
            },
        );
        self.metadata.last_updated = now;
        self.save_metadata()?;

        debug!("Cached docs topic '{}' ({} bytes)", topic, json.len());
        Ok(())
    }

    /// Deletes the active version's directory recursively, then immediately
    /// recreates the empty structure and a fresh metadata file.
    ///
    /// Idempotent, and never fails loudly: I/O problems come back in the
    /// outcome message.
    pub fn clear_version(&mut self) -> ClearOutcome {
        match self.reset_active_partition() {
            Ok(()) => ClearOutcome {
                success: true,
                message: format!("Cleared cache for version '{}'", self.active_version),
            },
            Err(e) => ClearOutcome {
                success: false,
                message: format!("Failed to clear version '{}': {e}", self.active_version),
            },
        }
    }

    /// Deletes every version partition, then recreates the active one
    /// empty. Returns the names of the removed partitions.
    pub fn clear_all(&mut self) -> ClearAllOutcome {
        match self.remove_all_partitions() {
            Ok(cleared) => ClearAllOutcome {
                success: true,
                message: format!("Cleared {} cached version(s)", cleared.len()),
                cleared,
            },
            Err(e) => ClearAllOutcome {
                success: false,
                message: format!("Failed to clear cache: {e}"),
                cleared: Vec::new(),
            },
        }
    }

    /// Summarizes every partition with readable metadata.
    ///
    /// Partitions whose metadata file is missing or corrupt are silently
    /// skipped: not counted, not errored.
    #[must_use]
    pub fn get_stats(&self) -> CacheStats {
        let versions: Vec<VersionStats> = self
            .list_versions()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|version| {
                let metadata = self.load_metadata(&version)?;
                Some(VersionStats {
                    component_count: metadata.components.len(),
                    docs_count: metadata.docs.len(),
                    created_at: metadata.created_at,
                    last_updated: metadata.last_updated,
                    is_current: version == self.active_version,
                    version,
                })
            })
            .collect();

        CacheStats {
            current_version: self.active_version.clone(),
            total_versions: versions.len(),
            versions,
        }
    }

    /// Lists version partitions present on disk, independent of metadata
    /// validity.
    pub fn list_versions(&self) -> Result<Vec<String>> {
        let mut versions = Vec::new();
        let entries = fs::read_dir(&self.root_dir)
            .map_err(|e| Error::Storage(format!("Failed to read cache root: {e}")))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::Storage(format!("Failed to read entry: {e}")))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    versions.push(name.to_string());
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    fn reset_active_partition(&mut self) -> Result<()> {
        let dir = self.version_dir(&self.active_version);
        if dir.exists() {
            fs::remove_dir_all(&dir)
                .map_err(|e| Error::Storage(format!("Failed to remove partition: {e}")))?;
        }

        self.metadata = VersionMetadata::new(&self.active_version);
        self.ensure_partition_dirs()?;
        self.save_metadata()?;
        info!("Cleared cache partition '{}'", self.active_version);
        Ok(())
    }

    fn remove_all_partitions(&mut self) -> Result<Vec<String>> {
        let versions = self.list_versions()?;
        for version in &versions {
            fs::remove_dir_all(self.version_dir(version))
                .map_err(|e| Error::Storage(format!("Failed to remove '{version}': {e}")))?;
        }

        self.metadata = VersionMetadata::new(&self.active_version);
        self.ensure_partition_dirs()?;
        self.save_metadata()?;
        Ok(versions)
    }

    fn is_stale(&self, cached_at: DateTime<Utc>) -> bool {
        let ttl_ms = i64::try_from(self.ttl_hours).unwrap_or(i64::MAX / 3_600_000) * 3_600_000;
        (Utc::now() - cached_at).num_milliseconds() > ttl_ms
    }

    fn version_dir(&self, version: &str) -> PathBuf {
        self.root_dir.join(version)
    }

    fn metadata_path(&self, version: &str) -> PathBuf {
        self.version_dir(version).join("metadata.json")
    }

    fn component_path(&self, key: &str) -> PathBuf {
        self.version_dir(&self.active_version)
            .join("components")
            .join(format!("{key}.json"))
    }

    fn docs_path(&self, topic: &str) -> PathBuf {
        self.version_dir(&self.active_version)
            .join("docs")
            .join(format!("{topic}.json"))
    }

    fn ensure_partition_dirs(&self) -> Result<()> {
        let dir = self.version_dir(&self.active_version);
        fs::create_dir_all(dir.join("components"))
            .map_err(|e| Error::Storage(format!("Failed to create components dir: {e}")))?;
        fs::create_dir_all(dir.join("docs"))
            .map_err(|e| Error::Storage(format!("Failed to create docs dir: {e}")))?;
        Ok(())
    }

    fn load_metadata(&self, version: &str) -> Option<VersionMetadata> {
        let contents = Self::read_file(&self.metadata_path(version))?;
        match serde_json::from_str(&contents) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Corrupt metadata for version '{}': {}", version, e);
                None
            },
        }
    }

    fn save_metadata(&self) -> Result<()> {
        Self::write_json_pretty(&self.metadata_path(&self.active_version), &self.metadata)
    }

    /// Normalizes and validates a caller-supplied cache key.
    fn cache_key(key: &str) -> Result<String> {
        let normalized = normalize(key);
        Self::validate_key(&normalized)?;
        Ok(normalized)
    }

    /// Validates that a key/version is safe to use as a file or directory
    /// name. Unified for components, topics, and version strings.
    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::Storage("Cache key cannot be empty".into()));
        }
        if key.contains("..") || key.contains('/') || key.contains('\\') {
            return Err(Error::Storage(format!(
                "Invalid cache key '{key}': contains path traversal characters"
            )));
        }
        if key.starts_with('.') || key.contains('\0') {
            return Err(Error::Storage(format!(
                "Invalid cache key '{key}': contains invalid filesystem characters"
            )));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(Error::Storage(format!(
                "Invalid cache key '{key}': exceeds maximum length of {MAX_KEY_LEN} characters"
            )));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(Error::Storage(format!(
                "Invalid cache key '{key}': only [A-Za-z0-9._-] are allowed"
            )));
        }
        Ok(())
    }

    fn entry_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
        value
            .get("cachedAt")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
    }

    fn read_file(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            },
        }
    }

    fn read_json_value(path: &Path) -> Option<serde_json::Value> {
        let contents = Self::read_file(path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Corrupt cache entry {}: {}", path.display(), e);
                None
            },
        }
    }

    fn write_json_pretty<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        Self::write_atomic(path, &json)
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<()> {
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .map_err(|e| Error::Storage(format!("Failed to write cache entry: {e}")))?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(path)
                .map_err(|e| Error::Storage(format!("Failed to replace cache entry: {e}")))?;
        }

        fs::rename(&tmp_path, path)
            .map_err(|e| Error::Storage(format!("Failed to commit cache entry: {e}")))?;
        Ok(())
    }
}
