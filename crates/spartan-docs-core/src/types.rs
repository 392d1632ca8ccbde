//! Core data types shared across extraction, storage, and warming.
//!
//! The serialized field names (camelCase) are part of the on-disk cache
//! format, so renames here are format changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a component's Inputs table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInput {
    /// Property name as written in the docs table.
    pub prop: String,
    /// Declared TypeScript type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Default value, empty when the table leaves it blank.
    pub default: String,
    /// Free-text description, empty when the table has no fourth cell.
    pub description: String,
}

/// One row of a component's Outputs table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiOutput {
    /// Event name as written in the docs table.
    pub prop: String,
    /// Declared emitter type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Free-text description.
    pub description: String,
}

/// Structured API data for a single `Brn*`/`Hlm*` primitive.
///
/// Constructed fresh on every parse of a documentation page and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentApiRecord {
    /// Primitive name, e.g. `BrnDialogTrigger`.
    pub name: String,
    /// Selector line content, possibly empty when the docs omit it.
    pub selector: String,
    /// Inputs in source-document order.
    pub inputs: Vec<ApiInput>,
    /// Outputs in source-document order.
    pub outputs: Vec<ApiOutput>,
}

/// Everything the API section parser extracts from one documentation page.
///
/// `brain_api` and `helm_api` are independently optional: a page without a
/// named section yields an empty sequence, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedApiInfo {
    /// Records parsed from the "Brain API" section.
    pub brain_api: Vec<ComponentApiRecord>,
    /// Records parsed from the "Helm API" section.
    pub helm_api: Vec<ComponentApiRecord>,
    /// Up to [`crate::api::MAX_EXAMPLES`] code examples from the whole page.
    pub examples: Vec<CodeExample>,
}

/// A code example lifted from a page's code blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExample {
    /// Positional title, `Example 1` onwards.
    pub title: String,
    /// Plain-text code content.
    pub code: String,
    /// Best-effort language guess.
    pub language: String,
}

/// Payload cached per component, as handed to `set_component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPayload {
    /// Raw page HTML the extraction ran against.
    pub html: String,
    /// Structured API data.
    pub api: ExtractedApiInfo,
    /// Code examples.
    pub examples: Vec<CodeExample>,
    /// Optional expanded doc (same shape plus source URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<FullComponentDoc>,
}

/// Expanded documentation payload retained alongside the summary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullComponentDoc {
    /// Raw page HTML.
    pub html: String,
    /// Structured API data.
    pub api: ExtractedApiInfo,
    /// Code examples.
    pub examples: Vec<CodeExample>,
    /// URL the page was fetched from.
    pub url: String,
}

/// On-disk shape of `components/{key}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    /// The cached payload fields, flattened into the entry object.
    #[serde(flatten)]
    pub payload: ComponentPayload,
    /// Case-normalized component key the entry was written under.
    pub component_name: String,
    /// Version partition the entry belongs to.
    pub version: String,
    /// Timestamp of the write.
    pub cached_at: DateTime<Utc>,
}

/// On-disk shape of `docs/{topic}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsEntry {
    /// Case-normalized topic key.
    pub topic: String,
    /// Plain documentation content.
    pub content: String,
    /// Version partition the entry belongs to.
    pub version: String,
    /// Timestamp of the write.
    pub cached_at: DateTime<Utc>,
}

/// Bookkeeping for one entry referenced from [`VersionMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    /// Timestamp of the entry write.
    pub cached_at: DateTime<Utc>,
    /// Serialized entry size in bytes.
    pub size: u64,
}

/// Per-partition index stored as `metadata.json`.
///
/// Kept in lockstep with entry files by updating it immediately after every
/// entry write. Entry files remain the source of truth for presence; this
/// index can be rebuilt from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Version string this partition is keyed by.
    pub version: String,
    /// Partition creation time.
    pub created_at: DateTime<Utc>,
    /// Last entry write time.
    pub last_updated: DateTime<Utc>,
    /// Component key -> entry bookkeeping.
    pub components: BTreeMap<String, EntryMeta>,
    /// Docs topic -> entry bookkeeping.
    pub docs: BTreeMap<String, EntryMeta>,
}

impl VersionMetadata {
    /// Fresh, empty metadata for a newly initialized partition.
    #[must_use]
    pub fn new(version: &str) -> Self {
        let now = Utc::now();
        Self {
            version: version.to_string(),
            created_at: now,
            last_updated: now,
            components: BTreeMap::new(),
            docs: BTreeMap::new(),
        }
    }
}

/// A component read from the disk cache.
#[derive(Debug, Clone)]
pub struct ComponentHit {
    /// The requested field projection, or the whole payload.
    pub data: serde_json::Value,
    /// Whether the entry is older than the configured TTL. Advisory only:
    /// stale entries are still returned and the caller decides whether to
    /// refresh.
    pub stale: bool,
    /// Timestamp the entry was written.
    pub cached_at: DateTime<Utc>,
    /// Version partition the entry was read from.
    pub version: String,
}

/// A docs topic read from the disk cache.
#[derive(Debug, Clone)]
pub struct DocsHit {
    /// Cached documentation content.
    pub content: String,
    /// Advisory staleness flag, as for [`ComponentHit`].
    pub stale: bool,
    /// Timestamp the entry was written.
    pub cached_at: DateTime<Utc>,
    /// Version partition the entry was read from.
    pub version: String,
}

/// Aggregate cache statistics across all version partitions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Currently active version.
    pub current_version: String,
    /// Number of partitions with readable metadata.
    pub total_versions: usize,
    /// Per-partition summaries.
    pub versions: Vec<VersionStats>,
}

/// Summary of a single version partition, derived from its metadata file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStats {
    /// Version string.
    pub version: String,
    /// Number of cached components.
    pub component_count: usize,
    /// Number of cached docs topics.
    pub docs_count: usize,
    /// Partition creation time.
    pub created_at: DateTime<Utc>,
    /// Last entry write time.
    pub last_updated: DateTime<Utc>,
    /// Whether this partition is the active one.
    pub is_current: bool,
}
