//! # spartan-docs-core
//!
//! Core functionality for spartan-docs - a local, versioned cache of the
//! spartan.ng component-library documentation.
//!
//! This crate scrapes the documentation site's HTML, extracts structured
//! API data (primitives, selectors, inputs/outputs tables, code examples),
//! and persists it per-version on disk so that request-handling layers (MCP
//! tools, resources, prompts) can serve it without a network round trip.
//!
//! ## Architecture
//!
//! - **Text & extraction**: best-effort HTML-to-text plus code block,
//!   heading, and link extraction ([`text`], [`extract`])
//! - **API parsing**: section-scoped extraction of "Brain API" / "Helm API"
//!   data into typed records ([`api`])
//! - **Fetching**: an HTTP client fronted by a short-TTL in-process
//!   response cache ([`fetcher`])
//! - **Storage**: a version-partitioned disk cache with advisory staleness
//!   ([`storage`])
//! - **Warming**: sequential batch population of the disk cache ([`warmer`])
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use spartan_docs_core::{ContentFormat, Fetcher, Registry, Storage, extract_api_info};
//!
//! # async fn run() -> spartan_docs_core::Result<()> {
//! let registry = Registry::new();
//! let fetcher = Fetcher::new()?;
//! let mut storage = Storage::new()?;
//! storage.initialize(None)?; // the "latest" partition
//!
//! let url = registry.component_url("dialog");
//! let html = fetcher.fetch_content(&url, ContentFormat::Html, false).await?;
//! let info = extract_api_info(&html);
//! println!("{} brain primitives", info.brain_api.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure semantics
//!
//! Extraction is best-effort and never fails: missing sections degrade to
//! empty results. Fetching fails hard on transport errors and non-success
//! statuses. Disk-cache reads downgrade problems to misses; writes
//! propagate them. The warmer reports partial failure as data, not as an
//! error.

/// Section-scoped API extraction from documentation pages
pub mod api;
/// Configuration loading with env overrides
pub mod config;
/// Error types and result aliases
pub mod error;
/// Code block, heading, and link extraction
pub mod extract;
/// HTTP fetching with an ephemeral response cache
pub mod fetcher;
/// Built-in registry of known components and topics
pub mod registry;
/// Version-partitioned disk cache
pub mod storage;
/// Best-effort HTML to plain-text conversion
pub mod text;
/// Core data types and structures
pub mod types;
/// Batch cache warming
pub mod warmer;

// Re-export commonly used types
pub use api::{MAX_EXAMPLES, extract_api_info};
pub use config::{CacheConfig, Config, FetchConfig, SiteConfig};
pub use error::{Error, Result};
pub use extract::{Link, extract_code_blocks, extract_headings, extract_links};
pub use fetcher::{ContentFormat, Fetcher};
pub use registry::Registry;
pub use storage::{ClearAllOutcome, ClearOutcome, DEFAULT_VERSION, Storage};
pub use text::to_plain_text;
pub use types::*;
pub use warmer::{WarmCounts, WarmFailure, WarmOptions, WarmReport, warm_cache};
