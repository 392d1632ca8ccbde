//! Batch cache warming across the known component and topic set.
//!
//! Warming is strictly sequential: one page at a time, with a fixed delay
//! between items to rate-limit outbound requests, and no concurrent writes
//! against the shared partition metadata. A per-item failure is recorded
//! and never aborts the batch; only catastrophic setup errors (an
//! unwritable cache root) propagate to the caller.

use crate::Result;
use crate::api::extract_api_info;
use crate::fetcher::{ContentFormat, Fetcher};
use crate::registry::Registry;
use crate::storage::Storage;
use crate::types::{ComponentPayload, FullComponentDoc};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Delay inserted between warmed items.
pub const ITEM_DELAY: Duration = Duration::from_millis(100);

/// Progress callback, invoked with `(current, total)` after every item.
pub type ProgressFn = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Options controlling a warm run.
#[derive(Default)]
pub struct WarmOptions {
    /// Component names to warm. Defaults to the full known-component list.
    pub components: Option<Vec<String>>,
    /// Whether to warm the documentation-topic list after components.
    pub include_docs: bool,
    /// Invoked after each item, success or failure.
    pub on_progress: Option<ProgressFn>,
}

/// Success/failure tally for one warmed category.
#[derive(Debug, Clone, Default)]
pub struct WarmCounts {
    /// Number of items attempted.
    pub total: usize,
    /// Number cached successfully.
    pub success: usize,
    /// Number that failed.
    pub failed: usize,
    /// One record per failed item.
    pub errors: Vec<WarmFailure>,
}

/// A single failed item in a warm run.
#[derive(Debug, Clone)]
pub struct WarmFailure {
    /// Component name or docs topic.
    pub item: String,
    /// Rendered error message.
    pub error: String,
}

/// Aggregate result of a warm run. Partial failure is reported here, never
/// as an error.
#[derive(Debug)]
pub struct WarmReport {
    /// Version partition the run wrote into.
    pub version: String,
    /// Component tally.
    pub components: WarmCounts,
    /// Docs tally (all zeroes when docs were not included).
    pub docs: WarmCounts,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

/// Warms the disk cache for a set of components and, optionally, the
/// documentation topics.
///
/// Fetches bypass the ephemeral cache to force freshness. Items are
/// processed one at a time with [`ITEM_DELAY`] between them.
pub async fn warm_cache(
    fetcher: &Fetcher,
    storage: &mut Storage,
    registry: &Registry,
    options: WarmOptions,
) -> Result<WarmReport> {
    let started = Instant::now();

    // Re-ensure the active partition up front so an unusable cache root
    // fails the run instead of every item.
    let active = storage.active_version().to_string();
    let version = storage.initialize(Some(&active))?;

    let components: Vec<String> = options.components.unwrap_or_else(|| {
        registry
            .components()
            .iter()
            .map(ToString::to_string)
            .collect()
    });

    info!(
        "Warming cache for {} component(s) into '{}'",
        components.len(),
        version
    );

    let mut component_counts = WarmCounts {
        total: components.len(),
        ..WarmCounts::default()
    };

    for (index, name) in components.iter().enumerate() {
        match warm_component(fetcher, storage, registry, name).await {
            Ok(()) => component_counts.success += 1,
            Err(e) => {
                warn!("Failed to warm component '{}': {}", name, e);
                component_counts.failed += 1;
                component_counts.errors.push(WarmFailure {
                    item: name.clone(),
                    error: e.to_string(),
                });
            },
        }

        if let Some(on_progress) = &options.on_progress {
            on_progress(index + 1, components.len());
        }
        if index + 1 < components.len() {
            tokio::time::sleep(ITEM_DELAY).await;
        }
    }

    let mut docs_counts = WarmCounts::default();
    if options.include_docs {
        let topics = registry.doc_topics();
        docs_counts.total = topics.len();

        for (index, topic) in topics.iter().enumerate() {
            match warm_topic(fetcher, storage, registry, topic).await {
                Ok(()) => docs_counts.success += 1,
                Err(e) => {
                    warn!("Failed to warm docs topic '{}': {}", topic, e);
                    docs_counts.failed += 1;
                    docs_counts.errors.push(WarmFailure {
                        item: (*topic).to_string(),
                        error: e.to_string(),
                    });
                },
            }

            if let Some(on_progress) = &options.on_progress {
                on_progress(index + 1, topics.len());
            }
            if index + 1 < topics.len() {
                tokio::time::sleep(ITEM_DELAY).await;
            }
        }
    }

    let report = WarmReport {
        version,
        components: component_counts,
        docs: docs_counts,
        duration: started.elapsed(),
    };
    info!(
        "Warm finished: {}/{} components, {}/{} docs in {:?}",
        report.components.success,
        report.components.total,
        report.docs.success,
        report.docs.total,
        report.duration
    );
    Ok(report)
}

async fn warm_component(
    fetcher: &Fetcher,
    storage: &mut Storage,
    registry: &Registry,
    name: &str,
) -> Result<()> {
    let url = registry.component_url(name);
    let html = fetcher.fetch_content(&url, ContentFormat::Html, true).await?;
    let api = extract_api_info(&html);

    let full = FullComponentDoc {
        html: html.clone(),
        api: api.clone(),
        examples: api.examples.clone(),
        url,
    };
    let payload = ComponentPayload {
        html,
        examples: api.examples.clone(),
        api,
        full: Some(full),
    };
    storage.set_component(name, &payload)
}

async fn warm_topic(
    fetcher: &Fetcher,
    storage: &mut Storage,
    registry: &Registry,
    topic: &str,
) -> Result<()> {
    let url = registry.documentation_url(topic);
    let content = fetcher.fetch_content(&url, ContentFormat::Text, true).await?;
    storage.set_docs(topic, &content)
}
