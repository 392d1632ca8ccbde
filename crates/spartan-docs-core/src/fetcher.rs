//! HTTP fetching with a short-TTL in-process response cache.
//!
//! The ephemeral cache sits in front of every page fetch so that bursts of
//! tool calls against the same page do not hammer the documentation site.
//! It is owned state of the [`Fetcher`] (no globals), keyed by URL and
//! requested format, and lost on process restart. Expiry is lazy: stale
//! entries are treated as absent on lookup, not purged.

use crate::config::DEFAULT_FETCH_CACHE_TTL_MS;
use crate::text::to_plain_text;
use crate::{Error, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Requested response format for a content fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// Raw HTML as served.
    Html,
    /// HTML converted to plain text before caching/returning.
    Text,
}

impl ContentFormat {
    /// Stable identifier used in cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
        }
    }
}

struct CachedResponse {
    content: String,
    fetched_at: Instant,
}

/// HTTP client for documentation pages with an ephemeral response cache.
pub struct Fetcher {
    client: Client,
    cache: RwLock<HashMap<String, CachedResponse>>,
    ttl: Duration,
}

impl Fetcher {
    /// Creates a fetcher with the default cache TTL (5 minutes).
    pub fn new() -> Result<Self> {
        Self::with_ttl(Duration::from_millis(DEFAULT_FETCH_CACHE_TTL_MS))
    }

    /// Creates a fetcher with a custom cache TTL.
    pub fn with_ttl(ttl: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("spartan-docs/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            cache: RwLock::new(HashMap::new()),
            ttl,
        })
    }

    /// Creates a fetcher with the TTL from configuration.
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Self::with_ttl(Duration::from_millis(config.fetch.cache_ttl_ms))
    }

    /// Fetches a page, serving from the ephemeral cache when possible.
    ///
    /// With `bypass_cache` false, a cached response younger than the TTL is
    /// returned without any network call, and a successful fetch overwrites
    /// the cache entry. With `bypass_cache` true the cache is neither read
    /// nor written.
    ///
    /// A non-success HTTP status is a hard failure carrying the URL and
    /// status code.
    pub async fn fetch_content(
        &self,
        url: &str,
        format: ContentFormat,
        bypass_cache: bool,
    ) -> Result<String> {
        let cache_key = format!("{url}::{}", format.as_str());

        if !bypass_cache {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    debug!("fetch cache hit for {}", cache_key);
                    return Ok(entry.content.clone());
                }
            }
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        info!("Fetched {} bytes from {}", raw.len(), url);

        let content = match format {
            ContentFormat::Html => raw,
            ContentFormat::Text => to_plain_text(&raw),
        };

        if !bypass_cache {
            let mut cache = self.cache.write().await;
            cache.insert(
                cache_key,
                CachedResponse {
                    content: content.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        Ok(content)
    }
}
