//! Error types and handling for spartan-docs-core operations.
//!
//! Failures are categorized so callers can tell transport problems apart from
//! cache I/O. Two policies worth knowing:
//!
//! - Extraction never produces an error: missing or malformed page structure
//!   degrades to empty results (see [`crate::api`]).
//! - Disk-cache reads downgrade any problem to a cache miss, while writes
//!   propagate, since a failed write must not report false success.

use thiserror::Error;

/// The main error type for spartan-docs-core operations.
///
/// All fallible public functions in this crate return `Result<T, Error>`.
/// Errors preserve their source chain where an underlying error exists.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers file system operations like reading/writing cache files and
    /// creating partition directories.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network transport failed before an HTTP status was available.
    ///
    /// Covers connection failures, timeouts, and TLS problems surfaced by
    /// the underlying client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    ///
    /// Carries the URL and status code so callers can surface the failure
    /// verbatim with context. Not retried automatically anywhere in this
    /// crate.
    #[error("Fetch failed for '{url}': HTTP {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// Cache storage operation failed.
    ///
    /// Covers disk-cache failures beyond plain I/O: invalid cache keys,
    /// metadata bookkeeping problems, partition management.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary: network
    /// timeouts, connection failures, interrupted I/O, and server-side
    /// (5xx) fetch failures.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Fetch { status, .. } => *status >= 500,
            Self::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                )
            },
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for grouping errors in logs and metrics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Fetch { .. } => "fetch",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
            Self::NotFound(_) => "not_found",
            Self::Config(_) => "config",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
