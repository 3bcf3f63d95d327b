//! Error types for album page resolution.
//!
//! Resolution errors are always fatal for a run: nothing has been
//! downloaded yet when they occur.

use thiserror::Error;

/// Errors that can occur while resolving an album listing.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A required request field was empty after trimming.
    #[error("{field} cannot be empty")]
    InvalidRequest {
        /// The offending field name (`artist` or `album`).
        field: &'static str,
    },

    /// The album page does not exist or lists no tracks.
    #[error(
        "album not found at {url}: {reason}\n  Suggestion: artist and album must match the site's URL path exactly (case and spelling)"
    )]
    NotFound {
        /// The listing URL that was requested.
        url: String,
        /// Why the album is considered missing.
        reason: String,
    },

    /// Connection-level failure while fetching the listing page.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The listing URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The listing URL could not be built from the request.
    #[error("invalid listing URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL text that failed to parse.
        url: String,
        /// Parser error message.
        reason: String,
    },
}

impl ResolveError {
    /// Creates a `NotFound` error.
    pub fn not_found(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotFound {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Network` error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Returns true for the not-found class of errors (including empty input).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidRequest { .. })
    }
}
