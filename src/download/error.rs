//! Error types for the download module.
//!
//! [`DownloadError`] describes a single failed track and is converted into a
//! `Failed` outcome by the engine. [`EngineError`] covers setup failures that
//! abort the whole batch before any track is fetched.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{MAX_CONCURRENCY, MIN_CONCURRENCY};

/// Errors that can occur while downloading one track.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing the track.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The track URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The track filename would not stay inside the destination directory.
    #[error("unsafe filename '{name}'")]
    InvalidFilename {
        /// The rejected filename.
        name: String,
    },
}

impl DownloadError {
    /// Creates a network error, promoting reqwest timeouts to [`Self::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Setup errors that abort a download batch.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The destination directory is unusable.
    #[error("cannot use destination directory {path}: {reason}")]
    Destination {
        /// The destination that was requested.
        path: PathBuf,
        /// Why it could not be prepared.
        reason: String,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

impl EngineError {
    /// Creates a destination error.
    pub fn destination(path: &Path, reason: impl Into<String>) -> Self {
        Self::Destination {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let err = DownloadError::http_status("https://example.com/a.mp3", 404);
        assert_eq!(err.to_string(), "HTTP 404 downloading https://example.com/a.mp3");
    }

    #[test]
    fn test_io_display_includes_path() {
        let err = DownloadError::io(
            "/tmp/out/a.mp3",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out/a.mp3"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_engine_error_display() {
        let error = EngineError::InvalidConcurrency { value: 0 };
        let msg = error.to_string();
        assert!(msg.contains("invalid concurrency"));
        assert!(msg.contains('0'));
        assert!(msg.contains("32"));

        let error = EngineError::destination(Path::new("foobar"), "exists but is not a directory");
        assert_eq!(
            error.to_string(),
            "cannot use destination directory foobar: exists but is not a directory"
        );
    }
}
