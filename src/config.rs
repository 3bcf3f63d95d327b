//! Runtime configuration shared by the resolver and the download engine.
//!
//! A [`RunConfig`] is built once from CLI flags, validated, and then used to
//! construct the single HTTP client every request goes through.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::user_agent;

/// Base URL of the album listing pages.
pub const DEFAULT_BASE_URL: &str = "https://www.music.com.bd/download";

/// Base URL the track files are served from.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://download.music.com.bd/Music";

/// Default number of in-flight track downloads.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 32;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while validating a [`RunConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A base URL could not be parsed or is not http(s).
    #[error("invalid {field} '{value}': {reason}")]
    InvalidBaseUrl {
        /// Which setting was invalid.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Concurrency outside the supported range.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// A timeout of zero seconds was requested.
    #[error("invalid {field}: timeout must be at least 1 second")]
    ZeroTimeout {
        /// Which timeout was zero.
        field: &'static str,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Settings for one download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Listing site base, e.g. `https://www.music.com.bd/download`.
    pub base_url: String,
    /// Track download base, e.g. `https://download.music.com.bd/Music`.
    pub download_base_url: String,
    /// Maximum number of concurrent track downloads.
    pub concurrency: usize,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds; `None` leaves reads unbounded.
    pub request_timeout_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
        }
    }
}

impl RunConfig {
    /// Checks every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("base URL", &self.base_url)?;
        validate_base_url("download base URL", &self.download_base_url)?;

        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "connect timeout",
            });
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout {
                field: "request timeout",
            });
        }
        Ok(())
    }

    /// Builds the shared HTTP client for this run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] when reqwest rejects the configuration.
    pub fn build_client(&self) -> Result<Client, ConfigError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent());
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        debug!(
            connect_timeout_secs = self.connect_timeout_secs,
            request_timeout_secs = ?self.request_timeout_secs,
            "building HTTP client"
        );
        Ok(builder.build()?)
    }
}

fn validate_base_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let parsed = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base".to_string()));
    }
    Ok(())
}
