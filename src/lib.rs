//! Album Downloader Core Library
//!
//! This library provides the core functionality for the album downloader,
//! which fetches an album listing page from music.com.bd, discovers its
//! tracks, and saves them concurrently into a destination directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Validated runtime configuration and shared HTTP client
//! - [`site`] - Listing URL construction, page resolution and track extraction
//! - [`download`] - Concurrent download engine, outcomes and run report

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod site;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, DEFAULT_CONCURRENCY, RunConfig};
pub use download::{
    DownloadEngine, DownloadError, DownloadOutcome, DownloadReport, EngineError, OutcomeStatus,
    ProgressObserver, TrackClient,
};
pub use site::{AlbumListing, AlbumRequest, PageResolver, ResolveError, SiteLayout, TrackLink};
