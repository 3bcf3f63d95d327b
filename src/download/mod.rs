//! Concurrent track downloads.
//!
//! This module takes the track links produced by [`crate::site`] and saves
//! them into a destination directory with bounded concurrency.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Semaphore-bounded fan-out with outcomes returned in track order
//! - Per-track failure isolation
//! - Atomic rename into place (collisions are last-write-wins)
//! - Text and JSON run summaries

mod client;
mod destination;
mod engine;
mod error;
mod outcome;
mod report;

pub use client::{SavedTrack, TrackClient};
pub use destination::{check_destination, prepare_destination};
pub use engine::{DownloadEngine, ProgressObserver};
pub use error::{DownloadError, EngineError};
pub use outcome::{DownloadOutcome, OutcomeStatus};
pub use report::DownloadReport;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
