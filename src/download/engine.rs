//! Download engine for concurrent track downloads.
//!
//! This module provides the `DownloadEngine` which fans a resolved track
//! list out over a semaphore-bounded set of Tokio tasks and collects one
//! [`DownloadOutcome`] per track.
//!
//! # Example
//!
//! ```no_run
//! use album_downloader_core::{DownloadEngine, PageResolver, RunConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::default();
//! let resolver = PageResolver::from_config(&config)?;
//! let engine = DownloadEngine::from_config(&config)?;
//!
//! let listing = resolver.resolve("Arnob", "Hok Kolorob").await?;
//! let report = engine.download(&listing.tracks, Path::new("foobar")).await?;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::client::TrackClient;
use super::destination::prepare_destination;
use super::error::EngineError;
use super::outcome::DownloadOutcome;
use super::report::DownloadReport;
use crate::config::{ConfigError, MAX_CONCURRENCY, MIN_CONCURRENCY, RunConfig};
use crate::site::TrackLink;

/// Callback invoked once per finished track with its index in the batch.
///
/// Calls arrive in completion order, not track order.
pub type ProgressObserver = Arc<dyn Fn(usize, &DownloadOutcome) + Send + Sync>;

/// Download engine for concurrent track downloads.
///
/// # Concurrency Model
///
/// - Each track runs in its own Tokio task
/// - A semaphore permit is acquired before starting each download
/// - Permits are released automatically when downloads complete (RAII)
/// - Task handles are awaited in track order, so outcomes come back in
///   track order whatever the completion order was
///
/// # Failure Isolation
///
/// A failed track becomes a `Failed` outcome; it never aborts its siblings.
/// Only destination setup errors fail the whole batch.
#[derive(Debug)]
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
    /// Client used by every track task.
    client: TrackClient,
}

impl DownloadEngine {
    /// Creates a new engine with the specified concurrency limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-32).
    #[instrument(level = "debug", skip(client))]
    pub fn new(concurrency: usize, client: TrackClient) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            client,
        })
    }

    /// Creates an engine with its own client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        let client = TrackClient::new(config.build_client()?);
        Self::new(config.concurrency, client).map_err(|_| ConfigError::InvalidConcurrency {
            value: config.concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every track into `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Destination`] if the destination cannot be
    /// prepared, or [`EngineError::SemaphoreClosed`] if the semaphore is
    /// closed.
    ///
    /// Note: Individual download failures do NOT cause this method to error.
    /// They are recorded as `Failed` outcomes in the report.
    pub async fn download(
        &self,
        tracks: &[TrackLink],
        destination: &Path,
    ) -> Result<DownloadReport, EngineError> {
        self.download_with_progress(tracks, destination, None).await
    }

    /// Same as [`download`](Self::download), reporting each finished track
    /// to `observer`.
    ///
    /// # Errors
    ///
    /// Same as [`download`](Self::download).
    #[instrument(skip(self, tracks, observer), fields(tracks = tracks.len(), destination = %destination.display()))]
    pub async fn download_with_progress(
        &self,
        tracks: &[TrackLink],
        destination: &Path,
        observer: Option<ProgressObserver>,
    ) -> Result<DownloadReport, EngineError> {
        let destination = prepare_destination(destination).await?;
        let mut handles = Vec::with_capacity(tracks.len());

        info!("starting track downloads");

        for (index, track) in tracks.iter().cloned().enumerate() {
            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = self.client.clone();
            let destination = destination.clone();
            let observer = observer.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                let outcome = match client.download_track(&track, &destination, index).await {
                    Ok(saved) => DownloadOutcome::success(track, saved.path, saved.bytes),
                    Err(e) => {
                        warn!(
                            index,
                            url = %track.url,
                            filename = %track.filename,
                            error = %e,
                            "track download failed"
                        );
                        DownloadOutcome::failed(track, e.to_string())
                    }
                };
                if let Some(observer) = observer {
                    observer(index, &outcome);
                }
                outcome
            }));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, track) in handles.into_iter().zip(tracks) {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!(url = %track.url, error = %e, "download task panicked");
                    outcomes.push(DownloadOutcome::failed(
                        track.clone(),
                        format!("download task failed: {e}"),
                    ));
                }
            }
        }

        let report = DownloadReport::new(destination, outcomes);
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            total = report.total(),
            "track downloads complete"
        );
        Ok(report)
    }
}
