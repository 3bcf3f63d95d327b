//! Final run summary.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::outcome::DownloadOutcome;

/// All outcomes of one batch, in track order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    destination: PathBuf,
    outcomes: Vec<DownloadOutcome>,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    destination: &'a Path,
    total: usize,
    succeeded: usize,
    failed: usize,
    outcomes: &'a [DownloadOutcome],
}

impl DownloadReport {
    /// Creates a report; `outcomes` must already be in track order.
    #[must_use]
    pub fn new(destination: PathBuf, outcomes: Vec<DownloadOutcome>) -> Self {
        Self {
            destination,
            outcomes,
        }
    }

    /// Directory the tracks were saved into.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Outcomes in track order.
    #[must_use]
    pub fn outcomes(&self) -> &[DownloadOutcome] {
        &self.outcomes
    }

    /// Number of tracks attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of tracks saved.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of tracks that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Failed outcomes, in track order.
    pub fn failures(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when at least one track was attempted and none were saved.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.total() > 0 && self.succeeded() == 0
    }

    /// Human-readable summary: one line per failure, then the save location.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for outcome in self.failures() {
            let reason = outcome.failure_reason().unwrap_or_default();
            let _ = writeln!(out, "Failed: \"{}\": {reason}", outcome.track.filename);
        }
        if !out.is_empty() {
            out.push('\n');
        }

        let destination = self.destination.display();
        if self.failed() == 0 {
            let _ = write!(out, "All songs saved in \"{destination}\"");
        } else {
            let _ = write!(
                out,
                "{} of {} songs saved in \"{destination}\" ({} failed)",
                self.succeeded(),
                self.total(),
                self.failed()
            );
        }
        out
    }

    /// JSON summary with counts and every outcome.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ReportJson {
            destination: &self.destination,
            total: self.total(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            outcomes: &self.outcomes,
        })
    }
}
