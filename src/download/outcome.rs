//! Per-track download outcomes.

use std::path::PathBuf;

use serde::Serialize;

use crate::site::TrackLink;

/// Result of one download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The track was saved.
    Success {
        /// Where the file was written.
        path: PathBuf,
        /// Size of the file in bytes.
        bytes: u64,
    },
    /// The track could not be fetched or written.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// One track paired with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    /// The track that was attempted.
    pub track: TrackLink,
    /// How the attempt ended.
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl DownloadOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn success(track: TrackLink, path: PathBuf, bytes: u64) -> Self {
        Self {
            track,
            status: OutcomeStatus::Success { path, bytes },
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failed(track: TrackLink, reason: impl Into<String>) -> Self {
        Self {
            track,
            status: OutcomeStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Returns true if the track was saved.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    /// Failure reason, if the attempt failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { reason } => Some(reason),
            OutcomeStatus::Success { .. } => None,
        }
    }
}
