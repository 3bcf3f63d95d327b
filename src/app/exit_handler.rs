//! Exit code logic for the album-downloader process.
//!
//! Single responsibility: map a finished run or a fatal error to the process
//! exit outcome.

use album_downloader_core::{ConfigError, DownloadReport, EngineError, ResolveError};

use crate::ProcessExit;

/// Determines the process exit outcome from a finished download report.
pub(crate) fn determine_exit_outcome(report: &DownloadReport) -> ProcessExit {
    if report.failed() == 0 {
        ProcessExit::Success
    } else if report.succeeded() > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::AllFailed
    }
}

/// Classifies a fatal error by walking its source chain.
pub(crate) fn exit_for_error(error: &anyhow::Error) -> ProcessExit {
    for cause in error.chain() {
        if let Some(resolve) = cause.downcast_ref::<ResolveError>() {
            return match resolve {
                ResolveError::Network { .. } => ProcessExit::Network,
                ResolveError::InvalidUrl { .. } => ProcessExit::Setup,
                _ => ProcessExit::NotFound,
            };
        }
        if cause.is::<EngineError>() || cause.is::<ConfigError>() {
            return ProcessExit::Setup;
        }
    }
    ProcessExit::Setup
}
