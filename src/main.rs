//! CLI entry point for the album-downloader tool.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

mod app;
mod cli;

use app::{exit_handler, runtime, terminal};
use cli::Args;

/// Process exit outcomes and their codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every track saved.
    Success,
    /// Some tracks saved, some failed.
    Partial,
    /// The album page is missing, lists nothing, or the input was empty.
    NotFound,
    /// The listing page could not be fetched.
    Network,
    /// Configuration or destination setup failed.
    Setup,
    /// Tracks were found but none could be saved.
    AllFailed,
    /// Ctrl-C.
    Interrupted,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success | Self::Partial => 0,
            Self::NotFound => 1,
            Self::Network => 2,
            Self::Setup => 3,
            Self::AllFailed => 4,
            Self::Interrupted => 130,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    terminal::init_tracing(terminal::resolve_default_log_level(&args));
    info!("album-downloader starting");

    let exit = tokio::select! {
        result = runtime::run_downloader(args) => match result {
            Ok(exit) => exit,
            Err(e) => {
                debug!(error = ?e, "run failed");
                eprintln!("Error: {e:#}");
                exit_handler::exit_for_error(&e)
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            ProcessExit::Interrupted
        }
    };

    ExitCode::from(exit.code())
}
