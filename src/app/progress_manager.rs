//! Progress UI (bar) for download runs.

use std::sync::Arc;

use album_downloader_core::{DownloadOutcome, ProgressObserver};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the progress bar for `total` tracks, or a hidden one when the
/// bar is not wanted.
pub(crate) fn create_progress_bar(show: bool, total: usize) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_bar} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// Observer that advances `bar` once per finished track.
pub(crate) fn progress_observer(bar: &ProgressBar) -> ProgressObserver {
    let bar = bar.clone();
    Arc::new(move |_index: usize, outcome: &DownloadOutcome| {
        bar.set_message(outcome.track.filename.clone());
        bar.inc(1);
    })
}
