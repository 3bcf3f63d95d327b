use album_downloader_core::download::check_destination;
use album_downloader_core::{
    AlbumRequest, DownloadEngine, PageResolver, RunConfig, SiteLayout, TrackClient,
};
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::{exit_handler, progress_manager, terminal};
use crate::cli::Args;

/// Builds the run configuration from parsed flags.
pub(crate) fn run_config_from_args(args: &Args) -> RunConfig {
    RunConfig {
        base_url: args.base_url.clone(),
        download_base_url: args.download_base_url.clone(),
        concurrency: usize::from(args.concurrency),
        request_timeout_secs: args.timeout,
        ..RunConfig::default()
    }
}

/// Resolves the album, downloads its tracks and prints the report.
///
/// The listing is resolved before the destination is touched, so a missing
/// album never leaves an empty directory behind.
pub(crate) async fn run_downloader(args: Args) -> Result<ProcessExit> {
    debug!(?args, "CLI arguments parsed");

    let config = run_config_from_args(&args);
    config.validate().context("invalid configuration")?;
    let request = AlbumRequest::new(&args.artist, &args.album, &args.destination)?;
    check_destination(&request.destination)?;

    // One client for the listing and every track.
    let client = config.build_client()?;
    let layout = SiteLayout::from_config(&config)?;
    let resolver = PageResolver::new(client.clone(), layout);
    let engine = DownloadEngine::new(config.concurrency, TrackClient::new(client))?;

    let listing = resolver.resolve(&request.artist, &request.album).await?;
    info!(
        album = %listing.label,
        tracks = listing.tracks.len(),
        "album resolved"
    );

    let destination = if args.album_dir {
        request.destination.join(request.album_dir_name())
    } else {
        request.destination.clone()
    };

    let show_progress = terminal::progress_requested(&args);
    if show_progress {
        eprintln!("Downloading {} ({} tracks)", listing.label, listing.tracks.len());
    }
    let bar = progress_manager::create_progress_bar(show_progress, listing.tracks.len());
    let observer = progress_manager::progress_observer(&bar);

    let report = engine
        .download_with_progress(&listing.tracks, &destination, Some(observer))
        .await?;
    bar.finish_and_clear();

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.render_text());
    }

    Ok(exit_handler::determine_exit_outcome(&report))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;

    #[test]
    fn test_run_config_from_args_maps_flags() {
        let args = Args::try_parse_from([
            "album-downloader",
            "--artist",
            "Arnob",
            "--album",
            "Hok Kolorob",
            "-c",
            "8",
            "--timeout",
            "90",
            "--base-url",
            "http://127.0.0.1:1/download",
        ])
        .unwrap();

        let config = run_config_from_args(&args);

        assert_eq!(config.concurrency, 8);
        assert_eq!(config.request_timeout_secs, Some(90));
        assert_eq!(config.base_url, "http://127.0.0.1:1/download");
        assert_eq!(config.connect_timeout_secs, RunConfig::default().connect_timeout_secs);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_empty_destination_is_setup_error_before_any_request() {
        let mut args = Args::try_parse_from([
            "album-downloader",
            "--artist",
            "Arnob",
            "--album",
            "Hok Kolorob",
            "--base-url",
            "http://127.0.0.1:9/download",
        ])
        .unwrap();
        args.destination = PathBuf::new();

        let err = run_downloader(args).await.unwrap_err();

        assert!(err.to_string().contains("path is empty"), "{err:#}");
        assert_eq!(exit_handler::exit_for_error(&err), ProcessExit::Setup);
    }
}
