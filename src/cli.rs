//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use album_downloader_core::DEFAULT_CONCURRENCY;
use album_downloader_core::config::{DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_BASE_URL};

/// Download every track of an album listed on music.com.bd.
///
/// The album page is located from the artist and album names, its track
/// links are extracted, and the tracks are saved concurrently into the
/// destination directory.
#[derive(Parser, Debug)]
#[command(name = "album-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Artist name as shown on the site
    #[arg(long)]
    pub artist: String,

    /// Album name as shown on the site
    #[arg(long)]
    pub album: String,

    /// Directory to save tracks into (created if missing)
    #[arg(short = 'd', long, default_value = ".")]
    pub destination: PathBuf,

    /// Save into a `<album>_<artist>` folder under the destination
    #[arg(long)]
    pub album_dir: bool,

    /// Maximum concurrent downloads (1-32)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub concurrency: u8,

    /// Whole-request timeout in seconds (no limit by default)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Listing site base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,

    /// Track download base URL
    #[arg(long, default_value = DEFAULT_DOWNLOAD_BASE_URL, hide = true)]
    pub download_base_url: String,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = ["album-downloader", "--artist", "Arnob", "--album", "Hok Kolorob"];

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(REQUIRED.iter().chain(extra))
    }

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.artist, "Arnob");
        assert_eq!(args.album, "Hok Kolorob");
        assert_eq!(args.destination, PathBuf::from("."));
        assert!(!args.album_dir);
        assert_eq!(args.concurrency, 4); // DEFAULT_CONCURRENCY
        assert_eq!(args.timeout, None);
        assert_eq!(args.base_url, DEFAULT_BASE_URL);
        assert!(!args.json);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_missing_artist_rejected() {
        let result = Args::try_parse_from(["album-downloader", "--album", "Hok Kolorob"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_missing_album_rejected() {
        let result = Args::try_parse_from(["album-downloader", "--artist", "Arnob"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_destination_short_and_long() {
        assert_eq!(parse(&["-d", "foobar"]).unwrap().destination, PathBuf::from("foobar"));
        assert_eq!(
            parse(&["--destination", "music/out"]).unwrap().destination,
            PathBuf::from("music/out")
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        assert_eq!(parse(&["-v"]).unwrap().verbose, 1);
        assert_eq!(parse(&["-vv"]).unwrap().verbose, 2);
        assert_eq!(parse(&["--verbose", "--verbose"]).unwrap().verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        assert!(parse(&["-q"]).unwrap().quiet);
        assert!(parse(&["--quiet"]).unwrap().quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let err = Args::try_parse_from(["album-downloader", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_help_hides_mirror_flags() {
        let err = Args::try_parse_from(["album-downloader", "--help"]).unwrap_err();
        let help = err.to_string();
        assert!(help.contains("--artist"));
        assert!(!help.contains("--base-url"));
        assert!(!help.contains("--download-base-url"));
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["album-downloader", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = parse(&["--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_concurrency_bounds() {
        assert_eq!(parse(&["-c", "1"]).unwrap().concurrency, 1);
        assert_eq!(parse(&["--concurrency", "32"]).unwrap().concurrency, 32);

        for value in ["0", "33"] {
            let err = parse(&["-c", value]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn test_cli_timeout_must_be_positive() {
        assert_eq!(parse(&["--timeout", "60"]).unwrap().timeout, Some(60));
        let err = parse(&["--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_mirror_urls_accepted() {
        let args = parse(&[
            "--base-url",
            "http://127.0.0.1:8080/download",
            "--download-base-url",
            "http://127.0.0.1:8080/Music",
        ])
        .unwrap();
        assert_eq!(args.base_url, "http://127.0.0.1:8080/download");
        assert_eq!(args.download_base_url, "http://127.0.0.1:8080/Music");
    }

    #[test]
    fn test_cli_album_dir_and_json_flags() {
        let args = parse(&["--album-dir", "--json"]).unwrap();
        assert!(args.album_dir);
        assert!(args.json);
    }
}
