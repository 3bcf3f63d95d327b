//! Album page resolution for music.com.bd.
//!
//! This module turns an artist/album pair into the album's listing URL,
//! fetches the listing, and extracts the ordered track links that the
//! download engine consumes.
//!
//! # Example
//!
//! ```no_run
//! use album_downloader_core::{PageResolver, RunConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = PageResolver::from_config(&RunConfig::default())?;
//! let listing = resolver.resolve("Arnob", "Hok Kolorob").await?;
//! for track in &listing.tracks {
//!     println!("{} -> {}", track.filename, track.url);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod extract;
pub mod filename;

pub use error::ResolveError;
pub use extract::{ListingExtractor, TrackExtractor};

use std::path::PathBuf;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{ConfigError, RunConfig};

/// User input for one run, validated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRequest {
    /// Artist name exactly as it appears in the site's URL path.
    pub artist: String,
    /// Album name exactly as it appears in the site's URL path.
    pub album: String,
    /// Directory the tracks are saved into.
    pub destination: PathBuf,
}

impl AlbumRequest {
    /// Trims and validates the user-supplied values.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidRequest`] if the artist or album is
    /// empty. The destination is checked when it is prepared.
    pub fn new(
        artist: &str,
        album: &str,
        destination: impl Into<PathBuf>,
    ) -> Result<Self, ResolveError> {
        let (artist, album) = validate_names(artist, album)?;
        Ok(Self {
            artist: artist.to_string(),
            album: album.to_string(),
            destination: destination.into(),
        })
    }

    /// Directory name used when saving into a per-album subdirectory.
    #[must_use]
    pub fn album_dir_name(&self) -> String {
        let name = filename::sanitize_filename(&format!("{}_{}", self.album, self.artist));
        if name.is_empty() {
            "album".to_string()
        } else {
            name
        }
    }
}

/// One downloadable track discovered on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackLink {
    /// Absolute download URL.
    pub url: String,
    /// Display name shown on the listing page.
    pub name: String,
    /// Filesystem-safe name the track is saved under.
    pub filename: String,
}

/// Result of resolving one album page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumListing {
    /// The listing URL that was fetched.
    pub url: String,
    /// Human-readable `"<album> by <artist>"` label.
    pub label: String,
    /// Tracks in page order; never empty.
    pub tracks: Vec<TrackLink>,
}

/// URL scheme of the site: where listings live and where files are served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    base_url: Url,
    download_base_url: Url,
}

impl SiteLayout {
    /// Creates a layout from the listing base and the download base.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for unparseable URLs.
    pub fn new(base_url: &str, download_base_url: &str) -> Result<Self, ConfigError> {
        let parse = |field: &'static str, value: &str| {
            Url::parse(value).map_err(|e| ConfigError::InvalidBaseUrl {
                field,
                value: value.to_string(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            base_url: parse("base URL", base_url)?,
            download_base_url: parse("download base URL", download_base_url)?,
        })
    }

    /// Creates the layout described by a [`RunConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for unparseable URLs.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, &config.download_base_url)
    }

    /// Listing URL: `<base>/browse/<LETTER>/<artist>/<album>/`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidUrl`] if the joined URL does not parse.
    pub fn album_url(&self, artist: &str, album: &str) -> Result<Url, ResolveError> {
        let letter = initial(artist);
        join_segments(
            &self.base_url,
            &["browse", letter.as_str(), artist, album, ""],
        )
    }

    /// Directory the album's files are served from:
    /// `<download-base>/<LETTER>/<artist>/<album>/`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidUrl`] if the joined URL does not parse.
    pub fn track_dir_url(&self, artist: &str, album: &str) -> Result<Url, ResolveError> {
        let letter = initial(artist);
        join_segments(&self.download_base_url, &[letter.as_str(), artist, album, ""])
    }
}

/// Uppercased first character of the artist, the site's index bucket.
fn initial(artist: &str) -> String {
    artist
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Appends percent-encoded path segments to `base`; an empty final segment
/// yields a trailing slash.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ResolveError> {
    let mut text = base.as_str().trim_end_matches('/').to_string();
    for segment in segments {
        text.push('/');
        text.push_str(&urlencoding::encode(segment));
    }
    Url::parse(&text).map_err(|e| ResolveError::InvalidUrl {
        url: text.clone(),
        reason: e.to_string(),
    })
}

fn validate_names<'a>(artist: &'a str, album: &'a str) -> Result<(&'a str, &'a str), ResolveError> {
    let artist = artist.trim();
    if artist.is_empty() {
        return Err(ResolveError::InvalidRequest { field: "artist" });
    }
    let album = album.trim();
    if album.is_empty() {
        return Err(ResolveError::InvalidRequest { field: "album" });
    }
    Ok((artist, album))
}

/// Resolves artist/album pairs into track listings.
#[derive(Debug, Clone)]
pub struct PageResolver {
    client: Client,
    layout: SiteLayout,
}

impl PageResolver {
    /// Creates a resolver that shares `client` with the rest of the run.
    #[must_use]
    pub fn new(client: Client, layout: SiteLayout) -> Self {
        Self { client, layout }
    }

    /// Creates a resolver with its own client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the layout or client cannot be built.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.build_client()?,
            SiteLayout::from_config(config)?,
        ))
    }

    /// Returns the site layout in use.
    #[must_use]
    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Resolves an album to its ordered track links using the site's
    /// listing extractor.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidRequest`] for empty artist or album
    /// - [`ResolveError::NotFound`] for a non-success status or a page
    ///   without tracks
    /// - [`ResolveError::Network`] on connection failure
    #[instrument(skip(self))]
    pub async fn resolve(&self, artist: &str, album: &str) -> Result<AlbumListing, ResolveError> {
        let (artist, album) = validate_names(artist, album)?;
        let extractor = ListingExtractor::new(self.layout.track_dir_url(artist, album)?);
        self.resolve_with(artist, album, &extractor).await
    }

    /// Same as [`resolve`](Self::resolve) with a caller-supplied extraction
    /// strategy.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    #[instrument(skip(self, extractor))]
    pub async fn resolve_with(
        &self,
        artist: &str,
        album: &str,
        extractor: &dyn TrackExtractor,
    ) -> Result<AlbumListing, ResolveError> {
        let (artist, album) = validate_names(artist, album)?;
        let album_url = self.layout.album_url(artist, album)?;

        let (page_url, html) = self.fetch_listing(&album_url).await?;
        let tracks = extractor.extract_track_links(&html, &page_url);
        if tracks.is_empty() {
            return Err(ResolveError::not_found(
                album_url.as_str(),
                "page lists no downloadable tracks",
            ));
        }

        info!(url = %album_url, tracks = tracks.len(), "resolved album listing");
        Ok(AlbumListing {
            url: album_url.to_string(),
            label: format!("{album} by {artist}"),
            tracks,
        })
    }

    /// Fetches the listing page; returns the final (post-redirect) URL used
    /// as the base for relative hrefs, and the body.
    async fn fetch_listing(&self, url: &Url) -> Result<(Url, String), ResolveError> {
        debug!(url = %url, "fetching album listing");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ResolveError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::not_found(
                url.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let page_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| ResolveError::network(url.as_str(), e))?;
        debug!(url = %page_url, bytes = html.len(), "fetched album listing");
        Ok((page_url, html))
    }
}
