//! Shared helpers for integration tests: the saved listing fixture and a
//! wiremock server that mimics the site's listing and download hosts.

#![allow(dead_code)]

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub mod socket_guard;

/// Saved listing page for `Arnob` / `Hok Kolorob` with ten track entries.
pub const ALBUM_PAGE: &str = include_str!("../fixtures/album_page.html");

/// Number of track entries in [`ALBUM_PAGE`].
pub const ALBUM_TRACKS: usize = 10;

/// Listing path of the fixture album, as requested on the wire.
pub const ALBUM_PATH: &str = "/download/browse/A/Arnob/Hok%20Kolorob/";

/// Filename the first fixture track is saved under.
pub const FIRST_FILENAME: &str = "01 - Arnob - Tomake.mp3";

/// `--base-url` value pointing at the mock server.
pub fn base_url(server: &MockServer) -> String {
    format!("{}/download", server.uri())
}

/// `--download-base-url` value pointing at the mock server.
pub fn download_base_url(server: &MockServer) -> String {
    format!("{}/Music", server.uri())
}

/// Serves the fixture listing page.
pub async fn mount_album_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ALBUM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALBUM_PAGE))
        .mount(server)
        .await;
}

/// Serves every track file under the album's download directory.
pub async fn mount_track_files(server: &MockServer, body: &'static [u8]) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/Music/A/Arnob/Hok%20Kolorob/.+\.mp3$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Serves the listing page and the track files.
pub async fn mount_album(server: &MockServer, body: &'static [u8]) {
    mount_album_page(server).await;
    mount_track_files(server, body).await;
}
