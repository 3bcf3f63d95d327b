//! Integration tests for album page resolution against a mock site.

mod support;

use album_downloader_core::{PageResolver, ResolveError, RunConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::socket_guard::start_mock_server_or_skip;

fn resolver_for(server: &MockServer) -> PageResolver {
    let config = RunConfig {
        base_url: support::base_url(server),
        download_base_url: support::download_base_url(server),
        ..RunConfig::default()
    };
    PageResolver::from_config(&config).expect("valid config")
}

#[tokio::test]
async fn test_resolve_fixture_page_yields_every_track_in_page_order() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    support::mount_album_page(&server).await;

    let listing = resolver_for(&server)
        .resolve("Arnob", "Hok Kolorob")
        .await
        .expect("fixture album resolves");

    assert_eq!(listing.tracks.len(), support::ALBUM_TRACKS);
    assert_eq!(listing.label, "Hok Kolorob by Arnob");
    assert_eq!(listing.tracks[0].filename, support::FIRST_FILENAME);
    assert_eq!(listing.tracks[9].filename, "10 - Arnob - Nongor.mp3");

    let prefixes: Vec<_> = listing
        .tracks
        .iter()
        .map(|t| t.filename[..2].to_string())
        .collect();
    let expected: Vec<_> = (1..=10).map(|n| format!("{n:02}")).collect();
    assert_eq!(prefixes, expected);
}

#[tokio::test]
async fn test_resolved_track_urls_point_at_download_host() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    support::mount_album_page(&server).await;

    let listing = resolver_for(&server)
        .resolve("Arnob", "Hok Kolorob")
        .await
        .expect("fixture album resolves");

    let expected_prefix = format!("{}/Music/A/Arnob/Hok%20Kolorob/", server.uri());
    for track in &listing.tracks {
        assert!(
            track.url.starts_with(&expected_prefix),
            "unexpected url {}",
            track.url
        );
        assert!(track.url.ends_with(".mp3"));
        assert!(!track.url.contains(".zip"));
    }
}

#[tokio::test]
async fn test_resolve_missing_album_is_not_found() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = resolver_for(&server)
        .resolve("Unknown Artist", "Nonexistent")
        .await
        .expect_err("404 listing must fail");

    assert!(err.is_not_found());
    let message = err.to_string();
    assert!(message.contains("album not found"), "{message}");
    assert!(message.contains("/browse/U/Unknown%20Artist/Nonexistent/"), "{message}");
}

#[tokio::test]
async fn test_resolve_page_without_tracks_is_not_found() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(support::ALBUM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><div class=\"list-group\"></div></body></html>"),
        )
        .mount(&server)
        .await;

    let err = resolver_for(&server)
        .resolve("Arnob", "Hok Kolorob")
        .await
        .expect_err("empty listing must fail");

    assert!(matches!(err, ResolveError::NotFound { .. }));
}

#[tokio::test]
async fn test_resolve_server_error_is_not_found() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = resolver_for(&server)
        .resolve("Arnob", "Hok Kolorob")
        .await
        .expect_err("503 listing must fail");

    assert!(err.to_string().contains("HTTP 503"));
}

#[tokio::test]
async fn test_resolve_unreachable_host_is_network_error() {
    let config = RunConfig {
        base_url: "http://127.0.0.1:9/download".to_string(),
        ..RunConfig::default()
    };
    let resolver = PageResolver::from_config(&config).expect("valid config");

    let err = resolver
        .resolve("Arnob", "Hok Kolorob")
        .await
        .expect_err("closed port must fail");

    assert!(matches!(err, ResolveError::Network { .. }));
}
