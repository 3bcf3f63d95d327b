//! HTTP client wrapper for downloading tracks.
//!
//! Each track is streamed into a hidden `.part` file named after its batch
//! slot, then renamed to its final name once the body is complete. A failed
//! or colliding download never leaves a truncated file under the real name.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use crate::site::TrackLink;
use crate::site::filename::sanitize_filename;

/// A track written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTrack {
    /// Final path of the file.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
}

/// HTTP client for track downloads.
///
/// Cheap to clone; clones share reqwest's connection pool.
#[derive(Debug, Clone)]
pub struct TrackClient {
    client: Client,
}

impl TrackClient {
    /// Wraps an already configured reqwest client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Downloads `track` into `destination/track.filename`.
    ///
    /// `slot` names the temporary file, so concurrent downloads never share
    /// one even when two tracks share a filename; the last rename wins.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL or filename is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Writing or renaming the file fails
    #[instrument(skip(self, track), fields(url = %track.url, filename = %track.filename))]
    pub async fn download_track(
        &self,
        track: &TrackLink,
        destination: &Path,
        slot: usize,
    ) -> Result<SavedTrack, DownloadError> {
        let url =
            Url::parse(&track.url).map_err(|_| DownloadError::invalid_url(track.url.clone()))?;
        let filename = sanitize_filename(&track.filename);
        if filename.is_empty() {
            return Err(DownloadError::InvalidFilename {
                name: track.filename.clone(),
            });
        }

        let response = self.send_request(url).await?;

        let final_path = destination.join(&filename);
        let part_path = destination.join(format!(".album-dl-{slot}.part"));
        debug!(path = %part_path.display(), "streaming to temporary file");

        let mut file = File::create(&part_path)
            .await
            .map_err(|e| DownloadError::io(part_path.clone(), e))?;
        let stream_result = stream_to_file(&mut file, response, &track.url, &part_path).await;
        drop(file);

        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %part_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &final_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(DownloadError::io(final_path, e));
        }

        info!(path = %final_path.display(), bytes, "track saved");
        Ok(SavedTrack {
            path: final_path,
            bytes,
        })
    }

    async fn send_request(&self, url: Url) -> Result<reqwest::Response, DownloadError> {
        let url_text = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url_text.clone(), e))?;

        if !response.status().is_success() {
            return Err(DownloadError::http_status(
                url_text,
                response.status().as_u16(),
            ));
        }
        Ok(response)
    }
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
