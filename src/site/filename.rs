//! Filename derivation for saved tracks.
//!
//! Saved files are named after the track's display name with the site
//! watermark removed, falling back to the URL basename when the display
//! name sanitizes to nothing.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Extensions recognized as downloadable audio.
pub const AUDIO_EXTENSIONS: [&str; 7] = [".mp3", ".m4a", ".aac", ".ogg", ".flac", ".wav", ".wma"];

/// Extension appended when neither the name nor the URL carries one.
const DEFAULT_AUDIO_EXTENSION: &str = ".mp3";

/// Longest stem kept before the extension; common filesystems cap a name
/// at 255 bytes.
const MAX_STEM_BYTES: usize = 200;

/// Matches `(music.com.bd)`, `( www.music.com.bd )` and bare `music.com.bd`
/// together with the whitespace around it.
static WATERMARK_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)\s*\(?\s*(?:www\.)?music\.com\.bd\s*\)?\s*")
});

pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Builds the on-disk filename for a track.
///
/// `display_name` wins when it survives sanitization; otherwise the last
/// URL path segment is used. The result always ends in an audio extension.
#[must_use]
pub fn track_filename(display_name: &str, url: &Url) -> String {
    let from_display = sanitize_filename(&strip_watermark(display_name));
    let base = if from_display.is_empty() {
        url_basename(url)
            .map(|name| sanitize_filename(&strip_watermark(&name)))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "track".to_string())
    } else {
        from_display
    };

    let (stem, extension) = match audio_extension(&base) {
        Some(ext) => {
            let split = base.len() - ext.len();
            (&base[..split], base[split..].to_string())
        }
        None => (
            base.as_str(),
            url_basename(url)
                .as_deref()
                .and_then(audio_extension)
                .unwrap_or(DEFAULT_AUDIO_EXTENSION)
                .to_string(),
        ),
    };
    format!("{}{extension}", truncate_stem(stem))
}

/// Cuts `stem` to at most [`MAX_STEM_BYTES`] on a char boundary.
fn truncate_stem(stem: &str) -> &str {
    if stem.len() <= MAX_STEM_BYTES {
        return stem;
    }
    let mut end = MAX_STEM_BYTES;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    stem[..end].trim_end().trim_end_matches('.')
}

/// Removes the site watermark from a track name.
#[must_use]
pub fn strip_watermark(name: &str) -> String {
    WATERMARK_RE.replace_all(name, "").trim().to_string()
}

/// Returns the audio extension `name` ends with, if any (case-insensitive).
#[must_use]
pub fn audio_extension(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    AUDIO_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Last non-empty path segment of `url`, percent-decoded.
pub(crate) fn url_basename(url: &Url) -> Option<String> {
    let last = url.path_segments()?.rev().find(|segment| !segment.is_empty())?;
    Some(
        urlencoding::decode(last)
            .map_or_else(|_| last.to_string(), std::borrow::Cow::into_owned),
    )
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters), trims surrounding
/// whitespace and trailing dots, and returns an empty string for names that
/// would escape the destination directory.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let sanitized = sanitized.trim().trim_end_matches('.').trim_end().to_string();

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        String::new()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
