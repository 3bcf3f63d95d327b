//! Track link extraction from album listing HTML.
//!
//! Extraction sits behind the [`TrackExtractor`] trait so the parsing
//! strategy can change without touching the download engine. The shipped
//! [`ListingExtractor`] is regex-based and matches the site's
//! `list-group-item` anchors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use super::TrackLink;
use super::filename::{audio_extension, compile_static_regex, track_filename, url_basename};

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<a\b([^>]*)>(.*?)</a\s*>"));
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
});
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
});
static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<span\b[^>]*>.*?</span\s*>"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?s)<[^>]*>"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\s+"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"&#(?:([0-9]{1,7})|[xX]([0-9a-fA-F]{1,6}));"));

/// Class carried by every entry of the site's file listing.
const LISTING_ENTRY_CLASS: &str = "list-group-item";

/// Suffix of per-song landing pages.
const SONG_PAGE_SUFFIX: &str = ".html";

/// Turns a listing page into an ordered sequence of track links.
pub trait TrackExtractor: Send + Sync {
    /// Extracts track links from `html`, resolving relative hrefs against
    /// `page_url`. Document order is preserved.
    fn extract_track_links(&self, html: &str, page_url: &Url) -> Vec<TrackLink>;
}

/// Regex-based extractor for music.com.bd listing pages.
///
/// Song entries link to `<name>.html` landing pages; the actual file lives
/// under `download_dir` with the same name. Anchors pointing straight at an
/// audio file are taken as-is.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    download_dir: Url,
}

impl ListingExtractor {
    /// Creates an extractor whose song files are served from `download_dir`.
    ///
    /// `download_dir` must end with `/` so that names join beneath it.
    #[must_use]
    pub fn new(download_dir: Url) -> Self {
        Self { download_dir }
    }

    fn link_for_href(&self, href: &Url, display: &str) -> Option<TrackLink> {
        let basename = url_basename(href)?;
        if href.path().ends_with('/') {
            return None;
        }

        let lower = basename.to_ascii_lowercase();
        let (url, name) = if let Some(stem_len) = lower
            .strip_suffix(SONG_PAGE_SUFFIX)
            .map(str::len)
        {
            let name = &basename[..stem_len];
            if name.is_empty() || name.to_ascii_lowercase().ends_with(".zip") {
                return None;
            }
            let url = self
                .download_dir
                .join(&urlencoding::encode(name))
                .ok()?;
            (url, name.to_string())
        } else if audio_extension(&basename).is_some() {
            (href.clone(), basename)
        } else {
            return None;
        };

        let display_name = if display.is_empty() {
            name.clone()
        } else {
            display.to_string()
        };
        let filename = track_filename(&display_name, &url);
        Some(TrackLink {
            url: url.to_string(),
            name: display_name,
            filename,
        })
    }
}

impl TrackExtractor for ListingExtractor {
    fn extract_track_links(&self, html: &str, page_url: &Url) -> Vec<TrackLink> {
        let mut links = Vec::new();

        for anchor in ANCHOR_RE.captures_iter(html) {
            let attrs = anchor.get(1).map_or("", |m| m.as_str());
            let inner = anchor.get(2).map_or("", |m| m.as_str());

            let is_entry = attribute_value(&CLASS_RE, attrs).is_some_and(|classes| {
                classes
                    .split_whitespace()
                    .any(|class| class == LISTING_ENTRY_CLASS)
            });
            if !is_entry {
                continue;
            }
            let Some(raw_href) = attribute_value(&HREF_RE, attrs) else {
                continue;
            };
            let Ok(href) = page_url.join(decode_entities(raw_href.trim()).as_str()) else {
                debug!(href = %raw_href, "skipping unparseable href");
                continue;
            };

            match self.link_for_href(&href, &anchor_text(inner)) {
                Some(link) => {
                    trace!(url = %link.url, filename = %link.filename, "found track link");
                    links.push(link);
                }
                None => trace!(href = %href, "listing entry is not a track"),
            }
        }

        debug!(count = links.len(), page = %page_url, "extracted track links");
        links
    }
}

fn attribute_value<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

/// Visible anchor text with icon and size-badge spans removed.
fn anchor_text(inner_html: &str) -> String {
    let without_spans = SPAN_RE.replace_all(inner_html, " ");
    let without_tags = TAG_RE.replace_all(&without_spans, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Decodes the named entities the site emits plus any numeric reference.
/// `&amp;` goes last so `&amp;#39;` stays literal.
fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}");
    let numeric = NUMERIC_ENTITY_RE.replace_all(&named, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
            (None, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, None) => None,
        };
        match code.and_then(char::from_u32) {
            Some('\u{00a0}') => " ".to_string(),
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });
    numeric.replace("&amp;", "&")
}
