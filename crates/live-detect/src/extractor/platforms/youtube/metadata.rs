//! Video id, title and thumbnail of a verified live broadcast.

use std::sync::LazyLock;

use regex::Regex;

use super::page::LivePage;
use crate::extractor::utils::{capture_group_1, decode_html_entities, decode_json_escapes, window};

/// Radius (bytes) around an embedded video id searched for live markers.
///
/// Tunable; the right size depends on how far apart YouTube serializes the
/// id and the badges of the same renderer.
pub const PROXIMITY_WINDOW: usize = 1_000;

pub const SITE_NAME: &str = "YouTube";
const SITE_SUFFIX: &str = " - YouTube";

const THUMBNAIL_TEMPLATE: &str = "https://i.ytimg.com/vi/{id}/maxresdefault.jpg";
const WATCH_URL_TEMPLATE: &str = "https://www.youtube.com/watch?v={id}";

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());
static OG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta property="og:url" content="[^"]*/watch\?v=([A-Za-z0-9_-]{11})"#).unwrap()
});
static CANONICAL_WATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="canonical" href="[^"]*/watch\?v=([A-Za-z0-9_-]{11})"#).unwrap()
});
static VIDEO_DETAILS_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""videoDetails"\s*:\s*\{\s*"videoId"\s*:\s*"([A-Za-z0-9_-]{11})""#).unwrap()
});
static EMBEDDED_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""videoId"\s*:\s*"([A-Za-z0-9_-]{11})""#).unwrap());
static NEARBY_LIVE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""isLive(?:Now)?"\s*:\s*true|BADGE_STYLE_TYPE_LIVE_NOW|"style"\s*:\s*"LIVE""#)
        .unwrap()
});
static NEARBY_REPLAY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""isReplay"\s*:\s*true"#).unwrap());

const JSON_STRING: &str = r#""((?:[^"\\]|\\.)*)""#;

static TITLE_VIDEO_DETAILS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""videoDetails"\s*:\s*\{{[^{{}}]*?"title"\s*:\s*{JSON_STRING}"#
    ))
    .unwrap()
});
static TITLE_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""title"\s*:\s*\{{\s*"runs"\s*:\s*\[\s*\{{\s*"text"\s*:\s*{JSON_STRING}"#
    ))
    .unwrap()
});
static TITLE_SIMPLE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""title"\s*:\s*\{{\s*"simpleText"\s*:\s*{JSON_STRING}"#
    ))
    .unwrap()
});
static META_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="title" content="([^"]*)""#).unwrap());
static OG_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:title" content="([^"]*)""#).unwrap());
static HTML_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Metadata of a live broadcast, with fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMetadata {
    pub video_id: Option<String>,
    pub title: String,
    pub thumbnail: Option<String>,
}

impl StreamMetadata {
    pub fn watch_url(&self) -> Option<String> {
        self.video_id.as_deref().map(watch_url)
    }
}

pub fn extract(page: &LivePage, display_name: &str) -> StreamMetadata {
    let video_id = extract_video_id(page);
    let title = extract_title(&page.body).unwrap_or_else(|| fallback_title(display_name));
    let thumbnail = video_id.as_deref().map(thumbnail_url);
    StreamMetadata {
        video_id,
        title,
        thumbnail,
    }
}

/// Find the broadcast's video id, most reliable source first.
pub fn extract_video_id(page: &LivePage) -> Option<String> {
    let text = page.body.as_str();

    if let Some(id) = page.final_query_param("v").filter(|id| VIDEO_ID.is_match(id)) {
        return Some(id);
    }

    let structured = [&OG_URL, &CANONICAL_WATCH, &VIDEO_DETAILS_ID];
    if let Some(id) = structured
        .into_iter()
        .find_map(|regex| capture_group_1(regex, text))
    {
        return Some(id.to_owned());
    }

    let near_live = EMBEDDED_VIDEO_ID.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let region = window(text, whole.start(), whole.end(), PROXIMITY_WINDOW);
        if NEARBY_LIVE_MARKER.is_match(region) && !NEARBY_REPLAY_MARKER.is_match(region) {
            caps.get(1).map(|m| m.as_str())
        } else {
            None
        }
    });
    if let Some(id) = near_live {
        return Some(id.to_owned());
    }

    capture_group_1(&EMBEDDED_VIDEO_ID, text).map(ToOwned::to_owned)
}

/// Broadcast title from the structured fields, then page meta, then `<title>`.
///
/// Returns `None` when every source is missing or only yields the site name.
pub fn extract_title(text: &str) -> Option<String> {
    let json_sources = [&TITLE_VIDEO_DETAILS, &TITLE_RUNS, &TITLE_SIMPLE_TEXT];
    let html_sources = [&META_TITLE, &OG_TITLE, &HTML_TITLE];

    let json_titles = json_sources
        .into_iter()
        .filter_map(|regex| capture_group_1(regex, text))
        .map(decode_json_escapes);
    let html_titles = html_sources
        .into_iter()
        .filter_map(|regex| capture_group_1(regex, text))
        .map(|raw| decode_html_entities(&decode_json_escapes(raw)));

    json_titles.chain(html_titles).find_map(clean_title)
}

/// Trim, strip the site suffix and reject titles that carry no information.
pub fn clean_title(raw: String) -> Option<String> {
    let trimmed = raw.trim_end();
    let title = trimmed.strip_suffix(SITE_SUFFIX).unwrap_or(trimmed).trim();
    if title.is_empty() || title == SITE_NAME {
        None
    } else {
        Some(title.to_owned())
    }
}

pub fn fallback_title(display_name: &str) -> String {
    format!("{display_name} is Live!")
}

pub fn thumbnail_url(video_id: &str) -> String {
    THUMBNAIL_TEMPLATE.replace("{id}", video_id)
}

pub fn watch_url(video_id: &str) -> String {
    WATCH_URL_TEMPLATE.replace("{id}", video_id)
}
