//! Checks that live content found on a `/live` page is hosted by the target channel.
//!
//! A live redirect can surface a cross-promoted or related broadcast; without
//! this step that broadcast would be reported as the channel going live.

use std::sync::LazyLock;

use regex::Regex;

use super::page::LivePage;
use crate::extractor::utils::{capture_group_1, decode_html_entities, decode_json_escapes};

// Empty values are captured too: a present but blank owner field is a mismatch.
static VIDEO_OWNER_CHANNEL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""videoOwnerChannelId"\s*:\s*"([A-Za-z0-9_-]*)""#).unwrap()
});
static OWNER_CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""ownerChannelId"\s*:\s*"([A-Za-z0-9_-]*)""#).unwrap());
static CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""channelId"\s*:\s*"([A-Za-z0-9_-]*)""#).unwrap());

static AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""author"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap());
static OWNER_CHANNEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""ownerChannelName"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap()
});
static ITEMPROP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link itemprop="name" content="([^"]*)""#).unwrap());

/// Exact-id fields, most specific first.
static ID_FIELDS: [(&str, &LazyLock<Regex>); 3] = [
    ("video_owner_channel_id", &VIDEO_OWNER_CHANNEL_ID),
    ("owner_channel_id", &OWNER_CHANNEL_ID),
    ("channel_id", &CHANNEL_ID),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipVerdict {
    pub owned: bool,
    pub reason: String,
}

impl OwnershipVerdict {
    fn owned(reason: impl Into<String>) -> Self {
        Self {
            owned: true,
            reason: reason.into(),
        }
    }

    fn not_owned(reason: impl Into<String>) -> Self {
        Self {
            owned: false,
            reason: reason.into(),
        }
    }
}

/// Decide whether the live content on `page` belongs to the target channel.
///
/// `expected_channel_id` enables the exact id checks; without it only the
/// display-name comparison is available. When nothing on the page can be
/// compared the verdict is NOT OWNED.
pub fn verify(
    page: &LivePage,
    expected_channel_id: Option<&str>,
    display_name: &str,
) -> OwnershipVerdict {
    let text = page.body.as_str();

    if let Some(expected) = expected_channel_id.filter(|id| !id.is_empty()) {
        for (field, regex) in ID_FIELDS.iter() {
            if let Some(actual) = capture_group_1(regex, text) {
                return if actual == expected {
                    OwnershipVerdict::owned(format!("{field}_match"))
                } else {
                    OwnershipVerdict::not_owned(format!("{field}_mismatch:{actual}"))
                };
            }
        }
    }

    match page_author(text) {
        Some(author) => compare_names(&author, display_name),
        None => OwnershipVerdict::not_owned("no_ownership_signal"),
    }
}

fn page_author(text: &str) -> Option<String> {
    if let Some(raw) =
        capture_group_1(&AUTHOR, text).or_else(|| capture_group_1(&OWNER_CHANNEL_NAME, text))
    {
        return Some(decode_json_escapes(raw));
    }
    capture_group_1(&ITEMPROP_NAME, text).map(decode_html_entities)
}

/// Lowercase and drop all whitespace.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Fuzzy name comparison.
///
/// Containment in either direction counts as a match and is tagged
/// `name_contains` so that short names matching inside longer ones can be
/// spotted in the reason.
pub fn compare_names(page_name: &str, display_name: &str) -> OwnershipVerdict {
    let page = normalize_name(page_name);
    let target = normalize_name(display_name);

    if page.is_empty() || target.is_empty() {
        return OwnershipVerdict::not_owned("no_ownership_signal");
    }

    if page == target {
        OwnershipVerdict::owned(format!("name_match:{page_name}"))
    } else if page.contains(&target) || target.contains(&page) {
        OwnershipVerdict::owned(format!("name_contains:{page_name}"))
    } else {
        OwnershipVerdict::not_owned(format!("name_mismatch:{page_name}"))
    }
}
