//! Live / not-live decision from the textual markers of a live page.
//!
//! Each check is a named rule; rules are evaluated in table order and the
//! first match decides, so the verdict's `reason` always names exactly one rule.

use std::sync::LazyLock;

use regex::Regex;

use super::page::LivePage;
use crate::extractor::utils::window;

/// Radius (bytes) around a positive match that is scanned for a replay marker.
///
/// A chat replay of a past broadcast carries most live structures next to
/// `"isReplay":true`; such matches do not count.
pub const REPLAY_REGION_RADIUS: usize = 1_000;

/// A named text predicate.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    regex: Regex,
}

impl Rule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// True if at least one occurrence has no replay marker in its region.
    pub fn matches_outside_replay(&self, text: &str) -> bool {
        self.regex.find_iter(text).any(|m| {
            !REPLAY_MARKER.is_match(window(text, m.start(), m.end(), REPLAY_REGION_RADIUS))
        })
    }
}

static REPLAY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""isReplay"\s*:\s*true"#).unwrap());

/// Explicit not-live markers, checked first.
pub static NEGATIVE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("is_live_false", r#""isLive"\s*:\s*false"#),
        Rule::new("is_live_now_false", r#""isLiveNow"\s*:\s*false"#),
        Rule::new("video_unavailable", r"(?i)video (?:is )?unavailable"),
        Rule::new("video_private", r"(?i)video is private"),
        Rule::new(
            "recording_unavailable",
            r"(?i)recording (?:is )?(?:not available|unavailable)",
        ),
        Rule::new("is_replay", r#""isReplay"\s*:\s*true"#),
        Rule::new("is_premiere", r#""isPremiere"\s*:\s*true"#),
        Rule::new("is_upcoming", r#""isUpcoming"\s*:\s*true"#),
        Rule::new("offline", r"LIVE_STREAM_OFFLINE"),
    ]
});

/// Positive markers that veto the negative short-circuit when present anywhere.
pub static CONTRADICTING_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("is_live_true", r#""isLive"\s*:\s*true"#),
        Rule::new("is_live_now_true", r#""isLiveNow"\s*:\s*true"#),
        Rule::new("live_now_badge", r"BADGE_STYLE_TYPE_LIVE_NOW"),
    ]
});

/// Positive markers in priority order.
pub static POSITIVE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("is_live_true", r#""isLive"\s*:\s*true"#),
        Rule::new("is_live_now_true", r#""isLiveNow"\s*:\s*true"#),
        Rule::new("live_now_badge", r"BADGE_STYLE_TYPE_LIVE_NOW"),
        Rule::new("live_style", r#""style"\s*:\s*"LIVE""#),
        Rule::new("live_badge", r#""liveBadge(?:Renderer)?"\s*:\s*\{"#),
        Rule::new("live_chat_renderer", r#""liveChatRenderer"\s*:"#),
        Rule::new("live_streamability", r#""liveStreamabilityRenderer"\s*:"#),
        Rule::new("broadcast_id", r#""broadcastId"\s*:\s*"\d+""#),
        Rule::new(
            "latency_class",
            r#""latencyClass"\s*:\s*"MDE_STREAM_OPTIMIZATIONS_RENDERER_LATENCY_[A-Z_]+""#,
        ),
        Rule::new("is_live_content", r#""isLiveContent"\s*:\s*true"#),
        Rule::new("stream_started", r"(?i)started streaming"),
    ]
});

static LIVE_CHAT_CONTINUATION: LazyLock<Rule> = LazyLock::new(|| {
    Rule::new(
        "live_chat_continuation",
        r#""(?:invalidationContinuationData|timedContinuationData)"\s*:"#,
    )
});

static VIDEO_DETAILS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""videoDetails"\s*:\s*\{"#).unwrap());
static LIVE_BADGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""liveBadge(?:Renderer)?"\s*:\s*\{"#).unwrap());

/// Output of the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalVerdict {
    pub is_live: bool,
    pub reason: String,
}

impl SignalVerdict {
    fn live(reason: impl Into<String>) -> Self {
        Self {
            is_live: true,
            reason: reason.into(),
        }
    }

    fn not_live(reason: impl Into<String>) -> Self {
        Self {
            is_live: false,
            reason: reason.into(),
        }
    }
}

/// Decide whether `page` shows a live broadcast.
pub fn detect(page: &LivePage) -> SignalVerdict {
    let text = page.body.as_str();

    // Phase 1: honor an explicit not-live marker unless a positive marker contradicts it.
    if let Some(negative) = NEGATIVE_RULES.iter().find(|rule| rule.matches(text))
        && !CONTRADICTING_RULES.iter().any(|rule| rule.matches(text))
    {
        return SignalVerdict::not_live(format!("not_live:{}", negative.name));
    }

    // Phase 2: first positive rule outside a replay region wins.
    if let Some(rule) = POSITIVE_RULES
        .iter()
        .find(|rule| rule.matches_outside_replay(text))
    {
        return SignalVerdict::live(rule.name);
    }

    if LIVE_CHAT_CONTINUATION.matches_outside_replay(text) {
        return SignalVerdict::live(LIVE_CHAT_CONTINUATION.name);
    }

    if page.is_watch_url() && (VIDEO_DETAILS.is_match(text) || LIVE_BADGE.is_match(text)) {
        return SignalVerdict::live("watch_redirect");
    }

    SignalVerdict::not_live("no_live_indicators")
}
