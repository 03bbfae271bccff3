use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extractor::utils::capture_group_1;

const HOST_PREFIX: &str = r"^(?i:(?:https?://)?(?:(?:www|m)\.)?youtube\.com)/";

static HANDLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{HOST_PREFIX}@([^/]+)(?:/.*)?$")).unwrap());
static CHANNEL_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{HOST_PREFIX}channel/([A-Za-z0-9_-]+)(?:/.*)?$")).unwrap()
});
static CUSTOM_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{HOST_PREFIX}c/([^/]+)(?:/.*)?$")).unwrap());
static LEGACY_USER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{HOST_PREFIX}user/([^/]+)(?:/.*)?$")).unwrap());

/// Which URL shape a channel reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelKind {
    /// `youtube.com/@name`
    Handle,
    /// `youtube.com/channel/UC...`
    ChannelId,
    /// `youtube.com/c/name`
    CustomName,
    /// `youtube.com/user/name`
    LegacyUser,
}

impl ChannelKind {
    fn path_prefix(self) -> &'static str {
        match self {
            ChannelKind::Handle => "@",
            ChannelKind::ChannelId => "channel/",
            ChannelKind::CustomName => "c/",
            ChannelKind::LegacyUser => "user/",
        }
    }
}

/// A typed channel reference parsed from a channel URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelIdentifier {
    pub kind: ChannelKind,
    pub value: String,
}

impl ChannelIdentifier {
    pub fn new(kind: ChannelKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Parse a channel URL, trying each known shape in order.
    ///
    /// Returns `None` when the URL matches none of them.
    pub fn resolve(url: &str) -> Option<Self> {
        let normalized = normalize(url);
        if normalized.is_empty() {
            return None;
        }

        let shapes: [(ChannelKind, &LazyLock<Regex>); 4] = [
            (ChannelKind::Handle, &HANDLE_REGEX),
            (ChannelKind::ChannelId, &CHANNEL_ID_REGEX),
            (ChannelKind::CustomName, &CUSTOM_NAME_REGEX),
            (ChannelKind::LegacyUser, &LEGACY_USER_REGEX),
        ];

        shapes.into_iter().find_map(|(kind, regex)| {
            capture_group_1(regex, normalized)
                .filter(|value| !value.is_empty())
                .map(|value| Self::new(kind, value))
        })
    }

    /// The channel id, when the reference already is one.
    pub fn as_channel_id(&self) -> Option<&str> {
        (self.kind == ChannelKind::ChannelId).then_some(self.value.as_str())
    }

    /// Path of the channel landing page, e.g. `/@name`.
    pub fn landing_path(&self) -> String {
        format!("/{}{}", self.kind.path_prefix(), self.value)
    }

    /// Path of the channel's live-redirect page, e.g. `/@name/live`.
    pub fn live_path(&self) -> String {
        format!("{}/live", self.landing_path())
    }

    pub fn landing_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.landing_path())
    }

    pub fn live_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.live_path())
    }
}

impl fmt::Display for ChannelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.path_prefix(), self.value)
    }
}

/// Drop query string, fragment and trailing slashes.
fn normalize(url: &str) -> &str {
    let url = url.trim();
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/@SkylifeRP", ChannelKind::Handle, "SkylifeRP")]
    #[case("https://youtube.com/@SkylifeRP/", ChannelKind::Handle, "SkylifeRP")]
    #[case("youtube.com/@skylife.rp?si=abc", ChannelKind::Handle, "skylife.rp")]
    #[case("https://m.youtube.com/@SkylifeRP/live", ChannelKind::Handle, "SkylifeRP")]
    #[case(
        "https://www.youtube.com/channel/UCabc123_-x/",
        ChannelKind::ChannelId,
        "UCabc123_-x"
    )]
    #[case("https://www.youtube.com/c/SkylifeRP#about", ChannelKind::CustomName, "SkylifeRP")]
    #[case("http://www.YouTube.com/user/oldname", ChannelKind::LegacyUser, "oldname")]
    #[case("https://WWW.YOUTUBE.COM/@SkylifeRP", ChannelKind::Handle, "SkylifeRP")]
    #[case("HTTPS://www.youtube.com/@SkylifeRP", ChannelKind::Handle, "SkylifeRP")]
    #[case("https://M.YouTube.com/channel/UCabc", ChannelKind::ChannelId, "UCabc")]
    fn test_resolve_known_shapes(
        #[case] url: &str,
        #[case] kind: ChannelKind,
        #[case] value: &str,
    ) {
        let id = ChannelIdentifier::resolve(url).expect("known shape should resolve");
        assert_eq!(id.kind, kind);
        assert_eq!(id.value, value);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("https://www.youtube.com/")]
    #[case("https://www.youtube.com/watch?v=abc12345678")]
    #[case("https://www.twitch.tv/skyliferp")]
    #[case("https://notyoutube.com/@SkylifeRP")]
    #[case("https://www.youtube.com/@")]
    #[case("SkylifeRP")]
    fn test_resolve_unknown_shapes(#[case] url: &str) {
        assert_eq!(ChannelIdentifier::resolve(url), None);
    }

    #[test]
    fn test_paths() {
        let handle = ChannelIdentifier::resolve("https://www.youtube.com/@SkylifeRP").unwrap();
        assert_eq!(handle.landing_path(), "/@SkylifeRP");
        assert_eq!(
            handle.live_url("https://www.youtube.com/"),
            "https://www.youtube.com/@SkylifeRP/live"
        );
        assert_eq!(handle.as_channel_id(), None);

        let id = ChannelIdentifier::new(ChannelKind::ChannelId, "UCabc");
        assert_eq!(id.live_path(), "/channel/UCabc/live");
        assert_eq!(id.as_channel_id(), Some("UCabc"));
        assert_eq!(id.to_string(), "channel/UCabc");
    }
}
