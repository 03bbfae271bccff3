use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use super::channel::ChannelIdentifier;
use super::page::LivePage;
use super::{metadata, ownership, signals};
use crate::detection::DetectionResult;
use crate::extractor::default::DEFAULT_TIMEOUT;
use crate::extractor::error::ExtractorError;
use crate::extractor::platform_extractor::{Extractor, LiveDetector};
use crate::extractor::utils::capture_group_1_owned;

static CANONICAL_LINK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="canonical" href="[^"]*/channel/(UC[A-Za-z0-9_-]+)""#).unwrap()
});
static META_CHANNEL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta itemprop="(?:channelId|identifier)" content="(UC[A-Za-z0-9_-]+)""#)
        .unwrap()
});
static EXTERNAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""externalId"\s*:\s*"(UC[A-Za-z0-9_-]+)""#).unwrap());
static PATH_CHANNEL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/channel/(UC[A-Za-z0-9_-]+)").unwrap());

pub struct YouTube {
    extractor: Extractor,
    base_url: String,
}

impl YouTube {
    pub const BASE_URL: &'static str = "https://www.youtube.com";

    pub fn new(client: Client) -> Self {
        Self {
            extractor: Extractor::new("YouTube", client, DEFAULT_TIMEOUT),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Fetch pages from another origin (a mirror or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Deadline for each page fetch.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.extractor.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.extractor
            .add_header_typed(reqwest::header::USER_AGENT, user_agent);
        self
    }

    pub fn with_accept_language(mut self, accept_language: &str) -> Self {
        self.extractor
            .add_header_typed(reqwest::header::ACCEPT_LANGUAGE, accept_language);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, url: &str) -> Result<LivePage, ExtractorError> {
        let response = self.extractor.get(url).send().await?.error_for_status()?;
        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!(
            platform = %self.extractor.platform_name,
            url,
            final_url = %final_url,
            bytes = body.len(),
            "Fetched page"
        );
        Ok(LivePage::new(body, final_url))
    }

    /// Fetch the channel's `/live` page, following redirects.
    pub async fn fetch_live_page(
        &self,
        identifier: &ChannelIdentifier,
    ) -> Result<LivePage, ExtractorError> {
        self.fetch_page(&identifier.live_url(&self.base_url)).await
    }

    /// Resolve the authoritative channel id used for exact ownership checks.
    ///
    /// Returns `None` when the landing page cannot be fetched or carries no id.
    pub async fn fetch_canonical_channel_id(
        &self,
        identifier: &ChannelIdentifier,
    ) -> Option<String> {
        if let Some(id) = identifier.as_channel_id() {
            return Some(id.to_string());
        }

        let page = match self
            .fetch_page(&identifier.landing_url(&self.base_url))
            .await
        {
            Ok(page) => page,
            Err(e) => {
                debug!(channel = %identifier, error = %e, "Failed to fetch channel landing page");
                return None;
            }
        };

        let id = find_canonical_channel_id(&page.body);
        debug!(channel = %identifier, channel_id = ?id, "Resolved canonical channel id");
        id
    }

    /// Run the whole pipeline for an already-resolved channel.
    pub async fn check_channel(
        &self,
        identifier: &ChannelIdentifier,
        display_name: &str,
    ) -> Result<DetectionResult, ExtractorError> {
        let expected_channel_id = self.fetch_canonical_channel_id(identifier).await;
        let page = self.fetch_live_page(identifier).await?;
        Ok(evaluate(
            &page,
            identifier,
            expected_channel_id.as_deref(),
            display_name,
        ))
    }
}

/// Scan a landing page for the channel's canonical id, most reliable marker first.
pub fn find_canonical_channel_id(body: &str) -> Option<String> {
    [
        &CANONICAL_LINK_ID,
        &META_CHANNEL_ID,
        &EXTERNAL_ID,
        &PATH_CHANNEL_ID,
    ]
    .into_iter()
    .find_map(|regex| capture_group_1_owned(regex, body))
}

/// Turn a fetched live page into a result.
///
/// Pure: the same page and inputs always produce the same result.
pub fn evaluate(
    page: &LivePage,
    identifier: &ChannelIdentifier,
    expected_channel_id: Option<&str>,
    display_name: &str,
) -> DetectionResult {
    let verdict = signals::detect(page);
    if !verdict.is_live {
        return DetectionResult::offline(verdict.reason);
    }

    let ownership = ownership::verify(page, expected_channel_id, display_name);
    if !ownership.owned {
        debug!(
            channel = %identifier,
            signal = %verdict.reason,
            ownership = %ownership.reason,
            "Live content is not hosted by this channel"
        );
        return DetectionResult::offline(format!(
            "ownership_failed:{}|{}",
            ownership.reason, verdict.reason
        ));
    }

    let metadata = metadata::extract(page, display_name);
    let mut reason = format!("{}|{}", verdict.reason, ownership.reason);
    if metadata.video_id.is_none() {
        reason.push_str("|no_video_id");
    }

    DetectionResult {
        is_live: true,
        stream_url: Some(
            metadata
                .watch_url()
                .unwrap_or_else(|| identifier.live_url(YouTube::BASE_URL)),
        ),
        video_id: metadata.video_id,
        stream_title: Some(metadata.title),
        stream_thumbnail: metadata.thumbnail,
        reason,
    }
}

#[async_trait]
impl LiveDetector for YouTube {
    fn get_extractor(&self) -> &Extractor {
        &self.extractor
    }

    async fn detect(
        &self,
        channel_url: &str,
        display_name: &str,
    ) -> Result<DetectionResult, ExtractorError> {
        let identifier = ChannelIdentifier::resolve(channel_url)
            .ok_or_else(|| ExtractorError::UnresolvableChannel(channel_url.to_string()))?;
        self.check_channel(&identifier, display_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::default::default_client;
    use crate::extractor::platforms::youtube::ChannelKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIVE_BODY: &str = r#"<html><head><title>Heist night - YouTube</title></head>
<script>var ytInitialPlayerResponse = {"videoDetails":{"videoId":"abc12345678","title":"Heist night","isLive":true,"author":"SkylifeRP"},"microformat":{"playerMicroformatRenderer":{"ownerChannelName":"SkylifeRP"}},"videoOwnerChannelId":"UCabc"};</script></html>"#;

    fn handle() -> ChannelIdentifier {
        ChannelIdentifier::new(ChannelKind::Handle, "SkylifeRP")
    }

    #[test]
    fn test_find_canonical_channel_id_order() {
        let body = r#"<a href="/channel/UCpath">x</a> "externalId":"UCexternal" <link rel="canonical" href="https://www.youtube.com/channel/UCcanonical">"#;
        assert_eq!(
            find_canonical_channel_id(body).as_deref(),
            Some("UCcanonical")
        );

        let body = r#"<meta itemprop="identifier" content="UCmeta"> "externalId":"UCexternal""#;
        assert_eq!(find_canonical_channel_id(body).as_deref(), Some("UCmeta"));

        let body = r#"<a href="https://www.youtube.com/channel/UCpath/videos">"#;
        assert_eq!(find_canonical_channel_id(body).as_deref(), Some("UCpath"));

        assert_eq!(find_canonical_channel_id("<html></html>"), None);
    }

    #[test]
    fn test_evaluate_live_and_owned() {
        let page = LivePage::new(LIVE_BODY, "https://www.youtube.com/watch?v=abc12345678");
        let result = evaluate(&page, &handle(), Some("UCabc"), "SkylifeRP");
        assert!(result.is_live);
        assert_eq!(result.video_id.as_deref(), Some("abc12345678"));
        assert_eq!(
            result.stream_url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc12345678")
        );
        assert_eq!(result.stream_title.as_deref(), Some("Heist night"));
        assert!(
            result
                .stream_thumbnail
                .as_deref()
                .unwrap()
                .ends_with("/abc12345678/maxresdefault.jpg")
        );
        assert_eq!(result.reason, "is_live_true|video_owner_channel_id_match");
    }

    #[test]
    fn test_evaluate_foreign_owner_is_not_live() {
        let body = LIVE_BODY.replace("UCabc", "UCxyz");
        let page = LivePage::new(body, "https://www.youtube.com/watch?v=abc12345678");
        let result = evaluate(&page, &handle(), Some("UCabc"), "SkylifeRP");
        assert!(!result.is_live);
        assert!(result.stream_url.is_none());
        assert!(result.stream_title.is_none());
        assert!(result.stream_thumbnail.is_none());
        assert!(result.reason.starts_with("ownership_failed"));
        assert!(result.reason.contains("UCxyz"));
    }

    #[test]
    fn test_evaluate_blank_owner_id_is_not_live() {
        let page = LivePage::new(
            r#"{"isLive":true,"videoOwnerChannelId":"","channelId":"UCabc","author":"Other"}"#,
            "https://www.youtube.com/@SkylifeRP/live",
        );
        let result = evaluate(&page, &handle(), Some("UCabc"), "SkylifeRP");
        assert!(!result.is_live);
        assert!(result.stream_url.is_none());
        assert_eq!(
            result.reason,
            "ownership_failed:video_owner_channel_id_mismatch:|is_live_true"
        );
    }

    #[test]
    fn test_evaluate_without_video_id_uses_channel_live_url() {
        let page = LivePage::new(
            r#"{"isLiveNow":true,"author":"SkylifeRP"}"#,
            "https://www.youtube.com/@SkylifeRP/live",
        );
        let result = evaluate(&page, &handle(), None, "SkylifeRP");
        assert!(result.is_live);
        assert_eq!(result.video_id, None);
        assert_eq!(
            result.stream_url.as_deref(),
            Some("https://www.youtube.com/@SkylifeRP/live")
        );
        assert_eq!(result.stream_title.as_deref(), Some("SkylifeRP is Live!"));
        assert_eq!(result.stream_thumbnail, None);
        assert!(result.reason.ends_with("|no_video_id"));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let page = LivePage::new(LIVE_BODY, "https://www.youtube.com/watch?v=abc12345678");
        let first = evaluate(&page, &handle(), Some("UCabc"), "SkylifeRP");
        let second = evaluate(&page, &handle(), Some("UCabc"), "SkylifeRP");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_check_channel_follows_live_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/@SkylifeRP"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<link rel="canonical" href="https://www.youtube.com/channel/UCabc">"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/@SkylifeRP/live"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/watch?v=abc12345678", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", "abc12345678"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LIVE_BODY))
            .mount(&server)
            .await;

        let youtube = YouTube::new(default_client()).with_base_url(server.uri());
        let result = youtube
            .detect("https://www.youtube.com/@SkylifeRP", "SkylifeRP")
            .await
            .unwrap();

        assert!(result.is_live);
        assert_eq!(result.video_id.as_deref(), Some("abc12345678"));
    }

    #[tokio::test]
    async fn test_canonical_id_skips_network_for_channel_ids() {
        // No server: a request would fail and yield None.
        let youtube = YouTube::new(default_client()).with_base_url("http://127.0.0.1:9");
        let id = ChannelIdentifier::new(ChannelKind::ChannelId, "UCabc");
        assert_eq!(
            youtube.fetch_canonical_channel_id(&id).await.as_deref(),
            Some("UCabc")
        );
        assert_eq!(youtube.fetch_canonical_channel_id(&handle()).await, None);
    }

    #[tokio::test]
    async fn test_detect_rejects_unresolvable_urls() {
        let youtube = YouTube::new(default_client());
        let err = youtube
            .detect("https://example.com/not-a-channel", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::UnresolvableChannel(_)));
    }

    #[tokio::test]
    async fn test_live_page_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let youtube = YouTube::new(default_client())
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(200));
        let err = youtube.fetch_live_page(&handle()).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(DetectionResult::from_error(&err).reason.starts_with("error:"));
    }
}
