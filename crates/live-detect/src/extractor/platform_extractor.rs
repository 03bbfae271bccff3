use crate::detection::DetectionResult;
use crate::extractor::default::DEFAULT_UA;

use super::error::ExtractorError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;
use tracing::debug;

/// Base extractor holding the HTTP client and the browser-like headers sent
/// with every page fetch.
#[derive(Debug, Clone)]
pub struct Extractor {
    // name of the platform, e.g., "YouTube"
    pub platform_name: String,
    // The reqwest client
    pub client: Client,
    // platform-specific headers
    platform_headers: HeaderMap,
    // deadline applied to each request
    pub timeout: Duration,
}

impl Extractor {
    pub fn new<S: Into<String>>(platform_name: S, client: Client, timeout: Duration) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        default_headers.insert(
            reqwest::header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        );
        // Do not set `Accept-Encoding` here.
        // Reqwest auto-adds it (and auto-decompresses) when the corresponding
        // crate features are enabled, as long as we don't override the header.

        Self {
            platform_name: platform_name.into(),
            client,
            platform_headers: default_headers,
            timeout,
        }
    }

    pub fn add_header_typed<K: Into<HeaderName>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderValue::from_str(value.as_ref()) {
            Ok(value) => {
                self.platform_headers.insert(key.into(), value);
            }
            Err(e) => {
                debug!(error = %e, "Invalid header value; skipping");
            }
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create an HTTP request carrying the platform headers and the per-request timeout.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .headers(self.platform_headers.clone());
        if !self.timeout.is_zero() {
            builder = builder.timeout(self.timeout);
        }
        builder
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }
}

/// A platform that can tell whether a channel is broadcasting.
#[async_trait]
pub trait LiveDetector: Send + Sync {
    fn get_extractor(&self) -> &Extractor;

    fn get_platform_headers(&self) -> &HeaderMap {
        self.get_extractor().get_platform_headers()
    }

    /// Run the full check for one channel.
    ///
    /// Fails with [`ExtractorError::UnresolvableChannel`] when `channel_url`
    /// does not look like a channel reference, and with a transport error when
    /// the live page cannot be fetched.
    async fn detect(
        &self,
        channel_url: &str,
        display_name: &str,
    ) -> Result<DetectionResult, ExtractorError>;
}
