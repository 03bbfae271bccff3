use serde::{Deserialize, Serialize};

use crate::extractor::error::ExtractorError;

/// Outcome of a single live check.
///
/// `is_live` is only ever `true` once ownership of the live content has been
/// verified; the stream fields are `None` whenever the channel is not live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub is_live: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub stream_url: Option<String>,
    pub stream_title: Option<String>,
    pub stream_thumbnail: Option<String>,
    /// Machine-readable tag(s) naming the rules that produced this verdict.
    pub reason: String,
}

impl DetectionResult {
    pub fn offline(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug_assert!(!reason.is_empty());
        Self {
            is_live: false,
            video_id: None,
            stream_url: None,
            stream_title: None,
            stream_thumbnail: None,
            reason,
        }
    }

    /// Collapse a failed check into a not-live result.
    pub fn from_error(error: &ExtractorError) -> Self {
        Self::offline(format!("error:{error}"))
    }

    pub fn is_error(&self) -> bool {
        self.reason.starts_with("error:")
    }
}
