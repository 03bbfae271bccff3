//! Monitored channel records and the live-state write-back.

use chrono::{DateTime, Utc};
use live_detect::DetectionResult;
use serde::{Deserialize, Serialize};

/// A channel under monitoring, as kept by the channel store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredChannel {
    pub id: String,
    pub channel_url: String,
    pub display_name: String,
    #[serde(default)]
    pub last_known_live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reason: Option<String>,
}

impl MonitoredChannel {
    pub fn new(
        id: impl Into<String>,
        channel_url: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel_url: channel_url.into(),
            display_name: display_name.into(),
            last_known_live: false,
            stream_url: None,
            stream_title: None,
            stream_thumbnail: None,
            last_checked_at: None,
            last_reason: None,
        }
    }

    /// Overwrite the live-state fields. Identity fields are left alone.
    pub fn apply(&mut self, update: &LiveStateUpdate) {
        self.last_known_live = update.is_live;
        self.stream_url = update.stream_url.clone();
        self.stream_title = update.stream_title.clone();
        self.stream_thumbnail = update.stream_thumbnail.clone();
        self.last_checked_at = Some(update.checked_at);
        self.last_reason = Some(update.reason.clone());
    }
}

/// The fields a check writes back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStateUpdate {
    pub is_live: bool,
    pub stream_url: Option<String>,
    pub stream_title: Option<String>,
    pub stream_thumbnail: Option<String>,
    pub reason: String,
    pub checked_at: DateTime<Utc>,
}

impl LiveStateUpdate {
    /// Stream fields are cleared whenever the result is not live.
    pub fn from_detection(result: &DetectionResult, checked_at: DateTime<Utc>) -> Self {
        let stream_field = |field: &Option<String>| {
            if result.is_live {
                field.clone()
            } else {
                None
            }
        };
        Self {
            is_live: result.is_live,
            stream_url: stream_field(&result.stream_url),
            stream_title: stream_field(&result.stream_title),
            stream_thumbnail: stream_field(&result.stream_thumbnail),
            reason: result.reason.clone(),
            checked_at,
        }
    }
}
