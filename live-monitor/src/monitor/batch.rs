//! Batch orchestration.
//!
//! One run checks every monitored channel concurrently, writes each result back
//! to the store and reports the transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use live_detect::DetectionResult;
use live_detect::extractor::error::ExtractorError;
use live_detect::extractor::platform_extractor::LiveDetector;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::events::{MonitorEvent, MonitorEventBroadcaster};
use crate::channel::{ChannelStore, LiveStateUpdate, MonitoredChannel};
use crate::{Error, Result};

pub const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Outcome of one channel within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReport {
    pub id: String,
    pub display_name: String,
    pub is_live: bool,
    /// Live flag differs from the previously stored one.
    pub transition: bool,
    /// The channel URL could not be resolved; nothing was written.
    pub skipped: bool,
    pub write_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    pub reason: String,
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Channels loaded from the store, skipped ones included.
    pub checked: usize,
    pub live: usize,
    pub transitions: usize,
    pub skipped: usize,
    pub failed_writes: usize,
    pub timestamp: DateTime<Utc>,
    pub channels: Vec<ChannelReport>,
}

impl BatchSummary {
    fn from_reports(channels: Vec<ChannelReport>, timestamp: DateTime<Utc>) -> Self {
        Self {
            checked: channels.len(),
            live: channels.iter().filter(|c| c.is_live).count(),
            transitions: channels.iter().filter(|c| c.transition).count(),
            skipped: channels.iter().filter(|c| c.skipped).count(),
            failed_writes: channels.iter().filter(|c| c.write_failed).count(),
            timestamp,
            channels,
        }
    }
}

/// Runs the live check for every stored channel.
pub struct BatchOrchestrator {
    detector: Arc<dyn LiveDetector>,
    store: Arc<dyn ChannelStore>,
    events: MonitorEventBroadcaster,
    max_concurrent: usize,
}

impl BatchOrchestrator {
    pub fn new(detector: Arc<dyn LiveDetector>, store: Arc<dyn ChannelStore>) -> Self {
        Self {
            detector,
            store,
            events: MonitorEventBroadcaster::new(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set the maximum number of channels checked at once.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Publish transitions on an existing broadcaster.
    pub fn with_broadcaster(mut self, events: MonitorEventBroadcaster) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &MonitorEventBroadcaster {
        &self.events
    }

    /// Check all channels once.
    ///
    /// Only a failure to load the channel list fails the run; per-channel
    /// errors end up in that channel's report.
    pub async fn run(&self) -> Result<BatchSummary> {
        let channels = self
            .store
            .list_channels()
            .await
            .map_err(|e| Error::BatchLoad(e.to_string()))?;

        debug!(
            count = channels.len(),
            max_concurrent = self.max_concurrent,
            "Starting batch"
        );

        let reports: Vec<ChannelReport> = stream::iter(channels)
            .map(|channel| self.process_channel(channel))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let summary = BatchSummary::from_reports(reports, Utc::now());
        info!(
            checked = summary.checked,
            live = summary.live,
            transitions = summary.transitions,
            skipped = summary.skipped,
            failed_writes = summary.failed_writes,
            "Batch complete"
        );
        Ok(summary)
    }

    async fn process_channel(&self, channel: MonitoredChannel) -> ChannelReport {
        let result = match self
            .detector
            .detect(&channel.channel_url, &channel.display_name)
            .await
        {
            Ok(result) => result,
            Err(ExtractorError::UnresolvableChannel(url)) => {
                warn!(
                    channel = %channel.display_name,
                    url = %url,
                    "Skipping channel with unresolvable URL"
                );
                return ChannelReport {
                    id: channel.id,
                    display_name: channel.display_name,
                    is_live: false,
                    transition: false,
                    skipped: true,
                    write_failed: false,
                    stream_url: None,
                    reason: "unresolvable_channel".to_string(),
                };
            }
            Err(e) => {
                warn!(channel = %channel.display_name, error = %e, "Live check failed");
                DetectionResult::from_error(&e)
            }
        };

        let checked_at = Utc::now();
        let transition = result.is_live != channel.last_known_live;
        let update = LiveStateUpdate::from_detection(&result, checked_at);

        let write_failed = match self.store.update_live_state(&channel.id, &update).await {
            Ok(()) => false,
            Err(e) => {
                warn!(channel = %channel.display_name, error = %e, "Failed to persist live state");
                true
            }
        };

        if transition {
            info!(
                channel = %channel.display_name,
                is_live = result.is_live,
                reason = %result.reason,
                "Live state changed"
            );
            self.publish_transition(&channel, &update);
        } else {
            debug!(
                channel = %channel.display_name,
                is_live = result.is_live,
                reason = %result.reason,
                "Live state unchanged"
            );
        }

        ChannelReport {
            id: channel.id,
            display_name: channel.display_name,
            is_live: update.is_live,
            transition,
            skipped: false,
            write_failed,
            stream_url: update.stream_url,
            reason: update.reason,
        }
    }

    fn publish_transition(&self, channel: &MonitoredChannel, update: &LiveStateUpdate) {
        let event = if update.is_live {
            MonitorEvent::ChannelLive {
                channel_id: channel.id.clone(),
                channel_name: channel.display_name.clone(),
                channel_url: channel.channel_url.clone(),
                stream_url: update.stream_url.clone(),
                title: update.stream_title.clone(),
                thumbnail: update.stream_thumbnail.clone(),
                reason: update.reason.clone(),
                timestamp: update.checked_at,
            }
        } else {
            MonitorEvent::ChannelOffline {
                channel_id: channel.id.clone(),
                channel_name: channel.display_name.clone(),
                reason: update.reason.clone(),
                timestamp: update.checked_at,
            }
        };

        // No subscribers is fine.
        let _ = self.events.publish(event);
    }
}
