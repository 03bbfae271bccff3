//! Monitor events.
//!
//! Emitted by the batch orchestrator whenever a channel's live state flips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Events emitted by the batch orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorEvent {
    /// Channel went live.
    ChannelLive {
        channel_id: String,
        channel_name: String,
        channel_url: String,
        stream_url: Option<String>,
        title: Option<String>,
        thumbnail: Option<String>,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    /// Channel went offline.
    ChannelOffline {
        channel_id: String,
        channel_name: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl MonitorEvent {
    /// Get a human-readable description of the event.
    pub fn description(&self) -> String {
        match self {
            MonitorEvent::ChannelLive {
                channel_name,
                title,
                ..
            } => match title {
                Some(title) => format!("{} is now live: {}", channel_name, title),
                None => format!("{} is now live", channel_name),
            },
            MonitorEvent::ChannelOffline { channel_name, .. } => {
                format!("{} went offline", channel_name)
            }
        }
    }

    pub fn channel_id(&self) -> &str {
        match self {
            MonitorEvent::ChannelLive { channel_id, .. }
            | MonitorEvent::ChannelOffline { channel_id, .. } => channel_id,
        }
    }
}

/// Broadcaster for monitor events.
pub struct MonitorEventBroadcaster {
    sender: broadcast::Sender<MonitorEvent>,
}

impl MonitorEventBroadcaster {
    /// Create a new broadcaster with default capacity (256).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new broadcaster with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to monitor events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    /// Publish a monitor event.
    pub fn publish(
        &self,
        event: MonitorEvent,
    ) -> Result<usize, broadcast::error::SendError<MonitorEvent>> {
        self.sender.send(event)
    }
}

impl Default for MonitorEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MonitorEventBroadcaster {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Log every event from `receiver` until all senders are dropped.
///
/// Returns the number of events logged.
pub async fn log_events(mut receiver: broadcast::Receiver<MonitorEvent>) -> usize {
    let mut logged = 0;
    loop {
        match receiver.recv().await {
            Ok(event) => {
                info!(channel_id = event.channel_id(), "{}", event.description());
                logged += 1;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Monitor event listener lagged by {} events", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Monitor event channel closed");
                break;
            }
        }
    }
    logged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_event() -> MonitorEvent {
        MonitorEvent::ChannelLive {
            channel_id: "1".to_string(),
            channel_name: "SkylifeRP".to_string(),
            channel_url: "https://www.youtube.com/@SkylifeRP".to_string(),
            stream_url: Some("https://www.youtube.com/watch?v=abc12345678".to_string()),
            title: Some("Heist night".to_string()),
            thumbnail: None,
            reason: "is_live_true|video_owner_channel_id_match".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_event_description() {
        let event = live_event();
        assert!(event.description().contains("SkylifeRP"));
        assert!(event.description().contains("Heist night"));
        assert_eq!(event.channel_id(), "1");

        let offline = MonitorEvent::ChannelOffline {
            channel_id: "1".to_string(),
            channel_name: "SkylifeRP".to_string(),
            reason: "no_live_indicators".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(offline.description(), "SkylifeRP went offline");
    }

    #[test]
    fn test_broadcaster_publish_subscribe() {
        let broadcaster = MonitorEventBroadcaster::new();
        let mut receiver = broadcaster.subscribe();

        broadcaster.publish(live_event()).unwrap();

        let received = receiver.try_recv().unwrap();
        assert!(matches!(received, MonitorEvent::ChannelLive { .. }));
    }

    #[test]
    fn test_publish_without_subscribers_fails() {
        let broadcaster = MonitorEventBroadcaster::new();
        assert!(broadcaster.publish(live_event()).is_err());
    }

    #[tokio::test]
    async fn test_log_events_drains_until_closed() {
        let broadcaster = MonitorEventBroadcaster::new();
        let listener = tokio::spawn(log_events(broadcaster.subscribe()));

        broadcaster.publish(live_event()).unwrap();
        broadcaster
            .publish(MonitorEvent::ChannelOffline {
                channel_id: "2".to_string(),
                channel_name: "Other".to_string(),
                reason: "no_live_indicators".to_string(),
                timestamp: Utc::now(),
            })
            .unwrap();
        drop(broadcaster);

        assert_eq!(listener.await.unwrap(), 2);
    }
}
