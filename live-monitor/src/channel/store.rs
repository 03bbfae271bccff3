//! Channel store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::metadata::{LiveStateUpdate, MonitoredChannel};
use crate::{Error, Result};

/// Channel store trait.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn list_channels(&self) -> Result<Vec<MonitoredChannel>>;
    async fn update_live_state(&self, id: &str, update: &LiveStateUpdate) -> Result<()>;
}

/// Channels kept in a JSON file holding an array of channel records.
///
/// Writes rewrite the whole file through a temporary sibling and a rename, one
/// writer at a time.
pub struct JsonFileChannelStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileChannelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<MonitoredChannel>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_all(&self, channels: &[MonitoredChannel]) -> Result<()> {
        let content = serde_json::to_string_pretty(channels)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelStore for JsonFileChannelStore {
    async fn list_channels(&self) -> Result<Vec<MonitoredChannel>> {
        let channels = self.read_all().await?;
        debug!(path = %self.path.display(), count = channels.len(), "Loaded channels");
        Ok(channels)
    }

    async fn update_live_state(&self, id: &str, update: &LiveStateUpdate) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut channels = self.read_all().await?;
        let channel = channels
            .iter_mut()
            .find(|channel| channel.id == id)
            .ok_or_else(|| Error::store(format!("channel {id} not found")))?;
        channel.apply(update);
        self.write_all(&channels).await
    }
}

/// Channels held in memory.
#[derive(Default)]
pub struct InMemoryChannelStore {
    channels: RwLock<Vec<MonitoredChannel>>,
}

impl InMemoryChannelStore {
    pub fn new(channels: Vec<MonitoredChannel>) -> Self {
        Self {
            channels: RwLock::new(channels),
        }
    }

    pub async fn get(&self, id: &str) -> Option<MonitoredChannel> {
        self.channels
            .read()
            .await
            .iter()
            .find(|channel| channel.id == id)
            .cloned()
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn list_channels(&self) -> Result<Vec<MonitoredChannel>> {
        Ok(self.channels.read().await.clone())
    }

    async fn update_live_state(&self, id: &str, update: &LiveStateUpdate) -> Result<()> {
        let mut channels = self.channels.write().await;
        let channel = channels
            .iter_mut()
            .find(|channel| channel.id == id)
            .ok_or_else(|| Error::store(format!("channel {id} not found")))?;
        channel.apply(update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn channels() -> Vec<MonitoredChannel> {
        vec![
            MonitoredChannel::new("1", "https://www.youtube.com/@SkylifeRP", "SkylifeRP"),
            MonitoredChannel::new("2", "https://www.youtube.com/@Other", "Other"),
        ]
    }

    fn live_update() -> LiveStateUpdate {
        LiveStateUpdate {
            is_live: true,
            stream_url: Some("https://www.youtube.com/watch?v=abc12345678".to_string()),
            stream_title: Some("Heist night".to_string()),
            stream_thumbnail: None,
            reason: "is_live_true|video_owner_channel_id_match".to_string(),
            checked_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.json");
        std::fs::write(&path, serde_json::to_string(&channels()).unwrap()).unwrap();

        let store = JsonFileChannelStore::new(&path);
        store.update_live_state("1", &live_update()).await.unwrap();

        let reloaded = store.list_channels().await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded[0].last_known_live);
        assert_eq!(reloaded[0].stream_title.as_deref(), Some("Heist night"));
        assert_eq!(reloaded[1], channels()[1]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"lastKnownLive\": true"));
    }

    #[tokio::test]
    async fn test_json_store_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileChannelStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.list_channels().await, Err(Error::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileChannelStore::new(&path);
        assert!(matches!(
            store.list_channels().await,
            Err(Error::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_is_a_store_error() {
        let store = InMemoryChannelStore::new(channels());
        let err = store.update_live_state("9", &live_update()).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert_eq!(store.list_channels().await.unwrap(), channels());
    }
}
