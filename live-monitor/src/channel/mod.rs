//! Monitored channels and where they are stored.

pub mod metadata;
pub mod store;

pub use metadata::{LiveStateUpdate, MonitoredChannel};
pub use store::{ChannelStore, InMemoryChannelStore, JsonFileChannelStore};
