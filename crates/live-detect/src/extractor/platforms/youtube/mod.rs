mod builder;
pub mod channel;
pub mod metadata;
pub mod ownership;
pub mod page;
pub mod signals;

pub use builder::{YouTube, evaluate, find_canonical_channel_id};
pub use channel::{ChannelIdentifier, ChannelKind};
pub use page::LivePage;
