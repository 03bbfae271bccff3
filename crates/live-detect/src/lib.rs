//! Live-broadcast detection for YouTube channels.
//!
//! Given a channel reference, [`extractor::platforms::youtube::YouTube`] scrapes the
//! channel's `/live` page and decides whether the channel is broadcasting right now,
//! refusing to report live content that is not hosted by that channel.

pub mod detection;
pub mod extractor;

pub use detection::DetectionResult;
