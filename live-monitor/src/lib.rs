//! Batch live-status monitoring for YouTube channels.
//!
//! Loads the monitored channels from a [`channel::ChannelStore`], checks each one
//! with `live-detect` and writes the live state back.

pub mod channel;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;

pub use error::{Error, Result};
