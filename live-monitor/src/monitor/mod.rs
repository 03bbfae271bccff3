//! Live monitoring of the stored channels.

pub mod batch;
pub mod events;

use live_detect::extractor::create_client_builder;
use live_detect::extractor::platforms::youtube::YouTube;

pub use batch::{BatchOrchestrator, BatchSummary, ChannelReport};
pub use events::{MonitorEvent, MonitorEventBroadcaster, log_events};

use crate::Result;
use crate::config::AppConfig;

/// Build the YouTube detector described by `config`.
///
/// The client carries no global timeout; the per-request deadline comes from
/// `request_timeout_secs`.
pub fn youtube_detector(config: &AppConfig) -> Result<YouTube> {
    let client = create_client_builder(None).build()?;
    let mut detector = YouTube::new(client)
        .with_base_url(&config.base_url)
        .with_timeout(config.request_timeout())
        .with_accept_language(&config.accept_language);
    if let Some(user_agent) = &config.user_agent {
        detector = detector.with_user_agent(user_agent);
    }
    Ok(detector)
}
