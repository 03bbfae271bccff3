mod cli;

use std::process;
use std::sync::Arc;

use clap::Parser;
use live_detect::DetectionResult;
use live_detect::extractor::error::ExtractorError;
use live_detect::extractor::platforms::youtube::ChannelIdentifier;
use live_monitor::Result;
use live_monitor::channel::JsonFileChannelStore;
use live_monitor::config::AppConfig;
use live_monitor::logging::init_logging;
use live_monitor::monitor::{BatchOrchestrator, log_events, youtube_detector};
use serde::Serialize;
use tracing::{error, info};

use crate::cli::{Args, Commands};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        let error_json = serde_json::json!({
            "status": "error",
            "message": e.to_string(),
        });
        println!("{error_json}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }

    init_logging(args.verbose, args.quiet, &config.log_filter, config.log_json);

    match args.command {
        Commands::Run { channels } => {
            if let Some(channels) = channels {
                config.channels_file = channels;
            }
            info!(
                channels_file = %config.channels_file.display(),
                max_concurrent = config.max_concurrent,
                "Running batch"
            );

            let store = Arc::new(JsonFileChannelStore::new(&config.channels_file));
            let detector = Arc::new(youtube_detector(&config)?);
            let orchestrator = BatchOrchestrator::new(detector, store)
                .with_max_concurrent(config.max_concurrent);
            let listener = tokio::spawn(log_events(orchestrator.events().subscribe()));

            let summary = orchestrator.run().await;
            drop(orchestrator);
            let _ = listener.await;
            print_json(&summary?)?;
        }

        Commands::Check { url, name } => {
            let identifier = resolve(&url)?;
            let display_name = name.unwrap_or_else(|| identifier.value.clone());
            let detector = youtube_detector(&config)?;
            let result = detector
                .check_channel(&identifier, &display_name)
                .await
                .unwrap_or_else(|e| DetectionResult::from_error(&e));
            print_json(&result)?;
        }

        Commands::Resolve { url } => {
            let identifier = resolve(&url)?;
            print_json(&serde_json::json!({
                "kind": identifier.kind,
                "value": identifier.value,
                "liveUrl": identifier.live_url(&config.base_url),
            }))?;
        }

        Commands::Config { show } => {
            if show {
                println!("{}", config.show()?);
            } else {
                println!("Use --show to display the current configuration");
            }
        }
    }

    Ok(())
}

fn resolve(url: &str) -> Result<ChannelIdentifier> {
    ChannelIdentifier::resolve(url)
        .ok_or_else(|| ExtractorError::UnresolvableChannel(url.to_string()).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
