//! Tracing subscriber setup for the binary.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `quiet` and `verbose` win over everything; otherwise `RUST_LOG` is honored
/// and `default_filter` applies when it is unset. Logs go to stderr so stdout
/// stays machine-readable.
pub fn init_logging(verbose: bool, quiet: bool, default_filter: &str, json: bool) {
    let filter = build_filter(verbose, quiet, default_filter);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(verbose)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn build_filter(verbose: bool, quiet: bool, default_filter: &str) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    }
}
