use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "live-monitor",
    version,
    about = "Check whether monitored YouTube channels are live"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LIVE_MONITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Per-request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every monitored channel once and print the batch summary
    Run {
        /// Channels file (overrides the config file)
        #[arg(long)]
        channels: Option<PathBuf>,
    },

    /// Check a single channel and print the detection result
    Check {
        /// Channel URL
        url: String,

        /// Display name used for the name-based ownership check
        #[arg(long)]
        name: Option<String>,
    },

    /// Print how a channel URL is interpreted
    Resolve {
        /// Channel URL
        url: String,
    },

    /// Configuration management
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_global_flags() {
        let args = Args::parse_from([
            "live-monitor",
            "run",
            "--channels",
            "list.json",
            "-v",
            "--timeout",
            "5",
        ]);
        assert!(args.verbose);
        assert_eq!(args.timeout, Some(5));
        assert!(matches!(
            args.command,
            Commands::Run { channels: Some(ref path) } if path == &PathBuf::from("list.json")
        ));
    }

    #[test]
    fn test_parse_check() {
        let args = Args::parse_from([
            "live-monitor",
            "check",
            "https://www.youtube.com/@SkylifeRP",
            "--name",
            "SkylifeRP",
        ]);
        assert!(matches!(
            args.command,
            Commands::Check { ref url, name: Some(ref name) }
                if url == "https://www.youtube.com/@SkylifeRP" && name == "SkylifeRP"
        ));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["live-monitor", "-v", "-q", "config"]).is_err());
    }
}
