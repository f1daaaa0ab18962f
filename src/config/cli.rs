//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bulk-relay: bulk outbound message relay
///
/// Dispatches one bulk-messaging job described by a TOML job file,
/// batching sends against the provider API and reporting completion
/// via a webhook.
#[derive(Debug, Parser)]
#[command(name = "bulk-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the job file describing one dispatch request
    #[arg(value_name = "JOB_FILE")]
    pub job: Option<PathBuf>,

    /// Completion webhook URL (required for run mode)
    #[arg(long = "notify-url")]
    pub notify_url: Option<String>,

    /// Account service base URL (required for run mode)
    #[arg(long = "account-url")]
    pub account_url: Option<String>,

    /// Graph API base URL
    #[arg(long = "graph-url")]
    pub graph_url: Option<String>,

    /// Graph API version for the messaging endpoint
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Maximum recipients per concurrent batch
    #[arg(long = "batch-size")]
    pub batch_size: Option<usize>,

    /// Pause between batches in milliseconds
    #[arg(long = "batch-pause-ms")]
    pub batch_pause_ms: Option<u64>,

    /// Per-request timeout in seconds (0 disables the bound)
    #[arg(long = "send-timeout")]
    pub send_timeout: Option<u64>,

    /// Connection pool capacity shared across a job's sends
    #[arg(long = "pool-limit")]
    pub pool_limit: Option<usize>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for bulk-relay
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "bulk-relay.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
