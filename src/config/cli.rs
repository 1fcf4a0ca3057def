//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::webhook::WebhookPayload;

/// yopass-webhook: secret-sharing event notifier
///
/// Sends a one-shot webhook describing a shared secret, retrying
/// failed deliveries with a linear backoff.
#[derive(Debug, Parser)]
#[command(name = "yopass-webhook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Webhook URL (empty or absent disables delivery)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of delivery attempts
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Base retry delay in seconds (the wait after attempt n is n times this)
    #[arg(long = "retry-delay", global = true)]
    pub retry_delay: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for yopass-webhook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deliver a notification for a shared secret
    Send(SendArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "yopass-webhook.toml")]
        output: PathBuf,
    },
}

/// Payload fields for the `send` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SendArgs {
    /// One-time link to the secret
    #[arg(long = "one-time-link")]
    pub one_time_link: String,

    /// Delivery manager identifier
    #[arg(long = "delivery-manager")]
    pub delivery_manager: String,

    /// Creation timestamp (e.g. 2024-01-01T00:00:00Z)
    #[arg(long)]
    pub timestamp: String,

    /// Secret lifetime in seconds
    #[arg(long = "expiration-seconds", default_value_t = 3600, allow_negative_numbers = true)]
    pub expiration_seconds: i32,

    /// IP address of the client that created the secret
    #[arg(long = "client-ip", default_value = "")]
    pub client_ip: String,

    /// Secret identifier
    #[arg(long = "secret-id")]
    pub secret_id: String,
}

impl From<SendArgs> for WebhookPayload {
    fn from(args: SendArgs) -> Self {
        Self {
            one_time_link: args.one_time_link,
            delivery_manager: args.delivery_manager,
            timestamp: args.timestamp,
            expiration_seconds: args.expiration_seconds,
            client_ip: args.client_ip,
            secret_id: args.secret_id,
        }
    }
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

    /// Parses CLI arguments from an iterator, returning clap's error instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags or missing required values.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
