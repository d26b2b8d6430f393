//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// WhatsApp Cloud API client
///
/// Serves the inbound webhook and sends text and media messages.
#[derive(Debug, Parser)]
#[command(name = "whatsapp-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Phone number ID messages are sent from
    #[arg(long = "account-id", global = true)]
    pub account_id: Option<String>,

    /// Graph API access token
    #[arg(long = "access-token", global = true)]
    pub access_token: Option<String>,

    /// Graph API base URL
    #[arg(long = "api-base", global = true)]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for whatsapp-api
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Serve the webhook and log inbound text messages
    Serve {
        /// Listen port
        #[arg(long)]
        port: Option<u16>,

        /// App secret for delivery signatures
        #[arg(long = "app-secret")]
        app_secret: Option<String>,

        /// Token expected in the subscription handshake
        #[arg(long = "verify-token")]
        verify_token: Option<String>,
    },

    /// Send a text message
    SendText {
        /// Recipient phone number, with country code
        #[arg(long)]
        to: String,

        /// Message text
        #[arg(long)]
        body: String,

        /// Do not render a preview for URLs in the body
        #[arg(long = "no-preview")]
        no_preview: bool,
    },

    /// Send an image, document, audio, video or sticker
    SendMedia {
        /// Recipient phone number, with country code
        #[arg(long)]
        to: String,

        /// Public URL of the media
        #[arg(long)]
        link: Option<String>,

        /// Local file to upload
        #[arg(long)]
        file: Option<PathBuf>,

        /// Media caption
        #[arg(long)]
        caption: Option<String>,

        /// File name shown to the recipient (documents only)
        #[arg(long)]
        filename: Option<String>,
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
