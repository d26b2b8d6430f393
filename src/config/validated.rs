//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::client::Credentials;
use crate::outbound::MediaOptions;
use crate::webhook::WebhookConfig;

use super::cli::{Cli, Command};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// What the binary does once configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Serve the webhook until interrupted
    Serve,
    /// Send one text message
    SendText {
        /// Recipient
        to: String,
        /// Message text
        body: String,
        /// Render URL previews
        preview_url: bool,
    },
    /// Send one media message
    SendMedia {
        /// Recipient
        to: String,
        /// Link or file, caption and file name
        options: MediaOptions,
    },
}

impl Action {
    /// Returns the subcommand name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Serve => "serve",
            Self::SendText { .. } => "send-text",
            Self::SendMedia { .. } => "send-media",
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Account credentials (required)
    pub credentials: Credentials,

    /// Graph API base URL
    pub api_base: Url,

    /// Per-request timeout
    pub timeout: Duration,

    /// Webhook settings; present when a verify token is configured
    pub webhook: Option<WebhookConfig>,

    /// What to do
    pub action: Action,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let webhook_str = self.webhook.as_ref().map_or_else(
            || "disabled".to_string(),
            |webhook| {
                format!(
                    "port {}, signed: {}",
                    webhook.port,
                    webhook.app_secret.is_some()
                )
            },
        );

        write!(
            f,
            "Config {{ action: {}, account_id: {}, api_base: {}, timeout: {}s, webhook: {} }}",
            self.action.name(),
            self.credentials.account_id,
            self.api_base,
            self.timeout.as_secs(),
            webhook_str,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. Empty strings
    /// count as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No runnable subcommand was given
    /// - Required fields are missing (`account_id`, `access_token`, and
    ///   `verify_token` for `serve`)
    /// - The API base URL is invalid
    /// - The timeout is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let action = Self::resolve_action(cli)?;
        let credentials = Self::resolve_credentials(cli, toml)?;
        let api_base = Self::resolve_api_base(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let webhook = Self::resolve_webhook(cli, toml);

        if action == Action::Serve && webhook.is_none() {
            return Err(ConfigError::missing(
                field::VERIFY_TOKEN,
                "Use --verify-token or set webhook.verify_token in config file",
            ));
        }

        Ok(Self {
            credentials,
            api_base,
            timeout,
            webhook,
            action,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_action(cli: &Cli) -> Result<Action, ConfigError> {
        match &cli.command {
            Some(Command::Serve { .. }) => Ok(Action::Serve),
            Some(Command::SendText {
                to,
                body,
                no_preview,
            }) => Ok(Action::SendText {
                to: to.clone(),
                body: body.clone(),
                preview_url: !no_preview,
            }),
            Some(Command::SendMedia {
                to,
                link,
                file,
                caption,
                filename,
            }) => Ok(Action::SendMedia {
                to: to.clone(),
                options: MediaOptions {
                    external_link: link.clone(),
                    local_path: file.clone(),
                    caption: caption.clone(),
                    filename: filename.clone(),
                },
            }),
            Some(Command::Init { .. }) | None => Err(ConfigError::missing(
                field::COMMAND,
                "Use one of: serve, send-text, send-media (see --help)",
            )),
        }
    }

    fn resolve_credentials(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Credentials, ConfigError> {
        // CLI takes precedence
        let account_id = non_empty(cli.account_id.as_deref())
            .or_else(|| non_empty(toml.and_then(|t| t.account.account_id.as_deref())))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::ACCOUNT_ID,
                    "Use --account-id or set account.account_id in config file",
                )
            })?;

        let access_token = non_empty(cli.access_token.as_deref())
            .or_else(|| non_empty(toml.and_then(|t| t.account.access_token.as_deref())))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::ACCESS_TOKEN,
                    "Use --access-token or set account.access_token in config file",
                )
            })?;

        Ok(Credentials::new(account_id, access_token))
    }

    fn resolve_api_base(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let url_str = non_empty(cli.api_base.as_deref())
            .or_else(|| non_empty(toml.and_then(|t| t.api.base_url.as_deref())))
            .unwrap_or(defaults::API_BASE);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.api.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_webhook(cli: &Cli, toml: Option<&TomlConfig>) -> Option<WebhookConfig> {
        let (cli_port, cli_secret, cli_token) = match &cli.command {
            Some(Command::Serve {
                port,
                app_secret,
                verify_token,
            }) => (*port, app_secret.as_deref(), verify_token.as_deref()),
            _ => (None, None, None),
        };
        let section = toml.map(|t| &t.webhook);

        let verify_token = non_empty(cli_token)
            .or_else(|| non_empty(section.and_then(|s| s.verify_token.as_deref())))?;

        let app_secret = non_empty(cli_secret)
            .or_else(|| non_empty(section.and_then(|s| s.app_secret.as_deref())));

        let port = cli_port
            .or_else(|| section.and_then(|s| s.port))
            .unwrap_or(defaults::PORT);

        let config = WebhookConfig::new(verify_token).with_port(port);
        Some(match app_secret {
            Some(secret) => config.with_app_secret(secret),
            None => config,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
