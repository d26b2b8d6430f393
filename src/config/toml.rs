//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Account credentials section
    #[serde(default)]
    pub account: AccountSection,

    /// Graph API section
    #[serde(default)]
    pub api: ApiSection,

    /// Inbound webhook section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// Account credentials section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountSection {
    /// Phone number ID messages are sent from
    pub account_id: Option<String>,

    /// Graph API access token
    pub access_token: Option<String>,
}

/// Graph API section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// API base URL
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
}

/// Inbound webhook section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// App secret for delivery signatures
    pub app_secret: Option<String>,

    /// Token expected in the subscription handshake
    pub verify_token: Option<String>,

    /// Listen port
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# whatsapp-api configuration file

[account]
# Phone number ID messages are sent from (required)
# account_id = "123456789012345"

# Graph API access token (required)
# access_token = "EAAG..."

[api]
# API base URL (default: https://graph.facebook.com/v13.0)
# base_url = "https://graph.facebook.com/v13.0"

# Per-request timeout in seconds (default: 30)
timeout = 30

[webhook]
# Token expected in the subscription handshake (required for `serve`)
# verify_token = "choose-a-token"

# App secret used to verify the x-hub-signature header.
# Without it, deliveries are checked against a fixed placeholder key.
# app_secret = "your-app-secret"

# Listen port (default: 1337); routes are served under /whatsapp/webhook
port = 1337
"#
    .to_string()
}
