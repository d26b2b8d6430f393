//! Webhook settings.

use std::fmt;

/// Port the built-in server listens on when none is configured.
pub const DEFAULT_PORT: u16 = 1337;

/// Settings for the inbound webhook path.
///
/// Read-only after construction; shared by every request handler.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// App secret used to verify delivery signatures.
    ///
    /// When absent, verification runs against a fixed sentinel key.
    pub app_secret: Option<String>,
    /// Token the platform echoes during the subscription handshake
    pub verify_token: String,
    /// Listen port for [`serve`](super::serve)
    pub port: u16,
}

impl WebhookConfig {
    /// Creates a config with the given verify token, no app secret and the
    /// default port.
    #[must_use]
    pub fn new(verify_token: impl Into<String>) -> Self {
        Self {
            app_secret: None,
            verify_token: verify_token.into(),
            port: DEFAULT_PORT,
        }
    }

    /// Sets the app secret.
    #[must_use]
    pub fn with_app_secret(mut self, secret: impl Into<String>) -> Self {
        self.app_secret = Some(secret.into());
        self
    }

    /// Sets the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("verify_token", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}
