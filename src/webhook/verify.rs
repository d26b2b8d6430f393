//! Subscription verification handshake.

use serde::Deserialize;

/// `hub.mode` value the platform sends when subscribing a webhook.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Query parameters of the verification GET request.
///
/// All fields are optional so that malformed handshakes still reach
/// [`verify_subscription`] instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerifyQuery {
    /// Should be `subscribe`
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// Token configured in the platform dashboard
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// Value to echo back on success
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Result of a verification handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Mode is `subscribe` and the token matches; respond 200 with the challenge.
    Accepted(String),
    /// Mode and token were given but do not match; respond 403.
    Rejected,
    /// Mode or token is missing or empty.
    Incomplete,
}

/// Checks a verification request against the configured token.
#[must_use]
pub fn verify_subscription(query: &VerifyQuery, expected_token: &str) -> VerifyOutcome {
    let mode = query.mode.as_deref().filter(|mode| !mode.is_empty());
    let token = query.verify_token.as_deref().filter(|token| !token.is_empty());

    let (Some(mode), Some(token)) = (mode, token) else {
        return VerifyOutcome::Incomplete;
    };

    if mode == SUBSCRIBE_MODE && token == expected_token {
        VerifyOutcome::Accepted(query.challenge.clone().unwrap_or_default())
    } else {
        VerifyOutcome::Rejected
    }
}
