//! Account credentials.

use std::fmt;

/// Business account ID and access token used for every outbound call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Phone number ID the messages are sent from
    pub account_id: String,
    /// Bearer token
    pub access_token: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(account_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
