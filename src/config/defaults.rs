//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default Graph API base URL.
pub const API_BASE: &str = crate::client::DEFAULT_API_BASE;

/// Default per-request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default webhook listen port.
pub const PORT: u16 = crate::webhook::DEFAULT_PORT;

/// Default output path of `init`.
pub const CONFIG_FILE: &str = "whatsapp-api.toml";

/// Default per-request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
