//! Webhook signature verification.
//!
//! The platform signs every delivery with HMAC-SHA1 keyed by the app secret
//! and sends the result in the `x-hub-signature` header as `sha1=<hex>`.
//! The signature covers the raw request body bytes, not the parsed JSON.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha1=";

/// Key used when no app secret is configured.
///
/// Verification still runs against this key, so unsigned deployments reject
/// every delivery that was signed with a real secret.
const SENTINEL_SECRET: &str = "N/A";

fn effective_secret(secret: Option<&str>) -> &str {
    secret
        .filter(|secret| !secret.is_empty())
        .unwrap_or(SENTINEL_SECRET)
}

/// Computes the full `x-hub-signature` header value for a body.
///
/// # Errors
///
/// Returns [`InvalidLength`] if the HMAC key is rejected. HMAC accepts keys of
/// any length, so this does not happen in practice.
pub fn sign(raw_body: &[u8], secret: Option<&str>) -> Result<String, InvalidLength> {
    let mut mac = HmacSha1::new_from_slice(effective_secret(secret).as_bytes())?;
    mac.update(raw_body);
    let digest = mac.finalize().into_bytes();
    Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode(digest)))
}

/// Verifies a delivery signature.
///
/// Returns `true` only if `header_signature` is exactly `sha1=` followed by the
/// lowercase hex HMAC-SHA1 of `raw_body`. An absent or empty `secret` falls back
/// to a sentinel key; verification is never skipped.
#[must_use]
pub fn verify(raw_body: &[u8], header_signature: &str, secret: Option<&str>) -> bool {
    let expected = match sign(raw_body, secret) {
        Ok(expected) => expected,
        Err(e) => {
            tracing::error!("Failed to create HMAC instance: {e}");
            return false;
        }
    };

    let is_valid: bool = header_signature
        .as_bytes()
        .ct_eq(expected.as_bytes())
        .into();

    if !is_valid {
        tracing::warn!("Webhook signature verification failed");
    }

    is_valid
}
