//! Webhook signature verification.
//!
//! LINE signs every webhook delivery: `x-line-signature` carries the
//! base64-encoded HMAC-SHA256 of the raw request body keyed by the channel
//! secret.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the expected signature for a body (base64 HMAC-SHA256).
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(channel_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify the x-line-signature header value against the raw body.
/// Comparison is constant-time via the hmac crate.
pub fn verify(channel_secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(provided) = base64::engine::general_purpose::STANDARD.decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(channel_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}
