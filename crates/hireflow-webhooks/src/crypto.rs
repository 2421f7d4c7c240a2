//! Cryptographic operations for webhook payload signing.
//!
//! - HMAC-SHA256 computation over `{timestamp}.{body}` for delivery signatures
//! - Signing-secret generation

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Version prefix carried by every signature string.
const SIGNATURE_VERSION: &str = "v1";

/// Prefix identifying a webhook signing secret.
const SECRET_PREFIX: &str = "whsec_";

/// Number of random bytes in a generated signing secret.
const SECRET_BYTES: usize = 24;

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Payload signing
// ---------------------------------------------------------------------------

/// Compute the signature for a webhook delivery.
///
/// The HMAC covers `{timestamp}.{body}` to prevent replay attacks. The
/// timestamp is Unix epoch seconds as a decimal string; the body is the
/// exact bytes sent on the wire. Returns `v1={hex}`.
pub fn sign_payload(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");

    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);

    format!(
        "{SIGNATURE_VERSION}={}",
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Verify a signature string using constant-time comparison.
///
/// Returns true if `signature` matches the one recomputed from `secret`,
/// `timestamp`, and `body`.
pub fn verify_signature(signature: &str, secret: &str, timestamp: &str, body: &[u8]) -> bool {
    let computed = sign_payload(secret, timestamp, body);
    constant_time_eq(signature.as_bytes(), computed.as_bytes())
}

/// Byte comparison that does not leak where the first mismatch sits.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

// ---------------------------------------------------------------------------
// Secret generation
// ---------------------------------------------------------------------------

/// Generate a fresh signing secret from the operating system's CSPRNG.
///
/// Format: `whsec_` followed by 48 hex characters.
pub fn generate_secret() -> String {
    use rand::rngs::OsRng;
    use rand::RngCore;

    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("{SECRET_PREFIX}{}", hex::encode(bytes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
