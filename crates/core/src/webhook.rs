//! Webhook signature verification.
//!
//! Aperture signs each webhook delivery with HMAC-SHA256 over
//! `"{timestamp}.{body}"` using the endpoint's signing secret, and sends the
//! hex signature and unix timestamp in the `X-Aperture-Signature` and
//! `X-Aperture-Timestamp` headers. [`verify_signature`] takes the local
//! clock as a parameter so skew handling can be tested without real time;
//! [`verify_signature_now`] is the production entry point.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Maximum allowed skew between the signed timestamp and the local clock.
pub const MAX_TIMESTAMP_SKEW_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a webhook delivery failed verification.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    /// The signature header is not a valid hex string.
    #[error("Signature is not valid hex: {0}")]
    MalformedSignature(String),

    /// The signature does not match the payload and timestamp.
    #[error("Signature does not match payload")]
    SignatureMismatch,

    /// The signed timestamp is too far from the local clock.
    #[error("Timestamp {timestamp} is outside the allowed skew window")]
    StaleTimestamp { timestamp: i64 },
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Compute the hex HMAC-SHA256 signature for a payload.
///
/// Exposed so tests and local tooling can produce valid deliveries.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    hex::encode(signature_bytes(secret, timestamp, payload))
}

fn signature_bytes(secret: &str, timestamp: i64, payload: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a webhook delivery against an explicit local clock reading.
///
/// Checks the timestamp skew first, then the signature in constant time.
pub fn verify_signature(
    secret: &str,
    timestamp: i64,
    payload: &str,
    signature: &str,
    now: i64,
) -> Result<(), WebhookError> {
    if (now - timestamp).abs() > MAX_TIMESTAMP_SKEW_SECS {
        return Err(WebhookError::StaleTimestamp { timestamp });
    }

    let claimed = hex::decode(signature)
        .map_err(|_| WebhookError::MalformedSignature(signature.to_string()))?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.verify_slice(&claimed)
        .map_err(|_| WebhookError::SignatureMismatch)
}

/// Verify a webhook delivery against the system clock.
pub fn verify_signature_now(
    secret: &str,
    timestamp: i64,
    payload: &str,
    signature: &str,
) -> Result<(), WebhookError> {
    verify_signature(
        secret,
        timestamp,
        payload,
        signature,
        chrono::Utc::now().timestamp(),
    )
}

// ---------------------------------------------------------------------------
// hex helpers (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string into bytes.
    pub fn decode(s: &str) -> Result<Vec<u8>, ()> {
        if !s.is_ascii() || s.len() % 2 != 0 {
            return Err(());
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &str = r#"{"event":"task.completed","task_id":"task-1"}"#;
    const NOW: i64 = 1_772_000_000;

    fn signed() -> String {
        compute_signature(SECRET, NOW, PAYLOAD)
    }

    // -- signing --

    #[test]
    fn signature_is_hex_sha256_length() {
        let sig = signed();
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_is_deterministic() {
        assert_eq!(signed(), signed());
    }

    #[test]
    fn signature_depends_on_all_inputs() {
        let base = signed();
        assert_ne!(base, compute_signature("other_secret", NOW, PAYLOAD));
        assert_ne!(base, compute_signature(SECRET, NOW + 1, PAYLOAD));
        assert_ne!(base, compute_signature(SECRET, NOW, "{}"));
    }

    // -- verification --

    #[test]
    fn valid_signature_verifies() {
        assert!(verify_signature(SECRET, NOW, PAYLOAD, &signed(), NOW).is_ok());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let err = verify_signature(SECRET, NOW, "{}", &signed(), NOW).unwrap_err();
        assert_eq!(err, WebhookError::SignatureMismatch);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let err = verify_signature("whsec_other", NOW, PAYLOAD, &signed(), NOW).unwrap_err();
        assert_eq!(err, WebhookError::SignatureMismatch);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        for bad in ["zz", "abc", "not hex at all", "ábc0"] {
            let err = verify_signature(SECRET, NOW, PAYLOAD, bad, NOW).unwrap_err();
            assert!(matches!(err, WebhookError::MalformedSignature(_)), "{bad}");
        }
    }

    // -- skew --

    #[test]
    fn skew_at_tolerance_is_accepted() {
        let sig = signed();
        assert!(verify_signature(SECRET, NOW, PAYLOAD, &sig, NOW + MAX_TIMESTAMP_SKEW_SECS).is_ok());
        assert!(verify_signature(SECRET, NOW, PAYLOAD, &sig, NOW - MAX_TIMESTAMP_SKEW_SECS).is_ok());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let err =
            verify_signature(SECRET, NOW, PAYLOAD, &signed(), NOW + MAX_TIMESTAMP_SKEW_SECS + 1)
                .unwrap_err();
        assert_eq!(err, WebhookError::StaleTimestamp { timestamp: NOW });
    }

    #[test]
    fn future_timestamp_is_rejected() {
        // A delivery "from the future" beyond tolerance is as suspect as a
        // stale one.
        let err =
            verify_signature(SECRET, NOW, PAYLOAD, &signed(), NOW - MAX_TIMESTAMP_SKEW_SECS - 1)
                .unwrap_err();
        assert_eq!(err, WebhookError::StaleTimestamp { timestamp: NOW });
    }

    // -- hex helpers --

    #[test]
    fn hex_round_trips() {
        let bytes = vec![0x00, 0x7f, 0xff, 0x10];
        assert_eq!(hex::decode(&hex::encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn hex_decode_rejects_odd_length() {
        assert!(hex::decode("abc").is_err());
    }
}
