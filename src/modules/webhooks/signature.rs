//! Shared-secret signature verification for webhook deliveries.
//!
//! Both upstream services sign the raw request body with HMAC-SHA256 but
//! encode the result differently: the payment processor sends a
//! `t=<unix>,v1=<hex>` header signed over `"{t}.{body}"`, the auth
//! provider sends Svix-style headers with base64 signatures over
//! `"{id}.{timestamp}.{body}"` and a `whsec_`-prefixed base64 secret.
//!
//! Comparison goes through `Mac::verify_slice`, which is constant-time.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    Malformed(&'static str),
    Mismatch,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::Malformed(what) => write!(f, "Malformed webhook signature: {what}"),
            SignatureError::Mismatch => f.write_str("Webhook signature does not verify"),
        }
    }
}

impl std::error::Error for SignatureError {}

fn mac_for(key: &[u8]) -> Result<HmacSha256, SignatureError> {
    HmacSha256::new_from_slice(key).map_err(|_| SignatureError::Malformed("secret"))
}

/// Verify a payment-processor delivery: `header` is the
/// `Stripe-Signature` value, the signed content is `"{t}.{payload}"`.
/// Several `v1` entries may be present during secret rotation; any one
/// verifying is enough.
pub fn verify_payment_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut candidates = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            return Err(SignatureError::Malformed("signature header"));
        };
        match key {
            "t" => timestamp = Some(value),
            "v1" => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed("missing timestamp"))?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed("missing v1 signature"));
    }

    for candidate in candidates {
        let Ok(expected) = hex::decode(candidate) else {
            continue;
        };
        let mut mac = mac_for(secret.as_bytes())?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// Verify an auth-provider delivery: `signatures` is the
/// `svix-signature` value, a space-separated list of `v1,<base64>`
/// entries; the signed content is `"{id}.{timestamp}.{payload}"`.
pub fn verify_provider_signature(
    secret: &str,
    message_id: &str,
    timestamp: &str,
    signatures: &str,
    payload: &[u8],
) -> Result<(), SignatureError> {
    let encoded_key = secret.strip_prefix("whsec_").unwrap_or(secret);
    let key = BASE64
        .decode(encoded_key)
        .map_err(|_| SignatureError::Malformed("secret is not base64"))?;

    let mut saw_candidate = false;
    for entry in signatures.split_whitespace() {
        let Some((version, signature)) = entry.split_once(',') else {
            continue;
        };
        if version != "v1" {
            continue;
        }
        saw_candidate = true;
        let Ok(expected) = BASE64.decode(signature) else {
            continue;
        };
        let mut mac = mac_for(&key)?;
        mac.update(message_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    if saw_candidate {
        Err(SignatureError::Mismatch)
    } else {
        Err(SignatureError::Malformed("missing v1 signature"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment_header(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn provider_signature(key: &[u8], id: &str, timestamp: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(key).unwrap();
        mac.update(format!("{id}.{timestamp}.").as_bytes());
        mac.update(payload);
        format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn payment_signature_verifies() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let header = payment_header("whsec_test", "1700000000", payload);
        assert_eq!(
            verify_payment_signature("whsec_test", payload, &header),
            Ok(())
        );
    }

    #[test]
    fn payment_signature_rejects_tampered_payload() {
        let payload = br#"{"amount":100}"#;
        let header = payment_header("whsec_test", "1700000000", payload);
        assert_eq!(
            verify_payment_signature("whsec_test", br#"{"amount":999}"#, &header),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn payment_signature_rejects_wrong_secret() {
        let payload = b"body";
        let header = payment_header("right-secret", "1700000000", payload);
        assert_eq!(
            verify_payment_signature("wrong-secret", payload, &header),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn payment_signature_accepts_any_rotation_candidate() {
        let payload = b"body";
        let good = payment_header("secret", "1700000000", payload);
        let v1 = good.split("v1=").nth(1).unwrap();
        let header = format!("t=1700000000,v1={},v1={v1}", hex::encode([0u8; 32]));
        assert_eq!(verify_payment_signature("secret", payload, &header), Ok(()));
    }

    #[test]
    fn payment_signature_rejects_malformed_header() {
        assert_eq!(
            verify_payment_signature("secret", b"body", "no-equals-signs"),
            Err(SignatureError::Malformed("signature header"))
        );
        assert_eq!(
            verify_payment_signature("secret", b"body", "v1=abcd"),
            Err(SignatureError::Malformed("missing timestamp"))
        );
        assert_eq!(
            verify_payment_signature("secret", b"body", "t=1700000000"),
            Err(SignatureError::Malformed("missing v1 signature"))
        );
    }

    #[test]
    fn provider_signature_verifies() {
        let key = b"raw-webhook-key";
        let secret = format!("whsec_{}", BASE64.encode(key));
        let payload = br#"{"type":"user.created"}"#;
        let signature = provider_signature(key, "msg_1", "1700000000", payload);

        assert_eq!(
            verify_provider_signature(&secret, "msg_1", "1700000000", &signature, payload),
            Ok(())
        );
    }

    #[test]
    fn provider_signature_rejects_wrong_message_id() {
        let key = b"raw-webhook-key";
        let secret = format!("whsec_{}", BASE64.encode(key));
        let payload = b"body";
        let signature = provider_signature(key, "msg_1", "1700000000", payload);

        assert_eq!(
            verify_provider_signature(&secret, "msg_2", "1700000000", &signature, payload),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn provider_signature_skips_unknown_versions() {
        let key = b"raw-webhook-key";
        let secret = format!("whsec_{}", BASE64.encode(key));
        let payload = b"body";
        let good = provider_signature(key, "msg_1", "1700000000", payload);
        let header = format!("v2,AAAA {good}");

        assert_eq!(
            verify_provider_signature(&secret, "msg_1", "1700000000", &header, payload),
            Ok(())
        );
    }

    #[test]
    fn provider_signature_requires_base64_secret() {
        assert_eq!(
            verify_provider_signature("whsec_!!!", "msg_1", "t", "v1,AAAA", b"body"),
            Err(SignatureError::Malformed("secret is not base64"))
        );
    }
}
