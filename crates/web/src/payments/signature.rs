//! Gateway signature verification.
//!
//! Razorpay signs two things we must check:
//!
//! - the checkout callback: `HMAC-SHA256(order_id + "|" + payment_id, key_secret)`
//! - webhooks: `HMAC-SHA256(raw request body, webhook_secret)`
//!
//! Both arrive hex-encoded. Verification goes through `Mac::verify_slice`,
//! which compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify a checkout callback signature.
///
/// The signed message is `"{gateway_order_id}|{gateway_payment_id}"`.
/// Returns `false` for malformed hex, wrong length, or mismatch - the
/// caller treats all of those identically as a failed payment.
#[must_use]
pub fn verify_checkout_signature(
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature_hex: &str,
    key_secret: &str,
) -> bool {
    let message = format!("{gateway_order_id}|{gateway_payment_id}");
    verify_hmac_hex(message.as_bytes(), signature_hex, key_secret)
}

/// Verify a webhook signature over the raw request body.
///
/// Must run before the body is parsed; an unverified body is untrusted
/// input from anyone on the internet.
#[must_use]
pub fn verify_webhook_signature(body: &[u8], signature_hex: &str, webhook_secret: &str) -> bool {
    verify_hmac_hex(body, signature_hex, webhook_secret)
}

fn verify_hmac_hex(message: &[u8], signature_hex: &str, secret: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(message);

    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY_SECRET: &str = "t1uV5bN8pL2jR6wD";

    fn sign(message: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_checkout_signature_accepted() {
        let sig = sign("order_abc|pay_def", KEY_SECRET);
        assert!(verify_checkout_signature(
            "order_abc", "pay_def", &sig, KEY_SECRET
        ));
    }

    #[test]
    fn test_tampered_payment_id_rejected() {
        let sig = sign("order_abc|pay_def", KEY_SECRET);
        assert!(!verify_checkout_signature(
            "order_abc",
            "pay_attacker",
            &sig,
            KEY_SECRET
        ));
    }

    #[test]
    fn test_tampered_order_id_rejected() {
        let sig = sign("order_abc|pay_def", KEY_SECRET);
        assert!(!verify_checkout_signature(
            "order_xyz", "pay_def", &sig, KEY_SECRET
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign("order_abc|pay_def", "some-other-secret-value");
        assert!(!verify_checkout_signature(
            "order_abc", "pay_def", &sig, KEY_SECRET
        ));
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let sig = sign("order_abc|pay_def", KEY_SECRET);
        let truncated = &sig[..sig.len() - 2];
        assert!(!verify_checkout_signature(
            "order_abc", "pay_def", truncated, KEY_SECRET
        ));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        assert!(!verify_checkout_signature(
            "order_abc",
            "pay_def",
            "not-hex-at-all!",
            KEY_SECRET
        ));
    }

    #[test]
    fn test_webhook_signature_over_raw_body() {
        let body = br#"{"event":"payment.captured"}"#;
        let sig = sign(r#"{"event":"payment.captured"}"#, "whsec_9rS4eBh7kC");
        assert!(verify_webhook_signature(body, &sig, "whsec_9rS4eBh7kC"));

        // A single byte of difference must fail.
        let tampered = br#"{"event":"payment.refunded"}"#;
        assert!(!verify_webhook_signature(tampered, &sig, "whsec_9rS4eBh7kC"));
    }
}
