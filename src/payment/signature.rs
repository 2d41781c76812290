// src/payment/signature.rs

//! HMAC-SHA256 verification of gateway payment callbacks.
//!
//! Razorpay signs `"<order_id>|<payment_id>"` with the key secret and sends
//! the hex digest alongside the payment. The server recomputes the digest
//! and compares in constant time; nothing from the client is trusted.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 digest of `message` under `secret`.
pub fn hmac_sha256_hex(secret: &[u8], message: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// The signature the gateway should have produced for this order/payment
/// pair.
pub fn expected_signature(order_id: &str, payment_id: &str, key_secret: &str) -> String {
    let message = format!("{}|{}", order_id, payment_id);
    hmac_sha256_hex(key_secret.as_bytes(), message.as_bytes())
}

/// Constant-time check of a supplied signature against the recomputed one.
/// Malformed hex fails closed.
pub fn verify_signature(
    order_id: &str,
    payment_id: &str,
    supplied_signature: &str,
    key_secret: &str,
) -> bool {
    let supplied = match hex::decode(supplied_signature.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(key_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&supplied).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?".
    #[test]
    fn matches_published_hmac_sha256_vector() {
        let digest = hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            digest,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn accepts_a_correctly_signed_payment() {
        let signature = expected_signature("order_abc123", "pay_xyz789", "test_secret");
        assert!(verify_signature(
            "order_abc123",
            "pay_xyz789",
            &signature,
            "test_secret"
        ));
    }

    #[test]
    fn rejects_a_single_flipped_hex_digit() {
        let mut signature = expected_signature("order_abc123", "pay_xyz789", "test_secret");
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });

        assert!(!verify_signature(
            "order_abc123",
            "pay_xyz789",
            &signature,
            "test_secret"
        ));
    }

    #[test]
    fn rejects_a_signature_made_with_the_wrong_secret() {
        let signature = expected_signature("order_abc123", "pay_xyz789", "other_secret");
        assert!(!verify_signature(
            "order_abc123",
            "pay_xyz789",
            &signature,
            "test_secret"
        ));
    }

    #[test]
    fn rejects_signatures_bound_to_a_different_order() {
        let signature = expected_signature("order_abc123", "pay_xyz789", "test_secret");
        assert!(!verify_signature(
            "order_other",
            "pay_xyz789",
            &signature,
            "test_secret"
        ));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(!verify_signature(
            "order_abc123",
            "pay_xyz789",
            "not-hex-at-all",
            "test_secret"
        ));
        assert!(!verify_signature("order_abc123", "pay_xyz789", "", "test_secret"));
    }
}
