//! Single-Use Secret Factory
//!
//! Issues and verifies purpose-bound, time-limited secrets without any
//! server-side storage. A secret is an HMAC-SHA256 over
//! (purpose, subject, stamp, expiry); binding the caller-supplied stamp
//! means every outstanding secret for a subject is invalidated the moment
//! the stamp rotates.
//!
//! Secret format: `{expires_ms}.{base64url(mac)}`

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::crypto::{constant_time_eq, from_base64url, hmac_sha256, to_base64url};

/// Stateless factory for single-use secrets
#[derive(Clone)]
pub struct SingleUseSecrets {
    key: [u8; 32],
    ttl: Duration,
}

impl SingleUseSecrets {
    /// Create a factory with a signing key and validity window
    pub fn new(key: [u8; 32], ttl: Duration) -> Self {
        Self { key, ttl }
    }

    /// Issue a secret bound to (purpose, subject, stamp), valid for the
    /// configured window
    pub fn issue(&self, purpose: &str, subject: &str, stamp: &str) -> String {
        let expires_ms = now_ms() + self.ttl.as_millis() as u64;
        let mac = self.mac(purpose, subject, stamp, expires_ms);
        format!("{}.{}", expires_ms, to_base64url(&mac))
    }

    /// Verify a secret against (purpose, subject, stamp)
    ///
    /// Returns false for expired, tampered, or malformed input.
    pub fn verify(&self, purpose: &str, subject: &str, stamp: &str, secret: &str) -> bool {
        let Some((expires_str, mac_b64)) = secret.split_once('.') else {
            return false;
        };

        let Ok(expires_ms) = expires_str.parse::<u64>() else {
            return false;
        };

        if now_ms() >= expires_ms {
            return false;
        }

        let Ok(presented_mac) = from_base64url(mac_b64) else {
            return false;
        };

        let expected_mac = self.mac(purpose, subject, stamp, expires_ms);
        constant_time_eq(&presented_mac, &expected_mac)
    }

    fn mac(&self, purpose: &str, subject: &str, stamp: &str, expires_ms: u64) -> [u8; 32] {
        let payload = format!("{}\n{}\n{}\n{}", purpose, subject, stamp, expires_ms);
        hmac_sha256(&self.key, payload.as_bytes())
    }
}

impl std::fmt::Debug for SingleUseSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleUseSecrets")
            .field("key", &"[KEY]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> SingleUseSecrets {
        SingleUseSecrets::new([7u8; 32], Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let f = factory();
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        assert!(f.verify("email-confirmation", "subject-1", "stamp-a", &secret));
    }

    #[test]
    fn test_wrong_purpose_rejected() {
        let f = factory();
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        assert!(!f.verify("password-reset", "subject-1", "stamp-a", &secret));
    }

    #[test]
    fn test_wrong_subject_rejected() {
        let f = factory();
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        assert!(!f.verify("email-confirmation", "subject-2", "stamp-a", &secret));
    }

    #[test]
    fn test_rotated_stamp_rejected() {
        let f = factory();
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        assert!(!f.verify("email-confirmation", "subject-1", "stamp-b", &secret));
    }

    #[test]
    fn test_expired_rejected() {
        let f = SingleUseSecrets::new([7u8; 32], Duration::ZERO);
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        assert!(!f.verify("email-confirmation", "subject-1", "stamp-a", &secret));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let f = factory();
        let other = SingleUseSecrets::new([8u8; 32], Duration::from_secs(3600));
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        assert!(!other.verify("email-confirmation", "subject-1", "stamp-a", &secret));
    }

    #[test]
    fn test_malformed_rejected() {
        let f = factory();
        assert!(!f.verify("email-confirmation", "subject-1", "stamp-a", ""));
        assert!(!f.verify("email-confirmation", "subject-1", "stamp-a", "no-dot"));
        assert!(!f.verify("email-confirmation", "subject-1", "stamp-a", "abc.def"));
        assert!(!f.verify(
            "email-confirmation",
            "subject-1",
            "stamp-a",
            "99999999999999.!!not-base64!!"
        ));
    }

    #[test]
    fn test_tampered_expiry_rejected() {
        let f = factory();
        let secret = f.issue("email-confirmation", "subject-1", "stamp-a");
        let (_, mac) = secret.split_once('.').unwrap();
        let forged = format!("{}.{}", u64::MAX, mac);
        assert!(!f.verify("email-confirmation", "subject-1", "stamp-a", &forged));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", factory());
        assert!(debug.contains("[KEY]"));
    }
}
