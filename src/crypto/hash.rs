//! One-way passphrase fingerprint for local equality checks.
//!
//! This is a plain SHA-256 digest. It is never used to derive keys.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// SHA-256 of the UTF-8 passphrase, base64-encoded.
pub fn hash_passphrase(passphrase: &str) -> String {
    let digest = Sha256::digest(passphrase.as_bytes());
    STANDARD.encode(digest)
}

/// Check a passphrase against a stored [`hash_passphrase`] value.
///
/// The comparison runs in constant time over the encoded digest.
pub fn verify_passphrase(passphrase: &str, expected_hash: &str) -> bool {
    hash_passphrase(passphrase)
        .as_bytes()
        .ct_eq(expected_hash.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash_passphrase("x"), hash_passphrase("x"));
    }

    #[test]
    fn test_hash_discriminates() {
        assert_ne!(hash_passphrase("x"), hash_passphrase("y"));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            hash_passphrase("abc"),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_verify() {
        let stored = hash_passphrase("correct horse");
        assert!(verify_passphrase("correct horse", &stored));
        assert!(!verify_passphrase("correct horse ", &stored));
    }

    #[test]
    fn test_verify_rejects_truncated_and_empty_hashes() {
        let stored = hash_passphrase("correct horse");
        assert!(!verify_passphrase("correct horse", &stored[..stored.len() - 1]));
        assert!(!verify_passphrase("correct horse", ""));
        assert!(!verify_passphrase("", ""));
    }
}
