//! AES-256-GCM envelope encryption.

use crate::config::IV_LENGTH;
use crate::crypto::kdf::DerivedKey;
use crate::error::{Error, Result};
use aes_gcm::aead::Aead;
use aes_gcm::Nonce;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// One encrypted payload as persisted: base64 IV and base64 ciphertext.
///
/// The ciphertext carries the 16-byte GCM tag at its end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// Base64 of the 12-byte IV.
    pub iv: String,
    /// Base64 of ciphertext || tag.
    pub ciphertext: String,
}

/// Encrypt a UTF-8 string under a fresh random IV.
pub fn encrypt(plaintext: &str, key: &DerivedKey) -> Result<EncryptedBlob> {
    let mut iv = [0u8; IV_LENGTH];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = key
        .cipher()
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|e| Error::Encryption(e.to_string()))?;

    Ok(EncryptedBlob {
        iv: STANDARD.encode(iv),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// The IV length is checked before the cipher runs; a wrong length is
/// reported as `Error::InvalidIvLength`, any authentication failure as
/// `Error::Decryption`.
pub fn decrypt(blob: &EncryptedBlob, key: &DerivedKey) -> Result<String> {
    let iv = STANDARD.decode(&blob.iv)?;
    let ciphertext = STANDARD.decode(&blob.ciphertext)?;

    if iv.len() != IV_LENGTH {
        return Err(Error::InvalidIvLength {
            expected: IV_LENGTH,
            got: iv.len(),
        });
    }

    let plaintext = key
        .cipher()
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_slice())
        .map_err(|_| Error::Decryption)?;

    String::from_utf8(plaintext)
        .map_err(|_| Error::InvalidEnvelope("plaintext is not valid UTF-8".to_string()))
}
