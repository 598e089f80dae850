//! Argon2id key derivation from a passphrase and a stored salt.

use crate::config::{KdfParams, KEY_LENGTH, SALT_LENGTH};
use crate::error::{Error, Result};
use aes_gcm::{Aes256Gcm, KeyInit};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use std::fmt;
use tracing::debug;
use zeroize::Zeroize;

/// Symmetric AES-256-GCM key derived from a passphrase.
///
/// The raw bytes never leave the crate: there is no accessor, no
/// serialization, and `Debug` is redacted. The material is wiped on drop.
pub struct DerivedKey {
    bytes: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Build the AES-GCM cipher for one operation.
    pub(crate) fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new((&self.bytes).into())
    }

    fn wipe(&mut self) {
        self.bytes.zeroize();
    }

    /// Generate a random key, not tied to any passphrase.
    #[cfg(test)]
    pub(crate) fn random() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Generate a fresh base64-encoded salt from the OS-seeded CSPRNG.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    STANDARD.encode(salt)
}

/// Decode a base64 salt, requiring exactly `SALT_LENGTH` bytes.
pub fn decode_salt(salt: &str) -> Result<[u8; SALT_LENGTH]> {
    let raw = STANDARD.decode(salt.trim())?;
    raw.as_slice()
        .try_into()
        .map_err(|_| Error::InvalidSalt {
            expected: SALT_LENGTH,
            got: raw.len(),
        })
}

/// Derive the session key with the production parameters.
///
/// Uses Argon2id with the following parameters:
/// - Memory: 64 MiB
/// - Iterations: 3
/// - Parallelism: 1
pub fn derive_key(passphrase: &str, salt: &str) -> Result<DerivedKey> {
    derive_key_with_params(passphrase, salt, &KdfParams::default())
}

/// Derive a key with explicit parameters.
///
/// Deterministic: the same passphrase, salt and parameters always give
/// the same key material. Allocation failures inside Argon2 surface as
/// `Error::KeyDerivation`.
pub fn derive_key_with_params(
    passphrase: &str,
    salt: &str,
    params: &KdfParams,
) -> Result<DerivedKey> {
    params.validate()?;
    let salt = decode_salt(salt)?;

    let argon_params = Params::new(
        params.memory_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(params.output_len),
    )
    .map_err(|e| Error::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    debug!(
        memory_kib = params.memory_cost_kib,
        time_cost = params.time_cost,
        "deriving key"
    );

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt, &mut key)
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;

    let derived = DerivedKey::from_bytes(key);
    key.zeroize();
    Ok(derived)
}
