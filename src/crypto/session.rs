//! Explicit holder for the session key.
//!
//! The application owns one `EncryptionSession` and passes it to whatever
//! needs to read or write encrypted fields.

use crate::config::KdfParams;
use crate::crypto::api::{decrypt_from_api, encrypt_for_api};
use crate::crypto::kdf::{derive_key_with_params, DerivedKey};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Session state: locked until a passphrase has been supplied.
#[derive(Debug, Default)]
pub struct EncryptionSession {
    key: Option<DerivedKey>,
}

impl EncryptionSession {
    /// A locked session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding a key.
    pub fn with_key(key: DerivedKey) -> Self {
        Self { key: Some(key) }
    }

    /// Derive the key from the passphrase and salt and keep it.
    ///
    /// On failure the previous state is left untouched.
    pub fn unlock(&mut self, passphrase: &str, salt: &str, params: &KdfParams) -> Result<()> {
        let key = derive_key_with_params(passphrase, salt, params)?;
        self.key = Some(key);
        debug!("encryption session unlocked");
        Ok(())
    }

    /// Drop the key.
    pub fn lock(&mut self) {
        self.key = None;
    }

    /// Whether a key is held.
    pub fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    /// The current key, or `Error::Locked`.
    pub fn key(&self) -> Result<&DerivedKey> {
        self.key.as_ref().ok_or(Error::Locked)
    }

    /// Swap in a new key after a completed passphrase rotation.
    ///
    /// Returns the old key, if any.
    pub fn replace_key(&mut self, key: DerivedKey) -> Option<DerivedKey> {
        self.key.replace(key)
    }

    /// Encrypt `data` with the session key into an envelope string.
    ///
    /// Fails with `Error::Locked` when no key is held.
    pub fn encrypt_for_api<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        encrypt_for_api(data, self.key()?)
    }

    /// Decrypt an envelope string produced under the session key.
    pub fn decrypt_from_api<T: DeserializeOwned>(&self, json: &str) -> Result<T> {
        decrypt_from_api(json, self.key()?)
    }
}
