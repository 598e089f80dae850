//! Client-side envelope encryption.
//!
//! This module provides:
//! - Argon2id key derivation from a passphrase and a stored salt
//! - AES-256-GCM encryption into `{iv, ciphertext}` envelopes
//! - JSON wrappers for entity `encrypted_data` fields
//! - A SHA-256 passphrase fingerprint for re-entry checks

mod api;
mod cipher;
mod hash;
mod kdf;
mod session;

pub use api::{decrypt_from_api, encrypt_for_api, parse_envelope};
pub use cipher::{decrypt, encrypt, EncryptedBlob};
pub use hash::{hash_passphrase, verify_passphrase};
pub use kdf::{decode_salt, derive_key, derive_key_with_params, generate_salt, DerivedKey};
pub use session::EncryptionSession;
