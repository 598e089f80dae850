//! Trauma Tree core
//!
//! The two pure-data cores behind a collaborative family trauma tree:
//! end-to-end envelope encryption of every entity field, and the timeline
//! filter engine that decides which persons, events and classifications
//! are dimmed.
//!
//! # Features
//!
//! - **Argon2id key derivation**: passphrase + per-account salt to an AES-256 key
//! - **AES-256-GCM envelopes**: `{iv, ciphertext}` JSON, fresh IV per call
//! - **Timeline filtering**: per-dimension allow-sets, person groups,
//!   time ranges, pattern restriction and quick-filter presets
//! - **Passphrase rotation**: record-by-record re-encryption through a
//!   narrow store trait
//!
//! # Example
//!
//! ```rust,no_run
//! use trauma_tree::crypto::{derive_key, generate_salt, encrypt_for_api, decrypt_from_api};
//!
//! let salt = generate_salt();
//! let key = derive_key("correct horse battery staple", &salt).unwrap();
//!
//! let wire = encrypt_for_api(&serde_json::json!({"name": "Ada"}), &key).unwrap();
//! let back: serde_json::Value = decrypt_from_api(&wire, &key).unwrap();
//! assert_eq!(back["name"], "Ada");
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod filter;
pub mod model;
pub mod rotation;

pub use config::KdfParams;
pub use crypto::{DerivedKey, EncryptedBlob, EncryptionSession};
pub use error::{Error, Result};
pub use filter::{DimSets, Selection, TimelineFilter, TimelineFilterState};
pub use model::TreeData;
