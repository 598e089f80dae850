//! Error types for the trauma tree core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for trauma tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in crypto, filtering, and rotation operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading input or settings files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Envelope IV does not decode to the expected number of bytes.
    #[error("Invalid IV length: expected {expected}, got {got}")]
    InvalidIvLength { expected: usize, got: usize },

    /// Decryption error (wrong key or tampered data).
    #[error("Decryption failed: wrong key or corrupted data")]
    Decryption,

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Key derivation error.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Salt does not decode to the expected number of bytes.
    #[error("Invalid salt length: expected {expected}, got {got}")]
    InvalidSalt { expected: usize, got: usize },

    /// A field was not valid base64.
    #[error("Base64 error: {0}")]
    Base64(String),

    /// Outer envelope JSON is malformed or incomplete.
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings file could not be parsed.
    #[error("Invalid settings file {path}: {reason}")]
    InvalidSettings { path: PathBuf, reason: String },

    /// Session has not been unlocked with a passphrase.
    #[error("Encryption session is locked")]
    Locked,

    /// Passphrase rotation stopped partway through.
    #[error("Passphrase rotation stopped after {completed} records at {failed_id}: {source}")]
    Rotation {
        completed: usize,
        failed_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Entity store reported a failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Whether this error came from decrypting an envelope.
    ///
    /// Both a malformed IV and an authentication failure count; callers
    /// use this to show a "wrong passphrase" message.
    pub fn is_decrypt_error(&self) -> bool {
        matches!(self, Error::InvalidIvLength { .. } | Error::Decryption)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Base64(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iv_length_message() {
        let err = Error::InvalidIvLength {
            expected: 12,
            got: 8,
        };
        assert_eq!(err.to_string(), "Invalid IV length: expected 12, got 8");
    }

    #[test]
    fn test_decrypt_error_classification() {
        assert!(Error::Decryption.is_decrypt_error());
        assert!(Error::InvalidIvLength {
            expected: 12,
            got: 16
        }
        .is_decrypt_error());
        assert!(!Error::KeyDerivation("out of memory".into()).is_decrypt_error());
        assert!(!Error::Locked.is_decrypt_error());
    }

    #[test]
    fn test_rotation_error_keeps_source() {
        let err = Error::Rotation {
            completed: 3,
            failed_id: "event-4".into(),
            source: Box::new(Error::Decryption),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 3 records"));
        assert!(msg.contains("event-4"));
    }
}
