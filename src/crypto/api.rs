//! JSON helpers for the `encrypted_data` field carried by every entity.

use crate::crypto::cipher::{decrypt, encrypt, EncryptedBlob};
use crate::crypto::kdf::DerivedKey;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Outer envelope as read off the wire, with both fields optional so
/// that a missing one is reported as such rather than as a parse error.
#[derive(Deserialize)]
struct WireEnvelope {
    iv: Option<String>,
    ciphertext: Option<String>,
}

/// Serialize `data` to JSON, encrypt it, and return the envelope as a JSON string.
pub fn encrypt_for_api<T: Serialize + ?Sized>(data: &T, key: &DerivedKey) -> Result<String> {
    let plaintext = serde_json::to_string(data)?;
    let blob = encrypt(&plaintext, key)?;
    Ok(serde_json::to_string(&blob)?)
}

/// Parse an envelope JSON string, decrypt it, and deserialize the payload.
pub fn decrypt_from_api<T: DeserializeOwned>(json: &str, key: &DerivedKey) -> Result<T> {
    let blob = parse_envelope(json)?;
    let plaintext = decrypt(&blob, key)?;
    Ok(serde_json::from_str(&plaintext)?)
}

/// Parse the outer `{"iv", "ciphertext"}` object without decrypting.
pub fn parse_envelope(json: &str) -> Result<EncryptedBlob> {
    let wire: WireEnvelope =
        serde_json::from_str(json).map_err(|e| Error::InvalidEnvelope(e.to_string()))?;

    let iv = wire
        .iv
        .ok_or_else(|| Error::InvalidEnvelope("missing field `iv`".to_string()))?;
    let ciphertext = wire
        .ciphertext
        .ok_or_else(|| Error::InvalidEnvelope("missing field `ciphertext`".to_string()))?;

    Ok(EncryptedBlob { iv, ciphertext })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
        year: i32,
    }

    #[test]
    fn test_struct_roundtrip() {
        let key = DerivedKey::random();
        let note = Note {
            title: "Moved to Rotterdam".into(),
            year: 1962,
        };

        let wire = encrypt_for_api(&note, &key).unwrap();
        let back: Note = decrypt_from_api(&wire, &key).unwrap();

        assert_eq!(back, note);
    }

    #[test]
    fn test_wire_format_has_only_iv_and_ciphertext() {
        let key = DerivedKey::random();
        let wire = encrypt_for_api(&json!({"name": "Ada"}), &key).unwrap();

        let value: Value = serde_json::from_str(&wire).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj["iv"].is_string());
        assert!(obj["ciphertext"].is_string());
    }

    #[test]
    fn test_malformed_outer_json() {
        let key = DerivedKey::random();
        let err = decrypt_from_api::<Value>("{\"iv\": ", &key).unwrap_err();
        assert!(matches!(err, Error::InvalidEnvelope(_)));
    }

    #[test]
    fn test_missing_fields() {
        let key = DerivedKey::random();

        let err = decrypt_from_api::<Value>(r#"{"ciphertext":"AAAA"}"#, &key).unwrap_err();
        assert!(err.to_string().contains("`iv`"));

        let err = decrypt_from_api::<Value>(r#"{"iv":"AAAA"}"#, &key).unwrap_err();
        assert!(err.to_string().contains("`ciphertext`"));
    }

    #[test]
    fn test_wrong_key_propagates_decryption_error() {
        let key1 = DerivedKey::random();
        let key2 = DerivedKey::random();

        let wire = encrypt_for_api(&json!([1, 2, 3]), &key1).unwrap();
        let err = decrypt_from_api::<Value>(&wire, &key2).unwrap_err();
        assert!(err.is_decrypt_error());
    }

    #[test]
    fn test_payload_shape_mismatch() {
        let key = DerivedKey::random();
        let wire = encrypt_for_api(&json!({"unexpected": true}), &key).unwrap();

        let err = decrypt_from_api::<Note>(&wire, &key).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
