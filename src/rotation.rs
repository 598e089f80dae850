//! Passphrase rotation: re-encrypt every stored record under a new key.
//!
//! Records are rewritten one at a time through [`EncryptedEntityStore`].
//! There is no atomicity across records. A failure partway leaves some
//! records under the new key and the rest under the old one; running the
//! rotation again with the same keys picks up where it stopped, since
//! records that already open under the new key are skipped.

use crate::config::KdfParams;
use crate::crypto::{
    decrypt, derive_key_with_params, encrypt, parse_envelope, DerivedKey, EncryptionSession,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Kind of record holding an `encrypted_data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Tree,
    Person,
    Relationship,
    Event,
    LifeEvent,
    Classification,
    TurningPoint,
    Pattern,
}

/// One stored record's encrypted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    pub kind: RecordKind,
    pub id: String,
    /// Envelope JSON string.
    pub encrypted_data: String,
}

/// The narrow storage surface the rotation needs.
pub trait EncryptedEntityStore {
    /// Every record to rotate.
    fn list(&mut self) -> Result<Vec<EncryptedRecord>>;

    /// Persist one re-encrypted record.
    fn update(&mut self, record: &EncryptedRecord) -> Result<()>;
}

/// Outcome of a completed rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RotationReport {
    /// Records re-encrypted in this run.
    pub rotated: usize,
    /// Records that already opened under the new key.
    pub already_rotated: usize,
}

/// Re-encrypt one envelope from `old_key` to `new_key`.
///
/// Returns `None` when the envelope is already under `new_key`.
pub fn reencrypt_envelope(
    encrypted_data: &str,
    old_key: &DerivedKey,
    new_key: &DerivedKey,
) -> Result<Option<String>> {
    let blob = parse_envelope(encrypted_data)?;
    let plaintext = match decrypt(&blob, old_key) {
        Ok(plaintext) => plaintext,
        Err(e) if e.is_decrypt_error() && decrypt(&blob, new_key).is_ok() => return Ok(None),
        Err(e) => return Err(e),
    };
    let rotated = encrypt(&plaintext, new_key)?;
    Ok(Some(serde_json::to_string(&rotated)?))
}

/// Move every record in `store` from `old_key` to `new_key`.
///
/// Stops at the first failure with `Error::Rotation`, which records how
/// many records were rewritten before it.
pub fn rotate_records<S: EncryptedEntityStore + ?Sized>(
    store: &mut S,
    old_key: &DerivedKey,
    new_key: &DerivedKey,
) -> Result<RotationReport> {
    let records = store.list()?;
    let mut report = RotationReport::default();

    for record in records {
        let step = reencrypt_envelope(&record.encrypted_data, old_key, new_key).and_then(
            |rotated| match rotated {
                Some(encrypted_data) => {
                    store.update(&EncryptedRecord {
                        encrypted_data,
                        ..record.clone()
                    })?;
                    Ok(true)
                }
                None => Ok(false),
            },
        );

        match step {
            Ok(true) => report.rotated += 1,
            Ok(false) => report.already_rotated += 1,
            Err(source) => {
                warn!(
                    kind = ?record.kind,
                    id = %record.id,
                    completed = report.rotated,
                    "passphrase rotation stopped"
                );
                return Err(Error::Rotation {
                    completed: report.rotated,
                    failed_id: record.id,
                    source: Box::new(source),
                });
            }
        }
        debug!(kind = ?record.kind, id = %record.id, "record rotated");
    }

    Ok(report)
}

/// Rotate the session to a new passphrase and salt.
///
/// The session keeps its old key unless every record was moved.
pub fn rotate_session<S: EncryptedEntityStore + ?Sized>(
    session: &mut EncryptionSession,
    store: &mut S,
    new_passphrase: &str,
    new_salt: &str,
    params: &KdfParams,
) -> Result<RotationReport> {
    let new_key = derive_key_with_params(new_passphrase, new_salt, params)?;
    let report = rotate_records(store, session.key()?, &new_key)?;
    session.replace_key(new_key);
    Ok(report)
}
