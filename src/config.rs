//! Configuration constants and types for the trauma tree core.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM IV length in bytes (96 bits).
pub const IV_LENGTH: usize = 12;

/// Derived key length in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// Default settings file name, looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = "trauma-tree.json";

/// Argon2id parameters shared with every other client of the same account.
pub mod argon2_params {
    /// Memory cost in KiB (64 MiB).
    pub const MEMORY_COST: u32 = 65536;

    /// Time cost (iterations).
    pub const TIME_COST: u32 = 3;

    /// Parallelism factor.
    pub const PARALLELISM: u32 = 1;

    /// Output length in bytes (256 bits).
    pub const OUTPUT_LENGTH: usize = 32;
}

/// Key derivation parameters.
///
/// The defaults must stay bit-compatible with data already stored
/// server-side; changing any of them makes existing envelopes unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Iterations.
    pub time_cost: u32,
    /// Memory in KiB.
    pub memory_cost_kib: u32,
    /// Lanes.
    pub parallelism: u32,
    /// Output length in bytes.
    pub output_len: usize,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            time_cost: argon2_params::TIME_COST,
            memory_cost_kib: argon2_params::MEMORY_COST,
            parallelism: argon2_params::PARALLELISM,
            output_len: argon2_params::OUTPUT_LENGTH,
        }
    }
}

impl KdfParams {
    /// Create custom parameters. Output length is fixed to the key size.
    pub fn new(time_cost: u32, memory_cost_kib: u32, parallelism: u32) -> Self {
        Self {
            time_cost,
            memory_cost_kib,
            parallelism,
            output_len: KEY_LENGTH,
        }
    }

    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.time_cost == 0 {
            return Err(Error::InvalidConfig(
                "Time cost must be greater than 0".to_string(),
            ));
        }
        if self.parallelism == 0 {
            return Err(Error::InvalidConfig(
                "Parallelism must be greater than 0".to_string(),
            ));
        }
        let min_memory = 8 * u64::from(self.parallelism);
        if u64::from(self.memory_cost_kib) < min_memory {
            return Err(Error::InvalidConfig(format!(
                "Memory cost must be at least {} KiB for parallelism {}",
                min_memory, self.parallelism
            )));
        }
        if self.output_len != KEY_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "Output length must be {} bytes",
                KEY_LENGTH
            )));
        }
        Ok(())
    }
}

/// Settings for the command-line tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Base64 salt used when `--salt` is not given.
    pub salt: Option<String>,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// KDF parameter override, for local testing only.
    pub kdf: Option<KdfParams>,
}

impl CliSettings {
    /// Load settings from a JSON file, returning defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let settings: Self =
            serde_json::from_str(&raw).map_err(|e| Error::InvalidSettings {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if let Some(kdf) = &settings.kdf {
            kdf.validate()?;
        }
        Ok(settings)
    }

    /// Default settings path.
    pub fn default_path() -> PathBuf {
        PathBuf::from(SETTINGS_FILE_NAME)
    }

    /// KDF parameters to use, falling back to the production defaults.
    pub fn kdf_params(&self) -> KdfParams {
        self.kdf.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_kdf_params_match_stored_data() {
        let params = KdfParams::default();
        assert_eq!(params.time_cost, 3);
        assert_eq!(params.memory_cost_kib, 65536);
        assert_eq!(params.parallelism, 1);
        assert_eq!(params.output_len, 32);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(KdfParams::new(0, 65536, 1).validate().is_err());
        assert!(KdfParams::new(3, 65536, 0).validate().is_err());
        assert!(KdfParams::new(1, 4, 1).validate().is_err());

        let mut params = KdfParams::default();
        params.output_len = 16;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_huge_parallelism_is_an_error() {
        let err = KdfParams::new(1, 64, u32::MAX).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_settings_with_huge_parallelism_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"kdf":{"time_cost":1,"memory_cost_kib":64,"parallelism":4000000000,"output_len":32}}"#,
        )
        .unwrap();

        let err = CliSettings::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_settings_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = CliSettings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, CliSettings::default());
        assert_eq!(settings.kdf_params(), KdfParams::default());
    }

    #[test]
    fn test_settings_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"salt":"AAAAAAAAAAAAAAAAAAAAAA==","log_level":"debug"}"#,
        )
        .unwrap();

        let settings = CliSettings::load(&path).unwrap();
        assert_eq!(settings.salt.as_deref(), Some("AAAAAAAAAAAAAAAAAAAAAA=="));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert!(settings.kdf.is_none());
    }

    #[test]
    fn test_settings_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = CliSettings::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings { .. }));
    }
}
