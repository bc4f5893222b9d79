//! Seal error types with clear, human-readable reasons
//!
//! Every failure of the seal surfaces as one of these variants. The `Display`
//! text is the reason handed to the error signal.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Seal system specific errors
#[derive(Error, Debug)]
pub enum SealError {
    /// An encoded token referenced a character outside the alphabet
    #[error("Alphabet index {index} is out of range (alphabet has {len} characters)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The alphabet itself is unusable
    #[error("Invalid alphabet: {reason}")]
    InvalidAlphabet { reason: String },

    /// A plain string contains a character the alphabet cannot express
    #[error("Character {ch:?} cannot be encoded with this alphabet")]
    UnencodableCharacter { ch: char },

    /// A manifest file is absent on disk
    #[error("Required chart component missing: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// A manifest file exists but could not be read
    #[error("Failed to read chart component: {}", path.display())]
    ArtifactUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The aggregate fingerprint could not be produced
    #[error("Failed to compute chart data signature: {source}")]
    FingerprintComputationFailed {
        #[source]
        source: Box<SealError>,
    },

    /// The activation gate did not hold
    #[error("Data validation condition not satisfied")]
    ValidationPreconditionFailed,

    /// Stored and computed fingerprints differ
    #[error("Chart data integrity violation detected")]
    IntegrityViolation { expected: String, actual: String },

    /// A config key outside the `data.` namespace was requested
    #[error("Invalid chart config access: {key}")]
    InvalidConfigAccess { key: String },

    /// The backing config file does not exist
    #[error("Chart configuration missing: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// Failed to read the backing config file
    #[error("Failed to read chart configuration from {}", path.display())]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing config file is not valid YAML
    #[error("Failed to parse chart configuration at {} (corrupted or invalid format)", path.display())]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Failed to write the backing config file
    #[error("Failed to write chart configuration to {}", path.display())]
    ConfigWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Verification did not finish in time
    #[error("Chart data validation timed out after {after:?}")]
    Timeout { after: Duration },

    /// The blocking verification task died before reporting
    #[error("Chart data validation task failed: {reason}")]
    TaskFailed { reason: String },
}

impl SealError {
    /// Wrap a fingerprint failure the way the controller reports it
    pub fn computation_failed(source: SealError) -> Self {
        SealError::FingerprintComputationFailed {
            source: Box::new(source),
        }
    }

    /// Log security-critical seal errors
    pub fn log_if_security_critical(&self) {
        match self {
            SealError::IntegrityViolation { expected, actual } => {
                tracing::error!(
                    target: "security",
                    expected = %expected,
                    actual = %actual,
                    "SEAL VIOLATION: {}",
                    self
                );
            }
            SealError::ValidationPreconditionFailed | SealError::InvalidConfigAccess { .. } => {
                tracing::error!(target: "security", "SEAL VIOLATION: {}", self);
            }
            _ => {}
        }
    }
}
