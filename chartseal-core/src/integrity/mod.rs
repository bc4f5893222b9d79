//! Chartseal integrity system - content seal for the bundled chart library
//!
//! Recomputes a SHA-256 fingerprint over a fixed manifest of library files and
//! compares it against the trusted fingerprint held in configuration. Which
//! files and which config key take part is kept out of plain text by encoding
//! them as indices into a shared alphabet.
//!
//! Design Principles:
//! - Fixed manifest - the protected set and its order are part of the seal
//! - Fail closed - every failure is terminal, there is no degraded mode
//! - Injected collaborators - config, path resolution and error signalling are traits

pub mod alphabet;
pub mod config;
pub mod error;
pub mod hasher;
pub mod manifest;
pub mod paths;
pub mod signal;
pub mod verifier;

pub use alphabet::{Alphabet, EncodedToken};
pub use config::{ConfigGateway, FileConfig, StaticConfig};
pub use error::SealError;
pub use hasher::{Fingerprint, FingerprintEngine};
pub use manifest::Manifest;
pub use paths::{AppRoot, PathResolver};
pub use signal::{ErrorSignal, ExitSignal, PanicSignal};
pub use verifier::IntegrityGuard;

/// Seal format version for future compatibility
pub const SEAL_VERSION: u32 = 1;
