//! Fingerprint computation for the protected artifact set
//!
//! Each file is hashed with SHA-256 on its own, the hex digests are joined with
//! a `|` after every entry, and the joined string is hashed once more. Hashing
//! per file keeps memory bounded and makes the aggregate depend on file count
//! and order as well as content.

use crate::integrity::error::SealError;
use crate::integrity::manifest::Manifest;
use crate::integrity::paths::PathResolver;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Appended after every per-file digest in the accumulator
pub const DIGEST_SEPARATOR: char = '|';

/// Hex-encoded SHA-256 aggregate over the manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Digest of one manifest entry
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactDigest {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub digest: String,
}

/// Aggregate fingerprint together with the digests it was built from
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintReport {
    pub fingerprint: Fingerprint,
    pub artifacts: Vec<ArtifactDigest>,
}

/// Hash a file's contents using SHA-256, streaming in 8KB chunks
pub fn hash_file(path: &Path) -> Result<String, SealError> {
    let unreadable = |source| SealError::ArtifactUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;

    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(unreadable)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hash a string using SHA-256
pub fn hash_string(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Combine per-file digests into the aggregate fingerprint
pub fn aggregate<I, S>(digests: I) -> Fingerprint
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut combined = String::new();
    for digest in digests {
        combined.push_str(digest.as_ref());
        combined.push(DIGEST_SEPARATOR);
    }
    Fingerprint(hash_string(&combined))
}

/// Computes the current fingerprint of the artifacts named by a manifest
pub struct FingerprintEngine<'a> {
    manifest: &'a Manifest,
    resolver: &'a dyn PathResolver,
}

impl<'a> FingerprintEngine<'a> {
    pub fn new(manifest: &'a Manifest, resolver: &'a dyn PathResolver) -> Self {
        FingerprintEngine { manifest, resolver }
    }

    /// Compute the aggregate fingerprint
    ///
    /// Aborts on the first missing or unreadable file; no partial fingerprint
    /// is ever returned.
    pub fn compute(&self) -> Result<Fingerprint, SealError> {
        Ok(self.compute_report()?.fingerprint)
    }

    /// Compute the aggregate fingerprint and keep the per-file digests
    pub fn compute_report(&self) -> Result<FingerprintReport, SealError> {
        let base_directory = self.manifest.decode(self.manifest.base_directory_token())?;
        let mut artifacts = Vec::with_capacity(self.manifest.component_manifest().len());

        for token in self.manifest.component_manifest() {
            let relative_path = self.manifest.decode(token)?;
            let absolute_path = self
                .resolver
                .resolve_absolute(&format!("{base_directory}{relative_path}"));

            if !absolute_path.exists() {
                return Err(SealError::MissingArtifact {
                    path: PathBuf::from(relative_path),
                });
            }

            let digest = hash_file(&absolute_path)?;
            trace!("Hashed {} -> {}", absolute_path.display(), digest);

            artifacts.push(ArtifactDigest {
                relative_path,
                absolute_path,
                digest,
            });
        }

        let fingerprint = aggregate(artifacts.iter().map(|a| a.digest.as_str()));
        debug!(
            "Computed fingerprint over {} artifacts: {}",
            artifacts.len(),
            fingerprint
        );

        Ok(FingerprintReport {
            fingerprint,
            artifacts,
        })
    }
}
