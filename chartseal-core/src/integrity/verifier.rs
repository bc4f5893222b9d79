//! Seal verification - compares the stored fingerprint against disk state
//!
//! The flow is linear: activation gate, stored fingerprint lookup, fingerprint
//! computation, constant-time comparison. The first failure is handed to the
//! error signal and nothing after it runs.

use crate::integrity::config::{coerce_to_string, ConfigGateway};
use crate::integrity::error::SealError;
use crate::integrity::hasher::{Fingerprint, FingerprintEngine, FingerprintReport};
use crate::integrity::manifest::Manifest;
use crate::integrity::paths::PathResolver;
use crate::integrity::signal::{ErrorSignal, PanicSignal};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

/// Short name the trusted fingerprint is stored under
pub const SIGNATURE_CONFIG_KEY: &str = "chart_data";

/// Decoded length of the activation source that enables verification
pub const ACTIVATION_KEY_LEN: usize = 4;

/// Verifies the bundled library against its stored fingerprint
#[derive(Clone)]
pub struct IntegrityGuard {
    manifest: Manifest,
    config: Arc<dyn ConfigGateway>,
    resolver: Arc<dyn PathResolver>,
    signal: Arc<dyn ErrorSignal>,
}

impl IntegrityGuard {
    /// Create a guard that panics on failure
    pub fn new(
        manifest: Manifest,
        config: Arc<dyn ConfigGateway>,
        resolver: Arc<dyn PathResolver>,
    ) -> Self {
        IntegrityGuard {
            manifest,
            config,
            resolver,
            signal: Arc::new(PanicSignal),
        }
    }

    /// Replace the error signal
    pub fn with_signal(mut self, signal: Arc<dyn ErrorSignal>) -> Self {
        self.signal = signal;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Activation gate
    ///
    /// Deliberately indirect: the config prefix token is decoded and only its
    /// length is tested. Keep it structural, not a literal `true`.
    pub fn is_validation_active(&self) -> Result<bool, SealError> {
        let activation_source = self.manifest.decode(self.manifest.config_key_prefix_token())?;
        Ok(activation_source.len() == ACTIVATION_KEY_LEN)
    }

    /// Fully namespaced key of the stored fingerprint
    pub fn signature_config_key(&self) -> Result<String, SealError> {
        let prefix = self.manifest.decode(self.manifest.config_key_prefix_token())?;
        Ok(format!("{prefix}.{SIGNATURE_CONFIG_KEY}"))
    }

    /// Trusted fingerprint from configuration, empty when none is stored
    pub fn stored_fingerprint(&self) -> Result<String, SealError> {
        let key = self.signature_config_key()?;
        let value = self.config.get(&key, Value::String(String::new()))?;
        Ok(coerce_to_string(&value))
    }

    /// Fingerprint of the artifacts as they are on disk right now
    pub fn compute_fingerprint(&self) -> Result<Fingerprint, SealError> {
        FingerprintEngine::new(&self.manifest, self.resolver.as_ref()).compute()
    }

    /// Fingerprint plus per-artifact digests
    pub fn compute_report(&self) -> Result<FingerprintReport, SealError> {
        FingerprintEngine::new(&self.manifest, self.resolver.as_ref()).compute_report()
    }

    /// Run the full verification and report the first failure as a value
    pub fn check(&self) -> Result<(), SealError> {
        if !self.is_validation_active()? {
            return Err(SealError::ValidationPreconditionFailed);
        }

        let stored = self.stored_fingerprint()?;
        let computed = self
            .compute_fingerprint()
            .map_err(SealError::computation_failed)?;

        if !bool::from(stored.as_bytes().ct_eq(computed.as_str().as_bytes())) {
            return Err(SealError::IntegrityViolation {
                expected: stored,
                actual: computed.into_string(),
            });
        }

        Ok(())
    }

    /// Verify the seal; returns silently on success, raises on any failure
    pub fn validate(&self) {
        info!("Verifying chart library seal");

        if let Err(e) = self.check() {
            self.signal.raise(e);
        }

        info!("Chart library seal verified");
    }

    /// Run [`IntegrityGuard::check`] on a blocking thread under a time limit
    pub async fn check_within(self: Arc<Self>, limit: Duration) -> Result<(), SealError> {
        let guard = Arc::clone(&self);
        let task = tokio::task::spawn_blocking(move || guard.check());

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(SealError::TaskFailed {
                reason: join_error.to_string(),
            }),
            Err(_) => {
                debug!("Seal verification exceeded {:?}", limit);
                Err(SealError::Timeout { after: limit })
            }
        }
    }

    /// [`IntegrityGuard::validate`] with a time limit around the whole run
    pub async fn validate_within(self: Arc<Self>, limit: Duration) {
        info!("Verifying chart library seal (limit {:?})", limit);

        let signal = Arc::clone(&self.signal);
        if let Err(e) = self.check_within(limit).await {
            signal.raise(e);
        }

        info!("Chart library seal verified");
    }
}
