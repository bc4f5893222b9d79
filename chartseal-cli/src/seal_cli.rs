//! Seal CLI commands
//!
//! Provides the operator interface for the chart library seal: verify, fingerprint, seal, manifest

use anyhow::{bail, Context, Result};
use chartseal_core::integrity::verifier::SIGNATURE_CONFIG_KEY;
use chartseal_core::integrity::{
    AppRoot, ExitSignal, FileConfig, IntegrityGuard, Manifest, SEAL_VERSION,
};
use clap::Parser;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
pub enum SealCommand {
    /// Verify the installed chart library against its stored fingerprint
    Verify {
        /// Application root (default: current directory)
        #[clap(long, default_value = ".")]
        root: PathBuf,

        /// Config file holding the stored fingerprint (default: <root>/chart_config/data.yml)
        #[clap(long)]
        config: Option<PathBuf>,

        /// Give up after this many seconds
        #[clap(long, default_value_t = 30)]
        timeout_secs: u64,
    },

    /// Print the current fingerprint of the installed chart library
    Fingerprint {
        /// Application root (default: current directory)
        #[clap(long, default_value = ".")]
        root: PathBuf,

        /// Also print the digest of every component
        #[clap(long)]
        verbose: bool,

        /// Output the report as JSON
        #[clap(long, conflicts_with = "verbose")]
        json: bool,
    },

    /// Compute the current fingerprint and store it as the trusted one
    Seal {
        /// Application root (default: current directory)
        #[clap(long, default_value = ".")]
        root: PathBuf,

        /// Config file to write (default: <root>/chart_config/data.yml)
        #[clap(long)]
        config: Option<PathBuf>,
    },

    /// List the protected components in seal order
    Manifest,
}

impl SealCommand {
    /// Execute the seal command
    pub async fn execute(&self) -> Result<()> {
        match self {
            SealCommand::Verify {
                root,
                config,
                timeout_secs,
            } => seal_verify(root, config.as_deref(), *timeout_secs).await,
            SealCommand::Fingerprint { root, verbose, json } => {
                seal_fingerprint(root, *verbose, *json)
            }
            SealCommand::Seal { root, config } => seal_store(root, config.as_deref()),
            SealCommand::Manifest => seal_manifest(),
        }
    }
}

fn app_root(root: &Path) -> Result<AppRoot> {
    if !root.is_dir() {
        bail!("Application root is not a directory: {}", root.display());
    }
    let canonical = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve application root: {}", root.display()))?;
    Ok(AppRoot::new(canonical))
}

fn config_file(root: &AppRoot, config: Option<&Path>) -> FileConfig {
    match config {
        Some(path) => FileConfig::new(path),
        None => FileConfig::default_location(root.root()),
    }
}

fn guard_for(root: &AppRoot, config: FileConfig) -> IntegrityGuard {
    IntegrityGuard::new(Manifest::bundled(), Arc::new(config), Arc::new(root.clone()))
}

async fn seal_verify(root: &Path, config: Option<&Path>, timeout_secs: u64) -> Result<()> {
    let root = app_root(root)?;
    let config = config_file(&root, config);
    info!("Using chart configuration at {}", config.path().display());

    let guard = guard_for(&root, config).with_signal(Arc::new(ExitSignal::default()));
    Arc::new(guard)
        .validate_within(Duration::from_secs(timeout_secs))
        .await;

    println!("✅ Chart library seal verified");
    Ok(())
}

fn seal_fingerprint(root: &Path, verbose: bool, json: bool) -> Result<()> {
    let root = app_root(root)?;
    let guard = guard_for(&root, FileConfig::default_location(root.root()));
    let report = guard
        .compute_report()
        .context("Failed to compute chart library fingerprint")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if verbose {
        for artifact in &report.artifacts {
            println!("{}  {}", artifact.digest, artifact.relative_path);
        }
        println!();
    }
    println!("{}", report.fingerprint);
    Ok(())
}

fn seal_store(root: &Path, config: Option<&Path>) -> Result<()> {
    let root = app_root(root)?;
    let config = config_file(&root, config);
    let guard = guard_for(&root, config.clone());

    let fingerprint = guard
        .compute_fingerprint()
        .context("Failed to compute chart library fingerprint")?;

    let prefix = guard.manifest().decode(guard.manifest().config_key_prefix_token())?;
    let signature_key = format!("{prefix}.{SIGNATURE_CONFIG_KEY}");
    let sealed_at_key = format!("{prefix}.chart_sealed_at");
    let version_key = format!("{prefix}.chart_seal_version");

    config.store_all(&[
        (signature_key.as_str(), json!(fingerprint.as_str())),
        (sealed_at_key.as_str(), json!(chrono::Utc::now().to_rfc3339())),
        (version_key.as_str(), json!(SEAL_VERSION)),
    ])?;

    info!("Stored seal in {}", config.path().display());
    println!("🔒 Sealed chart library: {fingerprint}");
    Ok(())
}

fn seal_manifest() -> Result<()> {
    let manifest = Manifest::bundled();
    let base = manifest.decode(manifest.base_directory_token())?;

    for (position, relative) in manifest.decoded_components()?.iter().enumerate() {
        println!("{:>3}  {base}{relative}", position + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartseal_core::integrity::PathResolver;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> SealCommand {
        let mut full = vec!["seal"];
        full.extend_from_slice(args);
        SealCommand::try_parse_from(full).unwrap()
    }

    fn install_library(root: &Path) -> Result<()> {
        let manifest = Manifest::bundled();
        let base = manifest.decode(manifest.base_directory_token())?;
        let resolver = AppRoot::new(root);
        for relative in manifest.decoded_components()? {
            let path = resolver.resolve_absolute(&format!("{base}{relative}"));
            fs::create_dir_all(path.parent().unwrap())?;
            fs::write(&path, relative.as_bytes())?;
        }
        Ok(())
    }

    #[test]
    fn test_verify_defaults() {
        match parse(&["verify"]) {
            SealCommand::Verify {
                root,
                config,
                timeout_secs,
            } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(config.is_none());
                assert_eq!(timeout_secs, 30);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_fingerprint_json_conflicts_with_verbose() {
        let result = SealCommand::try_parse_from(["seal", "fingerprint", "--json", "--verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_seal_store_then_verify() -> Result<()> {
        let temp_dir = TempDir::new()?;
        install_library(temp_dir.path())?;

        seal_store(temp_dir.path(), None)?;

        let root = app_root(temp_dir.path())?;
        let config = config_file(&root, None);
        let entries = config.load()?;
        assert_eq!(entries.len(), 3);
        assert!(entries.contains_key("chart_data"));
        let sealed_at = entries["chart_sealed_at"].as_str().unwrap_or_default();
        assert!(chrono::DateTime::parse_from_rfc3339(sealed_at).is_ok());
        assert_eq!(entries.get("chart_seal_version"), Some(&json!(SEAL_VERSION)));

        guard_for(&root, config).check()?;
        Ok(())
    }

    #[test]
    fn test_seal_store_custom_config_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        install_library(temp_dir.path())?;
        let custom = temp_dir.path().join("etc/seal.yml");

        seal_store(temp_dir.path(), Some(&custom))?;

        let root = app_root(temp_dir.path())?;
        guard_for(&root, FileConfig::new(&custom)).check()?;
        Ok(())
    }

    #[test]
    fn test_app_root_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        assert!(app_root(&temp_dir.path().join("missing")).is_err());
    }
}
