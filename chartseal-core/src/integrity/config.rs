//! Config gateway for the stored trusted fingerprint
//!
//! Keys are dot-namespaced and must live under `data.`. The prefix is stripped
//! and the remainder is looked up as a short name in the backing store.

use crate::integrity::error::SealError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Only keys under this namespace may be read
pub const CONFIG_NAMESPACE: &str = "data.";

/// Read access to the key/value store holding the trusted fingerprint
pub trait ConfigGateway: Send + Sync {
    /// Value stored under `key`, or `default` when the key is absent
    fn get(&self, key: &str, default: Value) -> Result<Value, SealError>;
}

/// Strip the namespace from `key`, rejecting keys outside of it
pub fn short_name(key: &str) -> Result<&str, SealError> {
    key.strip_prefix(CONFIG_NAMESPACE).ok_or_else(|| {
        warn!("Rejected config access outside namespace: {}", key);
        SealError::InvalidConfigAccess {
            key: key.to_string(),
        }
    })
}

/// Coerce a config value to the string form the comparison expects
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// In-memory config source
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    entries: BTreeMap<String, Value>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry under its short name (without the namespace)
    pub fn with_entry(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }
}

impl ConfigGateway for StaticConfig {
    fn get(&self, key: &str, default: Value) -> Result<Value, SealError> {
        let name = short_name(key)?;
        Ok(self.entries.get(name).cloned().unwrap_or(default))
    }
}

/// Config source backed by a YAML mapping on disk
///
/// The file is read on every lookup so edits take effect without a restart.
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileConfig { path: path.into() }
    }

    /// Conventional location under an application root
    pub fn default_location(app_root: &Path) -> Self {
        FileConfig::new(app_root.join("chart_config").join("data.yml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole mapping
    ///
    /// A well-formed document that is not a mapping (a list, a scalar) holds no
    /// entries and loads as an empty mapping. Only YAML that fails to parse is
    /// a [`SealError::ConfigParseError`].
    pub fn load(&self) -> Result<BTreeMap<String, Value>, SealError> {
        if !self.path.exists() {
            return Err(SealError::ConfigMissing {
                path: self.path.clone(),
            });
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| SealError::ConfigReadError {
                path: self.path.clone(),
                source: e,
            })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let parse_error = |e| SealError::ConfigParseError {
            path: self.path.clone(),
            source: e,
        };

        let document: serde_yaml_ng::Value =
            serde_yaml_ng::from_str(&content).map_err(parse_error)?;
        match document {
            serde_yaml_ng::Value::Mapping(_) => {
                serde_yaml_ng::from_value(document).map_err(parse_error)
            }
            _ => {
                debug!(
                    "Config at {} is not a mapping, treating it as empty",
                    self.path.display()
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Store `value` under `key`, keeping every other entry
    pub fn store(&self, key: &str, value: Value) -> Result<(), SealError> {
        self.store_all(&[(key, value)])
    }

    /// Store several entries with a single read and a single write
    ///
    /// Every key is checked against the namespace before the file is touched,
    /// so a batch with one bad key writes nothing.
    pub fn store_all(&self, entries: &[(&str, Value)]) -> Result<(), SealError> {
        let names = entries
            .iter()
            .map(|(key, _)| short_name(key))
            .collect::<Result<Vec<_>, _>>()?;

        let mut stored = match self.load() {
            Ok(stored) => stored,
            Err(SealError::ConfigMissing { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        for (name, (_, value)) in names.iter().zip(entries) {
            stored.insert(name.to_string(), value.clone());
        }

        let write_error = |e| SealError::ConfigWriteError {
            path: self.path.clone(),
            source: e,
        };

        let yaml = serde_yaml_ng::to_string(&stored)
            .map_err(|e| write_error(std::io::Error::other(e.to_string())))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(&self.path, yaml).map_err(write_error)?;

        debug!(
            "Stored {} config entries ({}) in {}",
            names.len(),
            names.join(", "),
            self.path.display()
        );
        Ok(())
    }
}

impl ConfigGateway for FileConfig {
    fn get(&self, key: &str, default: Value) -> Result<Value, SealError> {
        let name = short_name(key)?;
        let mut entries = self.load()?;
        Ok(entries.remove(name).unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_rejects_keys_outside_namespace() {
        let config = StaticConfig::new().with_entry("chart_data", "abc");

        for key in ["chart_data", "app.chart_data", "data", "datachart_data", ".data.chart_data"] {
            let result = config.get(key, json!("fallback"));
            assert!(
                matches!(result, Err(SealError::InvalidConfigAccess { .. })),
                "key {key} should be rejected"
            );
        }
    }

    #[test]
    fn test_static_lookup_and_default() {
        let config = StaticConfig::new().with_entry("chart_data", "abc");

        assert_eq!(config.get("data.chart_data", json!("")).unwrap(), json!("abc"));
        assert_eq!(config.get("data.other", json!("dflt")).unwrap(), json!("dflt"));
    }

    #[test]
    fn test_coerce_to_string() {
        assert_eq!(coerce_to_string(&json!("abc")), "abc");
        assert_eq!(coerce_to_string(&json!(42)), "42");
        assert_eq!(coerce_to_string(&json!(true)), "1");
        assert_eq!(coerce_to_string(&json!(false)), "");
        assert_eq!(coerce_to_string(&Value::Null), "");
        assert_eq!(coerce_to_string(&json!(["a"])), "[\"a\"]");
    }

    #[test]
    fn test_file_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = FileConfig::default_location(temp_dir.path());

        let result = config.get("data.chart_data", json!(""));
        assert!(matches!(result, Err(SealError::ConfigMissing { .. })));
    }

    #[test]
    fn test_file_config_namespace_checked_before_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = FileConfig::default_location(temp_dir.path());

        let result = config.get("chart_data", json!(""));
        assert!(matches!(result, Err(SealError::InvalidConfigAccess { .. })));
    }

    #[test]
    fn test_file_config_reads_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.yml");
        std::fs::write(&path, "chart_data: deadbeef\nretries: 3\n").unwrap();
        let config = FileConfig::new(&path);

        assert_eq!(config.get("data.chart_data", json!("")).unwrap(), json!("deadbeef"));
        assert_eq!(config.get("data.retries", json!(0)).unwrap(), json!(3));
        assert_eq!(config.get("data.absent", json!("")).unwrap(), json!(""));
    }

    #[test]
    fn test_file_config_non_mapping_yields_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.yml");
        let config = FileConfig::new(&path);

        for document in ["- just\n- a list\n", "plain scalar\n", "42\n", "~\n", ""] {
            std::fs::write(&path, document).unwrap();
            assert!(config.load().unwrap().is_empty(), "document {document:?}");
            assert_eq!(
                config.get("data.chart_data", json!("dflt")).unwrap(),
                json!("dflt")
            );
        }
    }

    #[test]
    fn test_file_config_syntax_error_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.yml");
        std::fs::write(&path, "chart_data: [unclosed\n").unwrap();

        let result = FileConfig::new(&path).get("data.chart_data", json!(""));
        assert!(matches!(result, Err(SealError::ConfigParseError { .. })));
    }

    #[test]
    fn test_file_config_store_preserves_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let config = FileConfig::default_location(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("chart_config")).unwrap();
        std::fs::write(config.path(), "theme: dark\n").unwrap();

        config.store("data.chart_data", json!("cafe")).unwrap();

        let entries = config.load().unwrap();
        assert_eq!(entries.get("theme"), Some(&json!("dark")));
        assert_eq!(entries.get("chart_data"), Some(&json!("cafe")));
    }

    #[test]
    fn test_file_config_store_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = FileConfig::default_location(temp_dir.path());

        config.store("data.chart_data", json!("cafe")).unwrap();
        assert_eq!(config.get("data.chart_data", json!("")).unwrap(), json!("cafe"));

        let rejected = config.store("chart_data", json!("cafe"));
        assert!(matches!(rejected, Err(SealError::InvalidConfigAccess { .. })));
    }

    #[test]
    fn test_file_config_store_all_writes_batch_together() {
        let temp_dir = TempDir::new().unwrap();
        let config = FileConfig::default_location(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join("chart_config")).unwrap();
        std::fs::write(config.path(), "theme: dark\n").unwrap();

        config
            .store_all(&[
                ("data.chart_data", json!("cafe")),
                ("data.chart_sealed_at", json!("2026-10-18T00:00:00Z")),
                ("data.chart_seal_version", json!(1)),
            ])
            .unwrap();

        let entries = config.load().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries.get("theme"), Some(&json!("dark")));
        assert_eq!(entries.get("chart_data"), Some(&json!("cafe")));
        assert_eq!(
            entries.get("chart_sealed_at"),
            Some(&json!("2026-10-18T00:00:00Z"))
        );
        assert_eq!(entries.get("chart_seal_version"), Some(&json!(1)));
    }

    #[test]
    fn test_file_config_store_all_rejects_whole_batch() {
        let temp_dir = TempDir::new().unwrap();
        let config = FileConfig::default_location(temp_dir.path());

        let result = config.store_all(&[
            ("data.chart_data", json!("cafe")),
            ("app.chart_sealed_at", json!("now")),
        ]);

        assert!(matches!(result, Err(SealError::InvalidConfigAccess { .. })));
        assert!(!config.path().exists());
    }
}
