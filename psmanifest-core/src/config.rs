//! Configuration for psmanifest
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::encoding::{EncodingDetector, ForcedEncoding, HeuristicDetector};

/// Top-level configuration file
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Log level used when neither `-v` nor `RUST_LOG` is given
    pub verbosity: String,

    /// Manifest reader settings
    pub reader: ReaderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self { verbosity: "info".to_string(), reader: ReaderConfig::default() }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        // Surface a bad encoding label at load time rather than on first read
        config.reader.detector()?;
        Ok(config)
    }
}

/// Settings applied to every [`PsModule`](crate::manifest::PsModule)
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ReaderConfig {
    /// Attribute consulted by `version()`
    pub version_key: String,

    /// Pin the source encoding instead of detecting it
    pub encoding: Option<String>,
}

impl ReaderConfig {
    pub const DEFAULT_VERSION_KEY: &'static str = "moduleversion";

    /// Version key in the lowercase form attribute names are stored in
    pub fn version_key(&self) -> String {
        self.version_key.trim().to_lowercase()
    }

    /// Build the encoding detector these settings describe
    pub fn detector(&self) -> Result<Arc<dyn EncodingDetector>> {
        match &self.encoding {
            Some(label) => {
                let forced = ForcedEncoding::for_label(label)
                    .context("Invalid reader.encoding setting")?;
                Ok(Arc::new(forced))
            }
            None => Ok(Arc::new(HeuristicDetector::new())),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { version_key: Self::DEFAULT_VERSION_KEY.to_string(), encoding: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.verbosity, "info");
        assert_eq!(config.reader.version_key(), "moduleversion");
        assert!(config.reader.encoding.is_none());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.verbosity, "info");
        assert_eq!(config.reader.version_key, ReaderConfig::DEFAULT_VERSION_KEY);
    }

    #[test]
    fn test_reader_section() {
        let config = Config::from_toml(
            r#"
verbosity = "debug"

[reader]
version_key = " ModuleVersion "
encoding = "windows-1252"
"#,
        )
        .unwrap();
        assert_eq!(config.verbosity, "debug");
        assert_eq!(config.reader.version_key(), "moduleversion");
        assert_eq!(config.reader.encoding.as_deref(), Some("windows-1252"));
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        let err = Config::from_toml("[reader]\nencoding = \"klingon\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("unknown encoding label 'klingon'"));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("psmanifest.toml");
        std::fs::write(&path, "[reader]\nversion_key = \"Version\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.reader.version_key(), "version");

        let missing = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read config file"));
    }
}
