//! PowerShell module manifest (.psd1) reader
//!
//! A [`PsModule`] names one manifest on disk. Nothing is read until an
//! attribute is first requested; the file is then decoded, scanned line by
//! line for flat `key = 'value'` assignments, and the result is kept for
//! the lifetime of the handle. Later edits to the file are not observed.
//!
//! Only scalar string assignments are understood. Arrays, nested
//! hashtables and expressions are skipped like any other unmatched line.

pub mod attributes;
pub mod errors;


use once_cell::sync::OnceCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub use attributes::AttributeMap;
pub use errors::{ManifestError, ManifestResult, ReadFailure};

use crate::config::ReaderConfig;
use crate::encoding::{Detection, EncodingDetector, HeuristicDetector};

/// Result of one complete load of the manifest
#[derive(Debug, Clone)]
struct LoadedManifest {
    detection: Detection,
    attributes: AttributeMap,
}

/// Handle on a single module manifest
///
/// The attribute cache is initialised at most once, so a handle can be
/// shared between threads. A failed load caches nothing; the next query
/// reads the file again.
pub struct PsModule {
    name: String,
    path: PathBuf,
    version_key: String,
    detector: Arc<dyn EncodingDetector>,
    loaded: OnceCell<LoadedManifest>,
}

impl PsModule {
    /// Create a handle with the default reader configuration. No I/O happens here.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version_key: ReaderConfig::DEFAULT_VERSION_KEY.to_string(),
            detector: Arc::new(HeuristicDetector::new()),
            loaded: OnceCell::new(),
        }
    }

    /// Create a handle using the version key and encoding from `config`
    pub fn with_config(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        config: &ReaderConfig,
    ) -> anyhow::Result<Self> {
        let module = Self::new(name, path).with_detector(config.detector()?);
        Ok(Self { version_key: config.version_key(), ..module })
    }

    /// Replace the encoding detector used on first load
    pub fn with_detector(mut self, detector: Arc<dyn EncodingDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the module; only affects error messages
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the manifest has already been read
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// The module version, which must be present and non-empty
    pub fn version(&self) -> ManifestResult<&str> {
        match self.attributes()?.get(&self.version_key) {
            Some(version) if !version.is_empty() => Ok(version),
            _ => Err(ManifestError::missing_version(&self.name, &self.path)),
        }
    }

    /// All attributes found in the manifest
    pub fn attributes(&self) -> ManifestResult<&AttributeMap> {
        self.load().map(|loaded| &loaded.attributes)
    }

    /// A single attribute, looked up without regard to case
    pub fn get(&self, key: &str) -> ManifestResult<Option<&str>> {
        Ok(self.attributes()?.get(key))
    }

    /// Encoding the manifest was decoded from
    pub fn detection(&self) -> ManifestResult<Detection> {
        self.load().map(|loaded| loaded.detection)
    }

    fn load(&self) -> ManifestResult<&LoadedManifest> {
        self.loaded.get_or_try_init(|| {
            self.read().map_err(|source| ManifestError::read(&self.name, &self.path, source))
        })
    }

    fn read(&self) -> Result<LoadedManifest, ReadFailure> {
        debug!(module = %self.name, path = %self.path.display(), "Reading module manifest");

        let bytes = fs::read(&self.path)?;
        let detection = self.detector.detect(&bytes);
        let text = self.detector.decode(&bytes, &detection)?;
        let attributes = AttributeMap::parse(&text);

        debug!(
            module = %self.name,
            encoding = detection.label(),
            attributes = attributes.len(),
            "Parsed module manifest"
        );
        Ok(LoadedManifest { detection, attributes })
    }
}

impl fmt::Debug for PsModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PsModule")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("version_key", &self.version_key)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
