//! Error types for manifest operations

use crate::encoding::EncodingError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for manifest operations
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest could not be read or converted to text
    #[error("could not read psd1 manifest file for {name} / {}: {source}", .path.display())]
    Read {
        name: String,
        path: PathBuf,
        #[source]
        source: ReadFailure,
    },

    /// The manifest was read but carries no usable version
    #[error("ModuleVersion not found for module {name} / {}", .path.display())]
    MissingVersion { name: String, path: PathBuf },
}

/// Underlying cause of [`ManifestError::Read`]
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl ManifestError {
    /// Create a read error
    pub fn read(name: impl Into<String>, path: &Path, source: impl Into<ReadFailure>) -> Self {
        Self::Read { name: name.into(), path: path.to_path_buf(), source: source.into() }
    }

    /// Create a missing version error
    pub fn missing_version(name: impl Into<String>, path: &Path) -> Self {
        Self::MissingVersion { name: name.into(), path: path.to_path_buf() }
    }

    /// Module name the failing manifest belongs to
    pub fn module_name(&self) -> &str {
        match self {
            Self::Read { name, .. } | Self::MissingVersion { name, .. } => name,
        }
    }

    /// Manifest path involved in the failure
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::MissingVersion { path, .. } => path,
        }
    }
}

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
