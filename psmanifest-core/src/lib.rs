//! Core functionality for psmanifest
//!
//! This crate reads PowerShell module manifests (`.psd1`): it detects the
//! file's character encoding, converts it to UTF-8 and extracts flat
//! `key = 'value'` attributes such as `ModuleVersion`.

pub mod config;
pub mod encoding;
pub mod manifest;

pub use config::{Config, ReaderConfig};
pub use encoding::{
    Confidence, Detection, EncodingDetector, EncodingError, ForcedEncoding, HeuristicDetector,
    SourceEncoding,
};
pub use manifest::{AttributeMap, ManifestError, ManifestResult, PsModule};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detectors_available_at_crate_root() {
        let forced = ForcedEncoding::for_label("utf-32be").unwrap();
        assert_eq!(forced.encoding(), SourceEncoding::Utf32Be);

        let detection = HeuristicDetector::new().detect(b"ModuleVersion = '1.0'");
        assert_eq!(detection.confidence, Confidence::High);
    }
}
