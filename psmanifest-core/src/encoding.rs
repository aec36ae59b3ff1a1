//! Character encoding detection and conversion to UTF-8
//!
//! Manifests written on Windows come in whatever encoding the editor
//! picked: UTF-16 with a byte-order mark, UTF-8 with or without one, or a
//! legacy single-byte code page. Detection is pluggable through the
//! [`EncodingDetector`] trait; [`HeuristicDetector`] is the default.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Number of leading bytes inspected by the NUL-pattern heuristics
const SNIFF_SAMPLE_LEN: usize = 4096;

const UTF32LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
const UTF32BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// Errors raised while detecting or converting an encoding
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Input is not valid in the detected encoding
    #[error("content is not valid {encoding}")]
    Malformed { encoding: &'static str },

    /// A UTF-32 unit outside the Unicode scalar range
    #[error("invalid code point U+{value:X} in {encoding}")]
    InvalidCodePoint { encoding: &'static str, value: u32 },

    /// Label does not name an encoding known to the converter
    #[error("unknown encoding label '{label}'")]
    UnknownLabel { label: String },
}

/// How much the detector trusts its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Statistical guess over the byte distribution
    Low,
    /// Structural hint, such as the NUL layout of BOM-less UTF-16
    Medium,
    /// Input validates in the reported encoding
    High,
    /// Byte-order mark or explicit configuration
    Certain,
}

/// Encoding a manifest can be converted from
///
/// `encoding_rs` covers the WHATWG encodings; UTF-32 is outside that set
/// and is decoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Standard(&'static Encoding),
    Utf32Le,
    Utf32Be,
}

impl SourceEncoding {
    /// Resolve a label, accepting `utf-32le`/`utf-32be` besides the WHATWG labels
    pub fn for_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("utf-32le") || label.eq_ignore_ascii_case("utf-32") {
            Some(Self::Utf32Le)
        } else if label.eq_ignore_ascii_case("utf-32be") {
            Some(Self::Utf32Be)
        } else {
            Encoding::for_label(label.as_bytes()).map(Self::Standard)
        }
    }

    /// Encoding announced by a leading byte-order mark, with the mark's length
    pub fn for_bom(bytes: &[u8]) -> Option<(Self, usize)> {
        // The UTF-32LE mark begins with the UTF-16LE one, so it is checked first
        if bytes.starts_with(&UTF32LE_BOM) {
            Some((Self::Utf32Le, UTF32LE_BOM.len()))
        } else if bytes.starts_with(&UTF32BE_BOM) {
            Some((Self::Utf32Be, UTF32BE_BOM.len()))
        } else {
            Encoding::for_bom(bytes).map(|(encoding, len)| (Self::Standard(encoding), len))
        }
    }

    /// Canonical name of the encoding
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard(encoding) => encoding.name(),
            Self::Utf32Le => "UTF-32LE",
            Self::Utf32Be => "UTF-32BE",
        }
    }

    /// Convert `bytes` (without BOM) to UTF-8, failing on malformed input
    pub fn decode(&self, bytes: &[u8]) -> Result<String, EncodingError> {
        match self {
            Self::Standard(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or(EncodingError::Malformed { encoding: self.name() }),
            Self::Utf32Le => self.decode_utf32(bytes, u32::from_le_bytes),
            Self::Utf32Be => self.decode_utf32(bytes, u32::from_be_bytes),
        }
    }

    fn decode_utf32(
        &self,
        bytes: &[u8],
        unit: fn([u8; 4]) -> u32,
    ) -> Result<String, EncodingError> {
        let units = bytes.chunks_exact(4);
        if !units.remainder().is_empty() {
            return Err(EncodingError::Malformed { encoding: self.name() });
        }
        units
            .map(|quad| {
                let value = unit([quad[0], quad[1], quad[2], quad[3]]);
                char::from_u32(value)
                    .ok_or(EncodingError::InvalidCodePoint { encoding: self.name(), value })
            })
            .collect()
    }
}

impl From<&'static Encoding> for SourceEncoding {
    fn from(encoding: &'static Encoding) -> Self {
        Self::Standard(encoding)
    }
}

impl PartialEq<&'static Encoding> for SourceEncoding {
    fn eq(&self, other: &&'static Encoding) -> bool {
        matches!(self, Self::Standard(encoding) if encoding == other)
    }
}

/// Outcome of [`EncodingDetector::detect`]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Source encoding of the bytes
    pub encoding: SourceEncoding,
    /// Length of the byte-order mark to skip before decoding
    pub bom_len: usize,
    pub confidence: Confidence,
}

impl Detection {
    pub fn new(encoding: impl Into<SourceEncoding>, confidence: Confidence) -> Self {
        Self { encoding: encoding.into(), bom_len: 0, confidence }
    }

    /// Canonical label of the detected encoding
    pub fn label(&self) -> &'static str {
        self.encoding.name()
    }
}

impl fmt::Debug for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detection")
            .field("encoding", &self.label())
            .field("bom_len", &self.bom_len)
            .field("confidence", &self.confidence)
            .finish()
    }
}

/// Detects the encoding of raw bytes and converts them to UTF-8
pub trait EncodingDetector: Send + Sync {
    /// Guess the encoding of `bytes`
    fn detect(&self, bytes: &[u8]) -> Detection;

    /// Convert `bytes` from the detected encoding to UTF-8.
    ///
    /// Malformed sequences are an error rather than being replaced.
    fn decode(&self, bytes: &[u8], detection: &Detection) -> Result<String, EncodingError> {
        let body = bytes.get(detection.bom_len..).unwrap_or_default();
        detection.encoding.decode(body)
    }
}

/// Byte-order mark, NUL layout, UTF-8 validity, then a statistical guess
#[derive(Debug, Clone, Default)]
pub struct HeuristicDetector;

impl HeuristicDetector {
    pub fn new() -> Self {
        Self
    }

    /// Recognise BOM-less UTF-32: every unit of BMP text has two NUL high bytes
    fn sniff_utf32(bytes: &[u8]) -> Option<SourceEncoding> {
        let sample = &bytes[..bytes.len().min(SNIFF_SAMPLE_LEN)];
        if sample.len() < 4 || bytes.len() % 4 != 0 {
            return None;
        }

        let mut quads = sample.chunks_exact(4);
        if quads.clone().all(|q| q[2] == 0 && q[3] == 0 && (q[0] != 0 || q[1] != 0)) {
            Some(SourceEncoding::Utf32Le)
        } else if quads.all(|q| q[0] == 0 && q[1] == 0 && (q[2] != 0 || q[3] != 0)) {
            Some(SourceEncoding::Utf32Be)
        } else {
            None
        }
    }

    /// Recognise BOM-less UTF-16 from where NUL bytes fall in ASCII-heavy text
    fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
        let sample = &bytes[..bytes.len().min(SNIFF_SAMPLE_LEN)];
        let pairs = sample.len() / 2;
        if pairs == 0 || bytes.len() % 2 != 0 {
            return None;
        }

        let (mut even_nuls, mut odd_nuls) = (0usize, 0usize);
        for pair in sample.chunks_exact(2) {
            if pair[0] == 0 {
                even_nuls += 1;
            }
            if pair[1] == 0 {
                odd_nuls += 1;
            }
        }

        if odd_nuls * 3 > pairs && even_nuls * 20 <= pairs {
            Some(UTF_16LE)
        } else if even_nuls * 3 > pairs && odd_nuls * 20 <= pairs {
            Some(UTF_16BE)
        } else {
            None
        }
    }
}

impl EncodingDetector for HeuristicDetector {
    fn detect(&self, bytes: &[u8]) -> Detection {
        let detection = if let Some((encoding, bom_len)) = SourceEncoding::for_bom(bytes) {
            Detection { encoding, bom_len, confidence: Confidence::Certain }
        } else if let Some(encoding) = Self::sniff_utf32(bytes) {
            Detection::new(encoding, Confidence::Medium)
        } else if let Some(encoding) = Self::sniff_utf16(bytes) {
            Detection::new(encoding, Confidence::Medium)
        } else if std::str::from_utf8(bytes).is_ok() {
            Detection::new(UTF_8, Confidence::High)
        } else {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(bytes, true);
            Detection::new(detector.guess(None, true), Confidence::Low)
        };

        debug!(
            encoding = detection.label(),
            confidence = ?detection.confidence,
            bom_len = detection.bom_len,
            "Detected manifest encoding"
        );
        detection
    }
}

/// Always reports one configured encoding
#[derive(Clone, Copy)]
pub struct ForcedEncoding {
    encoding: SourceEncoding,
}

impl ForcedEncoding {
    pub fn new(encoding: impl Into<SourceEncoding>) -> Self {
        Self { encoding: encoding.into() }
    }

    /// Resolve a label such as `utf-16le`, `utf-32le` or `latin1`
    pub fn for_label(label: &str) -> Result<Self, EncodingError> {
        SourceEncoding::for_label(label)
            .map(Self::new)
            .ok_or_else(|| EncodingError::UnknownLabel { label: label.to_string() })
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }
}

impl fmt::Debug for ForcedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ForcedEncoding").field(&self.encoding.name()).finish()
    }
}

impl EncodingDetector for ForcedEncoding {
    fn detect(&self, bytes: &[u8]) -> Detection {
        // A BOM for the pinned encoding is still not part of the text
        let bom_len = match SourceEncoding::for_bom(bytes) {
            Some((encoding, len)) if encoding == self.encoding => len,
            _ => 0,
        };
        Detection { encoding: self.encoding, bom_len, confidence: Confidence::Certain }
    }
}
