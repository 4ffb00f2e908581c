//! Pipeline output: the canonical bytes and how their encoding was decided.
//!
//! ## Example
//!
//! ```rust
//! use sniffrs::{to_canonical, DetectionSource};
//!
//! let canonical = to_canonical(b"<meta charset=koi8-r>\xf0\xd2\xc9", None, None).unwrap();
//! assert_eq!(canonical.detection().source, DetectionSource::MetaPrescan);
//! assert_eq!(canonical.to_string_lossy(), "<meta charset=koi8-r>При");
//!
//! let json = serde_json::to_string(canonical.detection()).unwrap();
//! assert_eq!(json, r#"{"codec":"KOI8-R","source":"meta_prescan"}"#);
//! ```

use crate::codec::Codec;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Which stage of the pipeline committed to the codec.
///
/// Variants are listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// The input was already text
    Decoded,
    /// The caller's transport encoding (e.g. an HTTP `Content-Type` header)
    Transport,
    /// A leading byte-order mark
    ByteOrderMark,
    /// A `<meta>` declaration found by the prescan
    MetaPrescan,
    /// The statistical detector's guess
    Statistical,
    /// The caller's fallback encoding
    Fallback,
    /// The host's preferred encoding
    Locale,
    /// Nothing else applied
    Default,
}

impl DetectionSource {
    /// Whether the encoding came from an explicit declaration rather than a guess.
    pub fn is_authoritative(self) -> bool {
        matches!(
            self,
            DetectionSource::Decoded
                | DetectionSource::Transport
                | DetectionSource::ByteOrderMark
                | DetectionSource::MetaPrescan
        )
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetectionSource::Decoded => "decoded text",
            DetectionSource::Transport => "transport encoding",
            DetectionSource::ByteOrderMark => "byte-order mark",
            DetectionSource::MetaPrescan => "meta prescan",
            DetectionSource::Statistical => "statistical detector",
            DetectionSource::Fallback => "fallback encoding",
            DetectionSource::Locale => "host locale",
            DetectionSource::Default => "default",
        })
    }
}

/// A codec together with the stage that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// The codec the document is decoded with
    pub codec: Codec,
    /// The stage that decided
    pub source: DetectionSource,
}

impl Detection {
    /// Pair a codec with its deciding stage
    pub fn new(codec: Codec, source: DetectionSource) -> Self {
        Self { codec, source }
    }
}

/// UTF-8 bytes ready for tree construction.
///
/// The bytes borrow from the input whenever no transcoding was needed. Bytes that passed
/// through as UTF-8 were not validated, so they may still contain malformed sequences; the
/// tree builder replaces those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical<'a> {
    bytes: Cow<'a, [u8]>,
    detection: Detection,
}

impl<'a> Canonical<'a> {
    pub(crate) fn new(bytes: Cow<'a, [u8]>, detection: Detection) -> Self {
        Self { bytes, detection }
    }

    /// The UTF-8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the UTF-8 bytes, borrowed or owned
    pub fn into_bytes(self) -> Cow<'a, [u8]> {
        self.bytes
    }

    /// Whether the bytes were copied out of the input
    pub fn is_owned(&self) -> bool {
        matches!(self.bytes, Cow::Owned(_))
    }

    /// How the source encoding was decided
    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    /// The codec the input was decoded with
    pub fn codec(&self) -> Codec {
        self.detection.codec
    }

    /// The bytes as text, with malformed sequences replaced by U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl AsRef<[u8]> for Canonical<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_string(&DetectionSource::ByteOrderMark).unwrap();
        assert_eq!(json, "\"byte_order_mark\"");
    }

    #[test]
    fn test_detection_serializes_codec_name() {
        let detection = Detection::new(Codec::XUserDefined, DetectionSource::Fallback);
        let value = serde_json::to_value(detection).unwrap();
        assert_eq!(value["codec"], "x-user-defined");
        assert_eq!(value["source"], "fallback");
    }

    #[test]
    fn test_authoritative_sources() {
        assert!(DetectionSource::MetaPrescan.is_authoritative());
        assert!(!DetectionSource::Statistical.is_authoritative());
        assert!(!DetectionSource::Default.is_authoritative());
    }

    #[test]
    fn test_canonical_accessors() {
        let canonical = Canonical::new(
            Cow::Borrowed(&b"caf\xc3\xa9 \xff"[..]),
            Detection::new(Codec::utf8(), DetectionSource::Transport),
        );
        assert!(!canonical.is_owned());
        assert_eq!(canonical.codec(), Codec::utf8());
        assert_eq!(canonical.to_string_lossy(), "café \u{FFFD}");
        assert_eq!(canonical.into_bytes().len(), 7);
    }
}
