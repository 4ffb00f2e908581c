//! The encoding pipeline.
//!
//! This module contains [`EncodingSniffer`], which decides how a document's bytes are to be
//! decoded and converts them to UTF-8 for tree construction.
//!
//! ## Decision chain
//!
//! Each stage is tried in order and the first one that produces a codec wins:
//!
//! 1. already-decoded text is re-encoded as UTF-8 (a transport hint is then an error)
//! 2. the caller's transport encoding
//! 3. a leading byte-order mark
//! 4. a `<meta>` charset declaration in the first [`prescan_bytes`](SniffOptions::prescan_bytes)
//! 5. the [`StatisticalDetector`]
//! 6. the caller's fallback encoding
//! 7. the host locale ([`LocaleEncoding`])
//! 8. `windows-1252`
//!
//! Once a stage has committed to a codec, a decoding failure is final: no later stage is tried.
//!
//! ## Example
//!
//! ```rust
//! use sniffrs::{EncodingSniffer, SniffOptions, DetectionSource};
//!
//! let sniffer = EncodingSniffer::new(SniffOptions::default());
//! let html = b"<html><meta charset=ISO-8859-5><p>\xbf\xe0\xd8\xd2\xd5\xe2</p></html>";
//!
//! let canonical = sniffer.to_canonical(html, None, None)?;
//! assert_eq!(canonical.detection().source, DetectionSource::MetaPrescan);
//! assert!(canonical.to_string_lossy().contains("Привет"));
//! # Ok::<(), sniffrs::SniffError>(())
//! ```

use crate::{
    bom::Bom,
    codec::Codec,
    detection::{Canonical, Detection, DetectionSource},
    detector::{ChardetngDetector, EnvLocale, LocaleEncoding, StatisticalDetector},
    error::{Result, SniffError},
    labels,
    options::SniffOptions,
    prescan::prescan,
    tree::TreeBuilder,
};
use log::{debug, warn};
use std::borrow::Cow;
use std::fmt;

/// Transport labels that mean "already UTF-8", compared trimmed and lowercased.
const PASSTHROUGH_LABELS: [&str; 3] = ["utf-8", "utf8", "ascii"];

/// A document handed to the pipeline: raw bytes, or text that was decoded elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// Undecoded bytes, sniffed and transcoded
    Bytes(&'a [u8]),
    /// Already-decoded text, passed through as UTF-8
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

/// Encoding detector and UTF-8 converter for HTML documents.
///
/// Holds its collaborators explicitly; nothing is cached or looked up globally, so one
/// sniffer can be shared across threads.
///
/// ## Custom collaborators
///
/// ```rust
/// use sniffrs::{EncodingSniffer, SniffOptions, DetectionSource};
///
/// let sniffer = EncodingSniffer::new(SniffOptions::default())
///     .with_detector(|_: &[u8]| -> Option<String> { None })
///     .with_locale(|| -> Option<String> { Some("ISO-8859-2".to_string()) });
///
/// let detection = sniffer.detect(b"\xa3\xf3d\xbc", None);
/// assert_eq!(detection.source, DetectionSource::Locale);
/// assert_eq!(detection.codec.name(), "ISO-8859-2");
/// ```
pub struct EncodingSniffer {
    options: SniffOptions,
    detector: Box<dyn StatisticalDetector>,
    locale: Box<dyn LocaleEncoding>,
}

impl EncodingSniffer {
    /// Create a sniffer using `chardetng` and the process environment's locale.
    pub fn new(options: SniffOptions) -> Self {
        Self {
            options,
            detector: Box::new(ChardetngDetector::new()),
            locale: Box::new(EnvLocale),
        }
    }

    /// Replace the statistical detector
    pub fn with_detector(mut self, detector: impl StatisticalDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Replace the host locale lookup
    pub fn with_locale(mut self, locale: impl LocaleEncoding + 'static) -> Self {
        self.locale = Box::new(locale);
        self
    }

    /// Options this sniffer was built with
    pub fn options(&self) -> &SniffOptions {
        &self.options
    }

    /// Convert `input` to UTF-8.
    ///
    /// # Arguments
    /// * `input` - Raw bytes, or text that is already decoded
    /// * `transport` - Encoding declared out of band, e.g. by an HTTP `Content-Type` header
    /// * `fallback` - Encoding to assume when neither markup nor statistics decide
    ///
    /// # Errors
    /// [`SniffError::ConflictingHint`] when text comes with a transport encoding, and
    /// [`SniffError::DecodeFailure`] when the chosen codec rejects the bytes.
    pub fn to_canonical<'a>(
        &self,
        input: impl Into<Input<'a>>,
        transport: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<Canonical<'a>> {
        let transport = transport.filter(|label| !label.trim().is_empty());

        let bytes = match input.into() {
            Input::Text(text) => {
                if let Some(label) = transport {
                    return Err(SniffError::ConflictingHint(label.to_string()));
                }
                let detection = Detection::new(Codec::utf8(), DetectionSource::Decoded);
                return Ok(Canonical::new(Cow::Borrowed(text.as_bytes()), detection));
            }
            Input::Bytes(bytes) => bytes,
        };

        if let Some(label) = transport {
            if is_passthrough_label(label) {
                debug!("transport encoding {label:?} passes through");
                let detection = Detection::new(Codec::utf8(), DetectionSource::Transport);
                return Ok(Canonical::new(Cow::Borrowed(bytes), detection));
            }
            match labels::resolve(label) {
                Some(codec) => {
                    // A UTF-16 label leaves the byte order to the BOM
                    let codec = match Bom::detect(bytes) {
                        Some(bom) if codec.is_utf16() && bom.codec().is_utf16() => bom.codec(),
                        _ => codec,
                    };
                    let body = Bom::strip_for(codec, bytes);
                    return commit(body, Detection::new(codec, DetectionSource::Transport));
                }
                None => warn!("ignoring unsupported transport encoding {label:?}"),
            }
        }

        if let Some(bom) = Bom::detect(bytes) {
            let body = &bytes[bom.bytes().len()..];
            return commit(body, Detection::new(bom.codec(), DetectionSource::ByteOrderMark));
        }

        let detection = self.detect_unmarked(bytes, fallback);
        commit(bytes, detection)
    }

    /// Decide the codec for `bytes` without converting them.
    ///
    /// Runs the byte-order mark, prescan, statistical, fallback, locale and default stages.
    /// Never fails: every stage that cannot decide hands over to the next one.
    pub fn detect(&self, bytes: &[u8], fallback: Option<&str>) -> Detection {
        match Bom::detect(bytes) {
            Some(bom) => {
                debug!("byte-order mark selects {}", bom.codec());
                Detection::new(bom.codec(), DetectionSource::ByteOrderMark)
            }
            None => self.detect_unmarked(bytes, fallback),
        }
    }

    /// Convert `input` to UTF-8 and hand it to `builder`.
    ///
    /// Malformed UTF-8 that passed through unconverted is replaced with U+FFFD on the way in.
    pub fn parse<'a, B: TreeBuilder>(
        &self,
        input: impl Into<Input<'a>>,
        transport: Option<&str>,
        fallback: Option<&str>,
        builder: &B,
    ) -> Result<B::Output> {
        let canonical = self.to_canonical(input, transport, fallback)?;
        Ok(builder.build(&canonical.to_string_lossy()))
    }

    fn detect_unmarked(&self, bytes: &[u8], fallback: Option<&str>) -> Detection {
        let prefix = &bytes[..bytes.len().min(self.options.prescan_bytes)];
        if let Some(codec) = prescan(prefix) {
            // A byte stream without a BOM cannot really be UTF-16.
            let codec = if codec.is_utf16() {
                debug!("meta prescan declared {codec}, using UTF-8 instead");
                Codec::utf8()
            } else {
                codec
            };
            debug!("meta prescan selects {codec}");
            return Detection::new(codec, DetectionSource::MetaPrescan);
        }

        let window = &bytes[..bytes.len().min(self.options.detector_window)];
        if let Some(label) = self.detector.detect(window) {
            match labels::resolve(&label) {
                Some(codec) => {
                    debug!("statistical detector selects {codec}");
                    return Detection::new(codec, DetectionSource::Statistical);
                }
                None => debug!("statistical detector guessed unsupported {label:?}"),
            }
        }

        if let Some(label) = fallback {
            match labels::resolve(label) {
                Some(codec) => {
                    debug!("fallback encoding selects {codec}");
                    return Detection::new(codec, DetectionSource::Fallback);
                }
                None => warn!("ignoring unsupported fallback encoding {label:?}"),
            }
        }

        if self.options.locale_fallback {
            if let Some(codec) = self
                .locale
                .preferred_encoding()
                .and_then(|label| labels::resolve(&label))
            {
                debug!("host locale selects {codec}");
                return Detection::new(codec, DetectionSource::Locale);
            }
        }

        let codec = Codec::legacy_default();
        debug!("no encoding found, defaulting to {codec}");
        Detection::new(codec, DetectionSource::Default)
    }
}

impl Default for EncodingSniffer {
    fn default() -> Self {
        Self::new(SniffOptions::default())
    }
}

impl fmt::Debug for EncodingSniffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingSniffer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Convert `input` to UTF-8 with a default [`EncodingSniffer`].
///
/// ```rust
/// use sniffrs::to_canonical;
///
/// let canonical = to_canonical(b"\xef\xbb\xbf<p>hi", None, None).unwrap();
/// assert_eq!(canonical.as_bytes(), b"<p>hi");
/// ```
pub fn to_canonical<'a>(
    input: impl Into<Input<'a>>,
    transport: Option<&str>,
    fallback: Option<&str>,
) -> Result<Canonical<'a>> {
    EncodingSniffer::default().to_canonical(input, transport, fallback)
}

fn is_passthrough_label(label: &str) -> bool {
    let label = label.trim().to_ascii_lowercase();
    PASSTHROUGH_LABELS.contains(&label.as_str())
}

fn commit(body: &[u8], detection: Detection) -> Result<Canonical<'_>> {
    let bytes = detection.codec.transcode(body)?;
    Ok(Canonical::new(bytes, detection))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sniffer whose late stages are fully under test control
    fn isolated() -> EncodingSniffer {
        EncodingSniffer::new(SniffOptions::default())
            .with_detector(|_: &[u8]| -> Option<String> { None })
            .with_locale(|| -> Option<String> { None })
    }

    #[test]
    fn test_empty_input_uses_default() {
        let canonical = isolated().to_canonical(b"", None, None).unwrap();
        assert_eq!(canonical.codec(), Codec::legacy_default());
        assert_eq!(canonical.detection().source, DetectionSource::Default);
        assert!(canonical.as_bytes().is_empty());
    }

    #[test]
    fn test_text_with_transport_conflicts() {
        let err = isolated()
            .to_canonical("<p>hi</p>", Some("utf-16"), None)
            .unwrap_err();
        assert_eq!(err, SniffError::ConflictingHint("utf-16".to_string()));
    }

    #[test]
    fn test_text_is_borrowed() {
        let text = String::from("<p>héllo</p>");
        let canonical = isolated().to_canonical(&text, None, None).unwrap();
        assert_eq!(canonical.detection().source, DetectionSource::Decoded);
        assert_eq!(canonical.as_bytes(), text.as_bytes());
        assert!(!canonical.is_owned());
    }

    #[test]
    fn test_passthrough_transport_skips_validation() {
        for label in ["UTF-8", " utf8 ", "ASCII"] {
            let canonical = isolated()
                .to_canonical(b"caf\xe9", Some(label), None)
                .unwrap();
            assert_eq!(canonical.as_bytes(), b"caf\xe9", "{label}");
            assert_eq!(canonical.detection().source, DetectionSource::Transport);
        }
    }

    #[test]
    fn test_transport_beats_meta() {
        let html = b"<meta charset=utf-8><p>\xe9";
        let canonical = isolated()
            .to_canonical(html, Some("latin1"), None)
            .unwrap();
        assert_eq!(canonical.to_string_lossy(), "<meta charset=utf-8><p>é");
    }

    #[test]
    fn test_transport_decode_failure_is_final() {
        let err = isolated()
            .to_canonical(b"\x82", Some("shift_jis"), Some("latin1"))
            .unwrap_err();
        assert_eq!(err, SniffError::DecodeFailure { encoding: "Shift_JIS" });
    }

    #[test]
    fn test_unknown_transport_is_ignored() {
        let canonical = isolated()
            .to_canonical(b"<meta charset=koi8-r>", Some("klingon"), None)
            .unwrap();
        assert_eq!(canonical.detection().source, DetectionSource::MetaPrescan);
    }

    #[test]
    fn test_transport_drops_own_bom() {
        let canonical = isolated()
            .to_canonical(b"\xff\xfeh\x00i\x00", Some("utf-16le"), None)
            .unwrap();
        assert_eq!(canonical.as_bytes(), b"hi");
    }

    #[test]
    fn test_utf16_transport_follows_bom_byte_order() {
        let canonical = isolated()
            .to_canonical(b"\xfe\xff\x00h\x00i", Some("utf-16"), None)
            .unwrap();
        assert_eq!(canonical.as_bytes(), b"hi");
        assert_eq!(canonical.codec().name(), "UTF-16BE");
        assert_eq!(canonical.detection().source, DetectionSource::Transport);

        let canonical = isolated()
            .to_canonical(b"\xff\xfeh\x00i\x00", Some("utf-16be"), None)
            .unwrap();
        assert_eq!(canonical.as_bytes(), b"hi");
        assert_eq!(canonical.codec().name(), "UTF-16LE");
    }

    #[test]
    fn test_utf16_transport_without_bom_keeps_label() {
        let canonical = isolated()
            .to_canonical(b"h\x00i\x00", Some("utf-16"), None)
            .unwrap();
        assert_eq!(canonical.as_bytes(), b"hi");
        assert_eq!(canonical.codec().name(), "UTF-16LE");
    }

    #[test]
    fn test_utf16_bom() {
        let canonical = isolated()
            .to_canonical(b"\xfe\xff\x00h\x00i", None, None)
            .unwrap();
        assert_eq!(canonical.as_bytes(), b"hi");
        assert_eq!(canonical.detection().source, DetectionSource::ByteOrderMark);
    }

    #[test]
    fn test_utf8_bom_is_borrowed() {
        let canonical = isolated()
            .to_canonical(b"\xef\xbb\xbf<p>hi", None, None)
            .unwrap();
        assert_eq!(canonical.as_bytes(), b"<p>hi");
        assert!(!canonical.is_owned());
    }

    #[test]
    fn test_meta_utf16_becomes_utf8() {
        let canonical = isolated()
            .to_canonical("<meta charset=utf-16>é".as_bytes(), None, None)
            .unwrap();
        assert_eq!(canonical.codec(), Codec::utf8());
        assert_eq!(canonical.to_string_lossy(), "<meta charset=utf-16>é");
    }

    #[test]
    fn test_meta_outside_prescan_window_is_not_seen() {
        let mut html = vec![b' '; 64];
        html.extend_from_slice(b"<meta charset=koi8-r>");
        let sniffer = EncodingSniffer::new(SniffOptions::builder().prescan_bytes(64).build())
            .with_detector(|_: &[u8]| -> Option<String> { None })
            .with_locale(|| -> Option<String> { None });
        assert_eq!(sniffer.detect(&html, None).source, DetectionSource::Default);
        assert_eq!(isolated().detect(&html, None).source, DetectionSource::MetaPrescan);
    }

    #[test]
    fn test_detector_sees_bounded_window() {
        let sniffer = EncodingSniffer::new(SniffOptions::builder().detector_window(4).build())
            .with_detector(|window: &[u8]| -> Option<String> {
                assert_eq!(window.len(), 4);
                Some("koi8-r".to_string())
            });
        let detection = sniffer.detect(b"\xf0\xd2\xc9\xd7\xc5\xd4", None);
        assert_eq!(detection.source, DetectionSource::Statistical);
        assert_eq!(detection.codec.name(), "KOI8-R");
    }

    #[test]
    fn test_unresolvable_detector_guess_falls_through() {
        let sniffer = isolated().with_detector(|_: &[u8]| -> Option<String> {
            Some("klingon".to_string())
        });
        let detection = sniffer.detect(b"\xe9", Some("iso-8859-2"));
        assert_eq!(detection.source, DetectionSource::Fallback);
        assert_eq!(detection.codec.name(), "ISO-8859-2");
    }

    #[test]
    fn test_unknown_fallback_then_locale() {
        let sniffer = isolated().with_locale(|| -> Option<String> { Some("UTF-8".to_string()) });
        let detection = sniffer.detect(b"", Some("klingon"));
        assert_eq!(detection.source, DetectionSource::Locale);
        assert_eq!(detection.codec, Codec::utf8());
    }

    #[test]
    fn test_locale_stage_can_be_disabled() {
        let sniffer = EncodingSniffer::new(SniffOptions::builder().locale_fallback(false).build())
            .with_detector(|_: &[u8]| -> Option<String> { None })
            .with_locale(|| -> Option<String> { Some("koi8-r".to_string()) });
        assert_eq!(sniffer.detect(b"", None).source, DetectionSource::Default);
    }

    #[test]
    fn test_x_user_defined_fallback() {
        let canonical = isolated()
            .to_canonical(b"a\x80", None, Some("x-user-defined"))
            .unwrap();
        assert_eq!(canonical.to_string_lossy(), "a\u{F780}");
    }

    #[test]
    fn test_statistical_decode_failure_is_final() {
        let sniffer = isolated().with_detector(|_: &[u8]| -> Option<String> {
            Some("shift_jis".to_string())
        });
        let err = sniffer.to_canonical(b"\x82", None, Some("latin1")).unwrap_err();
        assert_eq!(err, SniffError::DecodeFailure { encoding: "Shift_JIS" });
    }

    #[test]
    fn test_sniffer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EncodingSniffer>();
    }
}
