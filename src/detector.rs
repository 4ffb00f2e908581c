//! Best-effort collaborators consulted late in the pipeline.
//!
//! Both are injected into [`EncodingSniffer`](crate::EncodingSniffer) rather than looked up
//! globally, so tests and embedders can swap them for closures:
//!
//! ```rust
//! use sniffrs::{EncodingSniffer, SniffOptions};
//!
//! let sniffer = EncodingSniffer::new(SniffOptions::default())
//!     .with_detector(|_: &[u8]| -> Option<String> { Some("koi8-r".into()) })
//!     .with_locale(|| -> Option<String> { None });
//! let detection = sniffer.detect(b"\xf0\xd2\xc9\xd7\xc5\xd4", None);
//! assert_eq!(detection.codec.name(), "KOI8-R");
//! ```

use chardetng::EncodingDetector;
use std::env;

/// Guesses an encoding label from byte statistics.
///
/// Returning `None` means "no opinion"; the pipeline then moves on. A returned label that does
/// not resolve is treated the same way.
pub trait StatisticalDetector: Send + Sync {
    /// Guess a label for `window`, or `None` to abstain
    fn detect(&self, window: &[u8]) -> Option<String>;
}

impl<F> StatisticalDetector for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn detect(&self, window: &[u8]) -> Option<String> {
        self(window)
    }
}

/// Reports the host's preferred text encoding, if it has one.
pub trait LocaleEncoding: Send + Sync {
    /// The locale's encoding label, if any
    fn preferred_encoding(&self) -> Option<String>;
}

impl<F> LocaleEncoding for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn preferred_encoding(&self) -> Option<String> {
        self()
    }
}

/// [`StatisticalDetector`] backed by `chardetng`.
///
/// Abstains on empty or pure-ASCII input, where every candidate decodes identically and a
/// guess would only mask the caller's fallback.
#[derive(Debug, Clone, Copy)]
pub struct ChardetngDetector {
    /// Whether UTF-8 may be guessed
    pub allow_utf8: bool,
}

impl ChardetngDetector {
    pub fn new() -> Self {
        Self { allow_utf8: true }
    }
}

impl Default for ChardetngDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticalDetector for ChardetngDetector {
    fn detect(&self, window: &[u8]) -> Option<String> {
        if window.is_ascii() {
            return None;
        }
        let mut detector = EncodingDetector::new();
        detector.feed(window, true);
        let encoding = detector.guess(None, self.allow_utf8);
        Some(encoding.name().to_string())
    }
}

/// [`LocaleEncoding`] read from the POSIX locale environment variables.
///
/// The first non-empty of `LC_ALL`, `LC_CTYPE` and `LANG` wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocale;

impl LocaleEncoding for EnvLocale {
    fn preferred_encoding(&self) -> Option<String> {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .into_iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty())
            .and_then(|locale| codeset_of(&locale))
    }
}

/// Codeset part of a locale name: `de_DE.ISO-8859-15@euro` gives `ISO-8859-15`.
///
/// The `C` and `POSIX` locales are plain ASCII.
pub(crate) fn codeset_of(locale: &str) -> Option<String> {
    let locale = locale.split('@').next().unwrap_or(locale).trim();
    if locale == "C" || locale == "POSIX" {
        return Some("ANSI_X3.4-1968".to_string());
    }
    let (_, codeset) = locale.split_once('.')?;
    (!codeset.is_empty()).then(|| codeset.to_string())
}
