//! Resolved codecs and the decode/transcode step.
//!
//! A [`Codec`] is what every detection stage ultimately produces: a table-driven
//! [`encoding_rs`] encoding, the `x-user-defined` pseudo-codec (which maps high bytes into
//! the Private Use Area instead of through a table) or one of the legacy [`CodePage`]s.
//!
//! ## Example
//!
//! ```rust
//! use sniffrs::Codec;
//!
//! let codec: Codec = "ISO-8859-5".parse().unwrap();
//! assert_eq!(codec.name(), "ISO-8859-5");
//!
//! let utf8 = codec.transcode(b"\xbf\xe0\xd8\xd2\xd5\xe2").unwrap();
//! assert_eq!(&utf8[..], "Привет".as_bytes());
//! ```

use crate::code_pages::CodePage;
use crate::error::{Result, SniffError};
use crate::labels;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// First code point of the `x-user-defined` high-byte range (`0x80` maps here).
const X_USER_DEFINED_BASE: u32 = 0xF780;

/// A resolved, trusted decoder identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// A table-driven encoding
    Standard(&'static Encoding),

    /// `x-user-defined`: ASCII passes through, `0x80..=0xFF` become `U+F780..=U+F7FF`
    XUserDefined,

    /// A DOS, EBCDIC or other legacy code page outside `encoding_rs`
    Legacy(CodePage),
}

impl Codec {
    /// UTF-8, the canonical output encoding
    pub fn utf8() -> Self {
        Codec::Standard(UTF_8)
    }

    /// `windows-1252`, used when every detection stage comes up empty
    pub fn legacy_default() -> Self {
        Codec::Standard(WINDOWS_1252)
    }

    /// Canonical (WHATWG) name of the codec
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Standard(encoding) => encoding.name(),
            Codec::XUserDefined => "x-user-defined",
            Codec::Legacy(page) => page.name(),
        }
    }

    /// Whether decoding is unnecessary because the bytes already are UTF-8
    pub fn is_passthrough(&self) -> bool {
        *self == Codec::utf8()
    }

    /// Whether this is UTF-16 of either byte order
    pub fn is_utf16(&self) -> bool {
        matches!(self, Codec::Standard(e) if *e == UTF_16LE || *e == UTF_16BE)
    }

    /// Decode `bytes` to text, failing on the first malformed sequence.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        match self {
            Codec::Standard(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .ok_or(SniffError::DecodeFailure {
                    encoding: encoding.name(),
                }),
            Codec::XUserDefined => Ok(Cow::Owned(decode_x_user_defined(bytes))),
            Codec::Legacy(page) => page
                .decode(bytes)
                .map(Cow::Owned)
                .ok_or(SniffError::DecodeFailure {
                    encoding: page.name(),
                }),
        }
    }

    /// Convert `bytes` to UTF-8.
    ///
    /// UTF-8 input is handed back untouched and unvalidated; everything else goes through
    /// a strict [`decode`](Self::decode).
    pub fn transcode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        if self.is_passthrough() {
            return Ok(Cow::Borrowed(bytes));
        }
        Ok(match self.decode(bytes)? {
            Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
            Cow::Owned(text) => Cow::Owned(text.into_bytes()),
        })
    }
}

impl From<&'static Encoding> for Codec {
    fn from(encoding: &'static Encoding) -> Self {
        Codec::Standard(encoding)
    }
}

impl From<CodePage> for Codec {
    fn from(page: CodePage) -> Self {
        Codec::Legacy(page)
    }
}

impl FromStr for Codec {
    type Err = SniffError;

    fn from_str(label: &str) -> Result<Self> {
        labels::resolve(label).ok_or_else(|| SniffError::UnsupportedLabel(label.to_string()))
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Codec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Apply the fixed `x-user-defined` byte to code point mapping.
pub fn decode_x_user_defined(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b <= 0x7F {
                char::from(b)
            } else {
                char::from_u32(X_USER_DEFINED_BASE + u32::from(b - 0x80))
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
            }
        })
        .collect()
}
