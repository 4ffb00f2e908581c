//! Byte-order mark detection.

use crate::codec::Codec;
use encoding_rs::{UTF_16BE, UTF_16LE};

/// A byte-order mark of one of the supported Unicode transformation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bom {
    /// `EF BB BF`
    Utf8,
    /// `FE FF`
    Utf16Be,
    /// `FF FE`
    Utf16Le,
}

impl Bom {
    /// Every supported mark, in the order they are tested.
    pub const ALL: [Bom; 3] = [Bom::Utf8, Bom::Utf16Be, Bom::Utf16Le];

    /// The mark itself
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Bom::Utf8 => b"\xEF\xBB\xBF",
            Bom::Utf16Be => b"\xFE\xFF",
            Bom::Utf16Le => b"\xFF\xFE",
        }
    }

    /// The codec the mark announces
    pub fn codec(self) -> Codec {
        match self {
            Bom::Utf8 => Codec::utf8(),
            Bom::Utf16Be => Codec::from(UTF_16BE),
            Bom::Utf16Le => Codec::from(UTF_16LE),
        }
    }

    /// The mark `data` starts with, if any.
    pub fn detect(data: &[u8]) -> Option<Bom> {
        Self::ALL
            .into_iter()
            .find(|bom| data.starts_with(bom.bytes()))
    }

    /// `data` without `codec`'s own mark, when it starts with one.
    pub(crate) fn strip_for(codec: Codec, data: &[u8]) -> &[u8] {
        match Self::detect(data) {
            Some(bom) if bom.codec() == codec => &data[bom.bytes().len()..],
            _ => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_mark_is_found_and_no_other() {
        let tail: &[u8] = b"\xFE\xFF\xFF\xFE<html>";
        for bom in Bom::ALL {
            let mut data = bom.bytes().to_vec();
            data.extend_from_slice(tail);
            assert_eq!(Bom::detect(&data), Some(bom));
            for other in Bom::ALL.into_iter().filter(|&o| o != bom) {
                assert!(!data.starts_with(other.bytes()), "{bom:?} vs {other:?}");
            }
        }
    }

    #[test]
    fn test_no_mark() {
        assert_eq!(Bom::detect(b""), None);
        assert_eq!(Bom::detect(b"\xEF\xBB"), None);
        assert_eq!(Bom::detect(b"<html>"), None);
        assert_eq!(Bom::detect(b"\x00<\x00h"), None);
    }

    #[test]
    fn test_strip_for_matching_codec_only() {
        let data = b"\xFF\xFEa\x00";
        assert_eq!(Bom::strip_for(Codec::from(UTF_16LE), data), b"a\x00");
        assert_eq!(Bom::strip_for(Codec::from(UTF_16BE), data), data);
        assert_eq!(Bom::strip_for(Codec::utf8(), b"\xEF\xBB\xBFx"), b"x");
    }
}
