//! Legacy code pages that browsers no longer decode but older documents still declare.
//!
//! DOS/OEM pages go through [`oem_cp`], HZ through the `encoding` crate, and the EBCDIC,
//! HP Roman-8 and PT154 pages through the tables in `byte_tables`. UTF-7 and ISO-2022-KR are
//! small stateful schemes and are decoded here directly; the Korean half of ISO-2022-KR is
//! handed to `encoding_rs`'s EUC-KR decoder.
//!
//! Every decoder is strict: an unassigned byte or a malformed sequence yields `None`.

use crate::byte_tables::{self, UNMAPPED};
use encoding::{DecoderTrap, Encoding as _};
use oem_cp::code_table::DECODING_TABLE_CP_MAP;

/// A code page resolved by label but not known to `encoding_rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePage {
    /// A DOS/OEM page, by number (437, 850, ...)
    Oem(u16),
    /// EBCDIC US/Canada
    Ibm037,
    /// EBCDIC Hebrew
    Ibm424,
    /// EBCDIC International
    Ibm500,
    /// EBCDIC Turkish
    Ibm1026,
    HpRoman8,
    Ptcp154,
    /// `HZ-GB-2312`, RFC 1843
    Hz,
    /// RFC 1557
    Iso2022Kr,
    /// RFC 2152
    Utf7,
}

impl CodePage {
    /// DOS pages with a label in the alias table
    pub const OEM_PAGES: [u16; 13] = [
        437, 775, 850, 852, 855, 857, 860, 861, 862, 863, 864, 865, 869,
    ];

    /// Every non-OEM page
    pub const OTHERS: [CodePage; 9] = [
        CodePage::Ibm037,
        CodePage::Ibm424,
        CodePage::Ibm500,
        CodePage::Ibm1026,
        CodePage::HpRoman8,
        CodePage::Ptcp154,
        CodePage::Hz,
        CodePage::Iso2022Kr,
        CodePage::Utf7,
    ];

    /// IANA name of the code page
    pub fn name(&self) -> &'static str {
        match self {
            CodePage::Oem(page) => oem_name(*page),
            CodePage::Ibm037 => "IBM037",
            CodePage::Ibm424 => "IBM424",
            CodePage::Ibm500 => "IBM500",
            CodePage::Ibm1026 => "IBM1026",
            CodePage::HpRoman8 => "hp-roman8",
            CodePage::Ptcp154 => "PTCP154",
            CodePage::Hz => "HZ-GB-2312",
            CodePage::Iso2022Kr => "ISO-2022-KR",
            CodePage::Utf7 => "UTF-7",
        }
    }

    /// Decode `bytes`, returning `None` on the first byte the page cannot map.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            CodePage::Oem(page) => DECODING_TABLE_CP_MAP
                .get(page)
                .and_then(|table| table.decode_string_checked(bytes)),
            CodePage::Ibm037 => decode_full_table(&byte_tables::IBM037, bytes),
            CodePage::Ibm424 => decode_full_table(&byte_tables::IBM424, bytes),
            CodePage::Ibm500 => decode_full_table(&byte_tables::IBM500, bytes),
            CodePage::Ibm1026 => decode_full_table(&byte_tables::IBM1026, bytes),
            CodePage::HpRoman8 => decode_upper_table(&byte_tables::HP_ROMAN8, bytes),
            CodePage::Ptcp154 => decode_upper_table(&byte_tables::PTCP154, bytes),
            CodePage::Hz => encoding::all::HZ.decode(bytes, DecoderTrap::Strict).ok(),
            CodePage::Iso2022Kr => decode_iso_2022_kr(bytes),
            CodePage::Utf7 => decode_utf7(bytes),
        }
    }
}

fn oem_name(page: u16) -> &'static str {
    match page {
        437 => "IBM437",
        775 => "IBM775",
        850 => "IBM850",
        852 => "IBM852",
        855 => "IBM855",
        857 => "IBM857",
        860 => "IBM860",
        861 => "IBM861",
        862 => "IBM862",
        863 => "IBM863",
        864 => "IBM864",
        865 => "IBM865",
        869 => "IBM869",
        _ => "OEM",
    }
}

fn table_char(unit: u16) -> Option<char> {
    if unit == UNMAPPED {
        None
    } else {
        char::from_u32(u32::from(unit))
    }
}

fn decode_full_table(table: &[u16; 256], bytes: &[u8]) -> Option<String> {
    bytes
        .iter()
        .map(|&b| table_char(table[usize::from(b)]))
        .collect()
}

fn decode_upper_table(table: &[u16; 128], bytes: &[u8]) -> Option<String> {
    bytes
        .iter()
        .map(|&b| match b {
            0x00..=0x7F => Some(char::from(b)),
            _ => table_char(table[usize::from(b - 0x80)]),
        })
        .collect()
}

/// Designates KS X 1001 into G1; carries no text
const KR_DESIGNATOR: &[u8] = b"\x1b$)C";
const SHIFT_OUT: u8 = 0x0E;
const SHIFT_IN: u8 = 0x0F;

/// ISO-2022-KR: ASCII, with `SO`..`SI` runs of 7-bit KS X 1001 pairs.
///
/// Shifted bytes get their high bit set and the whole stream is decoded as EUC-KR, which is
/// the same character set in 8-bit form.
fn decode_iso_2022_kr(bytes: &[u8]) -> Option<String> {
    let mut euc = Vec::with_capacity(bytes.len());
    let mut shifted = false;
    let mut rest = bytes;

    while let Some((&b, tail)) = rest.split_first() {
        if rest.starts_with(KR_DESIGNATOR) {
            rest = &rest[KR_DESIGNATOR.len()..];
            continue;
        }
        match b {
            SHIFT_OUT => shifted = true,
            SHIFT_IN | b'\n' | b'\r' => {
                shifted = false;
                if b != SHIFT_IN {
                    euc.push(b);
                }
            }
            0x80..=0xFF => return None,
            0x21..=0x7E if shifted => euc.push(b | 0x80),
            _ => euc.push(b),
        }
        rest = tail;
    }

    encoding_rs::EUC_KR
        .decode_without_bom_handling_and_without_replacement(&euc)
        .map(|text| text.into_owned())
}

fn base64_value(b: u8) -> Option<u32> {
    let value = match b {
        b'A'..=b'Z' => b - b'A',
        b'a'..=b'z' => b - b'a' + 26,
        b'0'..=b'9' => b - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u32::from(value))
}

/// UTF-7: printable ASCII as is, everything else as `+`-introduced modified base64 of UTF-16.
fn decode_utf7(bytes: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();

    while let Some(b) = iter.next() {
        if b >= 0x80 {
            return None;
        }
        if b != b'+' {
            out.push(char::from(b));
            continue;
        }
        if iter.peek() == Some(&b'-') {
            iter.next();
            out.push('+');
            continue;
        }

        let mut units = Vec::new();
        let mut bits: u32 = 0;
        let mut width = 0u32;
        while let Some(value) = iter.peek().copied().and_then(base64_value) {
            iter.next();
            bits = (bits << 6) | value;
            width += 6;
            if width >= 16 {
                width -= 16;
                units.push((bits >> width) as u16);
                bits &= (1 << width) - 1;
            }
        }
        // Leftover padding must be short and zero
        if width >= 6 || bits != 0 {
            return None;
        }
        if iter.peek() == Some(&b'-') {
            iter.next();
        }
        for c in char::decode_utf16(units) {
            out.push(c.ok()?);
        }
    }

    Some(out)
}
