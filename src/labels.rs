//! Encoding label resolution.
//!
//! Maps the many spellings a document or a server may use for a charset (WHATWG labels,
//! IANA `cs*` aliases, vendor code page names) onto a single [`Codec`].
//!
//! Labels are compared after removing ASCII whitespace, control characters and punctuation
//! and lowercasing, so `ISO_8859-5:1988`, ` iso8859-5 ` and `iso88595` all resolve alike.
//! Labels `encoding_rs` has no decoder for map to a [`CodePage`]; the WHATWG `replacement`
//! labels are absent.

use crate::code_pages::CodePage;
use crate::codec::Codec;
use encoding_rs::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LABEL_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x09-\x0D\x20-\x2F\x3A-\x40\x5B-\x60\x7B-\x7E]").expect("valid label regex")
});

static ALIASES: Lazy<HashMap<&'static str, Codec>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(STANDARD_LABELS.len() * 8);
    for &(encoding, labels) in STANDARD_LABELS {
        for &label in labels {
            table.insert(label, Codec::Standard(encoding));
        }
    }
    for &(page, labels) in LEGACY_LABELS {
        for &label in labels {
            table.insert(label, Codec::Legacy(page));
        }
    }
    table.insert("xuserdefined", Codec::XUserDefined);
    table
});

/// Resolve a textual label. Returns `None` for anything not in the table.
///
/// ```rust
/// use sniffrs::{resolve, Codec};
///
/// assert_eq!(resolve("Windows-1251").map(|c| c.name()), Some("windows-1251"));
/// assert_eq!(resolve("x-user-defined"), Some(Codec::XUserDefined));
/// assert_eq!(resolve("no-such-charset"), None);
/// ```
pub fn resolve(label: &str) -> Option<Codec> {
    if !label.is_ascii() {
        return None;
    }
    let key = LABEL_NOISE.replace_all(label, "").to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }
    ALIASES.get(key.as_str()).copied()
}

/// Resolve a label taken straight from markup bytes.
pub fn resolve_bytes(label: &[u8]) -> Option<Codec> {
    std::str::from_utf8(label).ok().and_then(resolve)
}

/// Every key of the alias table, for consistency checks.
pub fn known_labels() -> impl Iterator<Item = &'static str> {
    ALIASES.keys().copied()
}

/// Normalised labels per encoding.
///
/// Keys are already stripped of punctuation and lowercased.
static STANDARD_LABELS: &[(&Encoding, &[&str])] = &[
    (
        &UTF_8_INIT,
        &[
            "unicode11utf8",
            "unicode20utf8",
            "utf8",
            "xunicode20utf8",
        ],
    ),
    (&IBM866_INIT, &["866", "cp866", "csibm866", "ibm866"]),
    (
        &ISO_8859_2_INIT,
        &[
            "csisolatin2",
            "iso88592",
            "isoir101",
            "iso885921987",
            "l2",
            "latin2",
        ],
    ),
    (
        &ISO_8859_3_INIT,
        &[
            "csisolatin3",
            "iso88593",
            "isoir109",
            "iso885931988",
            "l3",
            "latin3",
        ],
    ),
    (
        &ISO_8859_4_INIT,
        &[
            "csisolatin4",
            "iso88594",
            "isoir110",
            "iso885941988",
            "l4",
            "latin4",
        ],
    ),
    (
        &ISO_8859_5_INIT,
        &[
            "csisolatincyrillic",
            "cyrillic",
            "iso88595",
            "isoir144",
            "iso885951988",
        ],
    ),
    (
        &ISO_8859_6_INIT,
        &[
            "arabic",
            "asmo708",
            "csiso88596e",
            "csiso88596i",
            "csisolatinarabic",
            "ecma114",
            "iso88596",
            "iso88596e",
            "iso88596i",
            "isoir127",
            "iso885961987",
        ],
    ),
    (
        &ISO_8859_7_INIT,
        &[
            "csisolatingreek",
            "ecma118",
            "elot928",
            "greek",
            "greek8",
            "iso88597",
            "isoir126",
            "iso885971987",
            "suneugreek",
        ],
    ),
    (
        &ISO_8859_8_INIT,
        &[
            "csiso88598e",
            "csisolatinhebrew",
            "hebrew",
            "iso88598",
            "iso88598e",
            "isoir138",
            "iso885981988",
            "visual",
        ],
    ),
    (&ISO_8859_8_I_INIT, &["csiso88598i", "iso88598i", "logical"]),
    (
        &ISO_8859_10_INIT,
        &[
            "csisolatin6",
            "iso885910",
            "isoir157",
            "iso8859101992",
            "l6",
            "latin6",
        ],
    ),
    (&ISO_8859_13_INIT, &["iso885913"]),
    (
        &ISO_8859_14_INIT,
        &[
            "iso885914",
            "iso8859141998",
            "isoceltic",
            "isoir199",
            "l8",
            "latin8",
        ],
    ),
    (
        &ISO_8859_15_INIT,
        &["csisolatin9", "iso885915", "l9", "latin9"],
    ),
    (
        &ISO_8859_16_INIT,
        &["iso885916", "iso8859162001", "isoir226", "l10", "latin10"],
    ),
    (&KOI8_R_INIT, &["cskoi8r", "koi", "koi8", "koi8r"]),
    (&KOI8_U_INIT, &["koi8ru", "koi8u"]),
    (&MACINTOSH_INIT, &["csmacintosh", "mac", "macintosh", "xmacroman"]),
    (
        &WINDOWS_874_INIT,
        &["dos874", "iso885911", "tis620", "windows874"],
    ),
    (&WINDOWS_1250_INIT, &["cp1250", "windows1250", "xcp1250"]),
    (&WINDOWS_1251_INIT, &["cp1251", "windows1251", "xcp1251"]),
    (
        &WINDOWS_1252_INIT,
        &[
            "ansix341968",
            "ansix341986",
            "ascii",
            "cp1252",
            "cp367",
            "cp819",
            "csascii",
            "csisolatin1",
            "ibm367",
            "ibm819",
            "iso646irv1991",
            "iso646us",
            "iso88591",
            "isoir100",
            "isoir6",
            "iso885911987",
            "l1",
            "latin1",
            "us",
            "usascii",
            "windows1252",
            "xcp1252",
        ],
    ),
    (&WINDOWS_1253_INIT, &["cp1253", "windows1253", "xcp1253"]),
    (
        &WINDOWS_1254_INIT,
        &[
            "cp1254",
            "csisolatin5",
            "iso88599",
            "isoir148",
            "iso885991989",
            "l5",
            "latin5",
            "windows1254",
            "xcp1254",
        ],
    ),
    (&WINDOWS_1255_INIT, &["cp1255", "windows1255", "xcp1255"]),
    (&WINDOWS_1256_INIT, &["cp1256", "windows1256", "xcp1256"]),
    (&WINDOWS_1257_INIT, &["cp1257", "windows1257", "xcp1257"]),
    (&WINDOWS_1258_INIT, &["cp1258", "windows1258", "xcp1258"]),
    (&X_MAC_CYRILLIC_INIT, &["xmaccyrillic", "xmacukrainian"]),
    (
        &GBK_INIT,
        &[
            "chinese",
            "cp936",
            "csgb2312",
            "csiso58gb231280",
            "gb2312",
            "gb231280",
            "gbk",
            "isoir58",
            "ms936",
            "windows936",
            "xgbk",
        ],
    ),
    (&GB18030_INIT, &["gb18030"]),
    (&BIG5_INIT, &["big5", "big5hkscs", "cnbig5", "csbig5", "xxbig5"]),
    (
        &EUC_JP_INIT,
        &[
            "cseucpkdfmtjapanese",
            "eucjp",
            "extendedunixcodepackedformatforjapanese",
            "xeucjp",
        ],
    ),
    (&ISO_2022_JP_INIT, &["csiso2022jp", "iso2022jp"]),
    (
        &SHIFT_JIS_INIT,
        &[
            "csshiftjis",
            "ms932",
            "mskanji",
            "shiftjis",
            "sjis",
            "windows31j",
            "xsjis",
        ],
    ),
    (
        &EUC_KR_INIT,
        &[
            "cp949",
            "cseuckr",
            "csksc56011987",
            "euckr",
            "isoir149",
            "korean",
            "ksc56011987",
            "ksc56011989",
            "ksc5601",
            "windows949",
        ],
    ),
    (&UTF_16BE_INIT, &["unicodefffe", "utf16be"]),
    (
        &UTF_16LE_INIT,
        &[
            "csunicode",
            "iso10646ucs2",
            "ucs2",
            "unicode",
            "unicodefeff",
            "utf16",
            "utf16le",
        ],
    ),
];

/// Normalised labels per legacy code page.
static LEGACY_LABELS: &[(CodePage, &[&str])] = &[
    (CodePage::Oem(437), &["437", "cp437", "cspc8codepage437", "ibm437"]),
    (CodePage::Oem(775), &["cp775", "cspc775baltic", "ibm775"]),
    (CodePage::Oem(850), &["850", "cp850", "cspc850multilingual", "ibm850"]),
    (CodePage::Oem(852), &["852", "cp852", "cspcp852", "ibm852"]),
    (CodePage::Oem(855), &["855", "cp855", "csibm855", "ibm855"]),
    (CodePage::Oem(857), &["857", "cp857", "csibm857", "ibm857"]),
    (CodePage::Oem(860), &["860", "cp860", "csibm860", "ibm860"]),
    (CodePage::Oem(861), &["861", "cp861", "cpis", "csibm861", "ibm861"]),
    (CodePage::Oem(862), &["862", "cp862", "cspc862latinhebrew", "ibm862"]),
    (CodePage::Oem(863), &["863", "cp863", "csibm863", "ibm863"]),
    (CodePage::Oem(864), &["cp864", "csibm864", "ibm864"]),
    (CodePage::Oem(865), &["865", "cp865", "csibm865", "ibm865"]),
    (CodePage::Oem(869), &["869", "cp869", "cpgr", "csibm869", "ibm869"]),
    (
        CodePage::Ibm037,
        &[
            "cp037",
            "csibm037",
            "ebcdiccpca",
            "ebcdiccpnl",
            "ebcdiccpus",
            "ebcdiccpwt",
            "ibm037",
        ],
    ),
    (CodePage::Ibm424, &["cp424", "csibm424", "ebcdiccphe", "ibm424"]),
    (
        CodePage::Ibm500,
        &["cp500", "csibm500", "ebcdiccpbe", "ebcdiccpch", "ibm500"],
    ),
    (CodePage::Ibm1026, &["cp1026", "csibm1026", "ibm1026"]),
    (CodePage::HpRoman8, &["cshproman8", "hproman8", "r8", "roman8"]),
    (
        CodePage::Ptcp154,
        &["cp154", "csptcp154", "cyrillicasian", "pt154", "ptcp154"],
    ),
    (CodePage::Hz, &["hzgb2312"]),
    (CodePage::Iso2022Kr, &["csiso2022kr", "iso2022kr"]),
    (CodePage::Utf7, &["csunicode11utf7", "unicode11utf7", "utf7"]),
];
