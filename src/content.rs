//! `charset=` extraction from an HTTP-pragma `content` attribute.

use crate::cursor::{ByteCursor, SPACE_CHARS};

/// Pull the charset out of a `content` value such as `text/html; charset=koi8-r`.
///
/// Only the first occurrence of `charset` is considered. Returns `None` when there is no
/// `charset`, when it is not followed by `=`, or when nothing follows the `=`. A quoted value
/// missing its closing quote runs to the end of `content`. The result is lowercased.
pub fn extract_charset(content: &[u8]) -> Option<Vec<u8>> {
    let mut cursor = ByteCursor::new(content);
    cursor.jump_to(b"charset").ok()?;
    cursor.advance().ok()?;
    if cursor.skip(SPACE_CHARS)? != b'=' {
        return None;
    }
    cursor.advance().ok()?;

    let c = cursor.skip(SPACE_CHARS)?;
    if c == b'"' || c == b'\'' {
        cursor.advance().ok()?;
        let start = cursor.position()?;
        let end = match cursor.jump_to(&[c]) {
            Ok(()) => cursor.position()?,
            Err(_) => cursor.len(),
        };
        return Some(cursor.slice(start, end).to_vec());
    }

    let start = cursor.position()?;
    cursor.skip_until(SPACE_CHARS);
    let end = cursor.position().unwrap_or(cursor.len());
    Some(cursor.slice(start, end).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Option<String> {
        extract_charset(content.as_bytes()).map(|v| String::from_utf8(v).unwrap())
    }

    #[test]
    fn test_typical_pragma() {
        assert_eq!(
            extract("text/html; charset=ISO-8859-5"),
            Some("iso-8859-5".to_string())
        );
    }

    #[test]
    fn test_value_ends_at_whitespace() {
        assert_eq!(
            extract("text/html; charset=utf-8 ; foo"),
            Some("utf-8".to_string())
        );
    }

    #[test]
    fn test_whitespace_around_equals() {
        assert_eq!(extract("charset \t= koi8-r"), Some("koi8-r".to_string()));
    }

    #[test]
    fn test_quoted_values() {
        assert_eq!(extract("charset=\"big5\" x"), Some("big5".to_string()));
        assert_eq!(extract("charset='gbk'"), Some("gbk".to_string()));
    }

    #[test]
    fn test_unterminated_quote_takes_remainder() {
        assert_eq!(extract("charset=\"shift_jis"), Some("shift_jis".to_string()));
    }

    #[test]
    fn test_empty_quoted_value() {
        assert_eq!(extract("charset=\"\""), Some(String::new()));
    }

    #[test]
    fn test_no_charset_pragma() {
        assert_eq!(extract("text/html"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_charset_without_equals() {
        assert_eq!(extract("charset utf-8"), None);
        assert_eq!(extract("charsets=utf-8"), None);
    }

    #[test]
    fn test_nothing_after_equals() {
        assert_eq!(extract("charset="), None);
        assert_eq!(extract("charset"), None);
        assert_eq!(extract("charset=\""), None);
    }
}
