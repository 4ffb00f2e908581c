//! Attribute tokenizer for the `<meta>` prescan.
//!
//! Implements the "get an attribute" steps of the HTML prescan: starting at the cursor, it
//! reads one `name` / `value` pair out of a tag, lowercasing both as it goes. It never
//! builds a token stream and never looks past the `>` that ends the tag.

use crate::cursor::{is_space, ByteCursor, SPACE_CHARS};

/// Bytes skipped before an attribute name: whitespace and stray slashes.
const SPACE_OR_SLASH: &[u8] = b"\t\n\x0c\r /";

/// One attribute pulled out of a tag.
///
/// `name` is never empty. Both halves are ASCII-lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, lowercased
    pub name: Vec<u8>,
    /// Unquoted value, lowercased; empty when the attribute has none
    pub value: Vec<u8>,
}

impl Attribute {
    fn new(name: Vec<u8>, value: Vec<u8>) -> Self {
        Self { name, value }
    }
}

/// Read the next attribute of the tag the cursor is inside.
///
/// Returns `None` when the tag ends (`>`), or when the input runs out before the attribute
/// could be completed. In the latter case the cursor is left exhausted, which ends any
/// enclosing scan.
///
/// An unquoted value cut off by the end of input is still returned as-is.
pub fn next_attribute(cursor: &mut ByteCursor) -> Option<Attribute> {
    let mut c = cursor.skip(SPACE_OR_SLASH)?;
    if c == b'>' {
        return None;
    }

    let mut name = Vec::new();
    loop {
        if c == b'=' && !name.is_empty() {
            break;
        }
        if is_space(c) {
            c = cursor.skip(SPACE_CHARS)?;
            break;
        }
        if c == b'/' || c == b'>' {
            return Some(Attribute::new(name, Vec::new()));
        }
        name.push(c.to_ascii_lowercase());
        c = cursor.advance().ok()?;
    }

    if c != b'=' {
        // Leave the byte for the next call to pick up as a new attribute.
        cursor.retreat().ok()?;
        return Some(Attribute::new(name, Vec::new()));
    }

    cursor.advance().ok()?;
    let c = cursor.skip(SPACE_CHARS)?;
    let mut value = Vec::new();
    match c {
        b'"' | b'\'' => loop {
            let b = cursor.advance().ok()?;
            if b == c {
                // Running out of input right after the closing quote still yields the attribute
                let _ = cursor.advance();
                return Some(Attribute::new(name, value));
            }
            value.push(b.to_ascii_lowercase());
        },
        b'>' => return Some(Attribute::new(name, value)),
        _ => value.push(c.to_ascii_lowercase()),
    }

    loop {
        match cursor.advance() {
            Ok(b) if is_space(b) || b == b'<' || b == b'>' => {
                return Some(Attribute::new(name, value));
            }
            Ok(b) => value.push(b.to_ascii_lowercase()),
            Err(_) => return Some(Attribute::new(name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cursor resting on the first byte of `data`
    fn cursor_at_start(data: &[u8]) -> ByteCursor {
        let mut cursor = ByteCursor::new(data);
        cursor.advance().unwrap();
        cursor
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute::new(name.as_bytes().to_vec(), value.as_bytes().to_vec())
    }

    fn collect(data: &[u8]) -> Vec<Attribute> {
        let mut cursor = cursor_at_start(data);
        std::iter::from_fn(|| next_attribute(&mut cursor)).collect()
    }

    #[test]
    fn test_quoted_unquoted_and_bare() {
        let attrs = collect(b" charset=\"UTF-8\" lang=en hidden>");
        assert_eq!(
            attrs,
            vec![
                attr("charset", "utf-8"),
                attr("lang", "en"),
                attr("hidden", ""),
            ]
        );
    }

    #[test]
    fn test_names_are_lowercased() {
        let attrs = collect(b" HTTP-EQUIV='Content-Type'>");
        assert_eq!(attrs, vec![attr("http-equiv", "content-type")]);
    }

    #[test]
    fn test_whitespace_around_equals() {
        let attrs = collect(b" content  =  'a b' x>");
        assert_eq!(attrs, vec![attr("content", "a b"), attr("x", "")]);
    }

    #[test]
    fn test_name_without_value_then_another_attribute() {
        let mut cursor = cursor_at_start(b" async  defer>");
        assert_eq!(next_attribute(&mut cursor), Some(attr("async", "")));
        assert_eq!(next_attribute(&mut cursor), Some(attr("defer", "")));
        assert_eq!(next_attribute(&mut cursor), None);
        assert_eq!(cursor.current(), Ok(b'>'));
    }

    #[test]
    fn test_slash_ends_name() {
        let attrs = collect(b" checked/>");
        assert_eq!(attrs, vec![attr("checked", "")]);
    }

    #[test]
    fn test_stray_slashes_are_skipped() {
        let attrs = collect(b" / /charset=x/>");
        assert_eq!(attrs, vec![attr("charset", "x/")]);
    }

    #[test]
    fn test_leading_equals_is_part_of_name() {
        let attrs = collect(b" =x>");
        assert_eq!(attrs, vec![attr("=x", "")]);
    }

    #[test]
    fn test_value_directly_followed_by_tag_end() {
        let attrs = collect(b" charset=>");
        assert_eq!(attrs, vec![attr("charset", "")]);
    }

    #[test]
    fn test_unquoted_value_stops_at_angle_bracket() {
        let mut cursor = cursor_at_start(b" charset=koi8-r<p>");
        assert_eq!(next_attribute(&mut cursor), Some(attr("charset", "koi8-r")));
        assert_eq!(cursor.current(), Ok(b'<'));
    }

    #[test]
    fn test_unterminated_quote_yields_nothing() {
        let mut cursor = cursor_at_start(b" charset=\"ISO-8859-5>");
        assert_eq!(next_attribute(&mut cursor), None);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_unquoted_value_at_end_of_input_is_kept() {
        let mut cursor = cursor_at_start(b" charset=utf-8");
        assert_eq!(next_attribute(&mut cursor), Some(attr("charset", "utf-8")));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_closing_quote_as_last_byte_is_kept() {
        let mut cursor = cursor_at_start(b" charset='big5'");
        assert_eq!(next_attribute(&mut cursor), Some(attr("charset", "big5")));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_name_cut_off_by_end_of_input() {
        let mut cursor = cursor_at_start(b" chars");
        assert_eq!(next_attribute(&mut cursor), None);
    }

    #[test]
    fn test_tag_end_and_exhaustion() {
        assert!(collect(b"  >").is_empty());
        assert!(collect(b"   ").is_empty());
    }
}
