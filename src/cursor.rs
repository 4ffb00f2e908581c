//! Position-tracking byte cursor used by the `<meta>` prescan.
//!
//! A [`ByteCursor`] owns an ASCII-lowercased copy of the bytes it scans, so every literal
//! comparison made through it (`<meta`, `charset`, `content-type`) is case-insensitive.
//!
//! The cursor starts *before* the first byte. [`ByteCursor::advance`] must be called once to
//! land on byte `0`, which lets a driving loop be written as `while cursor.advance().is_ok()`.
//! Once the position reaches the end of the buffer the cursor is exhausted and stays there.
//!
//! ```rust
//! use sniffrs::ByteCursor;
//!
//! let mut cursor = ByteCursor::new(b"<META charset=x>");
//! assert_eq!(cursor.advance(), Ok(b'<'));
//! assert!(cursor.match_literal(b"<meta"));
//! assert_eq!(cursor.current(), Ok(b' '));
//! ```

use crate::error::CursorError;
use memchr::memmem;

/// HTML whitespace: tab, line feed, form feed, carriage return and space.
pub const SPACE_CHARS: &[u8] = b"\t\n\x0c\r ";

/// Returns `true` for the five HTML whitespace bytes
#[inline]
pub fn is_space(byte: u8) -> bool {
    SPACE_CHARS.contains(&byte)
}

/// Bounds-checked view over a lowercased byte buffer with a movable position.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    buf: Vec<u8>,
    /// `None` is the before-start position; `Some(len)` means exhausted.
    pos: Option<usize>,
}

impl ByteCursor {
    /// Create a cursor positioned before the first byte of `data`.
    pub fn new(data: &[u8]) -> Self {
        Self {
            buf: data.to_ascii_lowercase(),
            pos: None,
        }
    }

    /// Number of bytes in the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no bytes at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current index, or `None` before the first byte. Equals [`len`](Self::len) once exhausted.
    #[inline]
    pub fn position(&self) -> Option<usize> {
        self.pos
    }

    /// Whether every byte has been consumed
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.pos, Some(p) if p >= self.buf.len())
    }

    /// Bytes between two absolute indices, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.buf.len());
        &self.buf[start.min(end)..end]
    }

    /// Where forward searches begin: the current byte, or byte `0` before start.
    #[inline]
    fn search_start(&self) -> usize {
        self.pos.unwrap_or(0).min(self.buf.len())
    }

    /// The byte under the cursor.
    pub fn current(&self) -> Result<u8, CursorError> {
        self.pos
            .and_then(|p| self.buf.get(p).copied())
            .ok_or(CursorError::OutOfRange)
    }

    /// Step one byte forward and return the new current byte.
    ///
    /// Stepping onto the end of the buffer leaves the cursor exhausted and reports
    /// [`CursorError::Exhausted`]; so does any further call.
    pub fn advance(&mut self) -> Result<u8, CursorError> {
        let next = match self.pos {
            None => 0,
            Some(p) if p >= self.buf.len() => return Err(CursorError::Exhausted),
            Some(p) => p + 1,
        };
        self.pos = Some(next);
        self.buf.get(next).copied().ok_or(CursorError::Exhausted)
    }

    /// Step one byte backward. Stepping back from byte `0` returns to the before-start position.
    pub fn retreat(&mut self) -> Result<(), CursorError> {
        match self.pos {
            None => Err(CursorError::OutOfRange),
            Some(p) if p >= self.buf.len() => Err(CursorError::Exhausted),
            Some(0) => {
                self.pos = None;
                Ok(())
            }
            Some(p) => {
                self.pos = Some(p - 1);
                Ok(())
            }
        }
    }

    /// Advance while the current byte is in `allowed`.
    ///
    /// Returns the first byte outside the set (the cursor rests on it), or `None` if the
    /// buffer ran out first.
    pub fn skip(&mut self, allowed: &[u8]) -> Option<u8> {
        self.seek(|b| !allowed.contains(&b))
    }

    /// Advance while the current byte is *not* in `stop`.
    ///
    /// Returns the stop byte found (the cursor rests on it), or `None` if the buffer ran out.
    pub fn skip_until(&mut self, stop: &[u8]) -> Option<u8> {
        self.seek(|b| stop.contains(&b))
    }

    fn seek(&mut self, found: impl Fn(u8) -> bool) -> Option<u8> {
        let start = self.search_start();
        match self.buf[start..].iter().position(|&b| found(b)) {
            Some(offset) => {
                self.pos = Some(start + offset);
                Some(self.buf[start + offset])
            }
            None => {
                self.pos = Some(self.buf.len());
                None
            }
        }
    }

    /// If the bytes at the cursor equal `literal`, move past them and return `true`.
    pub fn match_literal(&mut self, literal: &[u8]) -> bool {
        let start = self.search_start();
        if self.buf[start..].starts_with(literal) {
            self.pos = Some(start + literal.len());
            true
        } else {
            false
        }
    }

    /// Move to the *last* byte of the next occurrence of `needle`, searching from the current byte.
    ///
    /// On [`CursorError::NotFound`] the position is unchanged.
    pub fn jump_to(&mut self, needle: &[u8]) -> Result<(), CursorError> {
        if self.is_exhausted() {
            return Err(CursorError::Exhausted);
        }
        let start = self.search_start();
        let offset = memmem::find(&self.buf[start..], needle).ok_or(CursorError::NotFound)?;
        self.pos = Some(start + offset + needle.len().saturating_sub(1));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_before_first_byte() {
        let cursor = ByteCursor::new(b"abc");
        assert_eq!(cursor.position(), None);
        assert_eq!(cursor.current(), Err(CursorError::OutOfRange));
    }

    #[test]
    fn test_advance_until_exhausted() {
        let mut cursor = ByteCursor::new(b"ab");
        assert_eq!(cursor.advance(), Ok(b'a'));
        assert_eq!(cursor.advance(), Ok(b'b'));
        assert_eq!(cursor.advance(), Err(CursorError::Exhausted));
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.position(), Some(2));
        assert_eq!(cursor.advance(), Err(CursorError::Exhausted));
        assert_eq!(cursor.position(), Some(2));
        assert_eq!(cursor.current(), Err(CursorError::OutOfRange));
    }

    #[test]
    fn test_empty_buffer_is_exhausted_after_first_advance() {
        let mut cursor = ByteCursor::new(b"");
        assert!(cursor.is_empty());
        assert_eq!(cursor.advance(), Err(CursorError::Exhausted));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_buffer_is_lowercased() {
        let mut cursor = ByteCursor::new(b"HeLLo\xC0");
        assert_eq!(cursor.advance(), Ok(b'h'));
        assert_eq!(cursor.slice(0, 6), b"hello\xC0");
    }

    #[test]
    fn test_retreat() {
        let mut cursor = ByteCursor::new(b"xy");
        assert_eq!(cursor.retreat(), Err(CursorError::OutOfRange));
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.retreat(), Ok(()));
        assert_eq!(cursor.current(), Ok(b'x'));
        assert_eq!(cursor.retreat(), Ok(()));
        assert_eq!(cursor.position(), None);
        assert_eq!(cursor.retreat(), Err(CursorError::OutOfRange));
    }

    #[test]
    fn test_retreat_refused_once_exhausted() {
        let mut cursor = ByteCursor::new(b"x");
        cursor.advance().unwrap();
        let _ = cursor.advance();
        assert_eq!(cursor.retreat(), Err(CursorError::Exhausted));
    }

    #[test]
    fn test_skip_and_skip_until() {
        let mut cursor = ByteCursor::new(b"  \t=value next");
        cursor.advance().unwrap();
        assert_eq!(cursor.skip(SPACE_CHARS), Some(b'='));
        assert_eq!(cursor.position(), Some(3));
        assert_eq!(cursor.skip_until(SPACE_CHARS), Some(b' '));
        assert_eq!(cursor.position(), Some(9));
        assert_eq!(cursor.skip_until(b">"), None);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.skip(SPACE_CHARS), None);
    }

    #[test]
    fn test_match_literal() {
        let mut cursor = ByteCursor::new(b"<!--x");
        cursor.advance().unwrap();
        assert!(!cursor.match_literal(b"<meta"));
        assert_eq!(cursor.position(), Some(0));
        assert!(cursor.match_literal(b"<!--"));
        assert_eq!(cursor.current(), Ok(b'x'));
    }

    #[test]
    fn test_match_literal_may_exhaust() {
        let mut cursor = ByteCursor::new(b"<META");
        cursor.advance().unwrap();
        assert!(cursor.match_literal(b"<meta"));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_jump_to_lands_on_last_byte() {
        let mut cursor = ByteCursor::new(b"a comment --> tail");
        cursor.advance().unwrap();
        assert_eq!(cursor.jump_to(b"-->"), Ok(()));
        assert_eq!(cursor.current(), Ok(b'>'));
        assert_eq!(cursor.position(), Some(12));
    }

    #[test]
    fn test_jump_to_from_before_start() {
        let mut cursor = ByteCursor::new(b"charset=utf-8");
        assert_eq!(cursor.jump_to(b"charset"), Ok(()));
        assert_eq!(cursor.position(), Some(6));
    }

    #[test]
    fn test_jump_to_not_found_keeps_position() {
        let mut cursor = ByteCursor::new(b"<!-- unterminated");
        cursor.advance().unwrap();
        assert_eq!(cursor.jump_to(b"-->"), Err(CursorError::NotFound));
        assert_eq!(cursor.position(), Some(0));
    }
}
