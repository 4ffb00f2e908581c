//! The `<meta>` charset prescan.
//!
//! Walks the leading bytes of a document looking for a `<meta charset>` or an HTTP-pragma
//! `<meta http-equiv="Content-Type" content="...; charset=...">` declaration, skipping comments,
//! processing instructions, doctypes and the attributes of unrelated tags along the way.
//!
//! The scan is deliberately forgiving: malformed markup never raises, it just ends the scan
//! without a result. The caller decides how many bytes to hand over; nothing here stops at
//! `</head>`.
//!
//! ```rust
//! use sniffrs::prescan;
//!
//! let codec = prescan(b"<!-- <meta charset=big5> --><META CHARSET='koi8-r'>");
//! assert_eq!(codec.map(|c| c.name()), Some("KOI8-R"));
//! ```

use crate::attributes::next_attribute;
use crate::codec::Codec;
use crate::content::extract_charset;
use crate::cursor::{is_space, ByteCursor};
use crate::error::CursorError;
use crate::labels::resolve_bytes;

/// Bytes that end a tag name
const TAG_NAME_END: &[u8] = b"\t\n\x0c\r <>";

/// What the dispatch loop should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Keep scanning from the cursor's next byte
    Continue,
    /// A declaration was accepted
    Found(Codec),
    /// Malformed or truncated markup; give up without a result
    Stop,
}

/// Scan `prefix` for an in-markup charset declaration.
///
/// Returns the first declaration that both parses and resolves to a known codec. A `charset`
/// attribute is accepted the moment it is read, even when a later attribute of the same tag
/// would contradict it; a `content` pragma is accepted only once the same tag has also
/// declared `http-equiv="content-type"`, in either order.
pub fn prescan(prefix: &[u8]) -> Option<Codec> {
    Scanner::new(prefix).run()
}

struct Scanner {
    cursor: ByteCursor,
}

impl Scanner {
    fn new(prefix: &[u8]) -> Self {
        Self {
            cursor: ByteCursor::new(prefix),
        }
    }

    fn run(mut self) -> Option<Codec> {
        while self.cursor.advance().is_ok() {
            match self.dispatch().unwrap_or(Flow::Stop) {
                Flow::Continue => {}
                Flow::Found(codec) => return Some(codec),
                Flow::Stop => return None,
            }
        }
        None
    }

    /// Try each markup construct in turn at the current byte.
    fn dispatch(&mut self) -> Result<Flow, CursorError> {
        if self.cursor.match_literal(b"<!--") {
            self.skip_comment()
        } else if self.cursor.match_literal(b"<meta") {
            self.meta()
        } else if self.cursor.match_literal(b"</") {
            self.possible_end_tag()
        } else if self.cursor.match_literal(b"<!") || self.cursor.match_literal(b"<?") {
            self.skip_other()
        } else if self.cursor.match_literal(b"<") {
            self.possible_tag(false)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn skip_comment(&mut self) -> Result<Flow, CursorError> {
        self.cursor.jump_to(b"-->")?;
        Ok(Flow::Continue)
    }

    fn skip_other(&mut self) -> Result<Flow, CursorError> {
        self.cursor.jump_to(b">")?;
        Ok(Flow::Continue)
    }

    fn meta(&mut self) -> Result<Flow, CursorError> {
        if !is_space(self.cursor.current()?) {
            // `<metadata>` and friends
            return Ok(Flow::Continue);
        }

        let mut has_pragma = false;
        let mut pending: Option<Codec> = None;

        while let Some(attr) = next_attribute(&mut self.cursor) {
            match attr.name.as_slice() {
                b"http-equiv" => {
                    has_pragma = attr.value == b"content-type";
                    if let (true, Some(codec)) = (has_pragma, pending) {
                        log::trace!("accepting pending pragma charset {codec}");
                        return Ok(Flow::Found(codec));
                    }
                }
                b"charset" => {
                    if let Some(codec) = resolve_bytes(&attr.value) {
                        log::trace!("accepting meta charset {codec}");
                        return Ok(Flow::Found(codec));
                    }
                }
                b"content" => {
                    let Some(codec) = extract_charset(&attr.value).and_then(|v| resolve_bytes(&v))
                    else {
                        continue;
                    };
                    if has_pragma {
                        log::trace!("accepting pragma charset {codec}");
                        return Ok(Flow::Found(codec));
                    }
                    log::trace!("pragma charset {codec} pending http-equiv");
                    pending = Some(codec);
                }
                _ => {}
            }
        }

        Ok(Flow::Continue)
    }

    fn possible_end_tag(&mut self) -> Result<Flow, CursorError> {
        self.cursor.advance()?;
        self.possible_tag(true)
    }

    fn possible_tag(&mut self, end_tag: bool) -> Result<Flow, CursorError> {
        if !self.cursor.current()?.is_ascii_alphabetic() {
            self.cursor.retreat()?;
            return if end_tag {
                self.skip_other()
            } else {
                Ok(Flow::Continue)
            };
        }

        match self.cursor.skip_until(TAG_NAME_END) {
            // A new tag starts before this one closed; let the loop see the `<`.
            Some(b'<') => self.cursor.retreat()?,
            _ => {
                while next_attribute(&mut self.cursor).is_some() {}
            }
        }
        Ok(Flow::Continue)
    }
}
