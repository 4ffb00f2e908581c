//! # sniffrs
//!
//! Character encoding sniffing for HTML byte streams.
//!
//! Given the raw bytes of a web page, sniffrs decides which character encoding they are in
//! and converts them to UTF-8, ready for an HTML5 tree builder. It follows the order browsers
//! use: an out-of-band (transport) declaration first, then a byte-order mark, then a `<meta>`
//! declaration found by a bounded prescan of the markup, and only then statistics and defaults.
//!
//! ## Key Features
//!
//! - **Byte-order marks**: UTF-8, UTF-16BE and UTF-16LE
//! - **`<meta>` prescan**: `charset` attributes and `http-equiv` pragmas, with the legacy
//!   precedence rules real-world pages depend on
//! - **Label resolution**: hundreds of historical charset spellings mapped onto `encoding_rs`,
//!   plus DOS, EBCDIC and other legacy code pages
//! - **Statistical fallback**: pluggable, `chardetng` by default
//! - **Zero-copy when possible**: input that is already UTF-8 is borrowed, not copied
//!
//! ## Basic Usage
//!
//! ```rust
//! use sniffrs::{to_canonical, DetectionSource};
//!
//! let html = b"<html><meta charset=ISO-8859-5></html>";
//! let canonical = to_canonical(html, None, None).unwrap();
//!
//! assert_eq!(canonical.codec().name(), "ISO-8859-5");
//! assert_eq!(canonical.detection().source, DetectionSource::MetaPrescan);
//! ```
//!
//! ## Advanced Usage
//!
//! ### Custom Options and Collaborators
//!
//! ```rust
//! use sniffrs::{EncodingSniffer, SniffOptions, ChardetngDetector};
//!
//! let options = SniffOptions::builder()
//!     .prescan_bytes(1024)
//!     .locale_fallback(false)
//!     .build();
//!
//! let sniffer = EncodingSniffer::new(options).with_detector(ChardetngDetector::new());
//! let detection = sniffer.detect(b"plain ascii", Some("koi8-r"));
//! assert_eq!(detection.codec.name(), "KOI8-R");
//! ```
//!
//! ### Parsing
//!
//! ```rust
//! use sniffrs::{EncodingSniffer, RcDomTree};
//!
//! let sniffer = EncodingSniffer::default();
//! let dom = sniffer.parse(b"<p>hello</p>", Some("utf-8"), None, &RcDomTree)?;
//! # Ok::<(), sniffrs::SniffError>(())
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use sniffrs::{to_canonical, SniffError};
//!
//! match to_canonical(b"\x82", Some("Shift_JIS"), None) {
//!     Ok(canonical) => println!("{} bytes", canonical.as_bytes().len()),
//!     Err(SniffError::DecodeFailure { encoding }) => {
//!         eprintln!("Not valid {}", encoding);
//!     }
//!     Err(e) => {
//!         eprintln!("Error: {}", e);
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! Stage decisions are reported through the [`log`](https://docs.rs/log) facade: `debug` for the
//! stage that chose the codec, `trace` for prescan details, and `warn` for caller-supplied labels
//! that could not be resolved.

mod attributes;
mod bom;
mod byte_tables;
mod code_pages;
mod codec;
mod content;
mod cursor;
mod detection;
mod detector;
mod error;
mod labels;
mod options;
mod prescan;
mod sniffer;
mod tree;

// Public exports
pub use attributes::{next_attribute, Attribute};
pub use bom::Bom;
pub use code_pages::CodePage;
pub use codec::{decode_x_user_defined, Codec};
pub use content::extract_charset;
pub use cursor::{is_space, ByteCursor, SPACE_CHARS};
pub use detection::{Canonical, Detection, DetectionSource};
pub use detector::{ChardetngDetector, EnvLocale, LocaleEncoding, StatisticalDetector};
pub use error::{CursorError, Result, SniffError};
pub use labels::{known_labels, resolve, resolve_bytes};
pub use options::{SniffOptions, SniffOptionsBuilder};
pub use prescan::prescan;
pub use sniffer::{to_canonical, EncodingSniffer, Input};
pub use tree::{parse_html, RcDomTree, ScraperTree, TreeBuilder};
