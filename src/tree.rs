//! Hand-off from canonical UTF-8 to an HTML tree builder.
//!
//! Sniffing ends once the document is UTF-8; building the tree is left to an HTML5 parser.
//! [`TreeBuilder`] is the seam, with adapters for `scraper` and for the `html5ever` reference
//! DOM.
//!
//! ## Example
//!
//! ```rust
//! use sniffrs::parse_html;
//! use scraper::Selector;
//!
//! let document = parse_html(b"<meta charset=koi8-r><title>\xf0\xd2\xc9\xd7\xc5\xd4</title>", None, None)?;
//! let title = Selector::parse("title").unwrap();
//! let text: String = document.select(&title).flat_map(|t| t.text()).collect();
//! assert_eq!(text, "Привет");
//! # Ok::<(), sniffrs::SniffError>(())
//! ```

use crate::error::Result;
use crate::sniffer::{EncodingSniffer, Input};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;
use scraper::Html;

/// Builds a document tree from UTF-8 text.
pub trait TreeBuilder {
    type Output;

    fn build(&self, html: &str) -> Self::Output;
}

/// Parses into a [`scraper::Html`] document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperTree;

impl TreeBuilder for ScraperTree {
    type Output = Html;

    fn build(&self, html: &str) -> Html {
        Html::parse_document(html)
    }
}

/// Parses into an `html5ever` [`RcDom`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RcDomTree;

impl TreeBuilder for RcDomTree {
    type Output = RcDom;

    fn build(&self, html: &str) -> RcDom {
        html5ever::parse_document(RcDom::default(), Default::default()).one(html)
    }
}

/// Sniff, convert and parse `input` into a [`scraper::Html`] document.
pub fn parse_html<'a>(
    input: impl Into<Input<'a>>,
    transport: Option<&str>,
    fallback: Option<&str>,
) -> Result<Html> {
    EncodingSniffer::default().parse(input, transport, fallback, &ScraperTree)
}
