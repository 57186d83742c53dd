//! DOMBlaster HTML
//!
//! HTML5 parsing built on html5ever, plus innerHTML/outerHTML
//! serialization of `blaster-dom` trees.

mod parser;
mod serializer;

pub use parser::{FragmentContext, HtmlParser};
pub use serializer::{HtmlSerializer, escape_attribute, escape_text};

use blaster_dom::{Document, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse markup meant for the inside of a `context` element into
/// detached nodes owned by `tree`
pub fn parse_fragment(tree: &mut DomTree, html: &str, context: &str) -> Result<Vec<NodeId>, ParseError> {
    HtmlParser::new().parse_fragment(tree, html, &FragmentContext::element(context))
}

/// Serialize the children of `node`
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node)
}

/// Serialize `node` including itself
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
