//! DOMBlaster CSS
//!
//! Selector parsing and matching against a `blaster-dom` tree, inline
//! `style` declarations, and a small author/user-agent cascade.

mod cascade;
mod matching;
mod parser;
mod selectors;
mod style;
mod stylesheet;

pub use cascade::{ComputedStyle, StyleResolver};
pub use matching::{matches, query_selector, query_selector_all};
pub use parser::parse_selector_list;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, NthExpression,
    PseudoClass, SelectorComponent, SelectorList, SelectorPart, Specificity,
};
pub use style::{Declaration, InlineStyle, property_name};
pub use stylesheet::{Rule, Stylesheet, parse_stylesheet};

use blaster_dom::{DomTree, NodeId};

/// Result type for CSS operations
pub type CssResult<T> = Result<T, CssError>;

/// CSS errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

impl CssError {
    pub(crate) fn selector(selector: &str, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            message: message.into(),
        }
    }
}

/// Parse `selector` and return the first matching descendant of `root`
pub fn select_first(tree: &DomTree, root: NodeId, selector: &str) -> CssResult<Option<NodeId>> {
    let list = parse_selector_list(selector)?;
    Ok(query_selector(tree, root, &list))
}

/// Parse `selector` and return every matching descendant of `root`
pub fn select_all(tree: &DomTree, root: NodeId, selector: &str) -> CssResult<Vec<NodeId>> {
    let list = parse_selector_list(selector)?;
    Ok(query_selector_all(tree, root, &list))
}

/// Parse `selector` and test it against one element
pub fn element_matches(tree: &DomTree, node: NodeId, selector: &str) -> CssResult<bool> {
    let list = parse_selector_list(selector)?;
    Ok(matches(tree, node, &list))
}
