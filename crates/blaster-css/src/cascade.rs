//! Style Cascade & Resolver
//!
//! Computes the cascaded styles for DOM elements by:
//! 1. Matching selectors against elements
//! 2. Sorting by importance, origin, specificity and source order
//! 3. Resolving `inherit`/`initial` and inheriting inherited properties
//!
//! Values are the declared strings; no unit or color computation happens.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use blaster_dom::{DomTree, NodeId};

use crate::matching::matches_complex;
use crate::selectors::Specificity;
use crate::style::{Declaration, InlineStyle, property_name};
use crate::stylesheet::{Stylesheet, parse_stylesheet};

const UA_STYLESHEET: &str = "
html, body, div, p, h1, h2, h3, h4, h5, h6, ul, ol, dl, dt, dd, form, fieldset, header, footer,
section, article, nav, aside, main, figure, figcaption, blockquote, pre, address, hr, details,
summary, legend { display: block }
li { display: list-item }
table { display: table }
tr { display: table-row }
td, th { display: table-cell }
head, script, style, link, meta, title, template, [hidden] { display: none }
b, strong, th, h1, h2, h3, h4, h5, h6 { font-weight: bold }
i, em, cite, var, dfn, address { font-style: italic }
pre, code, kbd, samp, tt { font-family: monospace }
pre { white-space: pre }
a:link { text-decoration: underline; cursor: pointer }
input, select, textarea, button { display: inline-block }
";

/// Properties whose value flows from parent to child when not declared
const INHERITED: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-variant",
    "font-weight",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-position",
    "list-style-type",
    "quotes",
    "text-align",
    "text-indent",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

/// Initial values reported when nothing applies
const INITIAL: &[(&str, &str)] = &[
    ("display", "inline"),
    ("position", "static"),
    ("visibility", "visible"),
    ("float", "none"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("text-decoration", "none"),
    ("white-space", "normal"),
    ("opacity", "1"),
];

fn is_inherited(property: &str) -> bool {
    property.starts_with("--") || INHERITED.contains(&property)
}

fn initial_value(property: &str) -> Option<&'static str> {
    INITIAL.iter().find(|(name, _)| *name == property).map(|(_, value)| *value)
}

/// Origin of a declaration, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    UserAgent,
    Author,
    Inline,
}

struct Candidate<'a> {
    declaration: &'a Declaration,
    origin: Origin,
    specificity: Specificity,
    order: usize,
}

impl Candidate<'_> {
    fn precedence(&self, other: &Self) -> Ordering {
        self.declaration
            .important
            .cmp(&other.declaration.important)
            .then(self.origin.cmp(&other.origin))
            .then(self.specificity.cmp(&other.specificity))
            .then(self.order.cmp(&other.order))
    }
}

/// Cascaded style of one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    properties: HashMap<String, String>,
}

impl ComputedStyle {
    /// Value of a property (CSS or camelCase name), falling back to its
    /// initial value
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = property_name(name);
        self.properties
            .get(&name)
            .map(String::as_str)
            .or_else(|| initial_value(&name))
    }

    /// Was a value declared or inherited (no initial fallback)?
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(&property_name(name))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Style resolver - computes styles for DOM elements
#[derive(Debug, Clone)]
pub struct StyleResolver {
    /// User agent stylesheet (browser defaults)
    ua_styles: Stylesheet,
    /// Author stylesheets (page CSS)
    author_styles: Vec<Stylesheet>,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self {
            ua_styles: parse_stylesheet(UA_STYLESHEET),
            author_styles: Vec::new(),
        }
    }

    /// Resolver with every `<style>` element of `tree` as an author sheet
    pub fn for_tree(tree: &DomTree) -> Self {
        let mut resolver = Self::new();
        for node in tree.descendant_elements(tree.root()) {
            if tree.tag_name(node) == Some("style") {
                resolver.add_stylesheet(parse_stylesheet(&tree.text_content(node)));
            }
        }
        tracing::debug!(sheets = resolver.author_styles.len(), "collected author stylesheets");
        resolver
    }

    /// Add an author stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        self.author_styles.push(stylesheet);
    }

    /// Compute styles for an element
    pub fn compute_style(&self, tree: &DomTree, node: NodeId) -> ComputedStyle {
        let parent = tree
            .parent_element(node)
            .map(|p| self.compute_style(tree, p))
            .unwrap_or_default();
        self.compute_with_parent(tree, node, &parent)
    }

    fn compute_with_parent(&self, tree: &DomTree, node: NodeId, parent: &ComputedStyle) -> ComputedStyle {
        let mut style = ComputedStyle::default();
        if !tree.is_element(node) {
            return style;
        }

        let inline = tree.attr(node, "style").map(InlineStyle::parse).unwrap_or_default();
        let mut candidates = Vec::new();
        let mut order = 0;

        self.collect_matches(tree, node, &self.ua_styles, Origin::UserAgent, &mut order, &mut candidates);
        for stylesheet in &self.author_styles {
            self.collect_matches(tree, node, stylesheet, Origin::Author, &mut order, &mut candidates);
        }
        for declaration in inline.iter() {
            order += 1;
            candidates.push(Candidate {
                declaration,
                origin: Origin::Inline,
                specificity: Specificity::default(),
                order,
            });
        }

        candidates.sort_by(|a, b| a.precedence(b));

        // Properties explicitly reset to their initial value do not inherit
        let mut reset: HashSet<&str> = HashSet::new();

        // Apply declarations in order
        for candidate in candidates {
            let Declaration { property, value, .. } = candidate.declaration;
            let keyword = value.to_ascii_lowercase();
            let inherit = match keyword.as_str() {
                "inherit" => true,
                "unset" | "revert" => is_inherited(property),
                "initial" => false,
                _ => {
                    reset.remove(property.as_str());
                    style.properties.insert(property.clone(), value.clone());
                    continue;
                }
            };
            match parent.properties.get(property).filter(|_| inherit) {
                Some(inherited) => {
                    reset.remove(property.as_str());
                    style.properties.insert(property.clone(), inherited.clone());
                }
                None => {
                    reset.insert(property.as_str());
                    style.properties.remove(property);
                }
            }
        }

        for (property, value) in &parent.properties {
            if is_inherited(property) && !reset.contains(property.as_str()) && !style.properties.contains_key(property) {
                style.properties.insert(property.clone(), value.clone());
            }
        }

        style
    }

    fn collect_matches<'a>(
        &self,
        tree: &DomTree,
        node: NodeId,
        stylesheet: &'a Stylesheet,
        origin: Origin,
        order: &mut usize,
        candidates: &mut Vec<Candidate<'a>>,
    ) {
        for rule in &stylesheet.rules {
            *order += 1;
            let specificity = rule
                .selectors
                .0
                .iter()
                .filter(|complex| matches_complex(tree, node, complex))
                .map(|complex| complex.specificity())
                .max();
            let Some(specificity) = specificity else {
                continue;
            };
            for declaration in &rule.declarations {
                candidates.push(Candidate {
                    declaration,
                    origin,
                    specificity,
                    order: *order,
                });
            }
        }
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = tree.create_element(tag);
        for (name, value) in attrs {
            tree.set_attr(id, name, *value).unwrap();
        }
        tree.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_ua_defaults() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = add(&mut tree, root, "div", &[]);
        let span = add(&mut tree, div, "span", &[]);
        let head = add(&mut tree, root, "head", &[]);

        let resolver = StyleResolver::new();
        assert_eq!(resolver.compute_style(&tree, div).get("display"), Some("block"));
        assert_eq!(resolver.compute_style(&tree, span).get("display"), Some("inline"));
        assert_eq!(resolver.compute_style(&tree, head).get("display"), Some("none"));
    }

    #[test]
    fn test_specificity_and_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = add(&mut tree, root, "p", &[("id", "x"), ("class", "note")]);

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(parse_stylesheet("#x { color: red } .note { color: blue } p { color: green }"));
        assert_eq!(resolver.compute_style(&tree, p).get("color"), Some("red"));

        resolver.add_stylesheet(parse_stylesheet("p { color: teal !important }"));
        assert_eq!(resolver.compute_style(&tree, p).get("color"), Some("teal"));
    }

    #[test]
    fn test_inline_beats_author() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = add(&mut tree, root, "p", &[("id", "x"), ("style", "backgroundColor: red")]);
        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(parse_stylesheet("#x { background-color: blue }"));
        assert_eq!(resolver.compute_style(&tree, p).get("backgroundColor"), Some("red"));
    }

    #[test]
    fn test_inheritance() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = add(&mut tree, root, "div", &[("style", "color: red; border: 1px solid")]);
        let span = add(&mut tree, div, "span", &[("style", "border: inherit")]);
        let em = add(&mut tree, span, "em", &[("style", "color: initial")]);

        let resolver = StyleResolver::new();
        let span_style = resolver.compute_style(&tree, span);
        assert_eq!(span_style.get("color"), Some("red"));
        assert_eq!(span_style.get("border"), Some("1px solid"));
        assert_eq!(resolver.compute_style(&tree, em).get("color"), None);
    }

    #[test]
    fn test_style_elements_collected() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let style = add(&mut tree, root, "style", &[]);
        tree.set_text_content(style, "p { margin: 4px }").unwrap();
        let p = add(&mut tree, root, "p", &[]);

        let resolver = StyleResolver::for_tree(&tree);
        assert_eq!(resolver.compute_style(&tree, p).get("margin"), Some("4px"));
    }
}
