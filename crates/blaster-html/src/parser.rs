//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into a `blaster-dom` tree.

use blaster_dom::{Document, DomTree, Node, NodeId};
use html5ever::{LocalName, QualName, ns, parse_document, parse_fragment};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!(url, bytes = html.len(), "parsing HTML document");

        let dom = parse_rcdom(html)?;
        let mut document = Document::empty(url);
        let root = document.root();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = convert_node(child, document.tree_mut()) {
                attach(document.tree_mut(), root, id);
            }
        }
        document.finalize();

        tracing::debug!(nodes = document.tree().len(), "parsed HTML document");
        Ok(document)
    }

    /// Parse an HTML fragment the way innerHTML assignment does.
    ///
    /// `context` names the element the fragment will be inserted into, so
    /// `<tr>` parses as a row inside a `tbody` and as text inside a `div`.
    /// Returns the top-level nodes, created detached inside `tree` and in
    /// source order.
    pub fn parse_fragment(
        &self,
        tree: &mut DomTree,
        html: &str,
        context: &FragmentContext,
    ) -> Result<Vec<NodeId>, ParseError> {
        let context_name = QualName::new(None, ns!(html), LocalName::from(context.context_element.as_str()));
        let dom = parse_fragment(RcDom::default(), Default::default(), context_name, Vec::new(), false)
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        // The fragment parser roots everything under a synthetic <html>
        let mut nodes = Vec::new();
        let document_children = dom.document.children.borrow();
        if let Some(root) = document_children.iter().find(|h| is_element(h, "html")) {
            for child in root.children.borrow().iter() {
                nodes.extend(convert_node(child, tree));
            }
        }

        tracing::trace!(context = %context.context_element, nodes = nodes.len(), "parsed HTML fragment");
        Ok(nodes)
    }
}

/// Element an HTML fragment is parsed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    pub context_element: String,
}

impl FragmentContext {
    /// Context for markup inserted into a `tag` element
    pub fn element(tag: &str) -> Self {
        Self {
            context_element: tag.to_ascii_lowercase(),
        }
    }
}

impl Default for FragmentContext {
    fn default() -> Self {
        Self::element("body")
    }
}

fn parse_rcdom(html: &str) -> Result<RcDom, ParseError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    Ok(dom)
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}

/// Freshly converted nodes are detached and cannot contain `parent`
fn attach(tree: &mut DomTree, parent: NodeId, child: NodeId) {
    if let Err(err) = tree.append_child(parent, child) {
        tracing::warn!(%err, "dropping node the tree rejected");
    }
}

/// Convert an RcDom node (and its subtree) into detached nodes of `tree`
fn convert_node(handle: &Handle, tree: &mut DomTree) -> Option<NodeId> {
    let id = match &handle.data {
        RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return None,
        RcNodeData::Doctype {
            name,
            public_id,
            system_id,
        } => tree.push(Node::doctype(name.to_string(), public_id.to_string(), system_id.to_string())),
        RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let id = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                let attr_name = match &attr.name.prefix {
                    Some(prefix) => format!("{prefix}:{}", attr.name.local),
                    None => attr.name.local.to_string(),
                };
                if let Some(elem) = tree.element_mut(id) {
                    elem.set_attr(&attr_name, attr.value.to_string());
                }
            }

            // <template> content lives in a separate fragment in RcDom
            if let Some(contents) = template_contents.borrow().as_ref() {
                for child in contents.children.borrow().iter() {
                    if let Some(child_id) = convert_node(child, tree) {
                        attach(tree, id, child_id);
                    }
                }
            }
            id
        }
    };

    for child in handle.children.borrow().iter() {
        if let Some(child_id) = convert_node(child, tree) {
            attach(tree, id, child_id);
        }
    }
    Some(id)
}
