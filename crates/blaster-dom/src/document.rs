//! Document - High-level document API

use crate::{DomResult, DomTree, EventListeners, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Registered event listeners
    pub(crate) listeners: EventListeners,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut document = Self::empty(url);
        let tree = &mut document.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created container elements cannot violate the hierarchy
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        document.html_element = html;
        document.head_element = head;
        document.body_element = body;
        document
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            listeners: EventListeners::default(),
        }
    }

    /// Locate the html/head/body elements after the tree was built externally
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let html = tree
            .element_children(tree.root())
            .into_iter()
            .find(|&id| tree.tag_name(id) == Some("html"));

        let (mut head, mut body) = (None, None);
        if let Some(html) = html {
            for child in tree.element_children(html) {
                match tree.tag_name(child) {
                    Some("head") if head.is_none() => head = Some(child),
                    Some("body") if body.is_none() => body = Some(child),
                    _ => {}
                }
            }
        }

        self.html_element = html.unwrap_or(NodeId::NONE);
        self.head_element = head.unwrap_or(NodeId::NONE);
        self.body_element = body.unwrap_or(NodeId::NONE);
        tracing::trace!(
            html = %self.html_element,
            head = %self.head_element,
            body = %self.body_element,
            "document finalized"
        );
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.get_elements_by_tag_name("title")
            .first()
            .map(|&t| self.tree.text_content(t).trim().to_string())
            .unwrap_or_default()
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.option()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.option()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.option()
    }

    /// First attached element with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.all_elements()
            .into_iter()
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// Elements whose `name` attribute equals `name`
    pub fn get_elements_by_name(&self, name: &str) -> Vec<NodeId> {
        self.all_elements()
            .into_iter()
            .filter(|&n| self.tree.attr(n, "name") == Some(name))
            .collect()
    }

    /// Elements with the given tag name (`*` for all)
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        let elements = self.all_elements();
        if tag == "*" {
            return elements;
        }
        let tag = tag.to_ascii_lowercase();
        elements
            .into_iter()
            .filter(|&n| self.tree.tag_name(n) == Some(tag.as_str()))
            .collect()
    }

    /// Elements carrying every class of a space-separated list
    pub fn get_elements_by_class_name(&self, classes: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = classes.split_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.all_elements()
            .into_iter()
            .filter(|&n| {
                self.tree
                    .element(n)
                    .is_some_and(|e| wanted.iter().all(|c| e.has_class(c)))
            })
            .collect()
    }

    /// Create a detached element owned by this document
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node owned by this document
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree.create_text(text)
    }

    /// Append a node, moving it when already attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree.append_child(parent, child)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Registered event listeners
    pub fn listeners(&self) -> &EventListeners {
        &self.listeners
    }

    fn all_elements(&self) -> Vec<NodeId> {
        self.tree.descendant_elements(self.tree.root())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
