//! HTML Serialization (innerHTML/outerHTML)
//!
//! Serializes DOM nodes to HTML strings.
//!
//! Key features:
//! - innerHTML/outerHTML serialization
//! - Proper HTML escaping
//! - Void element handling

use blaster_dom::{DomTree, NodeData, NodeId};

/// HTML serializer
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Indentation string
    pub indent: String,
}

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext"];

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output, 0);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output, 0);
        output
    }

    fn newline(&self, output: &mut String, depth: usize) {
        if self.pretty_print && !output.is_empty() {
            output.push('\n');
            for _ in 0..depth {
                output.push_str(&self.indent);
            }
        }
    }

    /// Serialize a node and its descendants
    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String, depth: usize) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                self.serialize_children(tree, node_id, output, depth);
            }
            NodeData::Element(elem) => {
                let tag = elem.tag.as_str();
                self.newline(output, depth);

                // Start tag
                output.push('<');
                output.push_str(tag);
                for attr in elem.attrs.iter() {
                    output.push(' ');
                    output.push_str(&attr.name);
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    self.serialize_children_raw(tree, node_id, output);
                } else {
                    // The parser drops a newline directly after these start tags
                    if matches!(tag, "pre" | "textarea" | "listing")
                        && tree
                            .children(node_id)
                            .next()
                            .and_then(|(_, first)| first.as_text())
                            .is_some_and(|text| text.starts_with('\n'))
                    {
                        output.push('\n');
                    }
                    self.serialize_children(tree, node_id, output, depth + 1);
                    if !tree.element_children(node_id).is_empty() {
                        self.newline(output, depth);
                    }
                }

                // End tag
                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => {
                if self.pretty_print && text.trim().is_empty() {
                    return;
                }
                escape_text(text, output);
            }
            NodeData::Comment(text) => {
                self.newline(output, depth);
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String, depth: usize) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output, depth);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (_, child) in tree.children(parent_id) {
            if let Some(text) = child.as_text() {
                output.push_str(text);
            }
        }
    }
}

/// Escape text content for HTML
pub fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
pub fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element("div");
        tree.set_attr(div, "class", "a \"b\"").unwrap();
        tree.append_child(root, div).unwrap();
        let input = tree.create_element("input");
        tree.set_attr(input, "checked", "").unwrap();
        tree.append_child(div, input).unwrap();
        let text = tree.create_text("1 < 2 & 3");
        tree.append_child(div, text).unwrap();
        (tree, div)
    }

    #[test]
    fn test_outer_html() {
        let (tree, div) = sample();
        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, div),
            r#"<div class="a &quot;b&quot;"><input checked="">1 &lt; 2 &amp; 3</div>"#
        );
    }

    #[test]
    fn test_inner_html() {
        let (tree, div) = sample();
        assert_eq!(
            HtmlSerializer::new().serialize_inner(&tree, div),
            r#"<input checked="">1 &lt; 2 &amp; 3"#
        );
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let mut tree = DomTree::new();
        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b && c) {}");
        tree.append_child(script, code).unwrap();
        assert_eq!(
            HtmlSerializer::new().serialize_outer(&tree, script),
            "<script>if (a < b && c) {}</script>"
        );
    }

    #[test]
    fn test_pretty_print() {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        let li = tree.create_element("li");
        let text = tree.create_text("x");
        tree.append_child(li, text).unwrap();
        tree.append_child(ul, li).unwrap();
        assert_eq!(HtmlSerializer::pretty().serialize_outer(&tree, ul), "<ul>\n  <li>x</li>\n</ul>");
    }
}
