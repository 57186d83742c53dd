//! Selector resolution

use blaster_css::{CssResult, parse_selector_list, query_selector, query_selector_all};
use blaster_dom::{DomTree, NodeId};

use crate::Group;

/// Anything that can be turned into a selection group
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selector {
    #[default]
    None,
    Node(NodeId),
    Nodes(Vec<NodeId>),
    Group(Group),
    Query(String),
}

impl Selector {
    /// Resolve against the whole document.
    ///
    /// An invalid selector string resolves to an empty group.
    pub fn resolve(self, tree: &DomTree, one: bool) -> Group {
        match self {
            Selector::Query(query) => match query_document(tree, &query, one) {
                Ok(group) => group,
                Err(err) => {
                    tracing::warn!(%err, "selector resolved to an empty group");
                    Group::empty()
                }
            },
            other => other.into_group(),
        }
    }

    /// Like [`Selector::resolve`], but an invalid selector is an error
    pub fn try_resolve(self, tree: &DomTree, one: bool) -> CssResult<Group> {
        match self {
            Selector::Query(query) => query_document(tree, &query, one),
            other => Ok(other.into_group()),
        }
    }

    fn into_group(self) -> Group {
        match self {
            Selector::None | Selector::Query(_) => Group::empty(),
            Selector::Node(node) => Group::one(node),
            Selector::Nodes(nodes) => Group::new(nodes),
            Selector::Group(group) => group,
        }
    }
}

/// Query `root`'s descendants; a blank query selects nothing
pub(crate) fn query_within(tree: &DomTree, root: NodeId, query: &str, one: bool) -> CssResult<Group> {
    if query.trim().is_empty() {
        return Ok(Group::empty());
    }
    let list = parse_selector_list(query)?;
    let group = if one {
        query_selector(tree, root, &list).into_iter().collect()
    } else {
        Group::new(query_selector_all(tree, root, &list))
    };
    tracing::debug!(query, one, found = group.len(), "resolved selector");
    Ok(group)
}

fn query_document(tree: &DomTree, query: &str, one: bool) -> CssResult<Group> {
    query_within(tree, tree.root(), query, one)
}

impl From<&str> for Selector {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for Selector {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<NodeId> for Selector {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl From<Option<NodeId>> for Selector {
    fn from(node: Option<NodeId>) -> Self {
        node.map_or(Self::None, Self::Node)
    }
}

impl From<Vec<NodeId>> for Selector {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

impl From<&[NodeId]> for Selector {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Nodes(nodes.to_vec())
    }
}

impl From<Group> for Selector {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<&Group> for Selector {
    fn from(group: &Group) -> Self {
        Self::Group(group.clone())
    }
}
