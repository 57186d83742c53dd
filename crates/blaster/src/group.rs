//! Selection groups

use std::fmt;
use std::rc::Rc;

use blaster_dom::{Document, NodeId};

use crate::util;

/// Ordered, fixed-size collection of element ids.
///
/// The document owns every node; a group only refers to them. Clones
/// share the backing sequence, so [`Group::ptr_eq`] recognizes "the same
/// group" after it has been handed back from a chained call.
#[derive(Clone)]
pub struct Group {
    nodes: Rc<[NodeId]>,
}

impl Group {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes: nodes.into() }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn one(node: NodeId) -> Self {
        Self::new(vec![node])
    }

    /// Same backing sequence (not just equal contents)
    pub fn ptr_eq(&self, other: &Group) -> bool {
        Rc::ptr_eq(&self.nodes, &other.nodes)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Element at `index` wrapped in its own group (empty when out of range)
    pub fn get(&self, index: usize) -> Group {
        self.node(index).map(Group::one).unwrap_or_else(Group::empty)
    }

    /// Raw id at `index`
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.node(0)
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Visit each element with its index; returning `true` stops early
    pub fn each(&self, mut f: impl FnMut(usize, NodeId) -> bool) {
        for (index, &node) in self.nodes.iter().enumerate() {
            if f(index, node) {
                break;
            }
        }
    }

    /// Every element matches `selector` (vacuously true when empty)
    pub fn matches(&self, document: &Document, selector: &str) -> bool {
        self.iter().all(|node| util::matches(document, node, selector))
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for Group {}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl From<NodeId> for Group {
    fn from(node: NodeId) -> Self {
        Self::one(node)
    }
}

impl From<Vec<NodeId>> for Group {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::new(nodes)
    }
}

impl FromIterator<NodeId> for Group {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
