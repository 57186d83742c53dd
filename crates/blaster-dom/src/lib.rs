//! DOMBlaster DOM - Document Object Model
//!
//! Arena-allocated DOM tree used as the host document for DOMBlaster
//! selections: nodes, attributes, class lists, event listeners and
//! form-control state.

mod attributes;
mod classlist;
mod document;
mod error;
mod events;
mod forms;
mod node;
mod tree;

pub use attributes::{Attr, AttributeMap};
pub use classlist::ClassList;
pub use document::Document;
pub use error::{DomError, DomResult};
pub use events::{Event, EventHandler, EventListeners, EventPhase, EventType, ListenerOptions};
pub use forms::{ControlKind, InputType};
pub use node::{ElementData, Node, NodeData};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
