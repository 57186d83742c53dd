//! Registry bound to a document

use blaster_css::CssResult;
use blaster_dom::{Document, DomTree, Event, EventHandler, ListenerOptions, NodeId};

use crate::{Arg, Blaster, BlasterError, BlasterResult, Extension, Group, Selector, Value};

/// A [`Blaster`] registry bound to one document.
///
/// Every selection, lookup and extension call goes through this context;
/// extensions receive it mutably so they can edit the tree or chain
/// further calls.
pub struct Dom<'d> {
    blaster: &'d Blaster,
    document: &'d mut Document,
}

impl<'d> Dom<'d> {
    pub(crate) fn new(blaster: &'d Blaster, document: &'d mut Document) -> Self {
        Self { blaster, document }
    }

    pub fn blaster(&self) -> &'d Blaster {
        self.blaster
    }

    pub fn document(&self) -> &Document {
        &*self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut *self.document
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        self.document.tree_mut()
    }

    /// Resolve a selector against the document.
    ///
    /// With `one`, at most the first match in document order is kept.
    pub fn select(&self, selector: impl Into<Selector>, one: bool) -> Group {
        selector.into().resolve(self.tree(), one)
    }

    /// [`Dom::select`] that reports an invalid selector string
    pub fn try_select(&self, selector: impl Into<Selector>, one: bool) -> CssResult<Group> {
        selector.into().try_resolve(self.tree(), one)
    }

    /// Invoke the extension registered as `name` over `group`.
    ///
    /// Per-element extensions run element by element until one produces a
    /// value; when none does, the group itself is returned for chaining.
    pub fn call(&mut self, group: &Group, name: &str, args: &[Arg]) -> BlasterResult<Value> {
        let blaster = self.blaster;
        let extension = blaster
            .extension(name)
            .ok_or_else(|| BlasterError::UnknownExtension(name.to_string()))?;
        tracing::trace!(name, elements = group.len(), args = args.len(), "dispatch");

        match extension {
            Extension::Element(f) => {
                for node in group {
                    if let Some(value) = f(self, node, args)? {
                        return Ok(value);
                    }
                }
                Ok(Value::Group(group.clone()))
            }
            Extension::Group(f) => f(self, group, args),
        }
    }

    /// Element with the given `id` (empty group when absent)
    pub fn id(&self, id: &str) -> Group {
        self.document.get_element_by_id(id).into_iter().collect()
    }

    /// Elements whose `name` attribute equals `name`
    pub fn name(&self, name: &str) -> Group {
        Group::new(self.document.get_elements_by_name(name))
    }

    pub fn tag(&self, tag: &str) -> Group {
        Group::new(self.document.get_elements_by_tag_name(tag))
    }

    /// Elements carrying every class in the space-separated `classes`
    pub fn class_name(&self, classes: &str) -> Group {
        Group::new(self.document.get_elements_by_class_name(classes))
    }

    /// Create a detached element with attributes and children
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], children: &[NodeId]) -> BlasterResult<NodeId> {
        let tree = self.tree_mut();
        let node = tree.create_element(tag);
        for &(name, value) in attrs {
            tree.set_attr(node, name, value)?;
        }
        for &child in children {
            tree.append_child(node, child)?;
        }
        Ok(node)
    }

    /// Create a detached text node
    pub fn text(&mut self, data: &str) -> NodeId {
        self.tree_mut().create_text(data)
    }

    /// Register a listener; returns `false` for a duplicate
    pub fn add_event(
        &mut self,
        node: NodeId,
        event_type: &str,
        handler: EventHandler,
        options: ListenerOptions,
    ) -> bool {
        self.document.add_event_listener(node, event_type, handler, options)
    }

    pub fn remove_event(
        &mut self,
        node: NodeId,
        event_type: &str,
        handler: &EventHandler,
        options: ListenerOptions,
    ) -> bool {
        self.document.remove_event_listener(node, event_type, handler, options)
    }

    /// Dispatch `event` at `node`; `false` when the default was prevented
    pub fn send_event(&mut self, node: NodeId, event: &mut Event) -> bool {
        self.document.dispatch_event(node, event)
    }
}
