//! DOM Events
//!
//! Listener registration and dispatch (capture, target, bubble).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// Well-known event types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    ContextMenu,
    MouseDown,
    MouseUp,
    MouseEnter,
    MouseLeave,
    MouseOver,
    MouseOut,
    KeyDown,
    KeyUp,
    KeyPress,
    Input,
    Change,
    Select,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Submit,
    Reset,
    Load,
    Custom(String),
}

impl EventType {
    /// Map an event name to its type
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "contextmenu" => Self::ContextMenu,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "keypress" => Self::KeyPress,
            "input" => Self::Input,
            "change" => Self::Change,
            "select" => Self::Select,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "load" => Self::Load,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Check if this event type bubbles when dispatched by the host
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            Self::Focus | Self::Blur | Self::Load | Self::MouseEnter | Self::MouseLeave | Self::Custom(_)
        )
    }

    /// Check if the default action can be prevented
    pub fn cancelable(&self) -> bool {
        matches!(
            self,
            Self::Click
                | Self::DblClick
                | Self::ContextMenu
                | Self::MouseDown
                | Self::MouseUp
                | Self::MouseOver
                | Self::MouseOut
                | Self::KeyDown
                | Self::KeyUp
                | Self::KeyPress
                | Self::Submit
                | Self::Reset
        )
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Free-form payload (e.g. a key name)
    pub detail: Option<String>,
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    in_passive_listener: bool,
}

impl Event {
    /// Create an event with the host defaults for its type
    pub fn new(event_type: &str) -> Self {
        let kind = EventType::from_name(event_type);
        Self {
            event_type: event_type.to_string(),
            bubbles: kind.bubbles(),
            cancelable: kind.cancelable(),
            detail: None,
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            in_passive_listener: false,
        }
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Event type name
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target.option()
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target.option()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable && !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip remaining listeners on this node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listener options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Capture phase
    pub capture: bool,
    /// Once (auto-remove)
    pub once: bool,
    /// Passive listener (cannot prevent default)
    pub passive: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self { capture: true, ..Self::default() }
    }

    pub fn once() -> Self {
        Self { once: true, ..Self::default() }
    }

    pub fn passive() -> Self {
        Self { passive: true, ..Self::default() }
    }
}

type HandlerFn = dyn Fn(&mut Document, &mut Event);

/// Event listener callback, compared by identity
#[derive(Clone)]
pub struct EventHandler(Rc<HandlerFn>);

impl EventHandler {
    pub fn new(f: impl Fn(&mut Document, &mut Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Same underlying callback
    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn call(&self, document: &mut Document, event: &mut Event) {
        (self.0)(document, event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

#[derive(Debug, Clone)]
struct Listener {
    event_type: String,
    handler: EventHandler,
    options: ListenerOptions,
}

impl Listener {
    fn is(&self, event_type: &str, handler: &EventHandler, capture: bool) -> bool {
        self.event_type == event_type && self.options.capture == capture && self.handler.ptr_eq(handler)
    }
}

/// Listeners registered per node
#[derive(Debug, Default)]
pub struct EventListeners {
    by_node: HashMap<NodeId, Vec<Listener>>,
}

impl EventListeners {
    /// Register a listener; duplicates (type, handler, capture) are ignored
    pub fn add(&mut self, node: NodeId, event_type: &str, handler: EventHandler, options: ListenerOptions) -> bool {
        let list = self.by_node.entry(node).or_default();
        if list.iter().any(|l| l.is(event_type, &handler, options.capture)) {
            return false;
        }
        list.push(Listener {
            event_type: event_type.to_string(),
            handler,
            options,
        });
        true
    }

    /// Unregister a listener
    pub fn remove(&mut self, node: NodeId, event_type: &str, handler: &EventHandler, capture: bool) -> bool {
        let Some(list) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| !l.is(event_type, handler, capture));
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_node.remove(&node);
        }
        removed
    }

    /// Whether the listener is still registered
    pub fn contains(&self, node: NodeId, event_type: &str, handler: &EventHandler, capture: bool) -> bool {
        self.by_node
            .get(&node)
            .is_some_and(|list| list.iter().any(|l| l.is(event_type, handler, capture)))
    }

    /// Number of listeners on a node
    pub fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    fn snapshot(&self, node: NodeId, event_type: &str, capture: Option<bool>) -> Vec<(EventHandler, ListenerOptions)> {
        self.by_node
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|l| l.event_type == event_type)
                    .filter(|l| capture.is_none_or(|c| l.options.capture == c))
                    .map(|l| (l.handler.clone(), l.options))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Document {
    /// Register an event listener on a node
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        handler: EventHandler,
        options: ListenerOptions,
    ) -> bool {
        let added = self.listeners.add(node, event_type, handler, options);
        tracing::trace!(%node, event_type, added, "add_event_listener");
        added
    }

    /// Unregister an event listener
    pub fn remove_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        handler: &EventHandler,
        options: ListenerOptions,
    ) -> bool {
        self.listeners.remove(node, event_type, handler, options.capture)
    }

    /// Dispatch an event at `target`.
    ///
    /// Runs capture listeners from the root down, then the target's own
    /// listeners, then (for bubbling events) non-capture listeners back up.
    /// Returns `false` if a listener prevented the default action.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> bool {
        event.target = target;
        event.propagation_stopped = false;
        event.immediate_propagation_stopped = false;

        let mut path: Vec<NodeId> = self.tree().ancestors(target).collect();
        path.reverse();

        event.phase = EventPhase::Capturing;
        for &node in &path {
            if event.propagation_stopped {
                break;
            }
            self.invoke_listeners(node, event, Some(true));
        }

        if !event.propagation_stopped {
            event.phase = EventPhase::AtTarget;
            self.invoke_listeners(target, event, None);
        }

        if event.bubbles {
            event.phase = EventPhase::Bubbling;
            for &node in path.iter().rev() {
                if event.propagation_stopped {
                    break;
                }
                self.invoke_listeners(node, event, Some(false));
            }
        }

        event.phase = EventPhase::None;
        event.current_target = NodeId::NONE;
        tracing::trace!(%target, event_type = event.event_type(), prevented = event.default_prevented, "dispatched");
        !event.default_prevented
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut Event, capture: Option<bool>) {
        let listeners = self.listeners.snapshot(node, &event.event_type, capture);
        event.current_target = node;
        for (handler, options) in listeners {
            if event.immediate_propagation_stopped {
                break;
            }
            // Removed by an earlier listener during this dispatch
            if !self.listeners.contains(node, &event.event_type, &handler, options.capture) {
                continue;
            }
            if options.once {
                self.listeners.remove(node, &event.event_type, &handler, options.capture);
            }
            event.in_passive_listener = options.passive;
            handler.call(self, event);
            event.in_passive_listener = false;
        }
    }
}
