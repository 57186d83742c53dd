//! `event` module and its named-event shortcut modules

use blaster_dom::{Event, ListenerOptions, NodeId};

use crate::{Arg, Blaster, Dom};

pub(crate) const FORM_EVENTS: &[&str] = &["blur", "focus", "focusin", "focusout", "change", "select", "submit"];
pub(crate) const KEYBOARD_EVENTS: &[&str] = &["keyup", "keydown", "keypress"];
pub(crate) const MOUSE_EVENTS: &[&str] = &[
    "click",
    "dblclick",
    "contextmenu",
    "mouseenter",
    "mouseleave",
    "mouseup",
    "mousedown",
    "mouseover",
    "mouseout",
];

pub(crate) fn register(blaster: &mut Blaster) {
    blaster.extend("on", |dom, node, args| {
        match args.first().and_then(Arg::to_text) {
            Some(event_type) => listen(dom, node, &event_type, args.get(1), args.get(2)),
            None => tracing::debug!(%node, "on: expected an event type"),
        }
        Ok(None)
    });

    blaster.extend("off", |dom, node, args| {
        let event_type = args.first().and_then(Arg::to_text);
        match (event_type, args.get(1)) {
            (Some(event_type), Some(Arg::Handler(handler))) => {
                let options = listener_options(args.get(2));
                dom.remove_event(node, &event_type, handler, options);
            }
            _ => tracing::debug!(%node, "off: expected an event type and a handler"),
        }
        Ok(None)
    });

    blaster.extend("send", |dom, node, args| {
        let mut event = match args.first() {
            Some(Arg::Event(event)) => event.clone(),
            Some(arg) => match arg.to_text() {
                Some(event_type) => Event::new(&event_type),
                None => {
                    tracing::debug!(%node, kind = arg.kind(), "send: expected an event");
                    return Ok(None);
                }
            },
            None => return Ok(None),
        };
        dom.send_event(node, &mut event);
        Ok(None)
    });
}

/// Register one `(handler, options?)` shortcut per event name
pub(crate) fn register_shortcuts(blaster: &mut Blaster, event_types: &'static [&'static str]) {
    for &event_type in event_types {
        blaster.extend(event_type, move |dom, node, args| {
            listen(dom, node, event_type, args.first(), args.get(1));
            Ok(None)
        });
    }
}

/// Add a listener; a `Null` handler is ignored
fn listen(dom: &mut Dom<'_>, node: NodeId, event_type: &str, handler: Option<&Arg>, options: Option<&Arg>) {
    match handler {
        Some(Arg::Handler(handler)) => {
            let options = listener_options(options);
            dom.add_event(node, event_type, handler.clone(), options);
        }
        Some(Arg::Null) | None => {}
        Some(other) => tracing::debug!(%node, event_type, kind = other.kind(), "expected an event handler"),
    }
}

/// `Options`, or a bare boolean meaning `capture`
fn listener_options(arg: Option<&Arg>) -> ListenerOptions {
    match arg {
        Some(Arg::Options(options)) => *options,
        Some(Arg::Bool(capture)) => ListenerOptions {
            capture: *capture,
            ..ListenerOptions::default()
        },
        _ => ListenerOptions::default(),
    }
}
