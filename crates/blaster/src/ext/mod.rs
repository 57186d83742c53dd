//! Built-in extension modules

pub(crate) mod attributes;
pub(crate) mod builtin;
pub(crate) mod css;
pub(crate) mod dom;
pub(crate) mod event;
pub(crate) mod forms;

use crate::{Arg, Blaster, ExtensionModule};

/// Register the extensions of `module`
pub(crate) fn install(blaster: &mut Blaster, module: ExtensionModule) {
    match module {
        ExtensionModule::Attributes => attributes::register(blaster),
        ExtensionModule::Css => css::register(blaster),
        ExtensionModule::Dom => dom::register(blaster),
        ExtensionModule::Event => event::register(blaster),
        ExtensionModule::EventForm => event::register_shortcuts(blaster, event::FORM_EVENTS),
        ExtensionModule::EventKeyboard => event::register_shortcuts(blaster, event::KEYBOARD_EVENTS),
        ExtensionModule::EventMouse => event::register_shortcuts(blaster, event::MOUSE_EVENTS),
        ExtensionModule::Forms => forms::register(blaster),
    }
}

/// Shape of a keyed accessor call (`attrib`, `style`)
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Keyed {
    Get(String),
    GetMany(Vec<String>),
    /// `None` removes the key
    Set(Vec<(String, Option<String>)>),
}

impl Keyed {
    /// `(key)`, `(key, value)`, `([keys])` or `({key: value})`
    pub(crate) fn parse(args: &[Arg]) -> Option<Keyed> {
        match (args.first()?, args.get(1)) {
            (Arg::List(keys), _) => Some(Keyed::GetMany(keys.clone())),
            (Arg::Map(entries), _) => Some(Keyed::Set(entries.clone())),
            (key, None) => Some(Keyed::Get(key.to_text()?)),
            (key, Some(Arg::Null)) => Some(Keyed::Set(vec![(key.to_text()?, None)])),
            (key, Some(value)) => Some(Keyed::Set(vec![(key.to_text()?, Some(value.to_text()?))])),
        }
    }
}

/// Whitespace-separated names from a text or list argument
pub(crate) fn names(arg: Option<&Arg>) -> Vec<String> {
    match arg {
        Some(Arg::List(items)) => items
            .iter()
            .flat_map(|item| item.split_whitespace())
            .map(str::to_string)
            .collect(),
        Some(arg) => arg
            .to_text()
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_shapes() {
        assert_eq!(Keyed::parse(&["id".into()]), Some(Keyed::Get("id".into())));
        assert_eq!(
            Keyed::parse(&["id".into(), "x".into()]),
            Some(Keyed::Set(vec![("id".into(), Some("x".into()))]))
        );
        assert_eq!(
            Keyed::parse(&["id".into(), Arg::Null]),
            Some(Keyed::Set(vec![("id".into(), None)]))
        );
        assert_eq!(
            Keyed::parse(&[Arg::list(["id", "class"])]),
            Some(Keyed::GetMany(vec!["id".into(), "class".into()]))
        );
        assert_eq!(Keyed::parse(&[]), None);
        assert_eq!(Keyed::parse(&[Arg::Node(blaster_dom::NodeId::ROOT)]), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(names(Some(&Arg::from("a  b"))), vec!["a", "b"]);
        assert_eq!(names(Some(&Arg::list(["a", "c d"]))), vec!["a", "c", "d"]);
        assert!(names(Some(&Arg::Null)).is_empty());
        assert!(names(None).is_empty());
    }
}
