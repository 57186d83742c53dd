//! `css` module: class list edits, inline style and computed style

use blaster_css::{InlineStyle, StyleResolver};
use blaster_dom::{ClassList, NodeId};

use super::{Keyed, names};
use crate::{Arg, Blaster, BlasterResult, Dom, Group, Value};

pub(crate) fn register(blaster: &mut Blaster) {
    blaster.extend("addClass", |dom, node, args| {
        let names = names(args.first());
        edit_classes(dom, node, |classes| classes.add(&as_strs(&names)));
        Ok(None)
    });

    blaster.extend("removeClass", |dom, node, args| {
        let names = names(args.first());
        edit_classes(dom, node, |classes| classes.remove(&as_strs(&names)));
        Ok(None)
    });

    blaster.extend("toggleClass", |dom, node, args| {
        let names = names(args.first());
        edit_classes(dom, node, |classes| {
            for name in &names {
                classes.toggle(name, None);
            }
        });
        Ok(None)
    });

    blaster.extend("replaceClass", |dom, node, args| {
        let old = names(args.first());
        let Some(new) = args.get(1).and_then(Arg::to_text).filter(|n| !n.trim().is_empty()) else {
            tracing::debug!(%node, "replaceClass: expected a replacement class");
            return Ok(None);
        };
        edit_classes(dom, node, |classes| {
            for name in &old {
                classes.replace(name, new.trim());
            }
        });
        Ok(None)
    });

    blaster.extend("hasClass", |dom, node, args| {
        let name = args.first().and_then(Arg::to_text).unwrap_or_default();
        let present = dom.tree().element(node).is_some_and(|e| e.has_class(&name));
        Ok(Some(Value::Bool(present)))
    });

    blaster.extend("getClasses", |dom, node, _| {
        let classes = class_list(dom, node).iter().map(Value::from).collect();
        Ok(Some(Value::List(classes)))
    });

    blaster.extend("style", style);
    blaster.extend_group("styleComputed", style_computed);
}

fn as_strs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

fn class_list(dom: &Dom<'_>, node: NodeId) -> ClassList {
    dom.tree().element(node).map(|e| e.class_list()).unwrap_or_default()
}

/// Parse the `class` attribute, edit it, and write it back
fn edit_classes(dom: &mut Dom<'_>, node: NodeId, edit: impl FnOnce(&mut ClassList)) {
    let Some(element) = dom.tree_mut().element_mut(node) else {
        tracing::debug!(%node, "class edit on a non-element");
        return;
    };
    let mut classes = element.class_list();
    edit(&mut classes);
    element.set_class_list(&classes);
}

fn inline_style(dom: &Dom<'_>, node: NodeId) -> InlineStyle {
    InlineStyle::parse(dom.tree().attr(node, "style").unwrap_or_default())
}

fn style(dom: &mut Dom<'_>, node: NodeId, args: &[Arg]) -> BlasterResult<Option<Value>> {
    let Some(keyed) = Keyed::parse(args) else {
        tracing::debug!(%node, "style: unsupported arguments");
        return Ok(None);
    };
    let mut declarations = inline_style(dom, node);
    match keyed {
        Keyed::Get(property) => Ok(Some(declarations.get(&property).into())),
        Keyed::GetMany(properties) => {
            let values = properties
                .into_iter()
                .map(|property| {
                    let value = declarations.get(&property).into();
                    (property, value)
                })
                .collect();
            Ok(Some(Value::Map(values)))
        }
        Keyed::Set(_) if !dom.tree().is_element(node) => {
            tracing::debug!(%node, "style: not an element");
            Ok(None)
        }
        Keyed::Set(entries) => {
            for (property, value) in entries {
                match value {
                    Some(value) => declarations.set(&property, &value),
                    None => {
                        declarations.remove(&property);
                    }
                }
            }
            let tree = dom.tree_mut();
            if declarations.is_empty() {
                tree.remove_attr(node, "style")?;
            } else {
                tree.set_attr(node, "style", declarations.serialize())?;
            }
            Ok(None)
        }
    }
}

/// Cascaded value of one property (`Value::Text`) or of a list of
/// properties (`Value::Map`) for the first element of the group.
///
/// The author stylesheets are collected once per call. A group without
/// elements is returned as is.
fn style_computed(dom: &mut Dom<'_>, group: &Group, args: &[Arg]) -> BlasterResult<Value> {
    let tree = dom.tree();
    let Some(node) = group.iter().find(|&node| tree.is_element(node)) else {
        return Ok(Value::Group(group.clone()));
    };
    let computed = StyleResolver::for_tree(tree).compute_style(tree, node);
    let value = match args.first() {
        Some(Arg::List(properties)) => Value::Map(
            properties
                .iter()
                .map(|property| (property.clone(), computed.get(property).into()))
                .collect(),
        ),
        Some(arg) => arg.to_text().and_then(|p| computed.get(&p)).into(),
        None => Value::Null,
    };
    Ok(value)
}
