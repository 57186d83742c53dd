//! `attributes` module: attribute getters and setters

use blaster_dom::NodeId;
use indexmap::IndexMap;

use super::Keyed;
use crate::{Arg, Blaster, BlasterResult, Dom, Value};

pub(crate) fn register(blaster: &mut Blaster) {
    blaster.extend("attrib", attrib);
    blaster.extend("id", |dom, node, args| single(dom, node, "id", args.first()));
    blaster.extend("name", |dom, node, args| single(dom, node, "name", args.first()));
    blaster.extend("aria", |dom, node, args| prefixed(dom, node, "aria-", args));
    blaster.extend("data", |dom, node, args| prefixed(dom, node, "data-", args));
}

fn attrib(dom: &mut Dom<'_>, node: NodeId, args: &[Arg]) -> BlasterResult<Option<Value>> {
    let Some(keyed) = Keyed::parse(args) else {
        tracing::debug!(%node, "attrib: unsupported arguments");
        return Ok(None);
    };
    match keyed {
        Keyed::Get(name) => Ok(Some(dom.tree().attr(node, &name).into())),
        Keyed::GetMany(names) => {
            let tree = dom.tree();
            let values: IndexMap<String, Value> = names
                .into_iter()
                .map(|name| {
                    let value = tree.attr(node, &name).into();
                    (name, value)
                })
                .collect();
            Ok(Some(Value::Map(values)))
        }
        Keyed::Set(entries) => {
            for (name, value) in entries {
                write(dom, node, &name, value)?;
            }
            Ok(None)
        }
    }
}

/// `(name)` reads, `(name, value)` writes
fn prefixed(dom: &mut Dom<'_>, node: NodeId, prefix: &str, args: &[Arg]) -> BlasterResult<Option<Value>> {
    let Some(suffix) = args.first().and_then(Arg::to_text) else {
        tracing::debug!(%node, prefix, "expected an attribute name");
        return Ok(None);
    };
    single(dom, node, &format!("{prefix}{suffix}"), args.get(1))
}

/// Get `name` when `value` is absent, else set it (`Null` removes)
fn single(dom: &mut Dom<'_>, node: NodeId, name: &str, value: Option<&Arg>) -> BlasterResult<Option<Value>> {
    match value {
        None => Ok(Some(dom.tree().attr(node, name).into())),
        Some(Arg::Null) => write(dom, node, name, None).map(|_| None),
        Some(arg) => match arg.to_text() {
            Some(text) => write(dom, node, name, Some(text)).map(|_| None),
            None => {
                tracing::debug!(%node, name, kind = arg.kind(), "unsupported attribute value");
                Ok(None)
            }
        },
    }
}

/// Set or remove one attribute; non-elements in the group are skipped
fn write(dom: &mut Dom<'_>, node: NodeId, name: &str, value: Option<String>) -> BlasterResult<()> {
    let tree = dom.tree_mut();
    if !tree.is_element(node) {
        tracing::debug!(%node, name, "skipping attribute write on a non-element");
        return Ok(());
    }
    match value {
        Some(value) => tree.set_attr(node, name, value)?,
        None => {
            tree.remove_attr(node, name)?;
        }
    }
    Ok(())
}
