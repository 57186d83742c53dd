//! Core group operations, registered on every `Blaster`

use crate::selector::query_within;
use crate::{Arg, Blaster, Group, Value};

pub(crate) fn register(blaster: &mut Blaster) {
    blaster.extend("each", |dom, node, args| {
        match args.first() {
            Some(Arg::Callback(callback)) => {
                callback.call(dom, Value::Node(node));
            }
            _ => tracing::debug!("each: expected a callback"),
        }
        Ok(None)
    });

    for name in ["select", "search"] {
        blaster.extend(name, |dom, node, args| {
            let Some(query) = args.first().and_then(Arg::to_text) else {
                tracing::debug!("select: expected a selector string");
                return Ok(Some(Value::Group(Group::empty())));
            };
            let one = matches!(args.get(1), Some(Arg::Bool(true)));
            let group = query_within(dom.tree(), node, &query, one).unwrap_or_else(|err| {
                tracing::warn!(%err, "selector resolved to an empty group");
                Group::empty()
            });
            Ok(Some(Value::Group(group)))
        });
    }

    blaster.extend_group("get", |_, group, args| {
        let group = match args.first().and_then(Arg::to_index) {
            Some(index) => group.get(index),
            None => Group::empty(),
        };
        Ok(Value::Group(group))
    });

    blaster.extend_group("gather", |dom, group, args| {
        let Some(Arg::Callback(callback)) = args.first() else {
            tracing::debug!("gather: expected a callback");
            return Ok(Value::List(Vec::new()));
        };
        let gathered = group.iter().map(|node| callback.call(dom, Value::Node(node))).collect();
        Ok(Value::List(gathered))
    });

    blaster.extend_group("matches", |dom, group, args| {
        let Some(selector) = args.first().and_then(Arg::to_text) else {
            return Ok(Value::Bool(group.is_empty()));
        };
        Ok(Value::Bool(group.matches(dom.document(), &selector)))
    });
}
