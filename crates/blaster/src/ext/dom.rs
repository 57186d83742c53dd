//! `dom` module: tree structure edits and markup access

use blaster_dom::NodeId;
use blaster_html::{inner_html, parse_fragment};

use crate::{Arg, Blaster, BlasterResult, Dom, Group, Value};

pub(crate) fn register(blaster: &mut Blaster) {
    blaster.extend("clear", |dom, node, _| {
        dom.tree_mut().remove_children(node);
        Ok(None)
    });

    blaster.extend("append", |dom, node, args| {
        append(dom, node, args.first())?;
        Ok(None)
    });

    blaster.extend("refill", |dom, node, args| {
        let target = Group::one(node);
        dom.call(&target, "clear", &[])?;
        dom.call(&target, "append", args)?;
        Ok(None)
    });

    blaster.extend("child", |dom, node, args| {
        let child = args
            .first()
            .and_then(Arg::to_index)
            .and_then(|index| dom.tree().element_children(node).get(index).copied());
        Ok(Some(Value::Group(child.into_iter().collect())))
    });

    blaster.extend("children", |dom, node, _| {
        Ok(Some(Value::Group(Group::new(dom.tree().element_children(node)))))
    });

    blaster.extend("parent", |dom, node, _| {
        Ok(Some(Value::Group(dom.tree().parent_element(node).into_iter().collect())))
    });

    blaster.extend("html", |dom, node, args| match args.first() {
        None => Ok(Some(Value::Text(inner_html(dom.tree(), node)))),
        Some(_) if !dom.tree().is_element(node) => {
            tracing::debug!(%node, "html: not an element");
            Ok(None)
        }
        Some(arg) => {
            let markup = arg.to_text().unwrap_or_default();
            dom.tree_mut().remove_children(node);
            append_markup(dom, node, &markup)?;
            Ok(None)
        }
    });

    blaster.extend("text", |dom, node, args| match args.first() {
        None => Ok(Some(Value::Text(dom.tree().text_content(node)))),
        Some(_) if !dom.tree().is_element(node) => {
            tracing::debug!(%node, "text: not an element");
            Ok(None)
        }
        Some(arg) => {
            let text = arg.to_text().unwrap_or_default();
            dom.tree_mut().set_text_content(node, &text)?;
            Ok(None)
        }
    });
}

/// Append a node, a list of nodes, or parsed markup
fn append(dom: &mut Dom<'_>, node: NodeId, children: Option<&Arg>) -> BlasterResult<()> {
    match children {
        Some(Arg::Node(child)) => dom.tree_mut().append_child(node, *child)?,
        Some(Arg::Nodes(children)) => {
            for &child in children {
                dom.tree_mut().append_child(node, child)?;
            }
        }
        Some(Arg::Text(markup)) => append_markup(dom, node, markup)?,
        Some(Arg::Null) | None => {}
        Some(other) => tracing::debug!(%node, kind = other.kind(), "append: unsupported argument"),
    }
    Ok(())
}

/// Parse `markup` in the context of `node` and append the result
fn append_markup(dom: &mut Dom<'_>, node: NodeId, markup: &str) -> BlasterResult<()> {
    let context = dom.tree().tag_name(node).unwrap_or("body").to_string();
    let tree = dom.tree_mut();
    for child in parse_fragment(tree, markup, &context)? {
        tree.append_child(node, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use blaster_dom::{Document, DomError, NodeId};

    use crate::{Arg, Blaster, BlasterError, ExtensionModule, Group, Value};

    fn blaster() -> Blaster {
        let mut blaster = Blaster::new();
        blaster.load(ExtensionModule::Dom).unwrap();
        blaster
    }

    fn list() -> (Document, NodeId) {
        let mut doc = blaster_html::parse(r#"<ul id="list"><li>one</li><li>two</li></ul>"#).unwrap();
        let ul = doc.get_element_by_id("list").unwrap();
        (doc, ul)
    }

    #[test]
    fn test_children_child_parent() {
        let blaster = blaster();
        let (mut doc, ul) = list();
        let mut dom = blaster.bind(&mut doc);
        let group = Group::one(ul);

        let children = dom.call(&group, "children", &[]).unwrap();
        assert_eq!(children.as_group().map(Group::len), Some(2));

        let second = dom.call(&group, "child", &[1usize.into()]).unwrap();
        let li = second.as_group().and_then(Group::first).unwrap();
        assert_eq!(dom.tree().text_content(li), "two");
        assert_eq!(dom.call(&group, "child", &[7usize.into()]).unwrap(), Value::Group(Group::empty()));

        let parent = dom.call(&Group::one(li), "parent", &[]).unwrap();
        assert_eq!(parent, Value::Group(group));
    }

    #[test]
    fn test_html_get_and_set() {
        let blaster = blaster();
        let (mut doc, ul) = list();
        let mut dom = blaster.bind(&mut doc);
        let group = Group::one(ul);
        assert_eq!(
            dom.call(&group, "html", &[]).unwrap(),
            Value::from("<li>one</li><li>two</li>")
        );
        dom.call(&group, "html", &["<li class=\"x\">three</li>".into()]).unwrap();
        assert_eq!(dom.tree().element_children(ul).len(), 1);
        assert_eq!(dom.select("li.x", false).len(), 1);
    }

    #[test]
    fn test_text_is_not_markup() {
        let blaster = blaster();
        let (mut doc, ul) = list();
        let mut dom = blaster.bind(&mut doc);
        let group = Group::one(ul);
        dom.call(&group, "text", &["<b>bold</b> & co".into()]).unwrap();
        assert_eq!(dom.call(&group, "text", &[]).unwrap(), Value::from("<b>bold</b> & co"));
        assert_eq!(
            dom.call(&group, "html", &[]).unwrap(),
            Value::from("&lt;b&gt;bold&lt;/b&gt; &amp; co")
        );
        assert!(dom.select("b", false).is_empty());
    }

    #[test]
    fn test_append_nodes_and_markup() {
        let blaster = blaster();
        let (mut doc, ul) = list();
        let mut dom = blaster.bind(&mut doc);
        let group = Group::one(ul);

        let text = dom.text("three");
        let li = dom.element("li", &[], &[text]).unwrap();
        dom.call(&group, "append", &[li.into()]).unwrap();
        dom.call(&group, "append", &["<li>four</li><li>five</li>".into()]).unwrap();
        assert_eq!(dom.tree().element_children(ul).len(), 5);
        assert_eq!(dom.tree().text_content(ul), "onetwothreefourfive");
    }

    #[test]
    fn test_clear_and_refill() {
        let blaster = blaster();
        let (mut doc, ul) = list();
        let mut dom = blaster.bind(&mut doc);
        let group = Group::one(ul);

        let a = dom.element("li", &[("id", "a")], &[]).unwrap();
        let b = dom.element("li", &[("id", "b")], &[]).unwrap();
        let result = dom.call(&group, "refill", &[vec![a, b].into()]).unwrap();
        assert!(result.as_group().is_some_and(|g| g.ptr_eq(&group)));
        assert_eq!(dom.tree().element_children(ul), vec![a, b]);

        dom.call(&group, "clear", &[]).unwrap();
        assert!(dom.tree().child_ids(ul).is_empty());
    }

    #[test]
    fn test_html_parses_in_element_context() {
        let blaster = blaster();
        let mut doc = blaster_html::parse(
            r#"<table><tbody id="rows"></tbody></table><select id="pick"></select><div id="note"></div>"#,
        )
        .unwrap();
        let mut dom = blaster.bind(&mut doc);

        let rows = dom.select("#rows", true);
        dom.call(&rows, "html", &["<tr><td>a</td></tr>".into()]).unwrap();
        assert_eq!(dom.call(&rows, "html", &[]).unwrap(), Value::from("<tr><td>a</td></tr>"));
        dom.call(&rows, "append", &["<tr><td>b</td></tr>".into()]).unwrap();
        assert_eq!(dom.select("#rows > tr", false).len(), 2);

        let pick = dom.select("#pick", true);
        dom.call(&pick, "html", &["<option>x</option><option>y</option>".into()]).unwrap();
        assert_eq!(dom.select("#pick option", false).len(), 2);

        let note = dom.select("#note", true);
        dom.call(&note, "html", &["<!-- note -->  hi".into()]).unwrap();
        assert_eq!(dom.call(&note, "html", &[]).unwrap(), Value::from("<!-- note -->  hi"));
    }

    #[test]
    fn test_append_ancestor_fails() {
        let blaster = blaster();
        let (mut doc, ul) = list();
        let body = doc.body().unwrap();
        let mut dom = blaster.bind(&mut doc);
        let err = dom.call(&Group::one(ul), "append", &[Arg::Node(body)]).unwrap_err();
        assert!(matches!(err, BlasterError::Dom(DomError::HierarchyRequest { .. })));
    }
}
