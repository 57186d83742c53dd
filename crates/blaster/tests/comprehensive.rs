//! Comprehensive tests for blaster
//!
//! End-to-end selection, chaining and scraping over parsed documents.

use std::cell::RefCell;
use std::rc::Rc;

use blaster::dom::{Document, EventHandler, NodeId};
use blaster::{Arg, Blaster, BlasterConfig, BlasterError, ExtensionModule, Group, Selector, Value, util};

const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Shop</title>
<style>.card { color: maroon } #cart .card { font-weight: bold }</style></head>
<body>
<section id="catalog">
  <div class="card" id="c1" data-sku="A1">Apple</div>
  <div class="card sale" id="c2" data-sku="B2">Banana</div>
  <div class="card" id="c3" data-sku="C3">Cherry</div>
</section>
<section id="cart"></section>
<form id="checkout">
  <input name="email" value="ann@example.test">
  <input type="checkbox" name="opt" value="a" checked>
  <input type="checkbox" name="opt" value="b" checked>
  <input type="radio" name="ship" value="std">
  <input type="radio" name="ship" value="fast" checked>
  <textarea name="note">leave at door</textarea>
</form>
</body></html>"#;

fn page() -> Document {
    blaster::html::parse(PAGE).unwrap()
}

fn class_set(dom: &blaster::Dom<'_>, node: NodeId) -> Vec<String> {
    let mut classes: Vec<String> = util::make_class_map(dom.tree().attr(node, "class").unwrap_or_default())
        .into_iter()
        .collect();
    classes.sort();
    classes
}

#[test]
fn test_query_returns_all_matches_in_document_order() {
    let blaster = Blaster::full();
    let mut doc = page();
    let dom = blaster.bind(&mut doc);
    let cards = dom.select(".card", false);
    assert_eq!(cards.len(), 3);
    let ids: Vec<&str> = cards.iter().filter_map(|n| dom.tree().attr(n, "id")).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);

    let first = dom.select(".card", true);
    assert_eq!(first.as_slice(), &cards.as_slice()[..1]);
    assert!(dom.select(".missing", true).is_empty());
}

#[test]
fn test_selector_kinds() {
    let blaster = Blaster::full();
    let mut doc = page();
    let dom = blaster.bind(&mut doc);
    let cards = dom.select(".card", false);
    let reversed: Vec<NodeId> = cards.iter().rev().collect();

    assert!(dom.select(Selector::None, false).is_empty());
    assert!(dom.select("", false).is_empty());
    assert_eq!(dom.select(reversed.clone(), false).as_slice(), &reversed[..]);
    assert_eq!(dom.select(cards.node(1), false), cards.get(1));
    assert!(dom.select(&cards, false).ptr_eq(&cards));
    assert!(dom.select("div[", false).is_empty());
    assert!(matches!(dom.try_select("div[", false), Err(blaster::css::CssError::InvalidSelector { .. })));
}

#[test]
fn test_class_properties() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let card = dom.id("c2");
    let node = card.first().unwrap();
    let before = class_set(&dom, node);

    dom.call(&card, "addClass", &["sale".into()]).unwrap();
    assert_eq!(class_set(&dom, node), before, "adding a present class is idempotent");

    dom.call(&card, "addClass", &["hot".into()]).unwrap();
    dom.call(&card, "removeClass", &["hot".into()]).unwrap();
    assert_eq!(class_set(&dom, node), before, "add then remove restores the set");

    dom.call(&card, "toggleClass", &["sale".into()]).unwrap();
    assert_eq!(dom.call(&card, "hasClass", &["sale".into()]).unwrap(), Value::Bool(false));
    dom.call(&card, "toggleClass", &["sale".into()]).unwrap();
    assert_eq!(class_set(&dom, node), before, "toggling twice restores presence");
}

#[test]
fn test_checked_checkboxes_collect_into_list() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let form = dom.select("#checkout", true);
    let data = dom.call(&form, "formData", &[]).unwrap();
    assert_eq!(data.get("opt"), Some(&Value::List(vec!["a".into(), "b".into()])));
    assert_eq!(data.get("ship"), Some(&Value::from("fast")));
    assert_eq!(data.get("note"), Some(&Value::from("leave at door")));

    let boxes = dom.select("input[name=opt]", false);
    for node in &boxes {
        dom.tree_mut().set_checked(node, false).unwrap();
    }
    let data = dom.call(&form, "formData", &[]).unwrap();
    assert_eq!(data.get("opt"), None, "no checked box leaves the key out");
    assert_eq!(data.get("email"), Some(&Value::from("ann@example.test")));
}

#[test]
fn test_form_data_serializes_to_json() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let form = dom.select("form", false);
    let state = dom.call(&form, "formState", &[]).unwrap();
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["opt"], serde_json::json!([true, true]));
    assert_eq!(json["ship"], serde_json::json!([false, true]));
    assert_eq!(json["email"], serde_json::json!("ann@example.test"));
}

#[test]
fn test_attrib_list_on_element_without_class() {
    let blaster = Blaster::full();
    let mut doc = blaster::html::parse(r#"<p id="x">p</p>"#).unwrap();
    let mut dom = blaster.bind(&mut doc);
    let p = dom.select("p", false);
    let attrs = dom.call(&p, "attrib", &[Arg::list(["id", "class"])]).unwrap();
    let mut expected = indexmap::IndexMap::new();
    expected.insert("id".to_string(), Value::from("x"));
    expected.insert("class".to_string(), Value::Null);
    assert_eq!(attrs, Value::Map(expected));
}

#[test]
fn test_per_element_handler_without_value_returns_same_group() {
    let mut blaster = Blaster::full();
    let visits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&visits);
    blaster.extend("touch", move |_, _, _| {
        *counter.borrow_mut() += 1;
        Ok(None)
    });
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let cards = dom.select(".card", false);
    let result = dom.call(&cards, "touch", &[]).unwrap();
    assert!(result.as_group().is_some_and(|g| g.ptr_eq(&cards)));
    assert_eq!(*visits.borrow(), 3);
}

#[test]
fn test_group_extension_runs_once() {
    let mut blaster = Blaster::new();
    blaster.extend_group("count", |_, group, _| Ok(Value::Number(group.len() as f64)));
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let cards = dom.select(".card", false);
    assert_eq!(dom.call(&cards, "count", &[]).unwrap(), Value::Number(3.0));
}

#[test]
fn test_chaining_through_returned_groups() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let catalog = dom.id("catalog");

    let sale = dom
        .call(&catalog, "search", &[".sale".into()])
        .unwrap()
        .as_group()
        .cloned()
        .unwrap();
    let chained = dom.call(&sale, "addClass", &["featured".into()]).unwrap();
    let chained = chained.as_group().cloned().unwrap();
    dom.call(&chained, "data", &["badge".into(), "new".into()]).unwrap();

    let node = sale.first().unwrap();
    assert!(dom.tree().element(node).unwrap().has_class("featured"));
    assert_eq!(dom.tree().attr(node, "data-badge"), Some("new"));
}

#[test]
fn test_move_cards_into_cart() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let cart = dom.id("cart");
    let picked = dom.select("#c1, #c3", false);

    dom.call(&cart, "append", &[Arg::from(&picked)]).unwrap();
    assert_eq!(dom.select("#cart .card", false), picked);
    assert_eq!(dom.select("#catalog .card", false).len(), 1);

    let weight = dom.call(&picked, "styleComputed", &["fontWeight".into()]).unwrap();
    assert_eq!(weight, Value::from("bold"));
    let color = dom.call(&picked, "styleComputed", &["color".into()]).unwrap();
    assert_eq!(color, Value::from("maroon"));

    dom.call(&cart, "refill", &["<p class=\"empty\">Cart is empty</p>".into()]).unwrap();
    assert_eq!(dom.call(&cart, "text", &[]).unwrap(), Value::from("Cart is empty"));
    assert!(dom.select("#cart .card", false).is_empty());
}

#[test]
fn test_events_on_groups() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&clicks);
    let handler = EventHandler::new(move |doc, event| {
        let id = event
            .current_target()
            .and_then(|n| doc.tree().attr(n, "id"))
            .unwrap_or_default()
            .to_string();
        log.borrow_mut().push(id);
    });

    let cards = dom.select(".card", false);
    dom.call(&cards, "click", &[handler.clone().into()]).unwrap();
    dom.call(&dom.id("c2"), "send", &["click".into()]).unwrap();
    dom.call(&cards, "send", &["click".into()]).unwrap();
    assert_eq!(*clicks.borrow(), vec!["c2", "c1", "c2", "c3"]);

    dom.call(&cards, "off", &["click".into(), handler.into()]).unwrap();
    dom.call(&cards, "send", &["click".into()]).unwrap();
    assert_eq!(clicks.borrow().len(), 4);
}

#[test]
fn test_eventform_select_replaces_core_select() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let catalog = dom.id("catalog");
    let registered = dom.call(&catalog, "select", &[Arg::Null]).unwrap();
    assert!(registered.as_group().is_some_and(|g| g.ptr_eq(&catalog)));
    let found = dom.call(&catalog, "search", &["div".into()]).unwrap();
    assert_eq!(found.as_group().map(Group::len), Some(3));
}

#[test]
fn test_core_only_configuration() {
    let blaster = Blaster::with_config(BlasterConfig::core_only()).unwrap();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let cards = dom.select(".card", false);
    let err = dom.call(&cards, "addClass", &["x".into()]).unwrap_err();
    assert!(matches!(err, BlasterError::UnknownExtension(_)));
    let found = dom.call(&dom.id("catalog"), "select", &[".card".into(), true.into()]).unwrap();
    assert_eq!(found.as_group().map(Group::len), Some(1));
}

#[test]
fn test_toml_configuration_with_skipped_module() {
    let config = BlasterConfig::from_toml_str(
        r#"
        modules = ["eventmouse", "css"]
        skip_unmet_dependencies = true
        "#,
    )
    .unwrap();
    let blaster = Blaster::with_config(config).unwrap();
    assert!(blaster.has_module(ExtensionModule::Css));
    assert!(!blaster.has_module(ExtensionModule::EventMouse));

    let strict = BlasterConfig::from_toml_str(r#"modules = ["eventmouse"]"#).unwrap();
    assert!(matches!(
        Blaster::with_config(strict),
        Err(BlasterError::MissingDependency { .. })
    ));
}

#[test]
fn test_html_round_trip_and_text_escaping() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    let cart = dom.id("cart");
    dom.call(&cart, "html", &["<b>1</b> item".into()]).unwrap();
    assert_eq!(dom.call(&cart, "html", &[]).unwrap(), Value::from("<b>1</b> item"));
    dom.call(&cart, "text", &["<b>1</b>".into()]).unwrap();
    assert_eq!(dom.call(&cart, "html", &[]).unwrap(), Value::from("&lt;b&gt;1&lt;/b&gt;"));
}

#[test]
fn test_lookups_and_gather() {
    let blaster = Blaster::full();
    let mut doc = page();
    let mut dom = blaster.bind(&mut doc);
    assert_eq!(dom.tag("section").len(), 2);
    assert_eq!(dom.class_name("card sale"), dom.id("c2"));
    assert_eq!(dom.name("opt").len(), 2);

    let cards = dom.class_name("card");
    let skus = dom
        .call(
            &cards,
            "gather",
            &[Arg::callback(|dom, node| {
                let group = node.as_node().map(Group::one).unwrap_or_default();
                dom.call(&group, "data", &["sku".into()]).unwrap_or_default()
            })],
        )
        .unwrap();
    assert_eq!(skus, Value::List(vec!["A1".into(), "B2".into(), "C3".into()]));
    assert_eq!(dom.call(&cards, "matches", &["section > div".into()]).unwrap(), Value::Bool(true));
}
