//! `forms` module: control values and form scraping

use blaster_dom::{ControlKind, DomTree, NodeId};
use indexmap::IndexMap;

use crate::{Arg, Blaster, BlasterError, BlasterResult, Callback, Dom, Group, Value};

pub(crate) fn register(blaster: &mut Blaster) {
    blaster.extend("value", |dom, node, args| {
        let tree = dom.tree_mut();
        let Some(current) = tree.control_value(node) else {
            tracing::debug!(%node, "value: not a form control");
            return Ok(None);
        };
        match args.first() {
            None => Ok(Some(Value::Text(current))),
            Some(arg) => {
                tree.set_control_value(node, &arg.to_text().unwrap_or_default())?;
                Ok(None)
            }
        }
    });

    blaster.extend_group("formData", |dom, group, args| scrape(dom, group, args, Scrape::Data));
    blaster.extend_group("formState", |dom, group, args| scrape(dom, group, args, Scrape::State));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scrape {
    /// Submitted values keyed by `name`; unchecked boxes are left out
    Data,
    /// Every control keyed by `name` or `id`; boxes report their state
    State,
}

impl Scrape {
    fn operation(self) -> &'static str {
        match self {
            Scrape::Data => "formData",
            Scrape::State => "formState",
        }
    }
}

fn scrape(dom: &mut Dom<'_>, group: &Group, args: &[Arg], mode: Scrape) -> BlasterResult<Value> {
    let callback: Option<Callback> = match args.first() {
        None | Some(Arg::Null) => None,
        Some(Arg::Callback(callback)) => Some(callback.clone()),
        Some(other) => {
            return Err(BlasterError::InvalidArgument(format!(
                "{} expects a callback, got {}",
                mode.operation(),
                other.kind()
            )));
        }
    };

    let mut forms: IndexMap<String, Value> = IndexMap::new();
    let mut unnamed = 0;
    for form in group {
        let data = form_values(dom.tree(), form, mode);
        tracing::debug!(%form, fields = data.len(), mode = mode.operation(), "scraped form");
        match &callback {
            Some(callback) => {
                callback.call(dom, Value::Map(data));
            }
            None => {
                let key = match dom.tree().attr(form, "id").filter(|id| !id.is_empty()) {
                    Some(id) => id.to_string(),
                    None => {
                        unnamed += 1;
                        format!("form{}", unnamed - 1)
                    }
                };
                forms.insert(key, Value::Map(data));
            }
        }
    }

    if callback.is_some() {
        return Ok(Value::Group(group.clone()));
    }
    Ok(if forms.len() > 1 {
        Value::Map(forms)
    } else {
        forms.pop().map_or(Value::Null, |(_, data)| data)
    })
}

/// Values of the enabled `input`/`textarea`/`select` descendants of `form`
fn form_values(tree: &DomTree, form: NodeId, mode: Scrape) -> IndexMap<String, Value> {
    let mut data = IndexMap::new();
    for control in tree.descendant_elements(form) {
        let Some(kind) = tree.control_kind(control) else {
            continue;
        };
        let key = match mode {
            Scrape::Data => tree.attr(control, "name"),
            Scrape::State => tree.attr(control, "name").or_else(|| tree.attr(control, "id")),
        };
        let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
            continue;
        };
        if tree.is_disabled(control) {
            continue;
        }

        match kind {
            ControlKind::Input(input_type) if input_type.is_checkable() => {
                let checked = tree.is_checked(control);
                match mode {
                    Scrape::State => push(&mut data, key, Value::Bool(checked)),
                    Scrape::Data if checked => {
                        push(&mut data, key, tree.control_value(control).into());
                    }
                    Scrape::Data => {}
                }
            }
            ControlKind::Select { .. } => {
                for option in tree.selected_options(control) {
                    push(&mut data, key, Value::Text(tree.option_value(option)));
                }
            }
            _ => push(&mut data, key, tree.control_value(control).into()),
        }
    }
    data
}

/// First value is stored as is, a repeat turns the entry into a list
fn push(data: &mut IndexMap<String, Value>, key: &str, value: Value) {
    match data.get_mut(key) {
        Some(Value::List(values)) => values.push(value),
        Some(existing) => {
            let first = std::mem::take(existing);
            *existing = Value::List(vec![first, value]);
        }
        None => {
            data.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use blaster_dom::Document;

    use crate::{Arg, Blaster, BlasterError, ExtensionModule, Group, Value};

    fn blaster() -> Blaster {
        let mut blaster = Blaster::new();
        blaster.load(ExtensionModule::Forms).unwrap();
        blaster
    }

    fn parse(html: &str) -> Document {
        blaster_html::parse(html).unwrap()
    }

    #[test]
    fn test_checked_boxes_become_list() {
        let blaster = blaster();
        let mut doc = parse(
            r#"<form><input type="checkbox" name="opt" value="a" checked>
               <input type="checkbox" name="opt" value="b" checked>
               <input type="checkbox" name="opt" value="c"></form>"#,
        );
        let mut dom = blaster.bind(&mut doc);
        let form = dom.select("form", false);
        let data = dom.call(&form, "formData", &[]).unwrap();
        assert_eq!(data.get("opt"), Some(&Value::List(vec!["a".into(), "b".into()])));
    }

    #[test]
    fn test_unchecked_key_absent() {
        let blaster = blaster();
        let mut doc = parse(r#"<form><input type="checkbox" name="opt" value="a"><input name="q" value="x"></form>"#);
        let mut dom = blaster.bind(&mut doc);
        let form = dom.select("form", false);
        let data = dom.call(&form, "formData", &[]).unwrap();
        assert_eq!(data.get("opt"), None);
        assert_eq!(data.get("q"), Some(&Value::from("x")));
    }

    #[test]
    fn test_form_state_reports_booleans_and_ids() {
        let blaster = blaster();
        let mut doc = parse(
            r#"<form><input type="checkbox" id="agree">
               <input type="radio" name="size" value="s" checked>
               <textarea name="note">hi</textarea></form>"#,
        );
        let mut dom = blaster.bind(&mut doc);
        let form = dom.select("form", false);
        let state = dom.call(&form, "formState", &[]).unwrap();
        assert_eq!(state.get("agree"), Some(&Value::Bool(false)));
        assert_eq!(state.get("size"), Some(&Value::Bool(true)));
        assert_eq!(state.get("note"), Some(&Value::from("hi")));

        let data = dom.call(&form, "formData", &[]).unwrap();
        assert_eq!(data.get("agree"), None);
        assert_eq!(data.get("size"), Some(&Value::from("s")));
    }

    #[test]
    fn test_disabled_controls_skipped() {
        let blaster = blaster();
        let mut doc = parse(
            r#"<form><input name="a" value="1" disabled>
               <fieldset disabled><input name="b" value="2"></fieldset>
               <input name="c" value="3"></form>"#,
        );
        let mut dom = blaster.bind(&mut doc);
        let form = dom.select("form", false);
        let data = dom.call(&form, "formData", &[]).unwrap();
        let keys: Vec<&str> = data.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["c"]);
    }

    #[test]
    fn test_selects() {
        let blaster = blaster();
        let mut doc = parse(
            r#"<form><select name="one"><option>x</option><option value="y">Y</option></select>
               <select name="many" multiple><option value="1" selected>1</option>
               <option value="2">2</option><option value="3" selected>3</option></select></form>"#,
        );
        let mut dom = blaster.bind(&mut doc);
        let form = dom.select("form", false);
        let data = dom.call(&form, "formData", &[]).unwrap();
        assert_eq!(data.get("one"), Some(&Value::from("x")));
        assert_eq!(data.get("many"), Some(&Value::List(vec!["1".into(), "3".into()])));
    }

    #[test]
    fn test_result_shape_by_form_count() {
        let blaster = blaster();
        let mut doc = parse(
            r#"<form id="login"><input name="u" value="ann"></form>
               <form><input name="q" value="rust"></form>
               <form><input name="r" value="x"></form>"#,
        );
        let mut dom = blaster.bind(&mut doc);

        let none = dom.select("table", false);
        assert_eq!(dom.call(&none, "formData", &[]).unwrap(), Value::Null);

        let forms = dom.select("form", false);
        let all = dom.call(&forms, "formData", &[]).unwrap();
        let keys: Vec<&str> = all.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["login", "form0", "form1"]);
        assert_eq!(all.get("form0").and_then(|f| f.get("q")), Some(&Value::from("rust")));
    }

    #[test]
    fn test_callback_mode_returns_group() {
        let blaster = blaster();
        let mut doc = parse(r#"<form><input name="a" value="1"></form><form><input name="a" value="2"></form>"#);
        let mut dom = blaster.bind(&mut doc);
        let forms = dom.select("form", false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let result = dom
            .call(
                &forms,
                "formData",
                &[Arg::callback(move |_, data| {
                    sink.borrow_mut().push(data);
                    Value::Null
                })],
            )
            .unwrap();
        assert!(result.as_group().is_some_and(|g| g.ptr_eq(&forms)));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].get("a"), Some(&Value::from("2")));
    }

    #[test]
    fn test_non_callback_argument_fails() {
        let blaster = blaster();
        let mut doc = parse("<form></form>");
        let mut dom = blaster.bind(&mut doc);
        let forms = dom.select("form", false);
        let err = dom.call(&forms, "formState", &["oops".into()]).unwrap_err();
        assert!(matches!(err, BlasterError::InvalidArgument(_)));
        assert_eq!(dom.call(&forms, "formState", &[Arg::Null]).unwrap(), Value::Map(Default::default()));
    }

    #[test]
    fn test_value_get_set() {
        let blaster = blaster();
        let mut doc = parse(
            r#"<input name="a" value="1"><textarea>t</textarea>
               <select><option value="x">X</option><option value="y">Y</option></select><p>no</p>"#,
        );
        let mut dom = blaster.bind(&mut doc);
        let input = dom.select("input", false);
        assert_eq!(dom.call(&input, "value", &[]).unwrap(), Value::from("1"));
        dom.call(&input, "value", &["2".into()]).unwrap();
        assert_eq!(dom.call(&input, "value", &[]).unwrap(), Value::from("2"));

        let select = dom.select("select", false);
        dom.call(&select, "value", &["y".into()]).unwrap();
        assert_eq!(dom.call(&select, "value", &[]).unwrap(), Value::from("y"));

        let textarea = dom.select("textarea", false);
        dom.call(&textarea, "value", &["new".into()]).unwrap();
        assert_eq!(dom.call(&textarea, "value", &[]).unwrap(), Value::from("new"));

        let p = dom.select("p", false);
        assert!(dom.call(&p, "value", &[]).unwrap().is_group());
    }

    #[test]
    fn test_value_set_skips_non_controls() {
        let blaster = blaster();
        let mut doc = parse(r#"<input id="a"><p id="p"></p><textarea id="b"></textarea>"#);
        let a = doc.get_element_by_id("a").unwrap();
        let p = doc.get_element_by_id("p").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let text = doc.create_text("loose");
        let mut dom = blaster.bind(&mut doc);

        let group = Group::new(vec![a, text, p, b]);
        dom.call(&group, "value", &["v".into()]).unwrap();
        assert_eq!(dom.tree().control_value(a).as_deref(), Some("v"));
        assert_eq!(dom.tree().control_value(b).as_deref(), Some("v"));
        assert_eq!(dom.tree().attr(p, "value"), None);
    }
}
