//! DOM-independent helpers

use std::sync::OnceLock;
use std::time::Instant;

use blaster_css::element_matches;
use blaster_dom::{Document, NodeId};
use indexmap::{IndexMap, IndexSet};

use crate::Value;

/// `Null`, zero, NaN, an empty list, or whitespace-only text
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(n) => *n == 0.0 || n.is_nan(),
        Value::List(items) => items.is_empty(),
        Value::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Keys of `base` in order, overridden by `add`, followed by keys only in `add`
pub fn merge(base: &IndexMap<String, Value>, add: &IndexMap<String, Value>) -> IndexMap<String, Value> {
    let mut out: IndexMap<String, Value> = base
        .iter()
        .map(|(key, value)| (key.clone(), add.get(key).unwrap_or(value).clone()))
        .collect();
    for (key, value) in add {
        if !base.contains_key(key) {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

/// Split a `class` attribute into a set of names
pub fn make_class_map(class_name: &str) -> IndexSet<String> {
    class_name.split_whitespace().map(str::to_string).collect()
}

/// Join a class set back into a `class` attribute value
pub fn merge_class_map(classes: &IndexSet<String>) -> String {
    classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Test `node` against a selector; an invalid selector never matches
pub fn matches(document: &Document, node: NodeId, selector: &str) -> bool {
    element_matches(document.tree(), node, selector).unwrap_or_else(|err| {
        tracing::warn!(%err, %node, "selector cannot match");
        false
    })
}

/// Monotonic nanoseconds since the first call in this process
pub fn nano_time() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, Value)]) -> IndexMap<String, Value> {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&Value::Number(0.0)));
        assert!(is_blank(&Value::Number(f64::NAN)));
        assert!(is_blank(&Value::List(vec![])));
        assert!(is_blank(&Value::from(" \t\n")));
        assert!(!is_blank(&Value::from("x")));
        assert!(!is_blank(&Value::Number(3.0)));
        assert!(!is_blank(&Value::Bool(false)));
    }

    #[test]
    fn test_merge() {
        let base = map(&[("a", 1.0.into()), ("b", 2.0.into())]);
        let add = map(&[("c", 3.0.into()), ("a", 9.0.into())]);
        let merged = merge(&base, &add);
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(merged["a"], Value::Number(9.0));
        assert_eq!(merged["b"], Value::Number(2.0));
    }

    #[test]
    fn test_class_map() {
        let mut classes = make_class_map("  one two\tone ");
        assert_eq!(classes.len(), 2);
        classes.insert("three".into());
        classes.shift_remove("one");
        assert_eq!(merge_class_map(&classes), "two three");
        assert!(make_class_map("   ").is_empty());
    }

    #[test]
    fn test_matches() {
        let doc = Document::default();
        let body = doc.body().unwrap();
        assert!(matches(&doc, body, "html > body"));
        assert!(!matches(&doc, body, "div"));
        assert!(!matches(&doc, body, "body["));
    }

    #[test]
    fn test_nano_time_monotonic() {
        let a = nano_time();
        let b = nano_time();
        assert!(b >= a);
    }
}
