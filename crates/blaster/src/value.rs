//! Extension call arguments and results

use std::fmt;
use std::rc::Rc;

use blaster_dom::{Event, EventHandler, ListenerOptions, NodeId};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::{Dom, Group};

/// Result of an extension call
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Group(Group),
    Node(NodeId),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Value::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(node) => Some(*node),
            _ => None,
        }
    }

    /// Map entry lookup (`None` for non-maps and missing keys)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
            // Node ids serialize as arena indices
            Value::Group(group) => serializer.collect_seq(group.iter().map(NodeId::index)),
            Value::Node(node) => serializer.serialize_u64(node.index() as u64),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Group> for Value {
    fn from(group: Group) -> Self {
        Value::Group(group)
    }
}

impl From<NodeId> for Value {
    fn from(node: NodeId) -> Self {
        Value::Node(node)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

type CallbackFn = dyn Fn(&mut Dom<'_>, Value) -> Value;

/// User function handed to `each`, `gather`, `formData` and friends.
///
/// Element iterators pass `Value::Node`, form scrapers pass the form's
/// `Value::Map`.
#[derive(Clone)]
pub struct Callback(Rc<CallbackFn>);

impl Callback {
    pub fn new(f: impl Fn(&mut Dom<'_>, Value) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, dom: &mut Dom<'_>, value: Value) -> Value {
        (self.0)(dom, value)
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Argument to an extension call
#[derive(Debug, Clone)]
pub enum Arg {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Ordered keys
    List(Vec<String>),
    /// Ordered key/value pairs; `None` removes the key
    Map(Vec<(String, Option<String>)>),
    Node(NodeId),
    Nodes(Vec<NodeId>),
    Callback(Callback),
    Handler(EventHandler),
    Options(ListenerOptions),
    Event(Event),
}

impl Arg {
    pub fn list<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arg::List(keys.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        Arg::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        )
    }

    pub fn callback(f: impl Fn(&mut Dom<'_>, Value) -> Value + 'static) -> Self {
        Arg::Callback(Callback::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Null)
    }

    /// Scalar coerced to text (numbers and booleans are stringified)
    pub fn to_text(&self) -> Option<String> {
        match self {
            Arg::Text(s) => Some(s.clone()),
            Arg::Number(n) => Some(n.to_string()),
            Arg::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Non-negative integral number as an index
    pub fn to_index(&self) -> Option<usize> {
        match self {
            Arg::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
            Arg::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Null => "null",
            Arg::Bool(_) => "bool",
            Arg::Number(_) => "number",
            Arg::Text(_) => "text",
            Arg::List(_) => "list",
            Arg::Map(_) => "map",
            Arg::Node(_) => "node",
            Arg::Nodes(_) => "nodes",
            Arg::Callback(_) => "callback",
            Arg::Handler(_) => "handler",
            Arg::Options(_) => "options",
            Arg::Event(_) => "event",
        }
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Number(n)
    }
}

impl From<usize> for Arg {
    fn from(n: usize) -> Self {
        Arg::Number(n as f64)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<NodeId> for Arg {
    fn from(node: NodeId) -> Self {
        Arg::Node(node)
    }
}

impl From<Vec<NodeId>> for Arg {
    fn from(nodes: Vec<NodeId>) -> Self {
        Arg::Nodes(nodes)
    }
}

impl From<&Group> for Arg {
    fn from(group: &Group) -> Self {
        Arg::Nodes(group.as_slice().to_vec())
    }
}

impl From<Callback> for Arg {
    fn from(callback: Callback) -> Self {
        Arg::Callback(callback)
    }
}

impl From<EventHandler> for Arg {
    fn from(handler: EventHandler) -> Self {
        Arg::Handler(handler)
    }
}

impl From<ListenerOptions> for Arg {
    fn from(options: ListenerOptions) -> Self {
        Arg::Options(options)
    }
}

impl From<Event> for Arg {
    fn from(event: Event) -> Self {
        Arg::Event(event)
    }
}
