//! Dynamically-shaped values accepted and produced by validators
//!
//! Input handed to a compiled schema is untrusted and may take any shape:
//! scalars, ordered lists, insertion-ordered maps, or opaque host objects.
//! [`Value`] models all of them as one closed enum so that every validator
//! speaks the same `(value, path) -> value` contract.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Maximum number of characters shown for a string by [`Value::repr`]
const REPR_MAX_CHARS: usize = 47;

/// Maximum number of entries shown for a collection by [`Value::repr`]
const REPR_MAX_ENTRIES: usize = 3;

/// A map key or a path segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Position inside a list, or an integer map key
    Index(usize),
    /// Named map key
    Name(String),
}

impl Key {
    /// Representation used inside messages (names quoted, indexes bare)
    pub fn repr(&self) -> String {
        match self {
            Key::Index(index) => index.to_string(),
            Key::Name(name) => quote(name),
        }
    }

    /// Convert the key into the value the key list of a map exposes
    pub fn to_value(&self) -> Value {
        match self {
            Key::Index(index) => Value::Int(*index as i64),
            Key::Name(name) => Value::Str(name.clone()),
        }
    }

    /// Convert a value back into a key, when it has a key shape
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Int(i) if *i >= 0 => Some(Key::Index(*i as usize)),
            Value::Str(s) => Some(Key::Name(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Returns true when `keys` are exactly the indexes `0..n-1`, in any order.
///
/// An empty key set counts as a sequence.
pub fn is_dense_index<'a, I>(keys: I) -> bool
where
    I: IntoIterator<Item = &'a Key>,
    I::IntoIter: ExactSizeIterator,
{
    let keys = keys.into_iter();
    let len = keys.len();
    let mut seen = vec![false; len];
    for key in keys {
        match key {
            Key::Index(i) if *i < len && !seen[*i] => seen[*i] = true,
            _ => return false,
        }
    }
    true
}

/// Runtime kind of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Object,
}

impl Kind {
    /// Name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Object => "object",
        }
    }

    /// Whether values of this kind are scalars (boolean, number or string)
    pub fn is_scalar(&self) -> bool {
        matches!(self, Kind::Bool | Kind::Int | Kind::Float | Kind::Str)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque host object carried through validation untouched.
///
/// Instances compare by identity: two clones of the same instance are
/// equal, two separately constructed instances never are.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wrap a host value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Fully qualified Rust type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// Nominal membership test
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.inner) as *const () == Arc::as_ptr(&other.inner) as *const ()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance(<{}>)", self.short_name())
    }
}

/// Strip the module path from a type name produced by `std::any::type_name`
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A dynamically-shaped value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<Key, Value>),
    Object(Instance),
}

impl Value {
    /// Build a map value from key/value pairs, preserving their order
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list value
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Wrap a host object
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Instance::new(value))
    }

    /// Runtime kind of this value
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.kind().is_scalar()
    }

    /// True for lists and maps
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Look up a map entry or list element
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match (self, key) {
            (Value::Map(map), key) => map.get(key),
            (Value::List(items), Key::Index(i)) => items.get(*i),
            _ => None,
        }
    }

    /// String length in characters, or collection cardinality
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Iterate a list or map as `(key, value)` entries, in natural order
    pub fn entries(&self) -> Option<Box<dyn Iterator<Item = (Key, &Value)> + '_>> {
        match self {
            Value::List(items) => Some(Box::new(
                items.iter().enumerate().map(|(i, v)| (Key::Index(i), v)),
            )),
            Value::Map(map) => Some(Box::new(map.iter().map(|(k, v)| (k.clone(), v)))),
            _ => None,
        }
    }

    /// Short human representation used in error messages
    pub fn repr(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{:?}", f),
            Value::Str(s) => {
                if s.chars().count() > REPR_MAX_CHARS {
                    let head: String = s.chars().take(REPR_MAX_CHARS).collect();
                    format!("\"{}...", head)
                } else {
                    quote(s)
                }
            }
            Value::List(items) => {
                let mut parts: Vec<String> =
                    items.iter().take(REPR_MAX_ENTRIES).map(Value::repr).collect();
                if items.len() > REPR_MAX_ENTRIES {
                    parts.push("...".to_string());
                }
                format!("[{}]", parts.join(", "))
            }
            Value::Map(map) => {
                let mut parts: Vec<String> = map
                    .iter()
                    .take(REPR_MAX_ENTRIES)
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect();
                if map.len() > REPR_MAX_ENTRIES {
                    parts.push("...".to_string());
                }
                format!("{{{}}}", parts.join(", "))
            }
            Value::Object(instance) => format!("<{}>", instance.short_name()),
        }
    }
}

/// JSON-style quoting for strings
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(&k.to_string(), v)?;
                }
                out.end()
            }
            Value::Object(instance) => {
                serializer.serialize_str(&format!("<{}>", instance.short_name()))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(map: IndexMap<Key, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
