//! Schema descriptions and input values from JSON or YAML text
//!
//! Only in-memory text is accepted; reading files is left to the caller.
//!
//! Both formats read map keys the same way: integers and canonical decimal
//! strings (`"0"`, `"17"`, not `"007"`) become [`Key::Index`], anything else
//! becomes [`Key::Name`]. A mapping keyed `0..n-1` therefore describes a
//! sequence whichever format it comes from.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::Schema;
use crate::value::{Key, Value};
use indexmap::IndexMap;

/// Parse a schema description from JSON text
pub fn from_json_str(text: &str) -> SchemaResult<Schema> {
    value_from_json_str(text).map(Schema::from)
}

/// Parse a schema description from YAML text
pub fn from_yaml_str(text: &str) -> SchemaResult<Schema> {
    value_from_yaml_str(text).map(Schema::from)
}

/// Parse an input value from JSON text, preserving key order
pub fn value_from_json_str(text: &str) -> SchemaResult<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(json_to_value(json))
}

/// Parse an input value from YAML text, preserving key order
pub fn value_from_yaml_str(text: &str) -> SchemaResult<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    yaml_to_value(&yaml)
}

fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (object_key(k), json_to_value(v)))
                .collect(),
        ),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(json_to_value).collect())
        }
        scalar => Value::from(scalar),
    }
}

fn yaml_to_value(yaml: &serde_yaml::Value) -> SchemaResult<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(SchemaError::malformed(format!("unsupported YAML number: {n:?}")))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::Str(s.clone())),
        serde_yaml::Value::Sequence(items) => Ok(Value::List(
            items.iter().map(yaml_to_value).collect::<SchemaResult<_>>()?,
        )),
        serde_yaml::Value::Mapping(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (k, v) in map {
                out.insert(yaml_key(k)?, yaml_to_value(v)?);
            }
            Ok(Value::Map(out))
        }
        // Tags carry no meaning for schemas
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}

fn yaml_key(yaml: &serde_yaml::Value) -> SchemaResult<Key> {
    match yaml {
        serde_yaml::Value::String(s) => Ok(object_key(s.clone())),
        serde_yaml::Value::Number(n) => match n.as_u64() {
            Some(index) => Ok(Key::Index(index as usize)),
            None => Ok(Key::Name(n.to_string())),
        },
        serde_yaml::Value::Bool(b) => Ok(Key::Name(b.to_string())),
        other => Err(SchemaError::malformed(format!(
            "unsupported YAML map key type: {other:?}"
        ))),
    }
}

/// Read a textual map key, turning canonical decimal indices into [`Key::Index`]
fn object_key(name: String) -> Key {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    match name.parse::<usize>() {
        Ok(index) if canonical => Key::Index(index),
        _ => Key::Name(name),
    }
}
