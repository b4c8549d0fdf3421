//! Schema descriptions and their compilation into validator trees

use crate::assert;
use crate::combinator::{dict, seq, Extra, Required};
use crate::error::{SchemaError, SchemaResult};
use crate::validator::Validator;
use crate::value::{is_dense_index, Key, Value};
use indexmap::IndexMap;
use tracing::trace;

/// Declarative description of an acceptable input shape.
///
/// - scalars match exactly (see [`assert::literal`])
/// - [`Schema::Seq`] describes a list whose elements match one of the
///   entries
/// - [`Schema::Map`] describes a map with a validator per key; a map keyed
///   by `0..n-1` is treated as a sequence
/// - [`Schema::Validator`] is an already compiled node used as-is
#[derive(Debug, Clone)]
pub enum Schema {
    Literal(Value),
    Seq(Vec<Schema>),
    Map(IndexMap<Key, Schema>),
    Validator(Validator),
}

impl Schema {
    /// Build a map description, preserving key order
    pub fn map<I, K, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<Key>,
        S: Into<Schema>,
    {
        Schema::Map(
            entries
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        )
    }

    /// Build a sequence description
    pub fn seq<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Schema::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Compile into a validator
    pub fn compile(&self) -> SchemaResult<Validator> {
        match self {
            Schema::Validator(validator) => Ok(validator.clone()),
            Schema::Literal(value) if value.is_scalar() => {
                trace!(literal = %value.repr(), "compiling literal");
                Ok(assert::literal(value.clone()))
            }
            Schema::Literal(value) => Err(SchemaError::unsupported(value.kind().name())),
            Schema::Seq(items) => {
                trace!(entries = items.len(), "compiling sequence");
                seq(items.iter().cloned())
            }
            Schema::Map(entries) if is_dense_index(entries.keys()) => {
                trace!(entries = entries.len(), "compiling indexed map as sequence");
                let mut ordered: Vec<(&Key, &Schema)> = entries.iter().collect();
                ordered.sort_by(|a, b| a.0.cmp(b.0));
                seq(ordered.into_iter().map(|(_, s)| s.clone()))
            }
            Schema::Map(entries) => {
                trace!(entries = entries.len(), "compiling dictionary");
                dict(entries.clone(), Required::None, Extra::Deny)
            }
        }
    }

    /// Short description used by `Display` of compiled plans
    pub fn repr(&self) -> String {
        match self {
            Schema::Literal(value) => value.repr(),
            Schema::Seq(items) => {
                let parts: Vec<String> = items.iter().map(Schema::repr).collect();
                format!("[{}]", parts.join(", "))
            }
            Schema::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, s)| format!("{}: {}", k.repr(), s.repr()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Schema::Validator(_) => "compiled".to_string(),
        }
    }
}

/// Compile a schema description into a validator
pub fn compile(schema: impl Into<Schema>) -> SchemaResult<Validator> {
    schema.into().compile()
}

impl From<Validator> for Schema {
    fn from(validator: Validator) -> Self {
        Schema::Validator(validator)
    }
}

impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        match value {
            Value::List(items) => Schema::Seq(items.into_iter().map(Schema::from).collect()),
            Value::Map(entries) => Schema::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Schema::from(v)))
                    .collect(),
            ),
            other => Schema::Literal(other),
        }
    }
}

impl From<serde_json::Value> for Schema {
    fn from(json: serde_json::Value) -> Self {
        Schema::from(Value::from(json))
    }
}

impl From<Vec<Schema>> for Schema {
    fn from(items: Vec<Schema>) -> Self {
        Schema::Seq(items)
    }
}

impl From<IndexMap<Key, Schema>> for Schema {
    fn from(entries: IndexMap<Key, Schema>) -> Self {
        Schema::Map(entries)
    }
}

impl From<bool> for Schema {
    fn from(b: bool) -> Self {
        Schema::Literal(Value::Bool(b))
    }
}

impl From<i64> for Schema {
    fn from(i: i64) -> Self {
        Schema::Literal(Value::Int(i))
    }
}

impl From<i32> for Schema {
    fn from(i: i32) -> Self {
        Schema::Literal(Value::from(i))
    }
}

impl From<f64> for Schema {
    fn from(f: f64) -> Self {
        Schema::Literal(Value::Float(f))
    }
}

impl From<&str> for Schema {
    fn from(s: &str) -> Self {
        Schema::Literal(Value::from(s))
    }
}

impl From<String> for Schema {
    fn from(s: String) -> Self {
        Schema::Literal(Value::Str(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::integer;
    use serde_json::json;

    #[test]
    fn test_literal_compiles_to_exact_match() {
        let validator = compile("hello").unwrap();
        assert_eq!(validator.call(&Value::from("hello")).unwrap(), Value::from("hello"));
        assert!(validator.call(&Value::from("world")).is_err());
    }

    #[test]
    fn test_compiled_validator_is_used_as_is() {
        let validator = compile(integer()).unwrap();
        assert_eq!(validator.name(), "type");
    }

    #[test]
    fn test_null_is_rejected() {
        let err = compile(Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported type null");
    }

    #[test]
    fn test_object_is_rejected() {
        struct Thing;
        let err = compile(Value::object(Thing)).unwrap_err();
        assert_eq!(err, SchemaError::unsupported("object"));
    }

    #[test]
    fn test_list_compiles_to_sequence() {
        let validator = compile(json!(["a", "b"])).unwrap();
        assert_eq!(validator.name(), "seq");
        assert!(validator.call(&Value::list(["a", "b", "a"])).is_ok());
    }

    #[test]
    fn test_map_compiles_to_dictionary() {
        let validator = compile(json!({"a": 1})).unwrap();
        assert_eq!(validator.name(), "dict");
    }

    #[test]
    fn test_indexed_map_compiles_to_sequence() {
        let schema = Schema::map([(1usize, Schema::from("b")), (0usize, Schema::from("a"))]);
        let validator = schema.compile().unwrap();
        assert_eq!(validator.name(), "seq");
    }

    #[test]
    fn test_nested_errors_surface_at_compile_time() {
        let err = compile(json!({"a": [null]})).unwrap_err();
        assert_eq!(err, SchemaError::unsupported("null"));
    }

    #[test]
    fn test_repr() {
        assert_eq!(Schema::from(42).repr(), "42");
        assert_eq!(Schema::from("foobar").repr(), "\"foobar\"");
        assert_eq!(Schema::from(integer()).repr(), "compiled");
    }
}
