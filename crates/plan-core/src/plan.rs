//! Root wrapper: the public entry point over a compiled schema

use crate::error::{Invalid, MultipleInvalid, SchemaResult};
use crate::path::Path;
use crate::schema::Schema;
use crate::validator::{Validate, Validator};
use crate::value::Value;
use std::fmt;
use tracing::debug;

/// A schema compiled once and reused for any number of calls.
///
/// Errors escaping the root are always reported as a [`MultipleInvalid`];
/// a lone [`Invalid`] is wrapped into a one-element aggregate.
#[derive(Debug, Clone)]
pub struct Plan {
    schema: Schema,
    validator: Validator,
}

impl Plan {
    /// Compile `schema`; configuration mistakes are reported here
    pub fn new(schema: impl Into<Schema>) -> SchemaResult<Self> {
        let schema = schema.into();
        let validator = schema.compile()?;
        debug!(schema = %schema.repr(), root = validator.name(), "schema compiled");
        Ok(Self { schema, validator })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Raw convention: the transformed value, or every error found
    pub fn validate(&self, value: &Value) -> Result<Value, MultipleInvalid> {
        self.validator
            .validate(value, &Path::root())
            .map_err(|error| {
                let aggregate = error.into_multiple();
                debug!(errors = aggregate.len(), "input rejected");
                aggregate
            })
    }

    /// Boolean convention: errors are swallowed
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Checked convention: never fails, returns a result record
    pub fn check(&self, value: &Value) -> Check {
        match self.validate(value) {
            Ok(output) => Check {
                output: Some(output),
                errors: Vec::new(),
            },
            Err(aggregate) => Check {
                output: None,
                errors: aggregate.flatten().into_iter().cloned().collect(),
            },
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Schema:{}>", self.schema.repr())
    }
}

/// Outcome of [`Plan::check`]
#[derive(Debug, Clone)]
pub struct Check {
    output: Option<Value>,
    errors: Vec<Invalid>,
}

impl Check {
    pub fn is_valid(&self) -> bool {
        self.output.is_some()
    }

    /// Transformed value, or `default` when validation failed
    pub fn result(&self, default: Value) -> Value {
        self.output.clone().unwrap_or(default)
    }

    pub fn output(&self) -> Option<&Value> {
        self.output.as_ref()
    }

    /// Every leaf error, flattened; empty when valid
    pub fn errors(&self) -> &[Invalid] {
        &self.errors
    }

    pub fn into_result(self) -> Result<Value, Vec<Invalid>> {
        self.output.ok_or(self.errors)
    }
}

/// Compile `schema` into a boolean predicate
pub fn validate(schema: impl Into<Schema>) -> SchemaResult<impl Fn(&Value) -> bool + Send + Sync> {
    let plan = Plan::new(schema)?;
    Ok(move |value: &Value| plan.is_valid(value))
}

/// Compile `schema` into a function producing [`Check`] records
pub fn check(schema: impl Into<Schema>) -> SchemaResult<impl Fn(&Value) -> Check + Send + Sync> {
    let plan = Plan::new(schema)?;
    Ok(move |value: &Value| plan.check(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::integer;
    use serde_json::json;

    #[test]
    fn test_single_error_is_wrapped() {
        let plan = Plan::new(integer()).unwrap();
        let err = plan.validate(&Value::from("x")).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.message(), "[ \"x\" is not integer ]");
    }

    #[test]
    fn test_aggregate_is_kept() {
        let plan = Plan::new(json!({"a": 1, "b": 2})).unwrap();
        let err = plan.validate(&Value::from(json!({"a": 0, "b": 0}))).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(err.message().starts_with("{ "));
    }

    #[test]
    fn test_check_record() {
        let plan = Plan::new(integer()).unwrap();

        let ok = plan.check(&Value::Int(1));
        assert!(ok.is_valid());
        assert_eq!(ok.result(Value::Null), Value::Int(1));
        assert!(ok.errors().is_empty());

        let bad = plan.check(&Value::from("1"));
        assert!(!bad.is_valid());
        assert_eq!(bad.result(Value::Int(0)), Value::Int(0));
        assert_eq!(bad.errors().len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Plan::new(42).unwrap().to_string(), "<Schema:42>");
        assert_eq!(Plan::new("foobar").unwrap().to_string(), "<Schema:\"foobar\">");
        assert_eq!(Plan::new(integer()).unwrap().to_string(), "<Schema:compiled>");
    }

    #[test]
    fn test_free_functions() {
        let is_int = validate(integer()).unwrap();
        assert!(is_int(&Value::Int(1)));
        assert!(!is_int(&Value::Null));

        let checker = check(integer()).unwrap();
        assert!(checker(&Value::Int(1)).is_valid());
    }

    #[test]
    fn test_compile_errors_are_not_deferred() {
        assert!(Plan::new(Value::Null).is_err());
    }
}
