use crate::error::{Invalid, MultipleInvalid, SchemaResult, ValidationError, ValidationResult};
use crate::path::Path;
use crate::schema::Schema;
use crate::validator::{Validate, Validator};
use crate::value::{Key, Value};
use indexmap::{IndexMap, IndexSet};

/// Which keys must be present in the input
#[derive(Debug, Clone, Default)]
pub enum Required {
    /// No key is required
    #[default]
    None,
    /// Every key of the structure is required
    All,
    /// Exactly these keys are required, whether or not the structure
    /// declares them
    Keys(Vec<Key>),
}

/// What happens to input keys the structure does not declare
#[derive(Debug, Clone, Default)]
pub enum Extra {
    /// Reject every undeclared key
    #[default]
    Deny,
    /// Pass every undeclared key through verbatim
    Allow,
    /// Pass these undeclared keys through verbatim, reject the others
    Keys(Vec<Key>),
    /// Validate these undeclared keys with their schema, reject the others
    Schemas(IndexMap<Key, Schema>),
}

enum ExtraPolicy {
    Deny,
    Allow,
    Keys(IndexSet<Key>),
    Schemas(IndexMap<Key, Validator>),
}

/// Builder for [`dict`] options
#[derive(Debug, Clone, Default)]
pub struct Dict {
    structure: IndexMap<Key, Schema>,
    required: Required,
    extra: Extra,
}

impl Dict {
    pub fn new<I, K, S>(structure: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<Key>,
        S: Into<Schema>,
    {
        Self {
            structure: structure
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Dictionary without declared keys
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: Required) -> Self {
        self.required = required;
        self
    }

    pub fn extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }

    /// Compile the structure and extra schemas into a validator
    pub fn build(self) -> SchemaResult<Validator> {
        let structure = compile_entries(&self.structure)?;

        let required = match self.required {
            Required::None => Vec::new(),
            Required::All => self.structure.keys().cloned().collect(),
            Required::Keys(keys) => keys,
        };

        let extra = match self.extra {
            Extra::Deny => ExtraPolicy::Deny,
            Extra::Allow => ExtraPolicy::Allow,
            Extra::Keys(keys) => ExtraPolicy::Keys(keys.into_iter().collect()),
            Extra::Schemas(schemas) => ExtraPolicy::Schemas(compile_entries(&schemas)?),
        };

        Ok(Validator::new(
            "dict",
            DictValidator {
                structure,
                required,
                extra,
            },
        ))
    }
}

fn compile_entries(entries: &IndexMap<Key, Schema>) -> SchemaResult<IndexMap<Key, Validator>> {
    entries
        .iter()
        .map(|(key, schema)| schema.compile().map(|validator| (key.clone(), validator)))
        .collect()
}

/// Validate a map key by key, collecting every problem in one pass.
///
/// Errors are keyed by offending key. A single error is raised on its own,
/// several are raised as one [`MultipleInvalid`] located at the map itself.
pub fn dict<I, K, S>(structure: I, required: Required, extra: Extra) -> SchemaResult<Validator>
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<Key>,
    S: Into<Schema>,
{
    Dict::new(structure).required(required).extra(extra).build()
}

struct DictValidator {
    structure: IndexMap<Key, Validator>,
    required: Vec<Key>,
    extra: ExtraPolicy,
}

/// Forward errors already located below `path`, wrap the others
fn scoped(error: ValidationError, path: &Path, wrapper: impl FnOnce() -> Invalid) -> ValidationError {
    if error.depth() > path.len() {
        error
    } else {
        wrapper().at(path).caused_by(error).into()
    }
}

impl Validate for DictValidator {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let Some(entries) = value.entries() else {
            return Err(Invalid::new("{data} is not {type}")
                .with_param("data", value.repr())
                .with_param("type", "map")
                .at(path)
                .into());
        };

        let mut output = IndexMap::new();
        let mut errors: IndexMap<Key, ValidationError> = IndexMap::new();

        for (key, item) in entries {
            let item_path = path.join(key.clone());

            if let Some(validator) = self.structure.get(&key) {
                match validator.validate(item, &item_path) {
                    Ok(transformed) => {
                        output.insert(key, transformed);
                    }
                    Err(error) => {
                        let error = scoped(error, &item_path, || {
                            Invalid::new("Invalid value at key {key} (value is {value})")
                                .with_param("key", key.to_string())
                                .with_param("value", item.repr())
                        });
                        errors.insert(key, error);
                    }
                }
                continue;
            }

            if self.required.contains(&key) {
                output.insert(key, item.clone());
                continue;
            }

            match &self.extra {
                ExtraPolicy::Allow => {
                    output.insert(key, item.clone());
                }
                ExtraPolicy::Keys(allowed) if allowed.contains(&key) => {
                    output.insert(key, item.clone());
                }
                ExtraPolicy::Schemas(schemas) if schemas.contains_key(&key) => {
                    match schemas[&key].validate(item, &item_path) {
                        Ok(transformed) => {
                            output.insert(key, transformed);
                        }
                        Err(error) => {
                            let error = scoped(error, &item_path, || {
                                Invalid::new("Extra key {key} is not valid")
                                    .with_param("key", key.to_string())
                            });
                            errors.insert(key, error);
                        }
                    }
                }
                _ => {
                    let error = Invalid::new("Extra key {key} not allowed")
                        .with_param("key", key.to_string())
                        .at(&item_path);
                    errors.insert(key, error.into());
                }
            }
        }

        for key in &self.required {
            if output.contains_key(key) || errors.contains_key(key) {
                continue;
            }
            let error = Invalid::new("Required key {key} not provided")
                .with_param("key", key.to_string())
                .at(&path.join(key.clone()));
            errors.insert(key.clone(), error.into());
        }

        if errors.len() > 1 {
            return Err(MultipleInvalid::keyed(errors).at(path).into());
        }
        match errors.pop() {
            Some((_, error)) => Err(error),
            None => Ok(Value::Map(output)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{integer, string};
    use crate::combinator::seq;
    use serde_json::json;

    #[test]
    fn test_known_keys_are_validated_and_kept_in_input_order() {
        let validator = dict(
            [("a", Schema::from(integer())), ("b", Schema::from(string()))],
            Required::None,
            Extra::Deny,
        )
        .unwrap();
        let input = Value::map([("b", Value::from("x")), ("a", Value::Int(1))]);
        let output = validator.call(&input).unwrap();
        let keys: Vec<String> = output.as_map().unwrap().keys().map(Key::to_string).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_optional_keys_are_fine() {
        let validator = dict([("a", integer())], Required::None, Extra::Deny).unwrap();
        assert_eq!(
            validator.call(&Value::map(Vec::<(Key, Value)>::new())).unwrap(),
            Value::Map(IndexMap::new())
        );
    }

    #[test]
    fn test_required_key_missing() {
        let validator = Dict::empty()
            .required(Required::Keys(vec![Key::from("k")]))
            .build()
            .unwrap();
        let err = validator.call(&Value::Map(IndexMap::new())).unwrap_err();
        assert_eq!(err.message(), "Required key k not provided");
        assert_eq!(err.path().to_string(), "$.k");
    }

    #[test]
    fn test_required_undeclared_key_passes_through() {
        let validator = Dict::empty()
            .required(Required::Keys(vec![Key::from("k")]))
            .build()
            .unwrap();
        let input = Value::map([("k", Value::list([1]))]);
        assert_eq!(validator.call(&input).unwrap(), input);
    }

    #[test]
    fn test_extra_key_denied_even_when_known_keys_fail() {
        let validator = dict([("k", integer())], Required::None, Extra::Deny).unwrap();
        let input = Value::map([("k", Value::from("v")), ("extra", Value::from("w"))]);
        let err = validator.call(&input).unwrap_err();
        let ValidationError::Multiple(aggregate) = err else {
            panic!("expected an aggregate");
        };
        assert_eq!(aggregate.len(), 2);
        assert_eq!(
            aggregate.errors()[&Key::from("extra")].message(),
            "Extra key extra not allowed"
        );
    }

    #[test]
    fn test_extra_allow_and_keys() {
        let allow_all = dict([("a", integer())], Required::None, Extra::Allow).unwrap();
        let input = Value::map([("a", Value::Int(1)), ("z", Value::Null)]);
        assert_eq!(allow_all.call(&input).unwrap(), input);

        let allow_some = dict(
            [("a", integer())],
            Required::None,
            Extra::Keys(vec![Key::from("z")]),
        )
        .unwrap();
        assert!(allow_some.call(&input).is_ok());
        let err = allow_some
            .call(&Value::map([("y", Value::Null)]))
            .unwrap_err();
        assert_eq!(err.message(), "Extra key y not allowed");
    }

    #[test]
    fn test_extra_schemas_validate_named_keys() {
        let mut extra = IndexMap::new();
        extra.insert(Key::from("z"), Schema::from(integer()));
        let validator = dict([("a", integer())], Required::None, Extra::Schemas(extra)).unwrap();

        assert!(validator.call(&Value::map([("z", 3)])).is_ok());
        let err = validator.call(&Value::map([("z", "3")])).unwrap_err();
        assert_eq!(
            err.message(),
            "Extra key z is not valid: \"3\" is not integer"
        );
        let err = validator.call(&Value::map([("y", 3)])).unwrap_err();
        assert_eq!(err.message(), "Extra key y not allowed");
    }

    #[test]
    fn test_shallow_error_is_wrapped_with_key() {
        let validator = dict([("age", integer())], Required::None, Extra::Deny).unwrap();
        let err = validator.call(&Value::map([("age", "old")])).unwrap_err();
        assert_eq!(
            err.message(),
            "Invalid value at key age (value is \"old\"): \"old\" is not integer"
        );
        assert_eq!(err.path().to_string(), "$.age");
    }

    #[test]
    fn test_deeper_error_is_forwarded() {
        let inner = seq(["bar", "baz"]).unwrap();
        let validator = dict([("foo", inner)], Required::None, Extra::Deny).unwrap();
        let err = validator
            .call(&Value::from(json!({"foo": ["x"]})))
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$.foo[0]");
        assert_eq!(err.message(), "Invalid value at index 0 (value is \"x\")");
    }

    #[test]
    fn test_list_input_is_keyed_by_index() {
        let validator = dict([(0usize, integer())], Required::None, Extra::Deny).unwrap();
        let output = validator.call(&Value::list([5])).unwrap();
        assert_eq!(output, Value::map([(Key::Index(0), Value::Int(5))]));
    }

    #[test]
    fn test_rejects_scalars() {
        let validator = Dict::empty().build().unwrap();
        let err = validator.call(&Value::Int(1)).unwrap_err();
        assert_eq!(err.message(), "1 is not map");
    }
}
