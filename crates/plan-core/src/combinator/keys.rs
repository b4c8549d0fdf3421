use crate::error::{Invalid, SchemaResult, ValidationResult};
use crate::path::Path;
use crate::schema::Schema;
use crate::validator::{Validate, Validator};
use crate::value::{Key, Value};
use indexmap::IndexMap;

struct DictKeys {
    keys: Validator,
}

impl Validate for DictKeys {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let Some(entries) = value.entries() else {
            return Err(Invalid::new("{data} is not {type}")
                .with_param("data", value.repr())
                .with_param("type", "map")
                .at(path)
                .into());
        };
        let source: IndexMap<Key, &Value> = entries.collect();
        let keys = Value::List(source.keys().map(Key::to_value).collect());

        let returned = self.keys.validate(&keys, path)?;
        let Some(returned_keys) = returned.entries() else {
            return Err(Invalid::new("{data} is not {type}")
                .with_param("data", returned.repr())
                .with_param("type", "list")
                .at(path)
                .into());
        };

        let mut output = IndexMap::new();
        for (_, key_value) in returned_keys {
            let found = Key::from_value(key_value)
                .and_then(|key| source.get(&key).map(|item| (key, *item)));
            match found {
                Some((key, item)) => {
                    output.insert(key, item.clone());
                }
                None => {
                    return Err(Invalid::new("Value for key {key} not found in {data}")
                        .with_param("key", key_value.repr())
                        .with_param("data", value.repr())
                        .at(path)
                        .into())
                }
            }
        }
        Ok(Value::Map(output))
    }
}

/// Validate the list of a map's keys, then rebuild the map from the keys
/// the validator returned.
pub fn dictkeys(schema: impl Into<Schema>) -> SchemaResult<Validator> {
    Ok(Validator::new(
        "dictkeys",
        DictKeys {
            keys: schema.into().compile()?,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::string;
    use crate::combinator::seq;

    #[test]
    fn test_keys_are_validated() {
        let validator = dictkeys(seq([string()]).unwrap()).unwrap();
        let input = Value::map([("a", 1), ("b", 2)]);
        assert_eq!(validator.call(&input).unwrap(), input);

        let err = validator.call(&Value::list([1])).unwrap_err();
        assert_eq!(err.path().to_string(), "$[0]");
    }

    #[test]
    fn test_map_is_rebuilt_from_returned_keys() {
        let keep_first = Validator::from_fn(|value: &Value, _: &Path| match value {
            Value::List(keys) => Ok(Value::List(keys.iter().take(1).cloned().collect())),
            other => Ok(other.clone()),
        });
        let validator = dictkeys(keep_first).unwrap();
        let output = validator.call(&Value::map([("a", 1), ("b", 2)])).unwrap();
        assert_eq!(output, Value::map([("a", 1)]));
    }

    #[test]
    fn test_unknown_returned_key() {
        let rename = Validator::from_fn(|_: &Value, _: &Path| Ok(Value::list(["z"])));
        let validator = dictkeys(rename).unwrap();
        let err = validator.call(&Value::map([("a", 1)])).unwrap_err();
        assert_eq!(err.message(), "Value for key \"z\" not found in {\"a\": 1}");
    }
}
