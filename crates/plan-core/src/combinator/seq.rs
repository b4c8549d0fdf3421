use crate::error::{Invalid, SchemaResult, ValidationResult};
use crate::path::Path;
use crate::schema::Schema;
use crate::validator::{Validate, Validator};
use crate::value::{Key, Value};
use tracing::trace;

use super::compile_all;

/// Ordered alternation over the elements of a container
struct Seq {
    candidates: Vec<Validator>,
}

impl Seq {
    fn validate_element(&self, key: &Key, element: &Value, path: &Path) -> ValidationResult {
        for candidate in &self.candidates {
            match candidate.validate(element, path) {
                Ok(output) => return Ok(output),
                Err(error) if error.depth() > path.len() => {
                    trace!(path = %path, depth = error.depth(), "nested mismatch ends alternation");
                    return Err(error);
                }
                Err(_) => {}
            }
        }

        Err(Invalid::new("Invalid value at index {index} (value is {value})")
            .with_param("index", key.to_string())
            .with_param("value", element.repr())
            .at(path)
            .into())
    }
}

impl Validate for Seq {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let Some(entries) = value.entries() else {
            return Err(Invalid::new("{data} is not iterable")
                .with_param("data", value.repr())
                .at(path)
                .into());
        };

        if self.candidates.is_empty() {
            return Ok(value.clone());
        }

        let mut output = Vec::with_capacity(value.len().unwrap_or(0));
        for (key, element) in entries {
            let element_path = path.join(key.clone());
            output.push(self.validate_element(&key, element, &element_path)?);
        }
        Ok(Value::List(output))
    }
}

/// Validate every element of a list (or the values of a map) against the
/// first matching candidate.
///
/// An empty candidate list accepts any container unchanged. A candidate
/// failure located deeper than the element itself stops the search for that
/// element and is raised as-is; remaining candidates are not tried.
pub fn seq<I, S>(candidates: I) -> SchemaResult<Validator>
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Ok(Validator::new(
        "seq",
        Seq {
            candidates: compile_all(candidates)?,
        },
    ))
}
