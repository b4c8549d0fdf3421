use crate::error::{Invalid, SchemaResult, ValidationError, ValidationResult};
use crate::path::Path;
use crate::schema::Schema;
use crate::validator::{Validate, Validator};
use crate::value::Value;
use tracing::trace;

use super::compile_all;

struct Any {
    alternatives: Vec<Validator>,
}

impl Validate for Any {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let mut cause: Option<ValidationError> = None;
        for alternative in &self.alternatives {
            match alternative.validate(value, path) {
                Ok(output) => return Ok(output),
                Err(error) => {
                    if cause.is_none() && error.depth() > path.len() {
                        trace!(path = %error.path(), "keeping first nested failure as cause");
                        cause = Some(error);
                    }
                }
            }
        }

        let error = Invalid::new("No valid value found").at(path);
        Err(match cause {
            Some(cause) => error.caused_by(cause),
            None => error,
        }
        .into())
    }
}

/// First alternative that accepts the whole value.
///
/// When all fail, the cause of the raised error is the first failure that
/// was located deeper than the value itself, if any.
pub fn any<I, S>(alternatives: I) -> SchemaResult<Validator>
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Ok(Validator::new(
        "any",
        Any {
            alternatives: compile_all(alternatives)?,
        },
    ))
}

struct All {
    chain: Vec<Validator>,
}

impl Validate for All {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let mut current = value.clone();
        for stage in &self.chain {
            current = stage.validate(&current, path)?;
        }
        Ok(current)
    }
}

/// Thread the value through every stage; the first failure propagates
pub fn all<I, S>(chain: I) -> SchemaResult<Validator>
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    Ok(Validator::new(
        "all",
        All {
            chain: compile_all(chain)?,
        },
    ))
}

struct Not {
    inner: Validator,
}

impl Validate for Not {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        match self.inner.validate(value, path) {
            Ok(_) => Err(Invalid::new("Validator passed").at(path).into()),
            Err(_) => Ok(value.clone()),
        }
    }
}

/// Succeeds with the untouched input exactly when `schema` rejects it
pub fn not(schema: impl Into<Schema>) -> SchemaResult<Validator> {
    Ok(Validator::new(
        "not",
        Not {
            inner: schema.into().compile()?,
        },
    ))
}

/// Branch chosen once, at construction time.
///
/// Only the selected branch is compiled; an omitted branch is the identity.
pub fn iif(
    condition: bool,
    if_true: Option<Schema>,
    if_false: Option<Schema>,
) -> SchemaResult<Validator> {
    let selected = if condition { if_true } else { if_false };
    match selected {
        Some(schema) => schema.compile(),
        None => Ok(Validator::identity()),
    }
}
