//! Leaf assertions
//!
//! Terminal checks with no sub-schemas. Each returns its input unchanged on
//! success and raises a single [`Invalid`] scoped to the current path on
//! failure.

mod formats;

pub use formats::Format;

use crate::error::{Invalid, SchemaError, SchemaResult, ValidationResult};
use crate::path::Path;
use crate::validator::{Validate, Validator};
use crate::value::{short_type_name, Kind, Value};
use regex::Regex;
use std::any::Any;
use std::marker::PhantomData;

struct KindCheck {
    kind: Kind,
}

impl Validate for KindCheck {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        if value.kind() != self.kind {
            return Err(Invalid::new("{data} is not {type}")
                .with_param("data", value.repr())
                .with_param("type", self.kind.name())
                .at(path)
                .into());
        }
        Ok(value.clone())
    }
}

/// Exact runtime-kind equality, no coercion
pub fn kind(kind: Kind) -> Validator {
    Validator::new("type", KindCheck { kind })
}

pub fn boolean() -> Validator {
    kind(Kind::Bool)
}

pub fn integer() -> Validator {
    kind(Kind::Int)
}

pub fn float() -> Validator {
    kind(Kind::Float)
}

pub fn string() -> Validator {
    kind(Kind::Str)
}

struct Literal {
    kind: KindCheck,
    expected: Value,
}

impl Validate for Literal {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        self.kind.validate(value, path)?;
        if *value != self.expected {
            return Err(Invalid::new("{data} is not {literal}")
                .with_param("data", value.repr())
                .with_param("literal", self.expected.repr())
                .at(path)
                .into());
        }
        Ok(value.clone())
    }
}

/// Kind check followed by exact equality
pub fn literal(expected: impl Into<Value>) -> Validator {
    let expected = expected.into();
    Validator::new(
        "literal",
        Literal {
            kind: KindCheck {
                kind: expected.kind(),
            },
            expected,
        },
    )
}

struct Scalar;

impl Validate for Scalar {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        if !value.is_scalar() {
            return Err(Invalid::new("{type} is not scalar")
                .with_param("type", value.kind().name())
                .at(path)
                .into());
        }
        Ok(value.clone())
    }
}

/// Accepts booleans, numbers and strings
pub fn scalar() -> Validator {
    Validator::new("scalar", Scalar)
}

struct InstanceOf<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T: Any> Validate for InstanceOf<T> {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        match value.as_instance() {
            Some(instance) if instance.is::<T>() => Ok(value.clone()),
            found => Err(Invalid::new("Expected {class} (is {data_class})")
                .with_param("class", short_type_name(std::any::type_name::<T>()))
                .with_param(
                    "data_class",
                    found.map_or("not an object", |instance| instance.short_name()),
                )
                .at(path)
                .into()),
        }
    }
}

/// Nominal membership test for host objects of type `T`
pub fn instance<T: Any>() -> Validator {
    Validator::new(
        "instance",
        InstanceOf::<T> {
            marker: PhantomData,
        },
    )
}

struct Length {
    min: Option<usize>,
    max: Option<usize>,
}

impl Validate for Length {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let Some(len) = value.len() else {
            return Err(Invalid::new("{type} has no length")
                .with_param("type", value.kind().name())
                .at(path)
                .into());
        };
        if let Some(min) = self.min {
            if len < min {
                return Err(Invalid::new("Value must be at least {limit}")
                    .with_param("limit", min.to_string())
                    .at(path)
                    .into());
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(Invalid::new("Value must be at most {limit}")
                    .with_param("limit", max.to_string())
                    .at(path)
                    .into());
            }
        }
        Ok(value.clone())
    }
}

/// String length in characters, or collection cardinality, within bounds
pub fn length(min: Option<usize>, max: Option<usize>) -> SchemaResult<Validator> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(SchemaError::InvertedBounds { min, max });
        }
    }
    Ok(Validator::new("length", Length { min, max }))
}

struct Pattern {
    regex: Regex,
}

impl Validate for Pattern {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        let Some(text) = value.as_str() else {
            return Err(Invalid::new("{data} is not {type}")
                .with_param("data", value.repr())
                .with_param("type", Kind::Str.name())
                .at(path)
                .into());
        };
        if !self.regex.is_match(text) {
            return Err(Invalid::new("Value {value} doesn't follow {pattern}")
                .with_param("value", value.repr())
                .with_param("pattern", self.regex.as_str())
                .at(path)
                .into());
        }
        Ok(value.clone())
    }
}

/// String input matching a regular expression
pub fn matches(pattern: &str) -> SchemaResult<Validator> {
    let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Validator::new("match", Pattern { regex }))
}

struct FormatCheck {
    format: Format,
}

impl Validate for FormatCheck {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        if !self.format.check(value) {
            return Err(Invalid::new("Validation {name} for {value} failed")
                .with_param("name", self.format.name())
                .with_param("value", value.repr())
                .at(path)
                .into());
        }
        Ok(value.clone())
    }
}

/// Named format check; names outside the allow-list fail to compile
pub fn validate(name: &str) -> SchemaResult<Validator> {
    Format::from_name(name)
        .map(format)
        .ok_or_else(|| SchemaError::FilterNotAllowed {
            name: name.to_string(),
        })
}

pub fn format(format: Format) -> Validator {
    Validator::new("validate", FormatCheck { format })
}

pub fn url() -> Validator {
    format(Format::Url)
}

pub fn email() -> Validator {
    format(Format::Email)
}

pub fn ip() -> Validator {
    format(Format::Ip)
}

pub fn intval() -> Validator {
    format(Format::Int)
}

pub fn floatval() -> Validator {
    format(Format::Float)
}

pub fn boolval() -> Validator {
    format(Format::Boolean)
}
