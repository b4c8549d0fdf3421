//! Error types for schema compilation and validation
//!
//! Two families are kept strictly apart:
//! - [`SchemaError`] is raised while a schema is compiled and signals a
//!   programming mistake in the schema itself.
//! - [`ValidationError`] is raised while input is validated. It is either a
//!   single [`Invalid`] or a [`MultipleInvalid`] aggregate.

use crate::path::Path;
use crate::value::{is_dense_index, Key};
use indexmap::IndexMap;
use thiserror::Error;

/// Result type for validation calls
pub type ValidationResult<T = crate::value::Value> = std::result::Result<T, ValidationError>;

/// Result type for schema compilation
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Configuration mistakes detected while compiling a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema description has a shape that cannot be compiled
    #[error("Unsupported type {kind}")]
    UnsupportedType { kind: String },

    /// A named check outside the allowed set
    #[error("Filter \"{name}\" not allowed")]
    FilterNotAllowed { name: String },

    /// A regular expression that does not compile
    #[error("Invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Length bounds with `min > max`
    #[error("Invalid length bounds: min {min} is greater than max {max}")]
    InvertedBounds { min: usize, max: usize },

    /// A date or time format that does not parse
    #[error("Invalid datetime format {format}")]
    InvalidFormat { format: String },

    /// An argument outside its accepted range
    #[error("Invalid argument {argument}: {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// A schema document that could not be read
    #[error("Malformed schema document: {0}")]
    Malformed(String),
}

impl SchemaError {
    pub fn unsupported(kind: impl Into<String>) -> Self {
        SchemaError::UnsupportedType { kind: kind.into() }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        SchemaError::Malformed(msg.into())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Malformed(err.to_string())
    }
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(err: serde_yaml::Error) -> Self {
        SchemaError::Malformed(err.to_string())
    }
}

/// A single validation failure.
///
/// The message is the template with `{name}` placeholders filled from the
/// context, followed by `": "` and the cause's message when a cause exists.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct Invalid {
    template: String,
    context: IndexMap<String, String>,
    path: Path,
    code: u32,
    #[source]
    cause: Option<Box<ValidationError>>,
    message: String,
}

impl Invalid {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            message: template.clone(),
            template,
            context: IndexMap::new(),
            path: Path::root(),
            code: 0,
            cause: None,
        }
    }

    /// Add one placeholder value
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(name.into(), value.into());
        self.render();
        self
    }

    /// Stamp the location of the offending value
    pub fn at(mut self, path: &Path) -> Self {
        self.path = path.clone();
        self
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = code;
        self
    }

    /// Attach the nested error that explains this one
    pub fn caused_by(mut self, cause: impl Into<ValidationError>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self.render();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn context(&self) -> &IndexMap<String, String> {
        &self.context
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn cause(&self) -> Option<&ValidationError> {
        self.cause.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Depth of the error, i.e. the length of its path
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn render(&mut self) {
        let mut message = interpolate(&self.template, &self.context);
        if let Some(cause) = &self.cause {
            message.push_str(": ");
            message.push_str(cause.message());
        }
        self.message = message;
    }
}

/// Replace `{name}` placeholders in a single pass; unknown names stay as-is
fn interpolate(template: &str, context: &IndexMap<String, String>) -> String {
    if context.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match context.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Aggregate of validation failures keyed by where they occurred.
///
/// Children may themselves be aggregates; the depth of an aggregate is the
/// deepest depth found among its own path and its children.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct MultipleInvalid {
    errors: IndexMap<Key, ValidationError>,
    path: Path,
    code: u32,
    message: String,
}

impl MultipleInvalid {
    /// Aggregate a list of errors, keyed by their position
    pub fn new<I>(errors: I) -> Self
    where
        I: IntoIterator<Item = ValidationError>,
    {
        Self::keyed(
            errors
                .into_iter()
                .enumerate()
                .map(|(i, e)| (Key::Index(i), e))
                .collect(),
        )
    }

    /// Aggregate errors under explicit keys, preserving their order
    pub fn keyed(errors: IndexMap<Key, ValidationError>) -> Self {
        debug_assert!(!errors.is_empty(), "an aggregate holds at least one error");
        let mut aggregate = Self {
            errors,
            path: Path::root(),
            code: 0,
            message: String::new(),
        };
        aggregate.render();
        aggregate
    }

    pub fn at(mut self, path: &Path) -> Self {
        self.path = path.clone();
        self
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = code;
        self
    }

    pub fn errors(&self) -> &IndexMap<Key, ValidationError> {
        &self.errors
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, ValidationError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Child messages, in order
    pub fn messages(&self) -> Vec<&str> {
        self.errors.values().map(ValidationError::message).collect()
    }

    pub fn depth(&self) -> usize {
        self.errors
            .values()
            .map(ValidationError::depth)
            .fold(self.path.len(), usize::max)
    }

    /// Every leaf error, in order, following cause chains
    pub fn flatten(&self) -> Vec<&Invalid> {
        let mut out = Vec::new();
        for error in self.errors.values() {
            collect_leaves(error, &mut out);
        }
        out
    }

    fn render(&mut self) {
        let joined = self.messages().join(", ");
        self.message = if is_dense_index(self.errors.keys()) {
            format!("[ {} ]", joined)
        } else {
            format!("{{ {} }}", joined)
        };
    }
}

fn collect_leaves<'a>(error: &'a ValidationError, out: &mut Vec<&'a Invalid>) {
    match error {
        ValidationError::Invalid(invalid) => {
            out.push(invalid);
            if let Some(cause) = invalid.cause() {
                collect_leaves(cause, out);
            }
        }
        ValidationError::Multiple(aggregate) => {
            for child in aggregate.errors.values() {
                collect_leaves(child, out);
            }
        }
    }
}

/// Any failure raised by a validator
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error(transparent)]
    Invalid(#[from] Invalid),

    #[error(transparent)]
    Multiple(#[from] MultipleInvalid),
}

impl ValidationError {
    pub fn path(&self) -> &Path {
        match self {
            ValidationError::Invalid(e) => e.path(),
            ValidationError::Multiple(e) => e.path(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            ValidationError::Invalid(e) => e.depth(),
            ValidationError::Multiple(e) => e.depth(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationError::Invalid(e) => e.message(),
            ValidationError::Multiple(e) => e.message(),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ValidationError::Invalid(e) => e.code(),
            ValidationError::Multiple(e) => e.code(),
        }
    }

    /// Every leaf error, in order, following cause chains
    pub fn flatten(&self) -> Vec<&Invalid> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// Normalize into an aggregate; a lone error becomes a one-element list
    pub fn into_multiple(self) -> MultipleInvalid {
        match self {
            ValidationError::Multiple(aggregate) => aggregate,
            ValidationError::Invalid(invalid) => {
                MultipleInvalid::new([ValidationError::Invalid(invalid)])
            }
        }
    }
}
