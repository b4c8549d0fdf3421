//! The validator contract and its shared handle

use crate::error::ValidationResult;
use crate::path::Path;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A compiled validation step.
///
/// Implementations inspect `value`, located at `path` inside the input, and
/// either return a (possibly transformed) value or an error stamped with a
/// path at least as deep as `path`. Validators must not mutate shared state;
/// a compiled tree is safe to use from many threads at once.
pub trait Validate: Send + Sync {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult;
}

impl<F> Validate for F
where
    F: Fn(&Value, &Path) -> ValidationResult + Send + Sync,
{
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        self(value, path)
    }
}

/// Shared handle to a compiled validator node
#[derive(Clone)]
pub struct Validator {
    name: &'static str,
    inner: Arc<dyn Validate>,
}

impl Validator {
    /// Wrap a node under a short name shown by `Debug`
    pub fn new(name: &'static str, node: impl Validate + 'static) -> Self {
        Self {
            name,
            inner: Arc::new(node),
        }
    }

    /// Wrap a caller-supplied function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value, &Path) -> ValidationResult + Send + Sync + 'static,
    {
        Self::new("fn", f)
    }

    /// Validator that returns its input unchanged
    pub fn identity() -> Self {
        fn pass_through(value: &Value, _: &Path) -> ValidationResult {
            Ok(value.clone())
        }
        Self::new("identity", pass_through)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validate a value located at the root of the input
    pub fn call(&self, value: &Value) -> ValidationResult {
        self.inner.validate(value, &Path::root())
    }
}

impl Validate for Validator {
    fn validate(&self, value: &Value, path: &Path) -> ValidationResult {
        self.inner.validate(value, path)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.name)
    }
}
