//! Schema compiler and validator combinators
//!
//! A [`Schema`] describes the acceptable shape of untrusted input. It is
//! compiled once into a tree of [`Validator`] nodes; each node is a pure
//! function of `(value, path)` and the tree can be shared across threads.
//!
//! # Example
//!
//! ```
//! use plan_core::{assert, combinator::{dict, Extra, Required}, Plan, Schema, Value};
//!
//! let schema = dict(
//!     [("name", Schema::from(assert::string())), ("age", assert::integer().into())],
//!     Required::All,
//!     Extra::Deny,
//! )
//! .unwrap();
//! let plan = Plan::new(schema).unwrap();
//!
//! let user = Value::map([("name", Value::from("Ada")), ("age", Value::Int(36))]);
//! assert!(plan.is_valid(&user));
//!
//! let errors = plan.validate(&Value::map([("age", "old")])).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

pub mod assert;
pub mod combinator;
pub mod error;
pub mod loader;
pub mod path;
pub mod plan;
pub mod schema;
pub mod validator;
pub mod value;

pub use error::{
    Invalid, MultipleInvalid, SchemaError, SchemaResult, ValidationError, ValidationResult,
};
pub use path::Path;
pub use plan::{Check, Plan};
pub use schema::{compile, Schema};
pub use validator::{Validate, Validator};
pub use value::{Instance, Key, Kind, Value};
