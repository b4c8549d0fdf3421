//! Filters for plan-core schemas
//!
//! Every filter is an ordinary [`plan_core::Validator`]: it takes a value
//! and its path and either returns a (converted) value or raises an
//! [`plan_core::Invalid`] at that path. Filters compose with the core
//! combinators like any other schema node:
//!
//! ```
//! use plan_core::{combinator::all, Plan, Value};
//! use plan_filters::{cast, intl};
//!
//! let username = all([intl::alnum(false).unwrap(), cast::strval()]).unwrap();
//! let plan = Plan::new(username).unwrap();
//! assert_eq!(plan.validate(&Value::from("ad@a_42")).unwrap(), Value::from("ada42"));
//! ```

pub mod cast;
pub mod datetime;
pub mod intl;
pub mod sanitize;
pub mod upload;
