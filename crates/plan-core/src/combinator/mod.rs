//! Validators composed from other validators
//!
//! - Structural: [`seq`], [`dict`] and [`dictkeys`] descend into containers
//!   and extend the path by one key per level.
//! - Logical: [`any`], [`all`], [`not`] and [`iif`] apply children to the
//!   whole value at the current path.
//!
//! Every sub-schema is compiled when the combinator is constructed, so
//! configuration mistakes surface before any input is seen.

mod dict;
mod keys;
mod logic;
mod seq;

pub use dict::{dict, Dict, Extra, Required};
pub use keys::dictkeys;
pub use logic::{all, any, iif, not};
pub use seq::seq;

use crate::error::SchemaResult;
use crate::schema::Schema;
use crate::validator::Validator;

fn compile_all<I, S>(schemas: I) -> SchemaResult<Vec<Validator>>
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    schemas
        .into_iter()
        .map(|schema| schema.into().compile())
        .collect()
}
