//! The logical data model: terms, atoms, queries, schemas, and tuples.

pub mod atom;
pub mod query;
pub mod schema;
pub mod term;
pub mod tuple;

use std::collections::HashMap;

pub use atom::{Atom, ComparisonAtom, RelationalAtom, SumAggregate};
pub use query::Query;
pub use schema::{ColumnType, RelationalSchema};
pub use term::{ComparisonOperator, Constant, Term, Variable};
pub use tuple::Tuple;

/// Maps variables to the terms they are replaced with.
pub type VariableAssignment = HashMap<Variable, Term>;

