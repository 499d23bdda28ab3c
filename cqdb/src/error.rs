//! Error-handling module for the crate.

use thiserror::Error;

use crate::io::parser::ParseError;
use crate::model::{ComparisonAtom, Constant, RelationalAtom, Term, Variable};

/// Error-collection for all the possible errors occurring in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Parse errors.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A schema line could not be interpreted.
    #[error("malformed schema line {line} in \"{filename}\"")]
    SchemaFormat {
        /// Name of the schema file.
        filename: String,
        /// One-based number of the offending line.
        line: usize,
    },
    /// A schema line declared a column of an unsupported type.
    #[error("unknown column type \"{0}\" in schema")]
    UnknownColumnType(String),
    /// A query referenced a relation the schema does not declare.
    #[error("relation \"{0}\" is not declared in the schema")]
    UnknownRelation(String),
    /// An atom used a relation with the wrong number of terms.
    #[error("atom {atom} does not match the declared arity {expected} of relation \"{relation}\"")]
    AtomArity {
        /// The offending atom.
        atom: RelationalAtom,
        /// The relation name.
        relation: String,
        /// The arity declared by the schema.
        expected: usize,
    },
    /// A head variable is not bound by the query body.
    #[error("head variable {0} does not occur in any body relation")]
    UnsafeHeadVariable(Variable),
    /// A projected, grouped, or compared variable is not bound by any
    /// relational atom.
    #[error("variable {0} does not occur in any relational atom")]
    UnboundVariable(Variable),
    /// The query body contains no relational atoms.
    #[error("query body contains no relational atoms")]
    EmptyBody,
    /// A sum aggregate term can never evaluate to an integer.
    #[error("sum aggregate term {0} is not a variable or an integer constant")]
    MalformedProductTerm(Term),
    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error while reading a particular file.
    #[error("failed to read \"{filename}\": {error}")]
    IoReading {
        /// Contains the wrapped error.
        error: std::io::Error,
        /// Name of the file that could not be read.
        filename: String,
    },
    /// Error while writing a particular file.
    #[error("failed to write \"{filename}\": {error}")]
    IoWriting {
        /// Contains the wrapped error.
        error: std::io::Error,
        /// Name of the file that could not be written.
        filename: String,
    },
    /// CSV deserialization error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// A data row does not match the arity of its relation.
    #[error("row {row} of relation \"{relation}\" has {found} fields, expected {expected}")]
    TupleArity {
        /// The relation name.
        relation: String,
        /// One-based number of the offending row.
        row: u64,
        /// The arity declared by the schema.
        expected: usize,
        /// The number of fields found in the row.
        found: usize,
    },
    /// A field of an integer column could not be parsed.
    #[error("cannot parse \"{field}\" as an integer value of relation \"{relation}\"")]
    IntegerField {
        /// The relation name.
        relation: String,
        /// The offending field.
        field: String,
    },
    /// Two constants of different types were compared.
    #[error("cannot compare {lhs} and {rhs}: mismatched constant types")]
    IncomparableConstants {
        /// The left operand.
        lhs: Constant,
        /// The right operand.
        rhs: Constant,
    },
    /// A sum aggregate resolved a product term to a non-integer value.
    #[error("sum aggregate over non-integer value {0}")]
    NonIntegerValue(Constant),
    /// A sum aggregate exceeded the 64-bit accumulator.
    #[error("integer overflow while computing a sum aggregate")]
    AggregateOverflow,
    /// A join predicate references no relation of the plan.
    #[error("join predicate {0} references no relation of the query")]
    DanglingJoinPredicate(ComparisonAtom),
    /// An internal planner invariant was violated; indicates a bug.
    #[error("planner invariant violated: {0}")]
    PlannerInvariant(String),
}
