//! Terms of the query language: variables and typed constants.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::Error;

/// Variable that can be bound to a specific value.
#[derive(Debug, Eq, PartialEq, Hash, Clone, PartialOrd, Ord)]
pub struct Variable(String);

impl Variable {
    /// Construct a new [Variable] with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the name of the variable.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A term with a specific constant value.
#[derive(Debug, Eq, PartialEq, Hash, Clone, PartialOrd, Ord)]
pub enum Constant {
    /// An integer literal.
    Integer(i64),
    /// A string literal.
    String(String),
}

impl Constant {
    /// Compare two constants of the same type.
    ///
    /// Integers compare by value and strings lexicographically; comparing
    /// constants of different types is an error.
    pub fn compare(&self, other: &Constant) -> Result<Ordering, Error> {
        match (self, other) {
            (Constant::Integer(lhs), Constant::Integer(rhs)) => Ok(lhs.cmp(rhs)),
            (Constant::String(lhs), Constant::String(rhs)) => Ok(lhs.cmp(rhs)),
            _ => Err(Error::IncomparableConstants {
                lhs: self.clone(),
                rhs: other.clone(),
            }),
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Integer(value) => write!(f, "{value}"),
            Constant::String(value) => write!(f, "'{value}'"),
        }
    }
}

/// Simple term that is either a constant or a variable.
#[derive(Debug, Eq, PartialEq, Hash, Clone, PartialOrd, Ord)]
pub enum Term {
    /// A variable.
    Variable(Variable),
    /// A constant.
    Constant(Constant),
}

impl Term {
    /// Return the contained [Variable], if this term is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            Term::Constant(_) => None,
        }
    }

    /// Return the contained [Constant], if this term is one.
    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Term::Variable(_) => None,
            Term::Constant(constant) => Some(constant),
        }
    }

    /// Return `true` if the term is not a variable.
    pub fn is_ground(&self) -> bool {
        matches!(self, Term::Constant(_))
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Term::Variable(value)
    }
}

impl From<Constant> for Term {
    fn from(value: Constant) -> Self {
        Term::Constant(value)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(variable) => write!(f, "{variable}"),
            Term::Constant(constant) => write!(f, "{constant}"),
        }
    }
}

/// A boolean-valued operation on two constants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// First operand is equal to the second operand.
    Equal,
    /// First operand is not equal to the second operand.
    Unequal,
    /// First operand is smaller than the second operand.
    LessThan,
    /// First operand is smaller than or equal the second operand.
    LessThanEqual,
    /// First operand is greater than the second operand.
    GreaterThan,
    /// First operand is greater than or equal to the second operand.
    GreaterThanEqual,
}

impl ComparisonOperator {
    /// Returns a symbolic representation of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::Unequal => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanEqual => ">=",
        }
    }

    /// Performs the operation represented by this object.
    ///
    /// Both operands must be constants of the same type.
    pub fn evaluate(&self, lhs: &Constant, rhs: &Constant) -> Result<bool, Error> {
        let ordering = lhs.compare(rhs)?;

        Ok(match self {
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::Unequal => ordering != Ordering::Equal,
            ComparisonOperator::LessThan => ordering == Ordering::Less,
            ComparisonOperator::LessThanEqual => ordering != Ordering::Greater,
            ComparisonOperator::GreaterThan => ordering == Ordering::Greater,
            ComparisonOperator::GreaterThanEqual => ordering != Ordering::Less,
        })
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
