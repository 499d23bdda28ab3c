//! Atoms of the query language: relational atoms, comparison atoms, and the
//! head sum aggregate.

use std::fmt::{Display, Formatter};

use super::term::{ComparisonOperator, Term, Variable};

/// An application of a predicate to a sequence of terms.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RelationalAtom {
    /// The predicate.
    predicate: String,
    /// The terms.
    terms: Vec<Term>,
}

impl RelationalAtom {
    /// Construct a new [RelationalAtom].
    pub fn new(predicate: impl Into<String>, terms: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            terms,
        }
    }

    /// Return the predicate name.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Return the terms of the atom.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Return the number of terms of the atom.
    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// Return all variables in the atom.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().filter_map(Term::as_variable)
    }

    /// Return `true` if the given term occurs in the atom.
    pub fn contains(&self, term: &Term) -> bool {
        self.terms.contains(term)
    }

    /// Return the positions at which the given variable occurs.
    pub fn positions<'a>(&'a self, variable: &'a Variable) -> impl Iterator<Item = usize> + 'a {
        self.terms
            .iter()
            .enumerate()
            .filter_map(move |(position, term)| {
                (term.as_variable() == Some(variable)).then_some(position)
            })
    }

    /// Apply the given assignment to every term of the atom at once,
    /// returning the substituted atom. Unassigned variables stay in place.
    pub fn apply_assignment(&self, assignment: &super::VariableAssignment) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|term| match term.as_variable().and_then(|v| assignment.get(v)) {
                Some(replacement) => replacement.clone(),
                None => term.clone(),
            })
            .collect();

        Self::new(self.predicate.clone(), terms)
    }
}

impl Display for RelationalAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (index, term) in self.terms.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
        }
        f.write_str(")")
    }
}

/// A comparison between two terms.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ComparisonAtom {
    /// The left operand.
    lhs: Term,
    /// The operation to be performed.
    operator: ComparisonOperator,
    /// The right operand.
    rhs: Term,
}

impl ComparisonAtom {
    /// Construct a new [ComparisonAtom].
    pub fn new(lhs: Term, operator: ComparisonOperator, rhs: Term) -> Self {
        Self { lhs, operator, rhs }
    }

    /// Return the left operand.
    pub fn lhs(&self) -> &Term {
        &self.lhs
    }

    /// Return the right operand.
    pub fn rhs(&self) -> &Term {
        &self.rhs
    }

    /// Return the comparison operator.
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Return the variables among the two operands.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        [&self.lhs, &self.rhs]
            .into_iter()
            .filter_map(Term::as_variable)
    }
}

impl Display for ComparisonAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.operator, self.rhs)
    }
}

/// The sum aggregate that may be attached to a query head.
///
/// Evaluates to the sum, over all result tuples, of the product of the
/// resolved values of its terms.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SumAggregate {
    /// The factors of the aggregated product.
    product_terms: Vec<Term>,
}

impl SumAggregate {
    /// Construct a new [SumAggregate] over the given product terms.
    pub fn new(product_terms: Vec<Term>) -> Self {
        Self { product_terms }
    }

    /// Return the factors of the aggregated product.
    pub fn product_terms(&self) -> &[Term] {
        &self.product_terms
    }

    /// Return all variables among the product terms.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.product_terms.iter().filter_map(Term::as_variable)
    }
}

impl Display for SumAggregate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SUM(")?;
        for (index, term) in self.product_terms.iter().enumerate() {
            if index > 0 {
                f.write_str(" * ")?;
            }
            write!(f, "{term}")?;
        }
        f.write_str(")")
    }
}

/// A body atom: either relational or a comparison.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Atom {
    /// A relational atom.
    Relational(RelationalAtom),
    /// A comparison atom.
    Comparison(ComparisonAtom),
}

impl Atom {
    /// Return the contained [RelationalAtom], if this atom is one.
    pub fn as_relational(&self) -> Option<&RelationalAtom> {
        match self {
            Atom::Relational(atom) => Some(atom),
            Atom::Comparison(_) => None,
        }
    }

    /// Return the contained [ComparisonAtom], if this atom is one.
    pub fn as_comparison(&self) -> Option<&ComparisonAtom> {
        match self {
            Atom::Relational(_) => None,
            Atom::Comparison(atom) => Some(atom),
        }
    }
}

impl From<RelationalAtom> for Atom {
    fn from(value: RelationalAtom) -> Self {
        Atom::Relational(value)
    }
}

impl From<ComparisonAtom> for Atom {
    fn from(value: ComparisonAtom) -> Self {
        Atom::Comparison(value)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Relational(atom) => write!(f, "{atom}"),
            Atom::Comparison(atom) => write!(f, "{atom}"),
        }
    }
}
