//! Conjunctive queries: a head atom, an optional sum aggregate, and a body.

use std::fmt::{Display, Formatter};

use super::atom::{Atom, ComparisonAtom, RelationalAtom, SumAggregate};
use super::term::Variable;

/// A conjunctive query.
///
/// The head terms are exactly the values exposed to the client; the optional
/// aggregate turns the query into a grouped sum over the product of its terms.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Query {
    /// The head atom.
    head: RelationalAtom,
    /// The aggregate attached to the head, if any.
    aggregate: Option<SumAggregate>,
    /// The body atoms, in input order.
    body: Vec<Atom>,
}

impl Query {
    /// Construct a new [Query].
    pub fn new(head: RelationalAtom, aggregate: Option<SumAggregate>, body: Vec<Atom>) -> Self {
        Self {
            head,
            aggregate,
            body,
        }
    }

    /// Return the head atom.
    pub fn head(&self) -> &RelationalAtom {
        &self.head
    }

    /// Return the aggregate attached to the head, if any.
    pub fn aggregate(&self) -> Option<&SumAggregate> {
        self.aggregate.as_ref()
    }

    /// Return the body atoms in input order.
    pub fn body(&self) -> &[Atom] {
        &self.body
    }

    /// Return the relational atoms of the body in input order.
    pub fn relational_atoms(&self) -> impl Iterator<Item = &RelationalAtom> {
        self.body.iter().filter_map(Atom::as_relational)
    }

    /// Return the comparison atoms of the body in input order.
    pub fn comparison_atoms(&self) -> impl Iterator<Item = &ComparisonAtom> {
        self.body.iter().filter_map(Atom::as_comparison)
    }

    /// Return the variables of the head atom.
    pub fn head_variables(&self) -> impl Iterator<Item = &Variable> {
        self.head.variables()
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.head.predicate())?;
        let mut first = true;
        for term in self.head.terms() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
            first = false;
        }
        if let Some(aggregate) = &self.aggregate {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{aggregate}")?;
        }
        f.write_str(") :- ")?;
        for (index, atom) in self.body.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}
