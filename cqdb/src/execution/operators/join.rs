//! Tuple nested loop join.

use crate::error::Error;
use crate::execution::bindings::{bound_values, resolve_term};
use crate::model::{ComparisonAtom, Constant, RelationalAtom, Term, Tuple};

use super::Operator;

/// Joins an accumulated left-deep subtree with one base relation.
///
/// The outer (left) child advances one tuple at a time; for each outer tuple
/// the inner (right) child is scanned to exhaustion and reset. A combined
/// tuple is emitted when every variable shared between the right atom and the
/// accumulated left atoms binds to equal values, and every explicitly
/// assigned join predicate holds.
#[derive(Debug)]
pub struct Join {
    /// The operator producing the accumulated left side.
    left: Box<dyn Operator>,
    /// The operator producing the right side.
    right: Box<dyn Operator>,
    /// The atoms naming the columns of outer tuples.
    left_atoms: Vec<RelationalAtom>,
    /// The atom naming the columns of inner tuples.
    right_atom: RelationalAtom,
    /// The join predicates assigned to this node.
    conditions: Vec<ComparisonAtom>,
    /// The current outer tuple.
    outer: Option<Tuple>,
    /// Whether the outer pointer has been primed since the last reset.
    primed: bool,
}

impl Join {
    /// Construct a new [Join].
    ///
    /// Every variable of every assigned predicate must be bound by the right
    /// atom or by one of the accumulated left atoms.
    pub fn new(
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
        left_atoms: Vec<RelationalAtom>,
        right_atom: RelationalAtom,
        conditions: Vec<ComparisonAtom>,
    ) -> Result<Self, Error> {
        for condition in &conditions {
            let unbound = condition.variables().any(|variable| {
                let term = Term::Variable(variable.clone());
                !right_atom.contains(&term) && !left_atoms.iter().any(|atom| atom.contains(&term))
            });
            if unbound {
                return Err(Error::DanglingJoinPredicate(condition.clone()));
            }
        }

        Ok(Self {
            left,
            right,
            left_atoms,
            right_atom,
            conditions,
            outer: None,
            primed: false,
        })
    }

    /// Check the implicit equi-join: every variable of the right atom that
    /// also occurs on the left must carry the same value on both sides.
    fn shares_consistent_bindings(&self, outer: &Tuple, inner: &Tuple) -> Result<bool, Error> {
        for (position, term) in self.right_atom.terms().iter().enumerate() {
            if !matches!(term, Term::Variable(_)) {
                continue;
            }
            let inner_value = &inner.constants()[position];
            let left_values = bound_values(term, outer, &self.left_atoms)?;
            if left_values.iter().any(|value| value != inner_value) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Resolve a predicate term against the current tuple pair, preferring
    /// the right side for variables bound on both.
    fn resolve_condition_term(
        &self,
        term: &Term,
        outer: &Tuple,
        inner: &Tuple,
    ) -> Result<Constant, Error> {
        if let Some(constant) = term.as_constant() {
            return Ok(constant.clone());
        }

        if self.right_atom.contains(term) {
            return resolve_term(term, inner, std::slice::from_ref(&self.right_atom));
        }

        let values = bound_values(term, outer, &self.left_atoms)?;
        values.into_iter().next().ok_or_else(|| {
            Error::PlannerInvariant(format!("join predicate term {term} is unbound"))
        })
    }

    /// Evaluate the assigned join predicates on the current tuple pair.
    fn satisfies_conditions(&self, outer: &Tuple, inner: &Tuple) -> Result<bool, Error> {
        for condition in &self.conditions {
            let lhs = self.resolve_condition_term(condition.lhs(), outer, inner)?;
            let rhs = self.resolve_condition_term(condition.rhs(), outer, inner)?;
            if !condition.operator().evaluate(&lhs, &rhs)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Operator for Join {
    fn next(&mut self) -> Result<Option<Tuple>, Error> {
        if !self.primed {
            self.outer = self.left.next()?;
            self.primed = true;
        }

        while self.outer.is_some() {
            // Exhausting the inner stream rewinds it and advances the outer
            // pointer, so the new pair is inspected in the same iteration.
            let inner = match self.right.next()? {
                Some(tuple) => Some(tuple),
                None => {
                    self.right.reset()?;
                    let first = self.right.next()?;
                    self.outer = self.left.next()?;
                    first
                }
            };

            let (Some(outer), Some(inner)) = (self.outer.as_ref(), inner.as_ref()) else {
                continue;
            };

            if self.shares_consistent_bindings(outer, inner)?
                && self.satisfies_conditions(outer, inner)?
            {
                return Ok(Some(Tuple::joined(outer, inner)));
            }
        }

        Ok(None)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.left.reset()?;
        self.right.reset()?;
        self.outer = None;
        self.primed = false;
        Ok(())
    }
}
