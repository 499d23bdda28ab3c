//! Filtering tuples by standalone comparison predicates.

use crate::error::Error;
use crate::execution::bindings::resolve_term;
use crate::model::{ComparisonAtom, RelationalAtom, Term, Tuple};

use super::Operator;

/// Filters the tuples of a single relation by a conjunction of comparison
/// atoms whose variables all belong to that relation.
///
/// Tuples are forwarded unchanged; the selection streams.
#[derive(Debug)]
pub struct Select {
    /// The atom naming the columns of the filtered tuples.
    atom: RelationalAtom,
    /// The predicates every emitted tuple satisfies.
    conditions: Vec<ComparisonAtom>,
    /// The operator producing the candidate tuples.
    child: Box<dyn Operator>,
}

impl Select {
    /// Construct a new [Select] over the given child.
    ///
    /// After normalization the labeling atom holds only distinct variables,
    /// and every condition variable must be one of them.
    pub fn new(
        atom: RelationalAtom,
        conditions: Vec<ComparisonAtom>,
        child: Box<dyn Operator>,
    ) -> Result<Self, Error> {
        if atom.terms().iter().any(Term::is_ground) {
            return Err(Error::PlannerInvariant(format!(
                "selection atom {atom} still contains a constant"
            )));
        }
        for condition in &conditions {
            if let Some(variable) = condition
                .variables()
                .find(|variable| !atom.contains(&Term::Variable((*variable).clone())))
            {
                return Err(Error::PlannerInvariant(format!(
                    "selection predicate {condition} references {variable}, \
                     which is not bound by {atom}"
                )));
            }
        }

        Ok(Self {
            atom,
            conditions,
            child,
        })
    }

    /// Return the atom this selection is labeled with.
    pub fn relational_atom(&self) -> &RelationalAtom {
        &self.atom
    }

    /// Evaluate all conditions against the given tuple.
    fn satisfies(&self, tuple: &Tuple) -> Result<bool, Error> {
        let atoms = std::slice::from_ref(&self.atom);
        for condition in &self.conditions {
            let lhs = resolve_term(condition.lhs(), tuple, atoms)?;
            let rhs = resolve_term(condition.rhs(), tuple, atoms)?;
            if !condition.operator().evaluate(&lhs, &rhs)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Operator for Select {
    fn next(&mut self) -> Result<Option<Tuple>, Error> {
        while let Some(tuple) = self.child.next()? {
            if self.satisfies(&tuple)? {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.child.reset()
    }
}

#[cfg(test)]
mod test {
    use crate::execution::operators::fixture::Fixture;
    use crate::model::{ComparisonOperator, Constant, Variable};

    use super::*;

    fn atom() -> RelationalAtom {
        RelationalAtom::new(
            "R",
            vec![
                Term::Variable(Variable::new("a")),
                Term::Variable(Variable::new("b")),
            ],
        )
    }

    fn rows() -> Box<dyn Operator> {
        Box::new(Fixture::new(vec![
            Tuple::new(vec![Constant::Integer(1), Constant::Integer(2)]),
            Tuple::new(vec![Constant::Integer(3), Constant::Integer(2)]),
            Tuple::new(vec![Constant::Integer(5), Constant::Integer(6)]),
        ]))
    }

    #[test]
    fn filters_by_all_conditions() {
        let conditions = vec![
            ComparisonAtom::new(
                Term::Variable(Variable::new("a")),
                ComparisonOperator::GreaterThan,
                Term::Constant(Constant::Integer(1)),
            ),
            ComparisonAtom::new(
                Term::Variable(Variable::new("b")),
                ComparisonOperator::Equal,
                Term::Constant(Constant::Integer(2)),
            ),
        ];

        let mut select = Select::new(atom(), conditions, rows()).unwrap();
        let tuple = select.next().unwrap().unwrap();
        assert_eq!(tuple.constants()[0], Constant::Integer(3));
        assert!(select.next().unwrap().is_none());
    }

    #[test]
    fn constant_conditions_evaluate_directly() {
        let falsum = ComparisonAtom::new(
            Term::Constant(Constant::Integer(1)),
            ComparisonOperator::Unequal,
            Term::Constant(Constant::Integer(1)),
        );

        let mut select = Select::new(atom(), vec![falsum], rows()).unwrap();
        assert!(select.next().unwrap().is_none());
    }

    #[test]
    fn mismatched_types_abort() {
        let broken = ComparisonAtom::new(
            Term::Variable(Variable::new("a")),
            ComparisonOperator::Equal,
            Term::Constant(Constant::String("1".to_string())),
        );

        let mut select = Select::new(atom(), vec![broken], rows()).unwrap();
        assert!(matches!(
            select.next(),
            Err(Error::IncomparableConstants { .. })
        ));
    }

    #[test]
    fn foreign_variables_are_rejected() {
        let foreign = ComparisonAtom::new(
            Term::Variable(Variable::new("z")),
            ComparisonOperator::Equal,
            Term::Constant(Constant::Integer(1)),
        );

        assert!(matches!(
            Select::new(atom(), vec![foreign], rows()),
            Err(Error::PlannerInvariant(_))
        ));
    }
}
