//! Resolving terms against tuples.
//!
//! An operator is labeled with the relational atoms whose columns make up its
//! tuples; a variable is bound to the tuple constant at each position where
//! it occurs in the concatenated term sequence of those atoms. The helpers
//! here are shared by selection, join, projection, and aggregation.

use crate::error::Error;
use crate::model::{Constant, RelationalAtom, Term, Tuple};

/// Collect every value that `tuple` binds to `term` across the given atoms.
///
/// A constant term resolves to itself; a variable resolves to the constant at
/// each of its positions, which may differ if the labeling atoms have not
/// been joined yet.
pub(crate) fn bound_values(
    term: &Term,
    tuple: &Tuple,
    atoms: &[RelationalAtom],
) -> Result<Vec<Constant>, Error> {
    let labeled_arity: usize = atoms.iter().map(RelationalAtom::arity).sum();
    if labeled_arity != tuple.arity() {
        return Err(Error::PlannerInvariant(format!(
            "tuple of arity {} labeled with atoms of total arity {labeled_arity}",
            tuple.arity()
        )));
    }

    let variable = match term {
        Term::Constant(constant) => return Ok(vec![constant.clone()]),
        Term::Variable(variable) => variable,
    };

    let mut values = Vec::new();
    let mut offset = 0;
    for atom in atoms {
        for position in atom.positions(variable) {
            values.push(tuple.constants()[offset + position].clone());
        }
        offset += atom.arity();
    }

    Ok(values)
}

/// Resolve `term` to its unique value under `tuple`.
///
/// All positions of a variable must carry equal values; upstream equi-joins
/// guarantee this for every tuple that reaches a projection.
pub(crate) fn resolve_term(
    term: &Term,
    tuple: &Tuple,
    atoms: &[RelationalAtom],
) -> Result<Constant, Error> {
    let values = bound_values(term, tuple, atoms)?;

    let Some((first, rest)) = values.split_first() else {
        return Err(Error::PlannerInvariant(format!(
            "term {term} has no binding in the current tuple"
        )));
    };
    if rest.iter().any(|value| value != first) {
        return Err(Error::PlannerInvariant(format!(
            "term {term} is bound to conflicting values"
        )));
    }

    Ok(first.clone())
}

/// Project `tuple` onto the given terms, resolving each variable through the
/// labeling atoms and passing constants straight through.
///
/// This is the common core of projection, group-by keys, and aggregate
/// products.
pub(crate) fn project_tuple(
    tuple: &Tuple,
    atoms: &[RelationalAtom],
    terms: &[Term],
) -> Result<Tuple, Error> {
    let constants = terms
        .iter()
        .map(|term| resolve_term(term, tuple, atoms))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Tuple::new(constants))
}

#[cfg(test)]
mod test {
    use crate::model::{Constant, Variable};

    use super::*;

    fn atoms() -> Vec<RelationalAtom> {
        vec![
            RelationalAtom::new(
                "R",
                vec![
                    Term::Variable(Variable::new("a")),
                    Term::Variable(Variable::new("b")),
                ],
            ),
            RelationalAtom::new(
                "S",
                vec![
                    Term::Variable(Variable::new("b")),
                    Term::Variable(Variable::new("c")),
                ],
            ),
        ]
    }

    fn tuple() -> Tuple {
        Tuple::new(vec![
            Constant::Integer(1),
            Constant::Integer(2),
            Constant::Integer(2),
            Constant::Integer(3),
        ])
    }

    #[test]
    fn variables_bind_at_every_position() {
        let values = bound_values(
            &Term::Variable(Variable::new("b")),
            &tuple(),
            &atoms(),
        )
        .unwrap();
        assert_eq!(values, vec![Constant::Integer(2), Constant::Integer(2)]);
    }

    #[test]
    fn constants_resolve_to_themselves() {
        let resolved = resolve_term(
            &Term::Constant(Constant::String("k".to_string())),
            &tuple(),
            &atoms(),
        )
        .unwrap();
        assert_eq!(resolved, Constant::String("k".to_string()));
    }

    #[test]
    fn projection_follows_term_order() {
        let projected = project_tuple(
            &tuple(),
            &atoms(),
            &[
                Term::Variable(Variable::new("c")),
                Term::Variable(Variable::new("a")),
            ],
        )
        .unwrap();
        assert_eq!(
            projected.constants(),
            &[Constant::Integer(3), Constant::Integer(1)]
        );
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let short = Tuple::new(vec![Constant::Integer(1)]);
        assert!(matches!(
            bound_values(&Term::Variable(Variable::new("a")), &short, &atoms()),
            Err(Error::PlannerInvariant(_))
        ));
    }

    #[test]
    fn unbound_variables_are_rejected() {
        assert!(matches!(
            resolve_term(&Term::Variable(Variable::new("z")), &tuple(), &atoms()),
            Err(Error::PlannerInvariant(_))
        ));
    }
}
