//! Deciding whether a homomorphism exists between two query bodies.

use std::collections::{BTreeSet, HashSet};

use crate::model::{Query, RelationalAtom, Term, Variable, VariableAssignment};

/// Decide whether a homomorphism exists from the body of `query` to the body
/// of `reduced` that fixes the head variables, where `reduced` is `query`
/// with the body occurrence of `removed` taken out.
///
/// Only the variables of `removed` that are not distinguished need rebinding:
/// head variables must map to themselves, and every other variable that still
/// occurs in the reduced body may stay in place. Candidate replacement terms
/// for a variable are the terms found at its positions across the
/// same-predicate atoms of the reduced body; any valid homomorphism must map
/// `removed` onto one of those atoms.
///
/// The search walks all partial assignments depth-first with an explicit
/// stack, treating unassigned variables as fixed. An assignment is a witness
/// when the substituted body is contained in the reduced body as a set of
/// atoms, with sets held in the canonical (predicate, terms) order.
pub fn exists_homomorphism(query: &Query, reduced: &Query, removed: &RelationalAtom) -> bool {
    let sources: BTreeSet<RelationalAtom> = query.relational_atoms().cloned().collect();
    let targets: BTreeSet<RelationalAtom> = reduced.relational_atoms().cloned().collect();

    let matching: Vec<&RelationalAtom> = targets
        .iter()
        .filter(|atom| atom.predicate() == removed.predicate() && atom.arity() == removed.arity())
        .collect();
    if matching.is_empty() {
        // The image of the removed atom would have nowhere to go.
        return false;
    }

    let mut head_variables: HashSet<&Variable> = query.head_variables().collect();
    if let Some(aggregate) = query.aggregate() {
        head_variables.extend(aggregate.variables());
    }

    let mut rebindable: Vec<&Variable> = Vec::new();
    for variable in removed.variables() {
        if !head_variables.contains(variable) && !rebindable.contains(&variable) {
            rebindable.push(variable);
        }
    }

    let candidates: Vec<(&Variable, Vec<Term>)> = rebindable
        .into_iter()
        .map(|variable| {
            let positions: Vec<usize> = removed.positions(variable).collect();
            let mut terms: Vec<Term> = Vec::new();
            for atom in &matching {
                for &position in &positions {
                    let term = &atom.terms()[position];
                    if term.as_variable() != Some(variable) && !terms.contains(term) {
                        terms.push(term.clone());
                    }
                }
            }
            (variable, terms)
        })
        .collect();

    let mut stack: Vec<(usize, VariableAssignment)> = vec![(0, VariableAssignment::new())];

    while let Some((depth, assignment)) = stack.pop() {
        let image: BTreeSet<RelationalAtom> = sources
            .iter()
            .map(|atom| atom.apply_assignment(&assignment))
            .collect();
        if image.is_subset(&targets) {
            log::trace!("homomorphism witness for {removed}: {assignment:?}");
            return true;
        }

        if let Some((variable, terms)) = candidates.get(depth) {
            // A variable that still occurs in the reduced body may stay in
            // place, so keeping it fixed is always one of the branches.
            stack.push((depth + 1, assignment.clone()));
            for term in terms {
                let mut extended = assignment.clone();
                extended.insert((*variable).clone(), term.clone());
                stack.push((depth + 1, extended));
            }
        }
    }

    false
}
