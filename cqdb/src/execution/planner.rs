//! Translating a conjunctive query into a left-deep operator tree.
//!
//! Planning proceeds in four steps: the query is normalized so that every
//! relational atom holds only pairwise-distinct variables, comparison atoms
//! are classified into per-relation selections and join predicates, each
//! relation becomes a scan (wrapped in a selection where predicates pushed
//! down to it), and the leaves are folded left-to-right into a tree of
//! nested-loop joins topped by a projection or a sum aggregate.

use std::collections::{HashMap, HashSet};

use crate::error::Error;
use crate::io::catalog::Catalog;
use crate::model::{
    Atom, ComparisonAtom, ComparisonOperator, Query, RelationalAtom, Term, Variable,
};

use super::operators::{Join, Operator, Project, Scan, Select, SumAggregate};

/// Build the operator tree evaluating `query` against the catalog's
/// relations, and hand its root to the caller.
pub fn plan(query: &Query, catalog: &Catalog) -> Result<Box<dyn Operator>, Error> {
    if query.relational_atoms().next().is_none() {
        return Err(Error::EmptyBody);
    }
    check_safety(query)?;

    let normalized = normalize(query);
    log::debug!("normalized query: {normalized}");

    let atoms: Vec<RelationalAtom> = normalized.relational_atoms().cloned().collect();
    let (selections, mut join_predicates) = classify(&normalized, &atoms)?;

    let mut leaves = Vec::new();
    for (atom, conditions) in atoms.iter().zip(selections) {
        let schema = catalog.schema(atom.predicate())?;
        let scan = Scan::new(schema.clone(), atom.clone())?;

        let leaf: Box<dyn Operator> = if conditions.is_empty() {
            Box::new(scan)
        } else {
            Box::new(Select::new(atom.clone(), conditions, Box::new(scan))?)
        };
        leaves.push(leaf);
    }

    let mut operators = leaves.into_iter().enumerate();
    let Some((_, first)) = operators.next() else {
        return Err(Error::EmptyBody);
    };

    let mut current = first;
    let mut accumulated = vec![atoms[0].clone()];

    for (index, leaf) in operators {
        let right_atom = atoms[index].clone();
        let conditions = join_predicates.remove(&index).unwrap_or_default();

        current = Box::new(Join::new(
            current,
            leaf,
            accumulated.clone(),
            right_atom.clone(),
            conditions,
        )?);
        accumulated.push(right_atom);
    }

    let head_terms = normalized.head().terms().to_vec();
    Ok(match normalized.aggregate() {
        None => Box::new(Project::new(accumulated, head_terms, current)?),
        Some(aggregate) => Box::new(SumAggregate::new(
            accumulated,
            head_terms,
            aggregate.product_terms().to_vec(),
            current,
        )?),
    })
}

/// Reject queries whose head or aggregate uses a variable the body does not
/// bind.
fn check_safety(query: &Query) -> Result<(), Error> {
    let bound: HashSet<&Variable> = query
        .relational_atoms()
        .flat_map(RelationalAtom::variables)
        .collect();

    for variable in query.head_variables() {
        if !bound.contains(variable) {
            return Err(Error::UnsafeHeadVariable(variable.clone()));
        }
    }
    if let Some(aggregate) = query.aggregate() {
        for variable in aggregate.variables() {
            if !bound.contains(variable) {
                return Err(Error::UnboundVariable(variable.clone()));
            }
        }
    }

    Ok(())
}

/// Generates variables that do not collide with any name of the input query.
struct FreshVariables {
    used: HashSet<String>,
    counter: usize,
}

impl FreshVariables {
    fn new(query: &Query) -> Self {
        let mut used: HashSet<String> = query
            .head_variables()
            .map(|variable| variable.name().to_string())
            .collect();
        if let Some(aggregate) = query.aggregate() {
            used.extend(aggregate.variables().map(|v| v.name().to_string()));
        }
        for atom in query.relational_atoms() {
            used.extend(atom.variables().map(|v| v.name().to_string()));
        }
        for comparison in query.comparison_atoms() {
            used.extend(comparison.variables().map(|v| v.name().to_string()));
        }

        Self { used, counter: 0 }
    }

    fn next(&mut self) -> Variable {
        loop {
            let name = format!("v{}", self.counter);
            self.counter += 1;
            if self.used.insert(name.clone()) {
                return Variable::new(name);
            }
        }
    }
}

/// Rewrite the query so that every relational atom contains only distinct
/// variables: repeated variables and embedded constants are replaced by fresh
/// variables, with the equality added to the body as a comparison atom.
fn normalize(query: &Query) -> Query {
    let mut fresh = FreshVariables::new(query);
    let mut body = Vec::new();
    let mut equalities = Vec::new();

    for atom in query.body() {
        let Atom::Relational(atom) = atom else {
            body.push(atom.clone());
            continue;
        };

        let mut seen: HashSet<Variable> = HashSet::new();
        let mut terms = Vec::new();
        for term in atom.terms() {
            match term {
                Term::Variable(variable) if seen.insert(variable.clone()) => {
                    terms.push(term.clone());
                }
                Term::Variable(variable) => {
                    let renamed = fresh.next();
                    equalities.push(ComparisonAtom::new(
                        Term::Variable(variable.clone()),
                        ComparisonOperator::Equal,
                        Term::Variable(renamed.clone()),
                    ));
                    terms.push(Term::Variable(renamed));
                }
                Term::Constant(_) => {
                    let renamed = fresh.next();
                    equalities.push(ComparisonAtom::new(
                        Term::Variable(renamed.clone()),
                        ComparisonOperator::Equal,
                        term.clone(),
                    ));
                    terms.push(Term::Variable(renamed));
                }
            }
        }
        body.push(Atom::Relational(RelationalAtom::new(
            atom.predicate(),
            terms,
        )));
    }

    body.extend(equalities.into_iter().map(Atom::Comparison));
    Query::new(query.head().clone(), query.aggregate().cloned(), body)
}

/// A comparison atom is standalone when a single relation's tuple suffices to
/// evaluate it: it has at most one variable, or one atom binds all of its
/// variables.
fn is_standalone(condition: &ComparisonAtom, atoms: &[RelationalAtom]) -> bool {
    let variables: Vec<&Variable> = condition.variables().collect();
    match variables.as_slice() {
        [] | [_] => true,
        variables => atoms.iter().any(|atom| {
            variables
                .iter()
                .all(|variable| atom.contains(&Term::Variable((*variable).clone())))
        }),
    }
}

/// Split the comparison atoms of the normalized body into per-relation
/// selections and join predicates grouped by their rightmost relation.
///
/// Standalone atoms are pushed to every leaf that binds all their variables
/// (variable-free atoms go to the first leaf, which suffices to veto the
/// whole result). Join predicates are assigned scanning the relations right
/// to left, so the predicate's other operand is always bound further left in
/// the plan.
#[allow(clippy::type_complexity)]
fn classify(
    query: &Query,
    atoms: &[RelationalAtom],
) -> Result<(Vec<Vec<ComparisonAtom>>, HashMap<usize, Vec<ComparisonAtom>>), Error> {
    let mut selections: Vec<Vec<ComparisonAtom>> = vec![Vec::new(); atoms.len()];
    let mut join_predicates: HashMap<usize, Vec<ComparisonAtom>> = HashMap::new();

    for condition in query.comparison_atoms() {
        for variable in condition.variables() {
            let term = Term::Variable(variable.clone());
            if !atoms.iter().any(|atom| atom.contains(&term)) {
                return Err(Error::UnboundVariable(variable.clone()));
            }
        }

        if is_standalone(condition, atoms) {
            let variables: Vec<&Variable> = condition.variables().collect();
            if variables.is_empty() {
                selections[0].push(condition.clone());
                continue;
            }
            for (index, atom) in atoms.iter().enumerate() {
                if variables
                    .iter()
                    .all(|variable| atom.contains(&Term::Variable((*variable).clone())))
                {
                    selections[index].push(condition.clone());
                }
            }
        } else {
            let owner = atoms.iter().enumerate().rev().find(|(_, atom)| {
                condition
                    .variables()
                    .any(|variable| atom.contains(&Term::Variable(variable.clone())))
            });
            match owner {
                Some((index, _)) => {
                    join_predicates
                        .entry(index)
                        .or_default()
                        .push(condition.clone());
                }
                None => return Err(Error::DanglingJoinPredicate(condition.clone())),
            }
        }
    }

    Ok((selections, join_predicates))
}

#[cfg(test)]
mod test {
    use crate::io::parser::parse_query;

    use super::*;

    #[test]
    fn normalization_leaves_distinct_variables() {
        let query = parse_query("Q(x) :- R(x, x, 4)").unwrap();
        let normalized = normalize(&query);

        let atom = normalized.relational_atoms().next().unwrap();
        assert!(atom.terms().iter().all(|term| !term.is_ground()));

        let variables: HashSet<&Variable> = atom.variables().collect();
        assert_eq!(variables.len(), atom.arity());

        assert_eq!(normalized.comparison_atoms().count(), 2);
        assert_eq!(
            normalized.to_string(),
            "Q(x) :- R(x, v0, v1), x = v0, v1 = 4"
        );
    }

    #[test]
    fn fresh_variables_avoid_collisions() {
        let query = parse_query("Q(v0) :- R(v0, v0)").unwrap();
        let normalized = normalize(&query);

        assert_eq!(normalized.to_string(), "Q(v0) :- R(v0, v1), v0 = v1");
    }

    #[test]
    fn untouched_queries_survive_normalization() {
        let query = parse_query("Q(x, y) :- R(x, y), S(y, z), x > 1").unwrap();
        assert_eq!(normalize(&query), query);
    }

    #[test]
    fn standalone_versus_join_classification() {
        let query = parse_query(
            "Q(a, c) :- R(a, b), S(c, d), a > 1, a = b, a < c, 1 = 1",
        )
        .unwrap();
        let atoms: Vec<RelationalAtom> = query.relational_atoms().cloned().collect();

        let (selections, join_predicates) = classify(&query, &atoms).unwrap();

        // a > 1, a = b, and 1 = 1 stay at the R-leaf; a < c joins at index 1.
        assert_eq!(selections[0].len(), 3);
        assert!(selections[1].is_empty());
        assert_eq!(join_predicates[&1].len(), 1);
        assert_eq!(join_predicates[&1][0].to_string(), "a < c");
    }

    #[test]
    fn join_predicates_attach_to_the_rightmost_operand() {
        let query = parse_query("Q(a) :- R(a), S(b), T(c), a < c, a != b").unwrap();
        let atoms: Vec<RelationalAtom> = query.relational_atoms().cloned().collect();

        let (_, join_predicates) = classify(&query, &atoms).unwrap();
        assert_eq!(join_predicates[&2][0].to_string(), "a < c");
        assert_eq!(join_predicates[&1][0].to_string(), "a != b");
    }

    #[test]
    fn unbound_comparison_variables_are_rejected() {
        let query = parse_query("Q(a) :- R(a), z > 1").unwrap();
        let atoms: Vec<RelationalAtom> = query.relational_atoms().cloned().collect();

        assert!(matches!(
            classify(&query, &atoms),
            Err(Error::UnboundVariable(variable)) if variable.name() == "z"
        ));
    }

    #[test]
    fn unsafe_heads_are_rejected() {
        let query = parse_query("Q(x, w) :- R(x, y)").unwrap();
        assert!(matches!(
            check_safety(&query),
            Err(Error::UnsafeHeadVariable(variable)) if variable.name() == "w"
        ));

        let query = parse_query("Q(SUM(w)) :- R(x, y)").unwrap();
        assert!(matches!(
            check_safety(&query),
            Err(Error::UnboundVariable(variable)) if variable.name() == "w"
        ));
    }
}
