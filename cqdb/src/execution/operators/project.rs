//! Projection onto the head terms.

use std::collections::HashSet;

use crate::error::Error;
use crate::execution::bindings::project_tuple;
use crate::model::{RelationalAtom, Term, Tuple};

use super::Operator;

/// Projects each child tuple onto the head terms and deduplicates the
/// result, since the answer to a conjunctive query is a set.
///
/// The operator is blocking in the sense that it remembers every tuple it
/// has emitted for the lifetime of the run; distinct tuples still stream out
/// in first-occurrence order.
#[derive(Debug)]
pub struct Project {
    /// The atoms naming the columns of the child tuples.
    atoms: Vec<RelationalAtom>,
    /// The output terms.
    head_terms: Vec<Term>,
    /// The operator producing the tuples to project.
    child: Box<dyn Operator>,
    /// All tuples emitted so far.
    emitted: HashSet<Tuple>,
}

impl Project {
    /// Construct a new [Project].
    ///
    /// Every projected variable must be bound by one of the labeling atoms.
    pub fn new(
        atoms: Vec<RelationalAtom>,
        head_terms: Vec<Term>,
        child: Box<dyn Operator>,
    ) -> Result<Self, Error> {
        for term in &head_terms {
            if let Term::Variable(variable) = term {
                if !atoms.iter().any(|atom| atom.contains(term)) {
                    return Err(Error::UnboundVariable(variable.clone()));
                }
            }
        }

        Ok(Self {
            atoms,
            head_terms,
            child,
            emitted: HashSet::new(),
        })
    }
}

impl Operator for Project {
    fn next(&mut self) -> Result<Option<Tuple>, Error> {
        while let Some(tuple) = self.child.next()? {
            let projected = project_tuple(&tuple, &self.atoms, &self.head_terms)?;
            if self.emitted.insert(projected.clone()) {
                return Ok(Some(projected));
            }
        }
        Ok(None)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.child.reset()?;
        self.emitted.clear();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::execution::operators::fixture::Fixture;
    use crate::model::{Constant, Variable};

    use super::*;

    fn atoms() -> Vec<RelationalAtom> {
        vec![RelationalAtom::new(
            "R",
            vec![
                Term::Variable(Variable::new("a")),
                Term::Variable(Variable::new("b")),
            ],
        )]
    }

    fn rows() -> Box<dyn Operator> {
        let row = |a: &str, b| {
            Tuple::new(vec![
                Constant::String(a.to_string()),
                Constant::Integer(b),
            ])
        };
        Box::new(Fixture::new(vec![
            row("x", 1),
            row("x", 2),
            row("y", 3),
            row("x", 4),
        ]))
    }

    #[test]
    fn deduplicates_in_first_occurrence_order() {
        let mut project = Project::new(
            atoms(),
            vec![Term::Variable(Variable::new("a"))],
            rows(),
        )
        .unwrap();

        let mut results = Vec::new();
        while let Some(tuple) = project.next().unwrap() {
            results.push(tuple.to_string());
        }
        assert_eq!(results, vec!["x", "y"]);
    }

    #[test]
    fn constants_pass_through() {
        let mut project = Project::new(
            atoms(),
            vec![
                Term::Constant(Constant::Integer(0)),
                Term::Variable(Variable::new("b")),
            ],
            rows(),
        )
        .unwrap();

        assert_eq!(project.next().unwrap().unwrap().to_string(), "0, 1");
    }

    #[test]
    fn reset_forgets_emitted_tuples() {
        let mut project = Project::new(
            atoms(),
            vec![Term::Variable(Variable::new("a"))],
            rows(),
        )
        .unwrap();

        while project.next().unwrap().is_some() {}
        project.reset().unwrap();

        assert_eq!(project.next().unwrap().unwrap().to_string(), "x");
    }

    #[test]
    fn unbound_head_variables_are_rejected() {
        assert!(matches!(
            Project::new(atoms(), vec![Term::Variable(Variable::new("z"))], rows()),
            Err(Error::UnboundVariable(variable)) if variable.name() == "z"
        ));
    }
}
