//! Core computation for conjunctive queries.
//!
//! A conjunctive query is minimized by repeatedly removing a body atom and
//! checking whether a homomorphism from the original body into the reduced
//! body exists that fixes the head variables. The result is the *core* of the
//! query, which is unique up to variable renaming.

pub mod homomorphism;

use crate::model::{Atom, Query};

use homomorphism::exists_homomorphism;

/// Compute the core of the given conjunctive query.
///
/// Body atoms are tried for removal in input order; after every successful
/// removal the pass restarts on the reduced query. The loop ends when no atom
/// of the current body can be removed, after at most `|body|` passes.
/// Comparison atoms are left untouched.
pub fn minimize(query: &Query) -> Query {
    let mut current = query.clone();

    loop {
        let candidate = current.body().iter().enumerate().find_map(|(index, atom)| {
            let removed = atom.as_relational()?;

            let mut body = current.body().to_vec();
            body.remove(index);
            let reduced = Query::new(current.head().clone(), current.aggregate().cloned(), body);

            exists_homomorphism(&current, &reduced, removed).then_some(reduced)
        });

        match candidate {
            Some(reduced) => {
                log::debug!(
                    "reduced query to {} body atoms",
                    reduced.body().len()
                );
                current = reduced;
            }
            None => return current,
        }
    }
}

/// Return `true` if the body consists of relational atoms only.
///
/// Minimization inputs are expected to be plain conjunctive queries; this
/// check lets callers reject comparison atoms up front.
pub fn is_plain_conjunctive(query: &Query) -> bool {
    query
        .body()
        .iter()
        .all(|atom| matches!(atom, Atom::Relational(_)))
}

#[cfg(test)]
mod test {
    use test_log::test;

    use crate::io::parser::parse_query;

    use super::*;

    fn minimized(input: &str) -> String {
        minimize(&parse_query(input).unwrap()).to_string()
    }

    #[test]
    fn collapses_duplicate_branch() {
        // The y- and z-branches are interchangeable, the first folds away.
        assert_eq!(minimized("Q(x) :- R(x, y), R(x, z)"), "Q(x) :- R(x, z)");
    }

    #[test]
    fn keeps_join_path() {
        assert_eq!(
            minimized("Q(x, y) :- R(x, y), R(y, z)"),
            "Q(x, y) :- R(x, y), R(y, z)"
        );
    }

    #[test]
    fn folds_constant_instance() {
        // R(x, 5) maps into R(4, 5) only if x is not distinguished.
        assert_eq!(minimized("Q(z) :- R(4, 5), R(x, 5), S(z)"), "Q(z) :- R(4, 5), S(z)");
        assert_eq!(
            minimized("Q(x) :- R(4, 5), R(x, 5), S(x)"),
            "Q(x) :- R(4, 5), R(x, 5), S(x)"
        );
    }

    #[test]
    fn removes_exact_duplicates() {
        assert_eq!(
            minimized("Q(x) :- R(x, y), R(x, y), R(x, y)"),
            "Q(x) :- R(x, y)"
        );
    }

    #[test]
    fn chain_folds_onto_distinguished_edge() {
        // Every R-atom maps onto R(x, y) once w and z collapse onto y.
        assert_eq!(
            minimized("Q(x, y) :- R(x, y), R(x, z), R(x, w)"),
            "Q(x, y) :- R(x, y)"
        );
    }

    #[test]
    fn minimization_is_idempotent() {
        for input in [
            "Q(x) :- R(x, y), R(x, z)",
            "Q(x, y) :- R(x, y), R(y, z)",
            "Q(x) :- R(x, x), R(x, y), S(y, z), S(y, w)",
        ] {
            let once = minimize(&parse_query(input).unwrap());
            let twice = minimize(&once);
            assert_eq!(once, twice, "minimize is not idempotent on {input}");
        }
    }

    #[test]
    fn body_never_shrinks_below_one_atom() {
        assert_eq!(minimized("Q(x) :- R(x, x)"), "Q(x) :- R(x, x)");
        assert_eq!(minimized("Q() :- R(a, b)"), "Q() :- R(a, b)");
    }

    #[test]
    fn plain_conjunctive_detection() {
        assert!(is_plain_conjunctive(
            &parse_query("Q(x) :- R(x, y)").unwrap()
        ));
        assert!(!is_plain_conjunctive(
            &parse_query("Q(x) :- R(x, y), x > 2").unwrap()
        ));
    }
}
