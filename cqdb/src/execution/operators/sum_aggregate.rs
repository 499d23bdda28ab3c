//! Grouped sums of products over the query result.

use std::collections::HashMap;
use std::io::Write;

use crate::error::Error;
use crate::execution::bindings::{project_tuple, resolve_term};
use crate::model::{Constant, RelationalAtom, Term, Tuple};

use super::Operator;

/// Computes, for every group defined by the head terms, the sum over all
/// result tuples of the product of the aggregate terms.
///
/// Fully blocking: the entire child stream is consumed into the accumulator
/// before anything is written. Sums use checked 64-bit arithmetic; overflow
/// aborts the query.
#[derive(Debug)]
pub struct SumAggregate {
    /// The atoms naming the columns of the child tuples.
    atoms: Vec<RelationalAtom>,
    /// The group-by terms (the plain head terms).
    group_terms: Vec<Term>,
    /// The factors of the aggregated product.
    product_terms: Vec<Term>,
    /// The operator producing the tuples to aggregate.
    child: Box<dyn Operator>,
    /// The running sum per group key.
    sums: HashMap<Tuple, i64>,
    /// Whether the child stream has been consumed.
    aggregated: bool,
}

impl SumAggregate {
    /// Construct a new [SumAggregate].
    ///
    /// Group-by variables must be bound by the labeling atoms; every product
    /// term must be a bound variable or an integer constant.
    pub fn new(
        atoms: Vec<RelationalAtom>,
        group_terms: Vec<Term>,
        product_terms: Vec<Term>,
        child: Box<dyn Operator>,
    ) -> Result<Self, Error> {
        for term in group_terms.iter().chain(&product_terms) {
            if let Term::Variable(variable) = term {
                if !atoms.iter().any(|atom| atom.contains(term)) {
                    return Err(Error::UnboundVariable(variable.clone()));
                }
            }
        }
        if let Some(term) = product_terms
            .iter()
            .find(|term| matches!(term, Term::Constant(Constant::String(_))))
        {
            return Err(Error::MalformedProductTerm(term.clone()));
        }

        Ok(Self {
            atoms,
            group_terms,
            product_terms,
            child,
            sums: HashMap::new(),
            aggregated: false,
        })
    }

    /// Consume the child stream into the accumulator.
    fn aggregate(&mut self) -> Result<(), Error> {
        if self.aggregated {
            return Ok(());
        }

        if self.group_terms.is_empty() {
            // A query without group-by terms has exactly one group, which
            // sums to zero over an empty input.
            self.sums.insert(Tuple::empty(), 0);
        }

        while let Some(tuple) = self.child.next()? {
            let key = if self.group_terms.is_empty() {
                Tuple::empty()
            } else {
                project_tuple(&tuple, &self.atoms, &self.group_terms)?
            };
            let delta = self.product(&tuple)?;

            let sum = self.sums.entry(key).or_insert(0);
            *sum = sum.checked_add(delta).ok_or(Error::AggregateOverflow)?;
        }

        self.aggregated = true;
        Ok(())
    }

    /// Compute the product of the aggregate terms under the given tuple.
    fn product(&self, tuple: &Tuple) -> Result<i64, Error> {
        let mut product: i64 = 1;
        for term in &self.product_terms {
            let value = match resolve_term(term, tuple, &self.atoms)? {
                Constant::Integer(value) => value,
                other => return Err(Error::NonIntegerValue(other)),
            };
            product = product
                .checked_mul(value)
                .ok_or(Error::AggregateOverflow)?;
        }
        Ok(product)
    }
}

impl Operator for SumAggregate {
    /// Consumes the entire child stream into the accumulator and reports the
    /// end of the stream; the aggregated groups are written by
    /// [SumAggregate::dump].
    fn next(&mut self) -> Result<Option<Tuple>, Error> {
        self.aggregate()?;
        Ok(None)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.child.reset()?;
        self.sums.clear();
        self.aggregated = false;
        Ok(())
    }

    /// Writes one line per group: the group tuple followed by its sum, or the
    /// bare sum when there are no group-by terms. Emission order over groups
    /// is unspecified.
    fn dump(&mut self, sink: &mut dyn Write) -> Result<u64, Error> {
        self.aggregate()?;

        let mut count = 0;
        for (key, sum) in &self.sums {
            if key.is_empty() {
                writeln!(sink, "{sum}")?;
            } else {
                writeln!(sink, "{key}, {sum}")?;
            }
            count += 1;
        }
        Ok(count)
    }
}
