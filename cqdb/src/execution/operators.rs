//! The pipelined operators that make up a query plan.
//!
//! A plan is a left-deep tree of operators pulled from the root: every call
//! to [Operator::next] produces one tuple or signals the end of the stream.
//! All operators stream, except [Project] (which buffers the set of tuples it
//! has emitted) and [SumAggregate] (which must consume its entire input
//! before producing anything).

pub mod join;
pub mod project;
pub mod scan;
pub mod select;
pub mod sum_aggregate;

use std::fmt::Debug;
use std::io::Write;

pub use join::Join;
pub use project::Project;
pub use scan::Scan;
pub use select::Select;
pub use sum_aggregate::SumAggregate;

use crate::error::Error;
use crate::model::Tuple;

/// The pull interface shared by all operators.
pub trait Operator: Debug {
    /// Return the next tuple of the output stream, or `None` at its end.
    ///
    /// After the end of the stream every further call keeps returning `None`
    /// until [Operator::reset] is called.
    fn next(&mut self) -> Result<Option<Tuple>, Error>;

    /// Restore the operator and all its children to their initial state.
    fn reset(&mut self) -> Result<(), Error>;

    /// Drain the stream into `sink`, one formatted tuple per line, and return
    /// the number of lines written.
    fn dump(&mut self, sink: &mut dyn Write) -> Result<u64, Error> {
        let mut count = 0;
        while let Some(tuple) = self.next()? {
            writeln!(sink, "{tuple}")?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;

    /// An operator that replays a fixed sequence of tuples, for tests.
    #[derive(Debug)]
    pub(crate) struct Fixture {
        tuples: Vec<Tuple>,
        cursor: usize,
    }

    impl Fixture {
        pub(crate) fn new(tuples: Vec<Tuple>) -> Self {
            Self { tuples, cursor: 0 }
        }
    }

    impl Operator for Fixture {
        fn next(&mut self) -> Result<Option<Tuple>, Error> {
            let tuple = self.tuples.get(self.cursor).cloned();
            if tuple.is_some() {
                self.cursor += 1;
            }
            Ok(tuple)
        }

        fn reset(&mut self) -> Result<(), Error> {
            self.cursor = 0;
            Ok(())
        }
    }
}
