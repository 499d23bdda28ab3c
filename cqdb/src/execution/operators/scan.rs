//! Reading the tuples of a single relation.

use crate::error::Error;
use crate::io::reader::TupleReader;
use crate::model::{RelationalAtom, RelationalSchema, Tuple};

use super::Operator;

/// The leaf of every plan: streams the data file of one relation as typed
/// tuples, labeled with the relational atom it was created for.
#[derive(Debug)]
pub struct Scan {
    /// The schema of the scanned relation.
    schema: RelationalSchema,
    /// The atom naming the columns of the produced tuples.
    atom: RelationalAtom,
    /// The underlying file reader.
    reader: TupleReader,
}

impl Scan {
    /// Construct a new [Scan] over the given relation.
    ///
    /// The atom must match the arity declared by the schema.
    pub fn new(schema: RelationalSchema, atom: RelationalAtom) -> Result<Self, Error> {
        if atom.arity() != schema.arity() {
            return Err(Error::AtomArity {
                atom,
                relation: schema.name().to_string(),
                expected: schema.arity(),
            });
        }

        let reader = TupleReader::open(&schema)?;
        Ok(Self {
            schema,
            atom,
            reader,
        })
    }

    /// Return the atom this scan is labeled with.
    pub fn relational_atom(&self) -> &RelationalAtom {
        &self.atom
    }
}

impl Operator for Scan {
    fn next(&mut self) -> Result<Option<Tuple>, Error> {
        self.reader.next_tuple()
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.reader = TupleReader::open(&self.schema)?;
        Ok(())
    }
}
