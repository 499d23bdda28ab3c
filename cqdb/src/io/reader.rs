//! Streaming csv input for relation data files.

use std::fs::File;

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};

use crate::error::Error;
use crate::model::{ColumnType, Constant, RelationalSchema, Tuple};

/// Reads the data file of a single relation as a stream of typed tuples.
///
/// Fields are separated by commas with surrounding whitespace trimmed;
/// string fields carry a single pair of `'` quotes on disk which are
/// stripped on parse. Every row must match the arity of the schema.
pub struct TupleReader {
    /// The relation name, used in error reports.
    relation: String,
    /// The column types, in column order.
    column_types: Vec<ColumnType>,
    /// The underlying csv record stream.
    records: StringRecordsIntoIter<File>,
    /// One-based number of the last row read.
    row: u64,
}

impl TupleReader {
    /// Open the data file of the given schema.
    pub fn open(schema: &RelationalSchema) -> Result<Self, Error> {
        let file = File::open(schema.source()).map_err(|error| Error::IoReading {
            error,
            filename: schema.source().display().to_string(),
        })?;

        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(file);

        log::debug!(
            "scanning relation {} from {}",
            schema.name(),
            schema.source().display()
        );

        Ok(Self {
            relation: schema.name().to_string(),
            column_types: schema.column_types().to_vec(),
            records: reader.into_records(),
            row: 0,
        })
    }

    /// Read the next tuple, or `None` at the end of the file.
    pub fn next_tuple(&mut self) -> Result<Option<Tuple>, Error> {
        let Some(record) = self.records.next() else {
            return Ok(None);
        };
        let record = record?;
        self.row += 1;

        if record.len() != self.column_types.len() {
            return Err(Error::TupleArity {
                relation: self.relation.clone(),
                row: self.row,
                expected: self.column_types.len(),
                found: record.len(),
            });
        }

        let constants = record
            .iter()
            .zip(&self.column_types)
            .map(|(field, column_type)| self.parse_field(field, *column_type))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Tuple::new(constants)))
    }

    /// Parse a single field according to its column type.
    fn parse_field(&self, field: &str, column_type: ColumnType) -> Result<Constant, Error> {
        match column_type {
            ColumnType::Integer => {
                field
                    .parse()
                    .map(Constant::Integer)
                    .map_err(|_| Error::IntegerField {
                        relation: self.relation.clone(),
                        field: field.to_string(),
                    })
            }
            ColumnType::String => Ok(Constant::String(strip_quotes(field).to_string())),
        }
    }
}

impl std::fmt::Debug for TupleReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TupleReader")
            .field("relation", &self.relation)
            .field("column_types", &self.column_types)
            .field("row", &self.row)
            .finish_non_exhaustive()
    }
}

/// Strip a single pair of surrounding `'` quotes, if present.
fn strip_quotes(field: &str) -> &str {
    field
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(field)
}
