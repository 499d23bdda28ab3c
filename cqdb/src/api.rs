//! Convenience functions for the two file-based entry points: query
//! minimization and query evaluation.

use std::fs::read_to_string;
use std::io::Write;
use std::path::Path;

use crate::error::Error;
use crate::execution::plan;
use crate::io::catalog::Catalog;
use crate::io::parser::parse_query;
use crate::io::writer::ResultWriter;
use crate::minimization::{is_plain_conjunctive, minimize};
use crate::model::Query;

/// Read a query from the given file.
fn read_query(path: &Path) -> Result<Query, Error> {
    let content = read_to_string(path).map_err(|error| Error::IoReading {
        error,
        filename: path.display().to_string(),
    })?;
    Ok(parse_query(&content)?)
}

/// Read a conjunctive query from `input`, minimize it, and write the result
/// to `output` in the same textual form.
pub fn minimize_query_file(input: &Path, output: &Path) -> Result<(), Error> {
    let query = read_query(input)?;
    log::info!("minimizing {query}");
    if !is_plain_conjunctive(&query) {
        log::warn!("query body contains comparison atoms; they are preserved unchanged");
    }

    let minimized = minimize(&query);
    log::info!(
        "minimized body from {} to {} atoms",
        query.body().len(),
        minimized.body().len()
    );

    let mut writer = ResultWriter::create(output)?;
    writeln!(writer, "{minimized}")?;
    writer.finish()
}

/// Evaluate the query in `query_path` against the database directory and
/// write the result tuples to `output`, returning how many lines were
/// written.
pub fn evaluate_query_file(
    database: &Path,
    query_path: &Path,
    output: &Path,
) -> Result<u64, Error> {
    let catalog = Catalog::load(database)?;
    log::info!("loaded {} relation schemas", catalog.len());

    let query = read_query(query_path)?;
    log::info!("evaluating {query}");

    let mut root = plan(&query, &catalog)?;

    let mut writer = ResultWriter::create(output)?;
    let count = root.dump(&mut writer)?;
    writer.finish()?;

    log::info!("wrote {count} result tuples");
    Ok(count)
}
