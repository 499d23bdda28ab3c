//! The schema catalog of an on-disk database.
//!
//! A database directory contains a `schema.txt` with one relation per line
//! (`<name> <type>...`, types `int` or `string`) and the relation data under
//! `files/<name>.csv`.

use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

use crate::error::Error;
use crate::model::{ColumnType, RelationalSchema};

/// The name of the schema file inside a database directory.
const SCHEMA_FILE: &str = "schema.txt";
/// The subdirectory holding the relation data files.
const DATA_DIRECTORY: &str = "files";

/// Maps each relation name to its [RelationalSchema].
///
/// The catalog is immutable after loading and shared by reference with every
/// scan the planner constructs.
#[derive(Debug, Clone)]
pub struct Catalog {
    schemas: HashMap<String, RelationalSchema>,
}

impl Catalog {
    /// Load the catalog of the database at the given directory.
    pub fn load(database_directory: &Path) -> Result<Self, Error> {
        let schema_path = database_directory.join(SCHEMA_FILE);
        let content = read_to_string(&schema_path).map_err(|error| Error::IoReading {
            error,
            filename: schema_path.display().to_string(),
        })?;

        let mut schemas = HashMap::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let name = fields.next().ok_or(Error::SchemaFormat {
                filename: schema_path.display().to_string(),
                line: index + 1,
            })?;

            let column_types = fields
                .map(|keyword| {
                    ColumnType::from_keyword(keyword)
                        .ok_or_else(|| Error::UnknownColumnType(keyword.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            if column_types.is_empty() {
                return Err(Error::SchemaFormat {
                    filename: schema_path.display().to_string(),
                    line: index + 1,
                });
            }

            let source = database_directory
                .join(DATA_DIRECTORY)
                .join(format!("{name}.csv"));

            log::debug!(
                "declared relation {name} with {} columns at {}",
                column_types.len(),
                source.display()
            );
            schemas.insert(
                name.to_string(),
                RelationalSchema::new(name, column_types, source),
            );
        }

        Ok(Self { schemas })
    }

    /// Return the schema of the given relation.
    pub fn schema(&self, relation: &str) -> Result<&RelationalSchema, Error> {
        self.schemas
            .get(relation)
            .ok_or_else(|| Error::UnknownRelation(relation.to_string()))
    }

    /// Return the number of declared relations.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Return `true` if no relations are declared.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn database(schema: &str) -> TempDir {
        let directory = TempDir::new().unwrap();
        fs::write(directory.path().join(SCHEMA_FILE), schema).unwrap();
        directory
    }

    #[test]
    fn loads_declared_relations() {
        let directory = database("R int int\nS string int\n");
        let catalog = Catalog::load(directory.path()).unwrap();

        assert_eq!(catalog.len(), 2);

        let schema = catalog.schema("S").unwrap();
        assert_eq!(
            schema.column_types(),
            &[ColumnType::String, ColumnType::Integer]
        );
        assert!(schema.source().ends_with("files/S.csv"));

        assert!(matches!(
            catalog.schema("T"),
            Err(Error::UnknownRelation(name)) if name == "T"
        ));
    }

    #[test]
    fn rejects_unknown_types() {
        let directory = database("R int float\n");
        assert!(matches!(
            Catalog::load(directory.path()),
            Err(Error::UnknownColumnType(keyword)) if keyword == "float"
        ));
    }

    #[test]
    fn rejects_columnless_relations() {
        let directory = database("R\n");
        assert!(matches!(
            Catalog::load(directory.path()),
            Err(Error::SchemaFormat { line: 1, .. })
        ));
    }

    #[test]
    fn missing_schema_file() {
        let directory = TempDir::new().unwrap();
        assert!(matches!(
            Catalog::load(directory.path()),
            Err(Error::IoReading { .. })
        ));
    }
}
