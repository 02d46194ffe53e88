//! Header rows: declared column types and names

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{HeaderRow, RowRef};
use crate::schema::{FieldKind, Schema};
use crate::{CsvRecordError, Result};

/// Declared type token from the first header row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Float,
    String,
    Array1,
    Array2,
    /// Any other token; never matches a field kind
    Other(String),
}

impl ColumnType {
    /// Tokens are matched exactly, without trimming or case folding
    pub fn parse(token: &str) -> Self {
        match token {
            "int" => ColumnType::Int,
            "float" => ColumnType::Float,
            "string" => ColumnType::String,
            "array1" => ColumnType::Array1,
            "array2" => ColumnType::Array2,
            other => ColumnType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Array1 => "array1",
            ColumnType::Array2 => "array2",
            ColumnType::Other(token) => token,
        }
    }

    /// Whether cells of this column are coerced into a field of `kind`
    pub fn accepts(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (ColumnType::Int, FieldKind::Int(_))
                | (ColumnType::Float, FieldKind::Float(_))
                | (ColumnType::String, FieldKind::String)
                | (ColumnType::Array1, FieldKind::Array1(_))
                | (ColumnType::Array2, FieldKind::Array2(_))
        )
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a schema field's cells come from, resolved once per load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub column: usize,
    pub column_type: ColumnType,
}

/// The two header rows of a table file
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    types: Vec<ColumnType>,
    names: Vec<String>,
    columns: IndexMap<String, usize>,
}

impl HeaderInfo {
    pub fn from_rows(types: Vec<String>, names: Vec<String>) -> Result<Self> {
        if types.len() != names.len() {
            return Err(CsvRecordError::ColumnCountMismatch {
                row: RowRef::Header(HeaderRow::Names),
                expected: types.len(),
                found: names.len(),
            });
        }

        // A repeated column name resolves to its last occurrence
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            types: types.iter().map(|t| ColumnType::parse(t)).collect(),
            names,
            columns,
        })
    }

    /// Number of columns every data row must have
    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Resolve every schema field to a column, in schema order
    pub fn bind(&self, schema: &Schema) -> Result<Vec<ColumnBinding>> {
        schema
            .fields()
            .iter()
            .map(|field| {
                let column = self
                    .column(&field.name)
                    .ok_or_else(|| CsvRecordError::UnknownColumn(field.name.clone()))?;
                let column_type = self.types[column].clone();

                if column_type.accepts(field.kind) {
                    debug!(field = %field.name, column, kind = %field.kind, "bound column");
                } else {
                    warn!(
                        field = %field.name,
                        column,
                        kind = %field.kind,
                        declared = %column_type,
                        "column type does not match field kind; field keeps its default"
                    );
                }

                Ok(ColumnBinding {
                    column,
                    column_type,
                })
            })
            .collect()
    }
}
