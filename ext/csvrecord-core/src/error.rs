use std::path::PathBuf;

use thiserror::Error;

use crate::value::IndexKey;

/// Which of the two leading header rows a structural error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRow {
    /// First row: declared type per column
    Types,
    /// Second row: declared name per column
    Names,
}

impl std::fmt::Display for HeaderRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderRow::Types => write!(f, "type header"),
            HeaderRow::Names => write!(f, "name header"),
        }
    }
}

/// Failure to coerce a single cell into its field's kind
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// Text is not an integer literal in any accepted base
    #[error("invalid integer literal {text:?}")]
    InvalidInt { text: String },

    /// Integer literal does not fit the field's bit width
    #[error("integer {text:?} out of range for {bits}-bit field")]
    IntOutOfRange { text: String, bits: u32 },

    /// Text is not a floating point literal
    #[error("invalid float literal {text:?}: {source}")]
    InvalidFloat {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Finite literal overflows the field's precision
    #[error("float {text:?} out of range for {bits}-bit field")]
    FloatOutOfRange { text: String, bits: u32 },
}

/// Core error type for schema building and table loading
#[derive(Error, Debug)]
pub enum CsvRecordError {
    /// File could not be opened or read
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tokenizer failures (malformed quoting, invalid UTF-8, read errors)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Field kind outside int / float / string / array1 / array2
    #[error("Unsupported field kind for '{field}': {kind}")]
    UnsupportedFieldKind { field: String, kind: String },

    /// Multi-valued field marked for indexing
    #[error("Field '{field}' of kind {kind} cannot be indexed")]
    NonIndexableFieldKind { field: String, kind: String },

    /// Same field name declared twice
    #[error("Field '{0}' declared more than once")]
    DuplicateField(String),

    /// File ended before both header rows were read
    #[error("Missing {0} row")]
    MissingHeaderRow(HeaderRow),

    /// Schema field with no matching column in the name header
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Row width differs from the header width
    #[error("Column count mismatch at {row}: expected {expected}, found {found}")]
    ColumnCountMismatch {
        row: RowRef,
        expected: usize,
        found: usize,
    },

    /// Cell could not be coerced into its field
    #[error("Parse field (row={row}, field={field}) error: {source}")]
    CoercionFailed {
        row: usize,
        field: String,
        #[source]
        source: CoercionError,
    },

    /// Indexed field repeated a key seen on an earlier row
    #[error("Duplicate index key {key} (row={row}, field={field})")]
    DuplicateIndexKey {
        row: usize,
        field: String,
        key: IndexKey,
    },

    /// Positional access past the end of the store
    #[error("Record index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Decoded value does not fit the record's Rust field
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Internal errors that shouldn't happen
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Location of a row within the file, for structural errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Header(HeaderRow),
    /// 0-based data row
    Data(usize),
}

impl std::fmt::Display for RowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowRef::Header(header) => write!(f, "{}", header),
            RowRef::Data(row) => write!(f, "row {}", row),
        }
    }
}

/// Result type alias for csvrecord operations
pub type Result<T> = std::result::Result<T, CsvRecordError>;

impl CsvRecordError {
    /// Create an IO error tied to a path
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        CsvRecordError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        CsvRecordError::Conversion(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        CsvRecordError::Internal(msg.into())
    }

    /// Attach `path` to a tokenizer error caused by a failed read
    pub fn with_path<P: Into<PathBuf>>(self, path: P) -> Self {
        match self {
            CsvRecordError::Csv(err) if err.is_io_error() => match err.into_kind() {
                csv::ErrorKind::Io(source) => CsvRecordError::io(path, source),
                kind => CsvRecordError::internal(format!("unexpected tokenizer error: {:?}", kind)),
            },
            other => other,
        }
    }

    /// Data row the error was raised on, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            CsvRecordError::CoercionFailed { row, .. }
            | CsvRecordError::DuplicateIndexKey { row, .. } => Some(*row),
            CsvRecordError::ColumnCountMismatch {
                row: RowRef::Data(row),
                ..
            } => Some(*row),
            _ => None,
        }
    }

    /// Field name the error was raised for, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CsvRecordError::CoercionFailed { field, .. }
            | CsvRecordError::DuplicateIndexKey { field, .. }
            | CsvRecordError::UnsupportedFieldKind { field, .. }
            | CsvRecordError::NonIndexableFieldKind { field, .. } => Some(field),
            CsvRecordError::UnknownColumn(field) | CsvRecordError::DuplicateField(field) => {
                Some(field)
            }
            _ => None,
        }
    }
}

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, ctx: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<CsvRecordError>,
{
    fn context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            CsvRecordError::Conversion(format!("{}: {}", ctx.into(), base_error))
        })
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            CsvRecordError::Conversion(format!("{}: {}", f().into(), base_error))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CsvRecordError::conversion("Cannot convert value");
        assert_eq!(err.to_string(), "Conversion error: Cannot convert value");

        let err = CsvRecordError::MissingHeaderRow(HeaderRow::Names);
        assert_eq!(err.to_string(), "Missing name header row");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = CsvRecordError::io("missing.csv", io_err);
        assert!(err.to_string().contains("IO error on 'missing.csv'"));
    }

    #[test]
    fn test_read_failure_gets_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Interrupted, "read failed");
        let err = CsvRecordError::from(csv::Error::from(io_err)).with_path("table.tsv");
        match err {
            CsvRecordError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("table.tsv"));
                assert_eq!(source.kind(), std::io::ErrorKind::Interrupted);
            }
            other => panic!("Expected IO error, got {}", other),
        }

        let err = CsvRecordError::UnknownColumn("id".to_string()).with_path("table.tsv");
        assert!(matches!(err, CsvRecordError::UnknownColumn(_)));
    }

    #[test]
    fn test_coercion_error_reports_row_and_field() {
        let err = CsvRecordError::CoercionFailed {
            row: 2,
            field: "height".to_string(),
            source: CoercionError::InvalidInt {
                text: "abc".to_string(),
            },
        };
        assert_eq!(err.row(), Some(2));
        assert_eq!(err.field(), Some("height"));
        assert!(err.to_string().contains("row=2, field=height"));
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = CsvRecordError::DuplicateIndexKey {
            row: 1,
            field: "id".to_string(),
            key: IndexKey::Int(1001),
        };
        assert_eq!(err.to_string(), "Duplicate index key 1001 (row=1, field=id)");
    }

    #[test]
    fn test_error_with_context() {
        fn failing_operation() -> Result<()> {
            Err(CsvRecordError::internal("bad state"))
        }

        let filename = "table.tsv";
        let result = failing_operation().with_context(|| format!("Processing file: {}", filename));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Processing file: table.tsv"));

        let parsed: std::result::Result<i32, CoercionError> = Err(CoercionError::InvalidInt {
            text: "x".to_string(),
        });
        let err = parsed.map_err(|e| CsvRecordError::conversion(e.to_string())).context("cell 3");
        assert_eq!(
            err.unwrap_err().to_string(),
            "Conversion error: cell 3: Conversion error: invalid integer literal \"x\""
        );
    }
}
