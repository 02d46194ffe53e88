//! Table file loading

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::decoder::RecordDecoder;
use crate::error::HeaderRow;
use crate::header::HeaderInfo;
use crate::schema::Schema;
use crate::store::RecordStore;
use crate::traits::CsvRecord;
use crate::{CsvRecordError, Result};

// Default configuration constants
const DEFAULT_DELIMITER: u8 = b'\t';
const DEFAULT_COMMENT: u8 = b'#';

/// Environment variable overriding the default field separator
pub const DELIMITER_ENV: &str = "CSVRECORD_DELIMITER";
/// Environment variable overriding the default comment prefix
pub const COMMENT_ENV: &str = "CSVRECORD_COMMENT";

/// Tokenizer settings for one load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Field separator
    pub delimiter: u8,
    /// Lines starting with this byte are skipped
    pub comment: Option<u8>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            comment: Some(DEFAULT_COMMENT),
        }
    }
}

impl LoadOptions {
    /// Create options with the default settings (tab separated, `#` comments)
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `CSVRECORD_DELIMITER` / `CSVRECORD_COMMENT`.
    ///
    /// Each variable holds a single ASCII character or `tab`; the comment
    /// variable also accepts `none`. Invalid values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut options = Self::default();

        if let Some(raw) = lookup(DELIMITER_ENV) {
            match parse_setting(&raw) {
                Some(Some(delimiter)) => options.delimiter = delimiter,
                _ => warn!(var = DELIMITER_ENV, value = %raw, "ignoring invalid delimiter"),
            }
        }

        if let Some(raw) = lookup(COMMENT_ENV) {
            match parse_setting(&raw) {
                Some(comment) => options.comment = comment,
                None => warn!(var = COMMENT_ENV, value = %raw, "ignoring invalid comment prefix"),
            }
        }

        options
    }

    /// Set the field separator
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the comment line prefix
    pub fn with_comment(mut self, comment: u8) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Treat no line as a comment
    pub fn without_comment(mut self) -> Self {
        self.comment = None;
        self
    }
}

// Some(None) means "disabled"
fn parse_setting(raw: &str) -> Option<Option<u8>> {
    match raw {
        "tab" | "\\t" => Some(Some(b'\t')),
        "none" => Some(None),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'\n' && *byte != b'\r' => Some(Some(*byte)),
            _ => None,
        },
    }
}

/// Loads table files into [`RecordStore`]s of one record type
#[derive(Debug)]
pub struct Loader<R> {
    schema: Arc<Schema>,
    options: LoadOptions,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Loader<R> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            options: self.options,
            _record: PhantomData,
        }
    }
}

impl<R: CsvRecord> Loader<R> {
    /// Build the record type's schema. Fails before any file is touched if
    /// the record declares an unsupported or non-indexable field.
    pub fn new(options: LoadOptions) -> Result<Self> {
        Ok(Self {
            schema: Arc::new(Schema::of::<R>()?),
            options,
            _record: PhantomData,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load and decode a whole file
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<RecordStore<R>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CsvRecordError::io(path, e))?;
        let store = self.load_reader(file).map_err(|e| e.with_path(path))?;

        info!(
            path = %path.display(),
            records = store.len(),
            indexes = store.indexed_fields().count(),
            "loaded table"
        );
        Ok(store)
    }

    /// Load and decode a whole table from any byte source
    pub fn load_reader<Rd: Read>(&self, reader: Rd) -> Result<RecordStore<R>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .comment(self.options.comment)
            .from_reader(reader);
        let mut rows = csv_reader.records();

        let types = next_header(&mut rows, HeaderRow::Types)?;
        let names = next_header(&mut rows, HeaderRow::Names)?;
        let header = HeaderInfo::from_rows(types, names)?;
        debug!(columns = header.width(), "read header rows");

        let mut decoder = RecordDecoder::<R>::new(&self.schema, &header)?;
        for row in rows {
            decoder.push_row(&row?)?;
        }

        let (records, indexes) = decoder.finish();
        Ok(RecordStore::new(self.schema.clone(), records, indexes))
    }
}

fn next_header<I>(rows: &mut I, which: HeaderRow) -> Result<Vec<String>>
where
    I: Iterator<Item = csv::Result<StringRecord>>,
{
    match rows.next() {
        Some(row) => Ok(row?.iter().map(str::to_string).collect()),
        None => Err(CsvRecordError::MissingHeaderRow(which)),
    }
}

/// Validate a record type's declared fields
pub fn build_schema<R: CsvRecord>() -> Result<Schema> {
    Schema::of::<R>()
}

/// Load a file with a one-off loader
pub fn load<R: CsvRecord, P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<RecordStore<R>> {
    Loader::<R>::new(options)?.load_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    crate::csv_record! {
        #[derive(Debug, Default)]
        struct Pair {
            #[index] key: String,
            value: i64,
        }
    }

    #[test]
    fn test_default_options() {
        let loader = Loader::<Pair>::new(LoadOptions::default()).unwrap();
        assert_eq!(loader.options(), &LoadOptions::default());

        let options = LoadOptions::default();
        assert_eq!(options.delimiter, b'\t');
        assert_eq!(options.comment, Some(b'#'));

        let options = LoadOptions::new().with_delimiter(b',').without_comment();
        assert_eq!(options.delimiter, b',');
        assert_eq!(options.comment, None);
    }

    #[test]
    fn test_options_from_lookup() {
        let vars: HashMap<&str, &str> = [(DELIMITER_ENV, ";"), (COMMENT_ENV, "none")].into();
        let options = LoadOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.comment, None);

        let vars: HashMap<&str, &str> = [(DELIMITER_ENV, "tab"), (COMMENT_ENV, "//")].into();
        let options = LoadOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(options.delimiter, b'\t');
        assert_eq!(options.comment, Some(b'#'));

        // "none" is not a valid delimiter
        let vars: HashMap<&str, &str> = [(DELIMITER_ENV, "none")].into();
        let options = LoadOptions::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(options.delimiter, b'\t');
    }

    #[test]
    fn test_load_reader() {
        let data = "# pairs\nstring\tint\nkey\tvalue\na\t1\n# skipped\nb\t0x10\n";
        let loader = Loader::<Pair>::new(LoadOptions::default()).unwrap();
        let store = loader.load_reader(data.as_bytes()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("key", "b").unwrap().value, 16);
    }

    #[test]
    fn test_missing_header_rows() {
        let loader = Loader::<Pair>::new(LoadOptions::default()).unwrap();

        let err = loader.load_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, CsvRecordError::MissingHeaderRow(HeaderRow::Types)));

        let err = loader.load_reader("string\tint\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CsvRecordError::MissingHeaderRow(HeaderRow::Names)));
    }

    #[test]
    fn test_missing_file() {
        let err = load::<Pair, _>("/nonexistent/table.tsv", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CsvRecordError::Io { .. }));
    }
}
