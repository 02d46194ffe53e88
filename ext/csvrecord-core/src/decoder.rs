//! Row to record decoding, feeding the index builders as it goes

use csv::StringRecord;
use indexmap::IndexMap;

use crate::coerce::{coerce_cell, CellOutcome};
use crate::error::RowRef;
use crate::header::{ColumnBinding, HeaderInfo};
use crate::index::{Index, IndexSet};
use crate::schema::Schema;
use crate::traits::CsvRecord;
use crate::{CsvRecordError, Result};

/// Single-pass decoder for the data rows of one load
pub struct RecordDecoder<'a, R> {
    schema: &'a Schema,
    bindings: Vec<ColumnBinding>,
    width: usize,
    indexes: IndexSet,
    records: Vec<R>,
}

impl<'a, R: CsvRecord> RecordDecoder<'a, R> {
    /// Bind the schema against the header. Fails with `UnknownColumn`.
    pub fn new(schema: &'a Schema, header: &HeaderInfo) -> Result<Self> {
        let bindings = header.bind(schema)?;
        Ok(Self {
            schema,
            bindings,
            width: header.width(),
            indexes: IndexSet::for_schema(schema),
            records: Vec::new(),
        })
    }

    /// Rows decoded so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decode the next data row into a new record.
    ///
    /// Any error leaves the decoder unusable; the caller abandons the load.
    pub fn push_row(&mut self, cells: &StringRecord) -> Result<()> {
        let row = self.records.len();
        if cells.len() != self.width {
            return Err(CsvRecordError::ColumnCountMismatch {
                row: RowRef::Data(row),
                expected: self.width,
                found: cells.len(),
            });
        }

        let mut record = R::default();
        for (position, (field, binding)) in self
            .schema
            .fields()
            .iter()
            .zip(&self.bindings)
            .enumerate()
        {
            let text = &cells[binding.column];
            let outcome = coerce_cell(field.kind, &binding.column_type, text).map_err(|source| {
                CsvRecordError::CoercionFailed {
                    row,
                    field: field.name.clone(),
                    source,
                }
            })?;

            let value = match outcome {
                CellOutcome::Value(value) => value,
                CellOutcome::Skip => continue,
            };

            if let Some(builder) = self.indexes.builder_mut(position) {
                let key = value.index_key().ok_or_else(|| {
                    CsvRecordError::internal(format!("indexed field '{}' decoded a list", field.name))
                })?;
                builder.insert(key, row)?;
            }

            record.set_field(position, value)?;
        }

        self.records.push(record);
        Ok(())
    }

    pub fn finish(self) -> (Vec<R>, IndexMap<String, Index>) {
        (self.records, self.indexes.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndexKey;

    crate::csv_record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Row {
            #[index] id: i32,
            name: String,
            kks: Vec<Vec<i32>>,
        }
    }

    fn header(types: &[&str], names: &[&str]) -> HeaderInfo {
        HeaderInfo::from_rows(
            types.iter().map(|s| s.to_string()).collect(),
            names.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_rows_and_index() {
        let schema = Schema::of::<Row>().unwrap();
        let header = header(&["string", "int", "array2"], &["name", "id", "kks"]);
        let mut decoder = RecordDecoder::<Row>::new(&schema, &header).unwrap();

        decoder
            .push_row(&StringRecord::from(vec!["a", "7", "1,2|3"]))
            .unwrap();
        decoder
            .push_row(&StringRecord::from(vec!["b", "8", ""]))
            .unwrap();
        assert_eq!(decoder.len(), 2);

        let (records, indexes) = decoder.finish();
        assert_eq!(
            records[0],
            Row {
                id: 7,
                name: "a".to_string(),
                kks: vec![vec![1, 2], vec![3]],
            }
        );
        assert!(records[1].kks.is_empty());
        assert_eq!(indexes["id"].get(&IndexKey::from(8)), Some(1));
    }

    #[test]
    fn test_type_mismatch_leaves_default() {
        let schema = Schema::of::<Row>().unwrap();
        let header = header(&["string", "float", "array2"], &["name", "id", "kks"]);
        let mut decoder = RecordDecoder::<Row>::new(&schema, &header).unwrap();

        decoder
            .push_row(&StringRecord::from(vec!["a", "not a number", "1"]))
            .unwrap();
        decoder
            .push_row(&StringRecord::from(vec!["b", "also not", "2"]))
            .unwrap();

        let (records, indexes) = decoder.finish();
        assert_eq!(records[0].id, 0);
        assert_eq!(records[1].id, 0);
        assert!(indexes["id"].is_empty());
    }

    #[test]
    fn test_row_width_checked() {
        let schema = Schema::of::<Row>().unwrap();
        let header = header(&["string", "int", "array2"], &["name", "id", "kks"]);
        let mut decoder = RecordDecoder::<Row>::new(&schema, &header).unwrap();

        let err = decoder
            .push_row(&StringRecord::from(vec!["a", "1"]))
            .unwrap_err();
        assert!(matches!(
            err,
            CsvRecordError::ColumnCountMismatch {
                row: RowRef::Data(0),
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_coercion_failure_names_row_and_field() {
        let schema = Schema::of::<Row>().unwrap();
        let header = header(&["string", "int", "array2"], &["name", "id", "kks"]);
        let mut decoder = RecordDecoder::<Row>::new(&schema, &header).unwrap();

        decoder
            .push_row(&StringRecord::from(vec!["a", "1", "1"]))
            .unwrap();
        let err = decoder
            .push_row(&StringRecord::from(vec!["b", "2", "1,x"]))
            .unwrap_err();
        assert_eq!(err.row(), Some(1));
        assert_eq!(err.field(), Some("kks"));
    }
}
