//! Decoded, immutable record sets

use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

use crate::index::Index;
use crate::reader::{LoadOptions, Loader};
use crate::schema::{FieldKind, Schema};
use crate::traits::{CsvRecord, SchemaInspector};
use crate::{CsvRecordError, IndexKey, Result};

/// Records of one successful load plus their lookup indexes.
///
/// Never modified after construction; share it across threads behind an
/// `Arc` (see [`RecordTable`]).
#[derive(Debug)]
pub struct RecordStore<R> {
    schema: Arc<Schema>,
    records: Vec<R>,
    indexes: IndexMap<String, Index>,
}

impl<R> RecordStore<R> {
    pub(crate) fn new(
        schema: Arc<Schema>,
        records: Vec<R>,
        indexes: IndexMap<String, Index>,
    ) -> Self {
        Self {
            schema,
            records,
            indexes,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Same as [`RecordStore::len`]
    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record decoded from data row `index`
    pub fn record_at(&self, index: usize) -> Result<&R> {
        self.records
            .get(index)
            .ok_or(CsvRecordError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Find the record whose indexed `field` holds `key`.
    ///
    /// `None` when no record matches, and also when `field` is not indexed.
    pub fn lookup<K: Into<IndexKey>>(&self, field: &str, key: K) -> Option<&R> {
        self.lookup_position(field, &key.into())
            .map(|pos| &self.records[pos])
    }

    /// Position of the record whose indexed `field` holds `key`
    pub fn lookup_position(&self, field: &str, key: &IndexKey) -> Option<usize> {
        let index = self.indexes.get(field)?;
        match self.schema.field(field).map(|f| f.kind) {
            Some(FieldKind::Float(width)) => index.get(&key.clone().at_float_width(width)),
            _ => index.get(key),
        }
    }

    pub fn index(&self, field: &str) -> Option<&Index> {
        self.indexes.get(field)
    }

    /// Names of the indexed fields, in declaration order
    pub fn indexed_fields(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }
}

impl<'a, R> IntoIterator for &'a RecordStore<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The current store of a reloadable table.
///
/// A reload swaps in a new store only when it succeeds; readers holding an
/// earlier snapshot keep it until they drop it.
#[derive(Debug)]
pub struct RecordTable<R> {
    loader: Loader<R>,
    current: Option<Arc<RecordStore<R>>>,
}

impl<R: CsvRecord> RecordTable<R> {
    pub fn new(options: LoadOptions) -> Result<Self> {
        Ok(Self {
            loader: Loader::new(options)?,
            current: None,
        })
    }

    /// Load `path`, replacing the current store on success. On failure the
    /// current store is kept.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<RecordStore<R>>> {
        let store = Arc::new(self.loader.load_path(path)?);
        self.current = Some(store.clone());
        Ok(store)
    }

    /// Current store, if a load has succeeded
    pub fn snapshot(&self) -> Option<Arc<RecordStore<R>>> {
        self.current.clone()
    }
}
