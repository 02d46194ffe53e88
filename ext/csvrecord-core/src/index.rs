//! Unique per-field lookup indexes

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::schema::Schema;
use crate::{CsvRecordError, IndexKey, Result};

/// Finished index: key to record position in the store
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: HashMap<IndexKey, usize>,
}

impl Index {
    pub fn get(&self, key: &IndexKey) -> Option<usize> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.entries.keys()
    }
}

/// Accumulates one field's keys while rows are decoded
#[derive(Debug)]
pub struct IndexBuilder {
    field: String,
    entries: HashMap<IndexKey, usize>,
}

impl IndexBuilder {
    pub fn new<S: Into<String>>(field: S) -> Self {
        Self {
            field: field.into(),
            entries: HashMap::new(),
        }
    }

    /// Record that `row` holds `key`. A key seen before is an error and the
    /// existing entry is left untouched.
    pub fn insert(&mut self, key: IndexKey, row: usize) -> Result<()> {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(occupied) => Err(CsvRecordError::DuplicateIndexKey {
                row,
                field: self.field.clone(),
                key: occupied.key().clone(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(row);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> (String, Index) {
        (
            self.field,
            Index {
                entries: self.entries,
            },
        )
    }
}

/// Index builders for every indexed field of a schema, by schema position
#[derive(Debug)]
pub struct IndexSet {
    builders: Vec<Option<IndexBuilder>>,
}

impl IndexSet {
    pub fn for_schema(schema: &Schema) -> Self {
        let builders = schema
            .fields()
            .iter()
            .map(|f| f.indexed.then(|| IndexBuilder::new(f.name.clone())))
            .collect();
        Self { builders }
    }

    /// Builder for the field at `position`, if that field is indexed
    pub fn builder_mut(&mut self, position: usize) -> Option<&mut IndexBuilder> {
        self.builders.get_mut(position).and_then(Option::as_mut)
    }

    /// Finished indexes keyed by field name, in declaration order
    pub fn finish(self) -> IndexMap<String, Index> {
        self.builders
            .into_iter()
            .flatten()
            .map(IndexBuilder::finish)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DeclaredType, IntWidth, SchemaBuilder};

    #[test]
    fn test_insert_and_get() {
        let mut builder = IndexBuilder::new("id");
        builder.insert(IndexKey::from(1001), 0).unwrap();
        builder.insert(IndexKey::from(1002), 1).unwrap();

        let (field, index) = builder.finish();
        assert_eq!(field, "id");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&IndexKey::from(1002)), Some(1));
        assert_eq!(index.get(&IndexKey::from(1004)), None);

        let mut keys: Vec<&IndexKey> = index.keys().collect();
        keys.sort_by_key(|k| k.to_string());
        assert_eq!(keys, vec![&IndexKey::from(1001), &IndexKey::from(1002)]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut builder = IndexBuilder::new("name");
        builder.insert(IndexKey::from("test1"), 0).unwrap();

        let err = builder.insert(IndexKey::from("test1"), 3).unwrap_err();
        match err {
            CsvRecordError::DuplicateIndexKey { row, field, key } => {
                assert_eq!(row, 3);
                assert_eq!(field, "name");
                assert_eq!(key, IndexKey::from("test1"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // First entry is not overwritten
        let (_, index) = builder.finish();
        assert_eq!(index.get(&IndexKey::from("test1")), Some(0));
    }

    #[test]
    fn test_index_set_follows_schema() {
        let schema = SchemaBuilder::new()
            .indexed_field("id", DeclaredType::Int(IntWidth::W32))
            .field("email", DeclaredType::String)
            .indexed_field("name", DeclaredType::String)
            .build()
            .unwrap();

        let mut set = IndexSet::for_schema(&schema);
        assert!(set.builder_mut(0).is_some());
        assert!(set.builder_mut(1).is_none());
        assert!(set.builder_mut(7).is_none());
        set.builder_mut(2)
            .unwrap()
            .insert(IndexKey::from("x"), 0)
            .unwrap();

        let indexes = set.finish();
        let names: Vec<&str> = indexes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(indexes["name"].len(), 1);
    }
}
