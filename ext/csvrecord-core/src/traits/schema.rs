use crate::schema::{FieldDescriptor, Schema};

/// Trait for schema introspection
///
/// This trait provides methods for examining and querying schemas
/// without modifying them.
pub trait SchemaInspector {
    /// Get the total number of declared fields
    fn field_count(&self) -> usize;

    /// Get a field by name
    fn field(&self, name: &str) -> Option<&FieldDescriptor>;

    /// Check if schema contains a specific field
    fn has_field(&self, name: &str) -> bool;

    /// Names of the fields that get a lookup index, in declaration order
    fn indexed_fields(&self) -> Vec<&str>;
}

impl SchemaInspector for Schema {
    fn field_count(&self) -> usize {
        self.len()
    }

    fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.position(name).map(|pos| &self.fields()[pos])
    }

    fn has_field(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn indexed_fields(&self) -> Vec<&str> {
        self.fields()
            .iter()
            .filter(|f| f.indexed)
            .map(|f| f.name.as_str())
            .collect()
    }
}
