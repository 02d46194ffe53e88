//! Traits at the seams between the decoder and caller-provided types

pub mod record;
pub mod schema;

pub use record::{CsvRecord, FieldType};
pub use schema::SchemaInspector;
