//! Schema-driven loading of delimited tables into typed, indexed records
//!
//! `csvrecord-core` decodes a tab (or otherwise) separated table file into a
//! vector of caller-defined records, and builds unique lookup indexes over
//! the fields the record marks for indexing.
//!
//! # Key Components
//!
//! - **Schema**: validated field list derived from a record type
//!   - Five field kinds: int, float, string, array1, array2
//!   - Array fields cannot be indexed
//!
//! - **Header**: the file's first two rows
//!   - Row 1 declares a type per column (`int`, `float`, `string`, `array1`, `array2`)
//!   - Row 2 names each column; fields bind to columns by name
//!
//! - **Coercion**: cell text to typed values
//!   - Integers in any prefixed base, range-checked at the field's width
//!   - `,`-separated lists and `|`-separated groups of lists
//!
//! - **Store**: the immutable result of one load
//!   - Positional access and O(1) lookup by indexed value
//!   - [`RecordTable`] swaps stores atomically on reload
//!
//! # Example Usage
//!
//! ```no_run
//! use csvrecord_core::{csv_record, load, LoadOptions};
//!
//! csv_record! {
//!     #[derive(Debug, Default)]
//!     pub struct Item {
//!         #[index] pub id: i32,
//!         pub name: String,
//!         pub tags: Vec<String>,
//!     }
//! }
//!
//! let store = load::<Item, _>("items.tsv", LoadOptions::default())?;
//! if let Some(item) = store.lookup("id", 7) {
//!     println!("{}", item.name);
//! }
//! # Ok::<(), csvrecord_core::CsvRecordError>(())
//! ```

pub mod coerce;
pub mod decoder;
pub mod error;
pub mod header;
pub mod index;
mod macros;
pub mod reader;
pub mod schema;
pub mod store;
pub mod traits;
pub mod value;

#[cfg(test)]
pub mod test_utils;

pub use coerce::CellOutcome;
pub use error::{CoercionError, CsvRecordError, ErrorContext, HeaderRow, Result, RowRef};
pub use header::{ColumnType, HeaderInfo};
pub use index::Index;
pub use reader::{build_schema, load, LoadOptions, Loader};
pub use schema::{
    DeclaredType, FieldDef, FieldDescriptor, FieldKind, FloatWidth, IntWidth, ScalarKind, Schema,
    SchemaBuilder,
};
pub use store::{RecordStore, RecordTable};
pub use traits::{CsvRecord, FieldType, SchemaInspector};
pub use value::{CellValue, IndexKey};
