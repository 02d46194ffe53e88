use ordered_float::OrderedFloat;
use std::sync::Arc;

use crate::error::ErrorContext;
use crate::schema::{DeclaredType, FieldDef, FloatWidth, IntWidth};
use crate::{CellValue, CsvRecordError, Result};

/// A record shape the loader can decode rows into.
///
/// `describe_fields` lists the fields in declaration order; `set_field`
/// receives the decoded value for the field at that position. Fields the
/// decoder skips keep their `Default` value.
///
/// Usually implemented through [`crate::csv_record!`].
pub trait CsvRecord: Default + Send + Sync + 'static {
    fn describe_fields() -> Vec<FieldDef>;

    fn set_field(&mut self, position: usize, value: CellValue) -> Result<()>;
}

/// Rust types usable as record fields
pub trait FieldType: Sized {
    fn declared_type() -> DeclaredType;

    fn from_cell(value: CellValue) -> Result<Self>;
}

fn mismatch<T>(expected: &str, value: &CellValue) -> Result<T> {
    Err(CsvRecordError::conversion(format!(
        "expected {}, got {}",
        expected,
        value.type_name()
    )))
}

macro_rules! impl_field_type {
    ($ty:ty, $declared:expr, $variant:ident, $name:literal, |$v:ident| $convert:expr) => {
        impl FieldType for $ty {
            fn declared_type() -> DeclaredType {
                $declared
            }

            fn from_cell(value: CellValue) -> Result<Self> {
                match value {
                    CellValue::$variant($v) => Ok($convert),
                    other => mismatch($name, &other),
                }
            }
        }
    };
}

impl_field_type!(i8, DeclaredType::Int(IntWidth::W8), Int8, "Int8", |v| v);
impl_field_type!(i16, DeclaredType::Int(IntWidth::W16), Int16, "Int16", |v| v);
impl_field_type!(i32, DeclaredType::Int(IntWidth::W32), Int32, "Int32", |v| v);
impl_field_type!(i64, DeclaredType::Int(IntWidth::W64), Int64, "Int64", |v| v);
impl_field_type!(f32, DeclaredType::Float(FloatWidth::W32), Float32, "Float32", |v| v.0);
impl_field_type!(f64, DeclaredType::Float(FloatWidth::W64), Float64, "Float64", |v| v.0);
impl_field_type!(String, DeclaredType::String, String, "String", |v| v.to_string());
impl_field_type!(Arc<str>, DeclaredType::String, String, "String", |v| v);
impl_field_type!(
    OrderedFloat<f64>,
    DeclaredType::Float(FloatWidth::W64),
    Float64,
    "Float64",
    |v| v
);

// Declared so the schema can name it in UnsupportedFieldKind; never decoded.
impl FieldType for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::Bool
    }

    fn from_cell(value: CellValue) -> Result<Self> {
        mismatch("Boolean", &value)
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::list_of(T::declared_type())
    }

    fn from_cell(value: CellValue) -> Result<Self> {
        match value {
            CellValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_cell(item).with_context(|| format!("list element {}", i)))
                .collect(),
            other => mismatch("List", &other),
        }
    }
}
