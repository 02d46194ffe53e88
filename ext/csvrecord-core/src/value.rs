use ordered_float::OrderedFloat;
use std::sync::Arc;

use crate::schema::FloatWidth;

/// A single coerced cell, shaped by the field kind it was decoded for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(OrderedFloat<f32>),
    Float64(OrderedFloat<f64>),
    String(Arc<str>),
    /// Array1 cells, and each group of an Array2 cell
    List(Vec<CellValue>),
}

impl CellValue {
    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Int8(_) => "Int8",
            CellValue::Int16(_) => "Int16",
            CellValue::Int32(_) => "Int32",
            CellValue::Int64(_) => "Int64",
            CellValue::Float32(_) => "Float32",
            CellValue::Float64(_) => "Float64",
            CellValue::String(_) => "String",
            CellValue::List(_) => "List",
        }
    }

    /// Key under which this value is indexed; `None` for lists
    pub fn index_key(&self) -> Option<IndexKey> {
        match self {
            CellValue::Int8(i) => Some(IndexKey::Int(*i as i64)),
            CellValue::Int16(i) => Some(IndexKey::Int(*i as i64)),
            CellValue::Int32(i) => Some(IndexKey::Int(*i as i64)),
            CellValue::Int64(i) => Some(IndexKey::Int(*i)),
            CellValue::Float32(f) => Some(IndexKey::Float(OrderedFloat(f.0 as f64))),
            CellValue::Float64(f) => Some(IndexKey::Float(*f)),
            CellValue::String(s) => Some(IndexKey::String(s.clone())),
            CellValue::List(_) => None,
        }
    }
}

/// Lookup key for an indexed field.
///
/// Integer and float widths are widened, so a key built from `1001_i32`
/// finds a record indexed from an `i64` field and vice versa. Float keys are
/// rounded to the indexed field's precision at lookup, so `1.6` finds an
/// `f32` field holding `1.6_f32`. Variants never match across each other:
/// `IndexKey::from("1001")` does not find `1001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Int(i64),
    Float(OrderedFloat<f64>),
    String(Arc<str>),
}

impl IndexKey {
    /// Round a float key to the precision a field of `width` stores.
    /// Other keys are returned unchanged.
    pub fn at_float_width(self, width: FloatWidth) -> Self {
        match (self, width) {
            (IndexKey::Float(x), FloatWidth::W32) => IndexKey::Float(OrderedFloat(x.0 as f32 as f64)),
            (key, _) => key,
        }
    }
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKey::Int(i) => write!(f, "{}", i),
            IndexKey::Float(x) => write!(f, "{}", x),
            IndexKey::String(s) => write!(f, "{:?}", s),
        }
    }
}

macro_rules! index_key_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for IndexKey {
                fn from(value: $ty) -> Self {
                    IndexKey::Int(value as i64)
                }
            }
        )*
    };
}

index_key_from_int!(i8, i16, i32, i64);

impl From<f32> for IndexKey {
    fn from(value: f32) -> Self {
        IndexKey::Float(OrderedFloat(value as f64))
    }
}

impl From<f64> for IndexKey {
    fn from(value: f64) -> Self {
        IndexKey::Float(OrderedFloat(value))
    }
}

impl From<&str> for IndexKey {
    fn from(value: &str) -> Self {
        IndexKey::String(Arc::from(value))
    }
}

impl From<String> for IndexKey {
    fn from(value: String) -> Self {
        IndexKey::String(Arc::from(value))
    }
}

impl From<&String> for IndexKey {
    fn from(value: &String) -> Self {
        IndexKey::String(Arc::from(value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        let v = CellValue::Int32(42);
        assert_eq!(v, CellValue::Int32(42));
        assert_eq!(v.type_name(), "Int32");
    }

    #[test]
    fn test_float_equality() {
        let v1 = CellValue::Float32(OrderedFloat(3.5));
        let v2 = CellValue::Float32(OrderedFloat(3.5));
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_index_key_widening() {
        assert_eq!(CellValue::Int32(1001).index_key(), Some(IndexKey::from(1001_i64)));
        assert_eq!(CellValue::Int8(-3).index_key(), Some(IndexKey::from(-3_i32)));
        assert_eq!(
            CellValue::Float32(OrderedFloat(1.5)).index_key(),
            Some(IndexKey::from(1.5_f64))
        );
        assert_eq!(CellValue::List(vec![]).index_key(), None);
    }

    #[test]
    fn test_float_key_rounded_to_field_width() {
        let stored = CellValue::Float32(OrderedFloat(1.6)).index_key().unwrap();
        assert_ne!(IndexKey::from(1.6_f64), stored);
        assert_eq!(IndexKey::from(1.6_f64).at_float_width(FloatWidth::W32), stored);
        assert_eq!(
            IndexKey::from(1.6_f64).at_float_width(FloatWidth::W64),
            IndexKey::from(1.6_f64)
        );
        assert_eq!(IndexKey::from(7).at_float_width(FloatWidth::W32), IndexKey::from(7));
    }

    #[test]
    fn test_index_key_variants_do_not_cross() {
        assert_ne!(IndexKey::from("1001"), IndexKey::from(1001));
        assert_ne!(IndexKey::from(1.0_f64), IndexKey::from(1));
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(IndexKey::from(42));
        set.insert(IndexKey::from("hello"));

        assert!(set.contains(&IndexKey::Int(42)));
        assert!(set.contains(&IndexKey::String(Arc::from("hello"))));
        assert!(!set.contains(&IndexKey::Int(43)));
    }
}
