use indexmap::IndexMap;

use crate::traits::CsvRecord;
use crate::{CsvRecordError, Result};

/// Bit width of an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub fn bits(&self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Precision of a floating point field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

impl FloatWidth {
    pub fn bits(&self) -> u32 {
        match self {
            FloatWidth::W32 => 32,
            FloatWidth::W64 => 64,
        }
    }
}

/// Element type shared by scalar fields and array elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int(IntWidth),
    Float(FloatWidth),
    String,
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarKind::Int(width) => write!(f, "int{}", width.bits()),
            ScalarKind::Float(width) => write!(f, "float{}", width.bits()),
            ScalarKind::String => write!(f, "string"),
        }
    }
}

/// Validated coercion target of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int(IntWidth),
    Float(FloatWidth),
    String,
    /// Flat list, `,`-separated
    Array1(ScalarKind),
    /// List of lists, `|` between groups and `,` inside each group
    Array2(ScalarKind),
}

impl FieldKind {
    /// Scalar kinds may be indexed, array kinds may not
    pub fn is_indexable(&self) -> bool {
        !matches!(self, FieldKind::Array1(_) | FieldKind::Array2(_))
    }

    fn from_scalar(scalar: ScalarKind) -> Self {
        match scalar {
            ScalarKind::Int(width) => FieldKind::Int(width),
            ScalarKind::Float(width) => FieldKind::Float(width),
            ScalarKind::String => FieldKind::String,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Int(width) => write!(f, "int{}", width.bits()),
            FieldKind::Float(width) => write!(f, "float{}", width.bits()),
            FieldKind::String => write!(f, "string"),
            FieldKind::Array1(elem) => write!(f, "array1<{}>", elem),
            FieldKind::Array2(elem) => write!(f, "array2<{}>", elem),
        }
    }
}

/// Type of a record field as declared by the record shape, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Int(IntWidth),
    Float(FloatWidth),
    String,
    Bool,
    List(Box<DeclaredType>),
}

impl DeclaredType {
    pub fn list_of(item: DeclaredType) -> Self {
        DeclaredType::List(Box::new(item))
    }

    fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            DeclaredType::Int(width) => Some(ScalarKind::Int(*width)),
            DeclaredType::Float(width) => Some(ScalarKind::Float(*width)),
            DeclaredType::String => Some(ScalarKind::String),
            DeclaredType::Bool | DeclaredType::List(_) => None,
        }
    }

    /// Map onto one of the five supported kinds, if possible
    pub fn to_kind(&self) -> Option<FieldKind> {
        if let Some(scalar) = self.as_scalar() {
            return Some(FieldKind::from_scalar(scalar));
        }
        let DeclaredType::List(item) = self else {
            return None;
        };
        if let Some(scalar) = item.as_scalar() {
            return Some(FieldKind::Array1(scalar));
        }
        match item.as_ref() {
            DeclaredType::List(inner) => inner.as_scalar().map(FieldKind::Array2),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredType::Int(width) => write!(f, "int{}", width.bits()),
            DeclaredType::Float(width) => write!(f, "float{}", width.bits()),
            DeclaredType::String => write!(f, "string"),
            DeclaredType::Bool => write!(f, "bool"),
            DeclaredType::List(item) => write!(f, "list<{}>", item),
        }
    }
}

/// One declared output field, as described by the record shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub declared_type: DeclaredType,
    pub indexed: bool,
}

impl FieldDef {
    pub fn new<S: Into<String>>(name: S, declared_type: DeclaredType, indexed: bool) -> Self {
        Self {
            name: name.into(),
            declared_type,
            indexed,
        }
    }
}

/// A validated field: name, kind and whether it is indexed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub indexed: bool,
}

/// Ordered, validated field list, positionally aligned with the record shape.
///
/// A schema holds no per-file state; column positions are resolved per load
/// by [`crate::header::HeaderInfo::bind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    positions: IndexMap<String, usize>,
}

impl Schema {
    /// Validate a list of field declarations
    pub fn build(defs: Vec<FieldDef>) -> Result<Self> {
        let mut fields = Vec::with_capacity(defs.len());
        let mut positions = IndexMap::with_capacity(defs.len());

        for def in defs {
            let kind = def.declared_type.to_kind().ok_or_else(|| {
                CsvRecordError::UnsupportedFieldKind {
                    field: def.name.clone(),
                    kind: def.declared_type.to_string(),
                }
            })?;

            if def.indexed && !kind.is_indexable() {
                return Err(CsvRecordError::NonIndexableFieldKind {
                    field: def.name,
                    kind: kind.to_string(),
                });
            }

            if positions.insert(def.name.clone(), fields.len()).is_some() {
                return Err(CsvRecordError::DuplicateField(def.name));
            }

            fields.push(FieldDescriptor {
                name: def.name,
                kind,
                indexed: def.indexed,
            });
        }

        Ok(Self { fields, positions })
    }

    /// Schema of a record type, from its declared fields
    pub fn of<R: CsvRecord>() -> Result<Self> {
        Self::build(R::describe_fields())
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Position of a field in declaration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for declaring a schema by hand, without a record type
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    defs: Vec<FieldDef>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<S: Into<String>>(mut self, name: S, declared_type: DeclaredType) -> Self {
        self.defs.push(FieldDef::new(name, declared_type, false));
        self
    }

    pub fn indexed_field<S: Into<String>>(mut self, name: S, declared_type: DeclaredType) -> Self {
        self.defs.push(FieldDef::new(name, declared_type, true));
        self
    }

    pub fn build(self) -> Result<Schema> {
        Schema::build(self.defs)
    }
}
