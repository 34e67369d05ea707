//! # Type Descriptors
//!
//! `TypeDescriptor` is the closed set of SQL value types the codec can lay
//! out, plus a nullability flag. Nullability is a modifier: `Nullable<T>` and
//! `T` share one wire encoding and differ only in whether the null bit may
//! be set.
//!
//! ## Wire Widths
//!
//! | Kind | Width |
//! |------|-------|
//! | bool | 1 |
//! | int16 | 2 |
//! | int32, float, date | 4 |
//! | int64, double, timestamp | 8 |
//! | opaque<N> | N |
//! | tuple (all elements fixed) | ceil(k/8) + sum of element widths |
//! | string, list, row, tuple (any element variable) | variable |
//!
//! Variable-width fields occupy an 8-byte `(offset, length)` slot in the
//! fixed area; their bytes live in the variable-data area.
//!
//! ## Generic Slots
//!
//! `List` and `Tuple` hold their element types as full descriptors, so every
//! generic slot records its own nullability. Nothing is inferred.

use std::fmt;
use std::sync::Arc;

use eyre::{bail, Result};

use crate::config::VAR_SLOT_SIZE;
use crate::error::CodecError;
use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Bool,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    /// Signed milliseconds since the Unix epoch.
    Timestamp,
    /// `year * 10000 + month * 100 + day` packed into 32 bits.
    Date,
    StringRef,
    List(Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    /// Uninterpreted fixed-size blob, e.g. a pointer-sized native handle.
    Opaque(usize),
    /// A nested row stored as a single field.
    Row(Arc<Schema>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireWidth {
    Fixed(usize),
    Variable,
}

impl WireWidth {
    pub fn fixed(self) -> Option<usize> {
        match self {
            WireWidth::Fixed(n) => Some(n),
            WireWidth::Variable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    kind: TypeKind,
    nullable: bool,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub fn bool() -> Self {
        Self::new(TypeKind::Bool)
    }

    pub fn int16() -> Self {
        Self::new(TypeKind::Int16)
    }

    pub fn int32() -> Self {
        Self::new(TypeKind::Int32)
    }

    pub fn int64() -> Self {
        Self::new(TypeKind::Int64)
    }

    pub fn float() -> Self {
        Self::new(TypeKind::Float)
    }

    pub fn double() -> Self {
        Self::new(TypeKind::Double)
    }

    pub fn timestamp() -> Self {
        Self::new(TypeKind::Timestamp)
    }

    pub fn date() -> Self {
        Self::new(TypeKind::Date)
    }

    pub fn string() -> Self {
        Self::new(TypeKind::StringRef)
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::new(TypeKind::List(Box::new(element)))
    }

    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        Self::new(TypeKind::Tuple(elements))
    }

    pub fn opaque(size: usize) -> Self {
        Self::new(TypeKind::Opaque(size))
    }

    pub fn row(schema: Arc<Schema>) -> Self {
        Self::new(TypeKind::Row(schema))
    }

    /// Marks this descriptor nullable.
    pub fn nullable(self) -> Self {
        self.with_nullable(true)
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn wire_width(&self) -> WireWidth {
        match &self.kind {
            TypeKind::Bool => WireWidth::Fixed(1),
            TypeKind::Int16 => WireWidth::Fixed(2),
            TypeKind::Int32 | TypeKind::Float | TypeKind::Date => WireWidth::Fixed(4),
            TypeKind::Int64 | TypeKind::Double | TypeKind::Timestamp => WireWidth::Fixed(8),
            TypeKind::Opaque(size) => WireWidth::Fixed(*size),
            TypeKind::Tuple(elements) => {
                let mut width = elements.len().div_ceil(8);
                for element in elements {
                    match element.wire_width() {
                        WireWidth::Fixed(n) => width += n,
                        WireWidth::Variable => return WireWidth::Variable,
                    }
                }
                WireWidth::Fixed(width)
            }
            TypeKind::StringRef | TypeKind::List(_) | TypeKind::Row(_) => WireWidth::Variable,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.wire_width() == WireWidth::Variable
    }

    /// Bytes this type occupies in a fixed area: its own width when fixed,
    /// an `(offset, length)` pair otherwise.
    pub fn slot_width(&self) -> usize {
        self.wire_width().fixed().unwrap_or(VAR_SLOT_SIZE)
    }

    /// Element types of a `List` (one slot) or `Tuple` (one per element).
    pub fn generics(&self) -> &[TypeDescriptor] {
        match &self.kind {
            TypeKind::List(element) => std::slice::from_ref(element.as_ref()),
            TypeKind::Tuple(elements) => elements,
            _ => &[],
        }
    }

    pub fn generics_nullable(&self) -> Vec<bool> {
        self.generics().iter().map(|g| g.nullable).collect()
    }

    /// Clears nullability on this descriptor and on every generic slot.
    /// Nested rows are reduced to their positional shape, so column names
    /// do not take part in the comparison.
    pub fn erase_nullability(&self) -> TypeDescriptor {
        let kind = match &self.kind {
            TypeKind::List(element) => TypeKind::List(Box::new(element.erase_nullability())),
            TypeKind::Tuple(elements) => {
                TypeKind::Tuple(elements.iter().map(|e| e.erase_nullability()).collect())
            }
            TypeKind::Row(schema) => TypeKind::Row(Arc::new(schema.erased())),
            other => other.clone(),
        };
        TypeDescriptor::new(kind)
    }

    /// Nesting depth: 0 for scalars, one more than the deepest child for
    /// lists, tuples and rows.
    pub fn depth(&self) -> usize {
        match &self.kind {
            TypeKind::List(element) => 1 + element.depth(),
            TypeKind::Tuple(elements) => 1 + elements.iter().map(|e| e.depth()).max().unwrap_or(0),
            TypeKind::Row(schema) => 1 + schema.depth(),
            _ => 0,
        }
    }

    /// Rejects descriptors no slice could hold. Nested row schemas were
    /// validated when they were built, so only their depth is checked here.
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        self.validate_structure()?;
        let depth = self.depth();
        if depth > max_depth {
            bail!(CodecError::invalid_type(format!(
                "{} nests {} levels deep, maximum is {}",
                self, depth, max_depth
            )));
        }
        Ok(())
    }

    fn validate_structure(&self) -> Result<()> {
        match &self.kind {
            TypeKind::Opaque(0) => bail!(CodecError::invalid_type("opaque<0> has no storage")),
            TypeKind::Opaque(size) if *size > u32::MAX as usize => {
                bail!(CodecError::invalid_type(format!(
                    "opaque<{}> exceeds the slice length range",
                    size
                )))
            }
            TypeKind::Tuple(elements) if elements.is_empty() => {
                bail!(CodecError::invalid_type("tuple must have at least one element"))
            }
            TypeKind::Tuple(elements) => elements.iter().try_for_each(|e| e.validate_structure()),
            TypeKind::List(element) => element.validate_structure(),
            _ => Ok(()),
        }
    }

    /// Canonical type name, e.g. `int32`, `list_string`, `tuple_int32_double`.
    pub fn type_name(&self) -> String {
        match &self.kind {
            TypeKind::Bool => "bool".to_string(),
            TypeKind::Int16 => "int16".to_string(),
            TypeKind::Int32 => "int32".to_string(),
            TypeKind::Int64 => "int64".to_string(),
            TypeKind::Float => "float".to_string(),
            TypeKind::Double => "double".to_string(),
            TypeKind::Timestamp => "timestamp".to_string(),
            TypeKind::Date => "date".to_string(),
            TypeKind::StringRef => "string".to_string(),
            TypeKind::List(element) => format!("list_{}", element.type_name()),
            TypeKind::Tuple(elements) => {
                let names: Vec<String> = elements.iter().map(|e| e.type_name()).collect();
                format!("tuple_{}", names.join("_"))
            }
            TypeKind::Opaque(size) => format!("opaque<{}>", size),
            TypeKind::Row(_) => "row".to_string(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}
