//! # Native Type Shapes
//!
//! `NativeType` describes the shape of a compiled function's parameter or
//! return value as the native side sees it: scalars, borrowed spans,
//! nullable wrappers and pointers. `resolve` maps a shape onto the
//! `TypeDescriptor` the row codec uses, so a function and the slice it reads
//! agree on layout.
//!
//! ## Pointer Shapes
//!
//! | Shape | Resolves to |
//! |-------|-------------|
//! | `Pointer(Timestamp \| Date \| StringRef \| List \| Row)` | the pointee |
//! | `Pointer(Opaque<N>)` | `opaque<N>` |
//! | `Pointer(scalar)` | `opaque<size_of(scalar)>` |
//! | `Pointer(Pointer(_))` | `opaque<pointer width>` |
//! | `Pointer(Nullable(_))`, `Pointer(Tuple(_))` | unsupported |
//!
//! `Nullable(Nullable(_))` and `Nullable(Pointer(_))` are unsupported, as
//! is a pointer used as a list or tuple element.

use std::fmt;

use eyre::{bail, Result};

use crate::config::{DEFAULT_MAX_NESTING_DEPTH, POINTER_WIDTH};
use crate::error::CodecError;
use crate::schema::SchemaRef;
use crate::types::{TypeDescriptor, TypeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum NativeType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Timestamp,
    Date,
    StringRef,
    List(Box<NativeType>),
    Tuple(Vec<NativeType>),
    Opaque(usize),
    Row(SchemaRef),
    Nullable(Box<NativeType>),
    Pointer(Box<NativeType>),
}

/// How a resolved value crosses the native call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConv {
    /// Fixed scalars: bool, ints, floats, timestamp, date.
    ByValue,
    /// Strings, lists, opaques, tuples and nested rows, as borrowed views.
    ByPointer,
}

impl CallConv {
    pub fn of(ty: &TypeDescriptor) -> Self {
        match ty.kind() {
            TypeKind::Bool
            | TypeKind::Int16
            | TypeKind::Int32
            | TypeKind::Int64
            | TypeKind::Float
            | TypeKind::Double
            | TypeKind::Timestamp
            | TypeKind::Date => CallConv::ByValue,
            TypeKind::StringRef
            | TypeKind::List(_)
            | TypeKind::Tuple(_)
            | TypeKind::Opaque(_)
            | TypeKind::Row(_) => CallConv::ByPointer,
        }
    }
}

impl NativeType {
    pub fn list(element: NativeType) -> Self {
        NativeType::List(Box::new(element))
    }

    pub fn nullable(inner: NativeType) -> Self {
        NativeType::Nullable(Box::new(inner))
    }

    pub fn pointer(pointee: NativeType) -> Self {
        NativeType::Pointer(Box::new(pointee))
    }

    /// Native width of a by-value scalar, as seen through a pointer.
    fn scalar_width(&self) -> Option<usize> {
        match self {
            NativeType::Bool => Some(1),
            NativeType::Int16 => Some(2),
            NativeType::Int32 | NativeType::Float => Some(4),
            NativeType::Int64 | NativeType::Double => Some(8),
            _ => None,
        }
    }

    /// Resolves this shape to a validated descriptor.
    pub fn resolve(&self) -> Result<TypeDescriptor> {
        let descriptor = self.resolve_shape()?;
        descriptor.validate(DEFAULT_MAX_NESTING_DEPTH)?;
        Ok(descriptor)
    }

    pub fn call_conv(&self) -> Result<CallConv> {
        Ok(CallConv::of(&self.resolve()?))
    }

    fn resolve_shape(&self) -> Result<TypeDescriptor> {
        Ok(match self {
            NativeType::Bool => TypeDescriptor::bool(),
            NativeType::Int16 => TypeDescriptor::int16(),
            NativeType::Int32 => TypeDescriptor::int32(),
            NativeType::Int64 => TypeDescriptor::int64(),
            NativeType::Float => TypeDescriptor::float(),
            NativeType::Double => TypeDescriptor::double(),
            NativeType::Timestamp => TypeDescriptor::timestamp(),
            NativeType::Date => TypeDescriptor::date(),
            NativeType::StringRef => TypeDescriptor::string(),
            NativeType::List(element) => TypeDescriptor::list(element.resolve_element("list")?),
            NativeType::Tuple(elements) => TypeDescriptor::tuple(
                elements
                    .iter()
                    .map(|e| e.resolve_element("tuple"))
                    .collect::<Result<_>>()?,
            ),
            NativeType::Opaque(size) => TypeDescriptor::opaque(*size),
            NativeType::Row(schema) => TypeDescriptor::row(schema.clone()),
            NativeType::Nullable(inner) => match inner.as_ref() {
                NativeType::Nullable(_) => {
                    bail!(CodecError::unsupported(format!("{} nests nullable", self)))
                }
                NativeType::Pointer(_) => {
                    bail!(CodecError::unsupported(format!("{} wraps a pointer", self)))
                }
                other => other.resolve_shape()?.nullable(),
            },
            NativeType::Pointer(pointee) => pointee.resolve_pointee(self)?,
        })
    }

    fn resolve_element(&self, container: &str) -> Result<TypeDescriptor> {
        if let NativeType::Pointer(_) = self {
            bail!(CodecError::unsupported(format!(
                "{} cannot be a {} element",
                self, container
            )));
        }
        self.resolve_shape()
    }

    fn resolve_pointee(&self, pointer: &NativeType) -> Result<TypeDescriptor> {
        match self {
            NativeType::Timestamp
            | NativeType::Date
            | NativeType::StringRef
            | NativeType::List(_)
            | NativeType::Row(_)
            | NativeType::Opaque(_) => self.resolve_shape(),
            NativeType::Pointer(_) => Ok(TypeDescriptor::opaque(POINTER_WIDTH)),
            NativeType::Nullable(_) | NativeType::Tuple(_) => {
                bail!(CodecError::unsupported(format!(
                    "{} has no pointer binding",
                    pointer
                )))
            }
            scalar => match scalar.scalar_width() {
                Some(width) => Ok(TypeDescriptor::opaque(width)),
                None => bail!(CodecError::unsupported(format!(
                    "{} has no pointer binding",
                    pointer
                ))),
            },
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Bool => f.write_str("bool"),
            NativeType::Int16 => f.write_str("i16"),
            NativeType::Int32 => f.write_str("i32"),
            NativeType::Int64 => f.write_str("i64"),
            NativeType::Float => f.write_str("f32"),
            NativeType::Double => f.write_str("f64"),
            NativeType::Timestamp => f.write_str("Timestamp"),
            NativeType::Date => f.write_str("Date"),
            NativeType::StringRef => f.write_str("StringRef"),
            NativeType::List(element) => write!(f, "ListRef<{}>", element),
            NativeType::Tuple(elements) => {
                f.write_str("(")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                f.write_str(")")
            }
            NativeType::Opaque(size) => write!(f, "Opaque<{}>", size),
            NativeType::Row(schema) => write!(f, "Row{}", schema),
            NativeType::Nullable(inner) => write!(f, "Nullable<{}>", inner),
            NativeType::Pointer(pointee) => write!(f, "*{}", pointee),
        }
    }
}
