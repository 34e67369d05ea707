//! # RowView - Zero-Copy Slice Access
//!
//! `RowView` binds one validated slice to its `Schema` and reads columns in
//! O(1): the slot position of every column is pre-computed by the schema,
//! so a read is a bitmap probe plus one slot read.
//!
//! ## Usage
//!
//! ```ignore
//! let view = RowView::new(&bytes, &schema)?;
//! let id: Nullable<i32> = view.get(0)?;
//! let name: Nullable<&str> = view.get(1)?;
//! let everything: Vec<Value> = view.values()?;
//! ```
//!
//! ## Typed Reads
//!
//! `get::<T>` is generic over [`FieldValue`]. Each implementation names the
//! descriptor kinds it accepts; asking for any other kind fails with
//! `TypeMismatch` before the bitmap is consulted, so a wrong type is
//! reported even for null columns.
//!
//! | T | Accepts |
//! |---|---------|
//! | `bool`, `i16`, `i32`, `i64`, `f32`, `f64` | matching scalar |
//! | `Timestamp`, `Date` | matching scalar |
//! | `StringRef`, `&str` | string |
//! | `&[u8]` | string, opaque |
//! | `ListView` | list |
//! | `TupleView` | tuple |
//! | `RowView` | row |
//! | `Value` | any |
//!
//! ## Thread Safety
//!
//! `RowView` is `Copy` and borrows immutably; any number of views may read
//! the same slice concurrently.

use std::borrow::Cow;

use eyre::{bail, Result};
use tracing::trace;

use super::header::declared_len;
use super::layout::{field_bytes, null_bit};
use super::nested::{ListView, TupleView};
use super::validate::validate_slice;
use crate::config::SLICE_HEADER_SIZE;
use crate::error::CodecError;
use crate::schema::Schema;
use crate::types::{Date, Nullable, StringRef, Timestamp, TypeDescriptor, TypeKind, Value};

#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    data: &'a [u8],
    schema: &'a Schema,
}

impl<'a> RowView<'a> {
    /// Validates `data` against `schema`. Bytes past the slice's declared
    /// length are ignored.
    pub fn new(data: &'a [u8], schema: &'a Schema) -> Result<Self> {
        let data = validate_slice(schema, data)?;
        trace!(
            len = data.len(),
            columns = schema.column_count(),
            "decoded row slice"
        );
        Ok(Self { data, schema })
    }

    /// View over a nested slice that was validated with its parent.
    pub(crate) fn nested(data: &'a [u8], schema: &'a Schema) -> Result<Self> {
        let declared = declared_len(data)?;
        let data = data
            .get(..declared)
            .ok_or_else(|| CodecError::truncated("nested row", declared, data.len()))?;
        Ok(Self { data, schema })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    fn null_bitmap(&self) -> &'a [u8] {
        &self.data[SLICE_HEADER_SIZE..self.schema.fixed_area_start()]
    }

    pub fn is_null(&self, col_idx: usize) -> bool {
        col_idx < self.column_count() && null_bit(self.null_bitmap(), col_idx)
    }

    fn column_type(&self, col_idx: usize) -> Result<&'a TypeDescriptor> {
        self.schema.column_type(col_idx).ok_or_else(|| {
            CodecError::IndexOutOfBounds {
                index: col_idx,
                len: self.column_count(),
            }
            .into()
        })
    }

    pub fn get<T: FieldValue<'a>>(&self, col_idx: usize) -> Result<Nullable<T>> {
        let ty = self.column_type(col_idx)?;
        let slot_pos = self.schema.fixed_area_start() + self.schema.slot_offset(col_idx);
        typed_field(col_idx, ty, self.is_null(col_idx), self.data, slot_pos)
    }

    /// Fully decoded column value; `Value::Null` when the bitmap says so.
    pub fn get_value(&self, col_idx: usize) -> Result<Value<'a>> {
        Ok(self.get::<Value<'a>>(col_idx)?.unwrap_or(Value::Null))
    }

    pub fn values(&self) -> Result<Vec<Value<'a>>> {
        (0..self.column_count()).map(|i| self.get_value(i)).collect()
    }
}

/// A Rust type that a non-null field can be read as.
pub trait FieldValue<'a>: Sized {
    /// Name reported in `TypeMismatch` errors.
    const TYPE_NAME: &'static str;

    fn accepts(ty: &TypeDescriptor) -> bool;

    /// `bytes` is the slot for fixed types and the payload for variable
    /// ones.
    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self>;
}

pub(crate) fn typed_field<'a, T: FieldValue<'a>>(
    index: usize,
    ty: &'a TypeDescriptor,
    is_null: bool,
    section: &'a [u8],
    slot_pos: usize,
) -> Result<Nullable<T>> {
    if !T::accepts(ty) {
        bail!(CodecError::TypeMismatch {
            index,
            declared: ty.type_name(),
            requested: T::TYPE_NAME,
        });
    }
    if is_null {
        return Ok(Nullable::Null);
    }
    let bytes = field_bytes(section, slot_pos, ty)?;
    T::from_field(ty, bytes).map(Nullable::Value)
}

macro_rules! le_field_value {
    ($($ty:ty => $kind:ident, $name:literal);* $(;)?) => {
        $(
            impl<'a> FieldValue<'a> for $ty {
                const TYPE_NAME: &'static str = $name;

                fn accepts(ty: &TypeDescriptor) -> bool {
                    matches!(ty.kind(), TypeKind::$kind)
                }

                fn from_field(_: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
                    let raw = bytes.try_into().map_err(|_| {
                        CodecError::truncated($name, std::mem::size_of::<$ty>(), bytes.len())
                    })?;
                    Ok(<$ty>::from_le_bytes(raw))
                }
            }
        )*
    };
}

le_field_value! {
    i16 => Int16, "int16";
    i32 => Int32, "int32";
    i64 => Int64, "int64";
    f32 => Float, "float";
    f64 => Double, "double";
}

impl<'a> FieldValue<'a> for bool {
    const TYPE_NAME: &'static str = "bool";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::Bool)
    }

    fn from_field(_: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        match bytes.first() {
            Some(b) => Ok(*b != 0),
            None => bail!(CodecError::truncated("bool", 1, 0)),
        }
    }
}

impl<'a> FieldValue<'a> for Timestamp {
    const TYPE_NAME: &'static str = "timestamp";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::Timestamp)
    }

    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        i64::from_field(ty, bytes).map(Timestamp::from_millis)
    }
}

impl<'a> FieldValue<'a> for Date {
    const TYPE_NAME: &'static str = "date";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::Date)
    }

    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        i32::from_field(ty, bytes).map(Date::from_packed)
    }
}

impl<'a> FieldValue<'a> for StringRef<'a> {
    const TYPE_NAME: &'static str = "string";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::StringRef)
    }

    fn from_field(_: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        Ok(StringRef::new(bytes))
    }
}

impl<'a> FieldValue<'a> for &'a str {
    const TYPE_NAME: &'static str = "str";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::StringRef)
    }

    fn from_field(_: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        StringRef::new(bytes).to_str()
    }
}

impl<'a> FieldValue<'a> for &'a [u8] {
    const TYPE_NAME: &'static str = "bytes";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::StringRef | TypeKind::Opaque(_))
    }

    fn from_field(_: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        Ok(bytes)
    }
}

impl<'a> FieldValue<'a> for ListView<'a> {
    const TYPE_NAME: &'static str = "list";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::List(_))
    }

    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        match ty.kind() {
            TypeKind::List(element) => ListView::new(bytes, element),
            _ => bail!("list read against {}", ty),
        }
    }
}

impl<'a> FieldValue<'a> for TupleView<'a> {
    const TYPE_NAME: &'static str = "tuple";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::Tuple(_))
    }

    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        match ty.kind() {
            TypeKind::Tuple(elements) => TupleView::new(bytes, elements),
            _ => bail!("tuple read against {}", ty),
        }
    }
}

impl<'a> FieldValue<'a> for RowView<'a> {
    const TYPE_NAME: &'static str = "row";

    fn accepts(ty: &TypeDescriptor) -> bool {
        matches!(ty.kind(), TypeKind::Row(_))
    }

    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        match ty.kind() {
            TypeKind::Row(schema) => RowView::nested(bytes, schema),
            _ => bail!("row read against {}", ty),
        }
    }
}

impl<'a> FieldValue<'a> for Value<'a> {
    const TYPE_NAME: &'static str = "value";

    fn accepts(_: &TypeDescriptor) -> bool {
        true
    }

    fn from_field(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Self> {
        decode_value(ty, bytes)
    }
}

fn decode_value<'a>(ty: &'a TypeDescriptor, bytes: &'a [u8]) -> Result<Value<'a>> {
    Ok(match ty.kind() {
        TypeKind::Bool => Value::Bool(bool::from_field(ty, bytes)?),
        TypeKind::Int16 => Value::Int16(i16::from_field(ty, bytes)?),
        TypeKind::Int32 => Value::Int32(i32::from_field(ty, bytes)?),
        TypeKind::Int64 => Value::Int64(i64::from_field(ty, bytes)?),
        TypeKind::Float => Value::Float(f32::from_field(ty, bytes)?),
        TypeKind::Double => Value::Double(f64::from_field(ty, bytes)?),
        TypeKind::Timestamp => Value::Timestamp(Timestamp::from_field(ty, bytes)?),
        TypeKind::Date => Value::Date(Date::from_field(ty, bytes)?),
        TypeKind::StringRef => Value::String(Cow::Borrowed(bytes)),
        TypeKind::Opaque(_) => Value::Opaque(Cow::Borrowed(bytes)),
        TypeKind::List(element) => Value::List(ListView::new(bytes, element)?.values()?),
        TypeKind::Tuple(elements) => Value::Tuple(TupleView::new(bytes, elements)?.values()?),
        TypeKind::Row(schema) => Value::Row(RowView::nested(bytes, schema)?.values()?),
    })
}
