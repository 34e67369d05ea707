//! # Runtime Value Representation
//!
//! `Value<'a>` is the dynamic form of one field: the encoder's input and the
//! result of `RowView::get_value`. String and opaque payloads are `Cow`, so a
//! decoded value borrows from its slice while a literal built in code may own
//! its bytes.
//!
//! | Variant | Descriptor kind |
//! |---------|-----------------|
//! | Null | any nullable |
//! | Bool .. Date | matching scalar |
//! | String | string |
//! | List | list |
//! | Tuple | tuple |
//! | Opaque | opaque<N> (exactly N bytes) |
//! | Row | row(schema) |

use std::borrow::Cow;

use super::{Date, Nullable, StringRef, Timestamp, TypeDescriptor, TypeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Timestamp(Timestamp),
    Date(Date),
    String(Cow<'a, [u8]>),
    List(Vec<Value<'a>>),
    Tuple(Vec<Value<'a>>),
    Opaque(Cow<'a, [u8]>),
    Row(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn string(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s.as_bytes()))
    }

    pub fn opaque(bytes: &'a [u8]) -> Self {
        Value::Opaque(Cow::Borrowed(bytes))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Opaque(_) => "opaque",
            Value::Row(_) => "row",
        }
    }

    /// True when the variant fits `desc`'s kind. Nested contents and
    /// nullability are checked by the encoder, not here.
    pub fn fits_kind(&self, desc: &TypeDescriptor) -> bool {
        matches!(
            (self, desc.kind()),
            (Value::Null, _)
                | (Value::Bool(_), TypeKind::Bool)
                | (Value::Int16(_), TypeKind::Int16)
                | (Value::Int32(_), TypeKind::Int32)
                | (Value::Int64(_), TypeKind::Int64)
                | (Value::Float(_), TypeKind::Float)
                | (Value::Double(_), TypeKind::Double)
                | (Value::Timestamp(_), TypeKind::Timestamp)
                | (Value::Date(_), TypeKind::Date)
                | (Value::String(_), TypeKind::StringRef)
                | (Value::List(_), TypeKind::List(_))
                | (Value::Tuple(_), TypeKind::Tuple(_))
                | (Value::Opaque(_), TypeKind::Opaque(_))
                | (Value::Row(_), TypeKind::Row(_))
        )
    }

    /// Detaches the value from any borrowed slice.
    pub fn into_owned(self) -> Value<'static> {
        fn owned(values: Vec<Value<'_>>) -> Vec<Value<'static>> {
            values.into_iter().map(Value::into_owned).collect()
        }
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Int16(v) => Value::Int16(v),
            Value::Int32(v) => Value::Int32(v),
            Value::Int64(v) => Value::Int64(v),
            Value::Float(v) => Value::Float(v),
            Value::Double(v) => Value::Double(v),
            Value::Timestamp(v) => Value::Timestamp(v),
            Value::Date(v) => Value::Date(v),
            Value::String(b) => Value::String(Cow::Owned(b.into_owned())),
            Value::List(vs) => Value::List(owned(vs)),
            Value::Tuple(vs) => Value::Tuple(owned(vs)),
            Value::Opaque(b) => Value::Opaque(Cow::Owned(b.into_owned())),
            Value::Row(vs) => Value::Row(owned(vs)),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    Timestamp => Timestamp,
    Date => Date,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s.into_bytes()))
    }
}

impl<'a> From<StringRef<'a>> for Value<'a> {
    fn from(s: StringRef<'a>) -> Self {
        Value::String(Cow::Borrowed(s.as_bytes()))
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<'a, T: Into<Value<'a>>> From<Nullable<T>> for Value<'a> {
    fn from(v: Nullable<T>) -> Self {
        v.into_option().into()
    }
}
