//! # Call Glue
//!
//! Turns the bound columns of a decoded row into the argument list of a
//! registered function. Null handling happens here, so function bodies never
//! see the bitmap:
//!
//! | Column | Parameter | Result |
//! |--------|-----------|--------|
//! | value | any | `CallArg` by value or by view |
//! | null | nullable | `CallArg::Null` |
//! | null | non-nullable | whole call is `BoundCall::NullResult` |

use eyre::{ensure, eyre, Result};

use super::native::CallConv;
use super::registry::FunctionBinding;
use crate::error::CodecError;
use crate::records::{ListView, RowView, TupleView};
use crate::types::{Date, Nullable, StringRef, Timestamp, TypeDescriptor, TypeKind};

#[derive(Debug, Clone)]
pub enum CallArg<'a> {
    Null,
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Timestamp(Timestamp),
    Date(Date),
    String(StringRef<'a>),
    List(ListView<'a>),
    Tuple(TupleView<'a>),
    Opaque(&'a [u8]),
    Row(RowView<'a>),
}

impl CallArg<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, CallArg::Null)
    }

    /// `None` for `Null`, which carries no value to pass.
    pub fn conv(&self) -> Option<CallConv> {
        match self {
            CallArg::Null => None,
            CallArg::Bool(_)
            | CallArg::Int16(_)
            | CallArg::Int32(_)
            | CallArg::Int64(_)
            | CallArg::Float(_)
            | CallArg::Double(_)
            | CallArg::Timestamp(_)
            | CallArg::Date(_) => Some(CallConv::ByValue),
            CallArg::String(_)
            | CallArg::List(_)
            | CallArg::Tuple(_)
            | CallArg::Opaque(_)
            | CallArg::Row(_) => Some(CallConv::ByPointer),
        }
    }
}

#[derive(Debug, Clone)]
pub enum BoundCall<'a> {
    Invoke(Vec<CallArg<'a>>),
    /// A null reached a non-nullable parameter; the call result is null.
    NullResult,
}

impl BoundCall<'_> {
    pub fn is_null_result(&self) -> bool {
        matches!(self, BoundCall::NullResult)
    }
}

/// Type name for mismatch messages; rows carry their column list.
fn describe(ty: &TypeDescriptor) -> String {
    match ty.kind() {
        TypeKind::Row(schema) => format!("row{}", schema),
        _ => ty.to_string(),
    }
}

fn present<T>(field: Nullable<T>, col: usize) -> Result<T> {
    field
        .into_option()
        .ok_or_else(|| eyre!("column {} changed to null while binding", col))
}

impl FunctionBinding {
    /// Reads `columns[i]` of `view` as argument `i`.
    pub fn bind_args<'a>(&self, view: RowView<'a>, columns: &[usize]) -> Result<BoundCall<'a>> {
        ensure!(
            columns.len() == self.arity(),
            CodecError::schema_mismatch(format!(
                "{} takes {} arguments, {} columns bound",
                self.name(),
                self.arity(),
                columns.len()
            ))
        );

        let mut args = Vec::with_capacity(columns.len());
        for (param, &col) in self.params().iter().zip(columns) {
            let column = view
                .schema()
                .column_type(col)
                .ok_or(CodecError::IndexOutOfBounds {
                    index: col,
                    len: view.column_count(),
                })?;
            ensure!(
                column.erase_nullability() == param.erase_nullability(),
                CodecError::schema_mismatch(format!(
                    "{} expects {} but column {} is {}",
                    self.name(),
                    describe(param),
                    col,
                    describe(column)
                ))
            );

            if view.is_null(col) {
                if !param.is_nullable() {
                    return Ok(BoundCall::NullResult);
                }
                args.push(CallArg::Null);
                continue;
            }

            let arg = match param.kind() {
                TypeKind::Bool => CallArg::Bool(present(view.get(col)?, col)?),
                TypeKind::Int16 => CallArg::Int16(present(view.get(col)?, col)?),
                TypeKind::Int32 => CallArg::Int32(present(view.get(col)?, col)?),
                TypeKind::Int64 => CallArg::Int64(present(view.get(col)?, col)?),
                TypeKind::Float => CallArg::Float(present(view.get(col)?, col)?),
                TypeKind::Double => CallArg::Double(present(view.get(col)?, col)?),
                TypeKind::Timestamp => CallArg::Timestamp(present(view.get(col)?, col)?),
                TypeKind::Date => CallArg::Date(present(view.get(col)?, col)?),
                TypeKind::StringRef => CallArg::String(present(view.get(col)?, col)?),
                TypeKind::List(_) => CallArg::List(present(view.get(col)?, col)?),
                TypeKind::Tuple(_) => CallArg::Tuple(present(view.get(col)?, col)?),
                TypeKind::Opaque(_) => CallArg::Opaque(present(view.get(col)?, col)?),
                TypeKind::Row(_) => CallArg::Row(present(view.get(col)?, col)?),
            };
            args.push(arg);
        }
        Ok(BoundCall::Invoke(args))
    }
}
