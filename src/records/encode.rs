//! # Slice Encoder
//!
//! Turns one `Value` per column into a single contiguous slice. Fixed-width
//! fields are written in place; each variable-width field is encoded into its
//! own payload, then appended to the variable area in schema order and
//! referenced from its slot by `(offset, length)`.
//!
//! The output depends only on `(schema, values)`: null slots and unused
//! bitmap bits are zero, and no padding is inserted, so equal inputs encode
//! to equal bytes.

use eyre::{bail, Result, WrapErr};
use tracing::trace;
use zerocopy::IntoBytes;

use super::header::SliceHeader;
use super::layout::{list_header_len, set_null_bit, tuple_slot_offsets, write_u32};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::schema::Schema;
use crate::types::{TypeDescriptor, TypeKind, Value, WireWidth};

type Field<'t, 'v> = (&'t TypeDescriptor, &'t Value<'v>);

/// Encodes `values` against `schema` with default limits.
pub fn encode_row(schema: &Schema, values: &[Value<'_>]) -> Result<Vec<u8>> {
    encode_row_with(schema, values, &CodecConfig::default())
}

pub fn encode_row_with(
    schema: &Schema,
    values: &[Value<'_>],
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    let buf = encode_slice_bytes(schema, values)?;
    if buf.len() > config.max_slice_len() {
        bail!(CodecError::Overflow {
            size: buf.len(),
            limit: config.max_slice_len(),
        });
    }
    trace!(
        columns = schema.column_count(),
        len = buf.len(),
        "encoded row slice"
    );
    Ok(buf)
}

fn encode_slice_bytes(schema: &Schema, values: &[Value<'_>]) -> Result<Vec<u8>> {
    if values.len() != schema.column_count() {
        bail!(CodecError::schema_mismatch(format!(
            "expected {} values, got {}",
            schema.column_count(),
            values.len()
        )));
    }

    let mut buf = Vec::with_capacity(schema.min_slice_len());
    buf.extend_from_slice(SliceHeader::new(0).as_bytes());

    let fields: Vec<Field<'_, '_>> = schema
        .columns()
        .iter()
        .map(|col| col.data_type())
        .zip(values)
        .collect();
    write_section(&mut buf, &fields, &|idx| {
        let name = schema.column(idx).map_or("", |c| c.name());
        format!("column {} ({})", idx, name)
    })?;

    let total = to_u32(buf.len())?;
    SliceHeader::from_bytes_mut(&mut buf)?.set_total_len(total);
    Ok(buf)
}

/// Appends bitmap, slots and variable data for `fields` to `buf`. Offsets
/// written into slots are relative to the start of `buf`.
fn write_section(
    buf: &mut Vec<u8>,
    fields: &[Field<'_, '_>],
    describe: &dyn Fn(usize) -> String,
) -> Result<()> {
    let bitmap_start = buf.len();
    let slots_start = bitmap_start + fields.len().div_ceil(8);
    let slots_len: usize = fields.iter().map(|(ty, _)| ty.slot_width()).sum();
    buf.resize(slots_start + slots_len, 0);

    let mut slot_pos = slots_start;
    for (idx, (ty, value)) in fields.iter().enumerate() {
        write_field(buf, bitmap_start, idx, slot_pos, ty, value).wrap_err_with(|| describe(idx))?;
        slot_pos += ty.slot_width();
    }
    Ok(())
}

fn write_field(
    buf: &mut Vec<u8>,
    bitmap_start: usize,
    idx: usize,
    slot_pos: usize,
    ty: &TypeDescriptor,
    value: &Value<'_>,
) -> Result<()> {
    if value.is_null() {
        check_nullable(ty)?;
        set_null_bit(&mut buf[bitmap_start..], idx);
        return Ok(());
    }

    match ty.wire_width() {
        WireWidth::Fixed(width) => write_fixed(&mut buf[slot_pos..slot_pos + width], ty, value),
        WireWidth::Variable => {
            let payload = encode_variable(ty, value)?;
            let offset = to_u32(buf.len())?;
            let len = to_u32(payload.len())?;
            write_u32(buf, slot_pos, offset);
            write_u32(buf, slot_pos + 4, len);
            buf.extend_from_slice(&payload);
            Ok(())
        }
    }
}

fn write_fixed(dst: &mut [u8], ty: &TypeDescriptor, value: &Value<'_>) -> Result<()> {
    match (ty.kind(), value) {
        (TypeKind::Bool, Value::Bool(v)) => dst[0] = u8::from(*v),
        (TypeKind::Int16, Value::Int16(v)) => dst.copy_from_slice(&v.to_le_bytes()),
        (TypeKind::Int32, Value::Int32(v)) => dst.copy_from_slice(&v.to_le_bytes()),
        (TypeKind::Int64, Value::Int64(v)) => dst.copy_from_slice(&v.to_le_bytes()),
        (TypeKind::Float, Value::Float(v)) => dst.copy_from_slice(&v.to_le_bytes()),
        (TypeKind::Double, Value::Double(v)) => dst.copy_from_slice(&v.to_le_bytes()),
        (TypeKind::Timestamp, Value::Timestamp(v)) => {
            dst.copy_from_slice(&v.millis().to_le_bytes())
        }
        (TypeKind::Date, Value::Date(v)) => dst.copy_from_slice(&v.packed().to_le_bytes()),
        (TypeKind::Opaque(size), Value::Opaque(bytes)) => {
            if bytes.len() != *size {
                bail!(CodecError::schema_mismatch(format!(
                    "opaque<{}> given {} bytes",
                    size,
                    bytes.len()
                )));
            }
            dst.copy_from_slice(bytes);
        }
        (TypeKind::Tuple(elements), Value::Tuple(items)) => {
            write_fixed_tuple(dst, elements, items)?
        }
        _ => return Err(kind_mismatch(ty, value)),
    }
    Ok(())
}

/// All-fixed tuple stored inline: local bitmap, then element slots.
fn write_fixed_tuple(
    dst: &mut [u8],
    elements: &[TypeDescriptor],
    items: &[Value<'_>],
) -> Result<()> {
    check_arity(elements, items)?;
    let bitmap_len = elements.len().div_ceil(8);
    let (offsets, _) = tuple_slot_offsets(elements);

    for (idx, ((element, item), offset)) in elements.iter().zip(items).zip(offsets).enumerate() {
        if item.is_null() {
            check_nullable(element).wrap_err_with(|| format!("tuple element {}", idx))?;
            set_null_bit(&mut dst[..bitmap_len], idx);
            continue;
        }
        let start = bitmap_len + offset;
        let end = start + element.slot_width();
        write_fixed(&mut dst[start..end], element, item)
            .wrap_err_with(|| format!("tuple element {}", idx))?;
    }
    Ok(())
}

fn encode_variable(ty: &TypeDescriptor, value: &Value<'_>) -> Result<Vec<u8>> {
    match (ty.kind(), value) {
        (TypeKind::StringRef, Value::String(bytes)) => Ok(bytes.to_vec()),
        (TypeKind::List(element), Value::List(items)) => {
            let count = to_u32(items.len())?;
            let mut buf = Vec::with_capacity(list_header_len(items.len(), element).unwrap_or(0));
            buf.extend_from_slice(&count.to_le_bytes());
            let fields: Vec<Field<'_, '_>> =
                items.iter().map(|item| (element.as_ref(), item)).collect();
            write_section(&mut buf, &fields, &|idx| format!("element {}", idx))?;
            Ok(buf)
        }
        (TypeKind::Tuple(elements), Value::Tuple(items)) => {
            check_arity(elements, items)?;
            let mut buf = Vec::new();
            let fields: Vec<Field<'_, '_>> = elements.iter().zip(items).collect();
            write_section(&mut buf, &fields, &|idx| format!("tuple element {}", idx))?;
            Ok(buf)
        }
        (TypeKind::Row(schema), Value::Row(items)) => encode_slice_bytes(schema, items),
        _ => Err(kind_mismatch(ty, value)),
    }
}

fn check_nullable(ty: &TypeDescriptor) -> Result<()> {
    if !ty.is_nullable() {
        bail!(CodecError::schema_mismatch(format!(
            "null given for non-nullable {}",
            ty
        )));
    }
    Ok(())
}

fn check_arity(elements: &[TypeDescriptor], items: &[Value<'_>]) -> Result<()> {
    if elements.len() != items.len() {
        bail!(CodecError::schema_mismatch(format!(
            "tuple of {} elements given {} values",
            elements.len(),
            items.len()
        )));
    }
    Ok(())
}

fn kind_mismatch(ty: &TypeDescriptor, value: &Value<'_>) -> eyre::Report {
    CodecError::schema_mismatch(format!("expected {}, got {}", ty, value.variant_name())).into()
}

fn to_u32(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| {
        CodecError::Overflow {
            size: n,
            limit: u32::MAX as usize,
        }
        .into()
    })
}
