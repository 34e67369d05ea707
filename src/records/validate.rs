//! # Slice Validation
//!
//! Decoding is eager: before a `RowView` is handed out, every non-null
//! variable field at every nesting level is checked to lie inside its
//! enclosing section. Views built on a validated slice can then index
//! without re-checking offsets against the wire.
//!
//! Recursion follows the schema, not the data, so its depth is bounded by
//! the schema's nesting depth no matter what the bytes claim.

use eyre::{ensure, Result, WrapErr};

use super::header::{declared_len, SliceHeader};
use super::layout::{list_header_len, null_bit, read_u32, tuple_slot_offsets, var_span};
use crate::config::{FORMAT_VERSION, LIST_COUNT_SIZE, SLICE_HEADER_SIZE};
use crate::error::CodecError;
use crate::schema::Schema;
use crate::types::{TypeDescriptor, TypeKind};

/// Checks `bytes` against `schema` and returns the slice trimmed to its
/// declared length.
pub(crate) fn validate_slice<'a>(schema: &Schema, bytes: &'a [u8]) -> Result<&'a [u8]> {
    let declared = declared_len(bytes)?;
    ensure!(
        bytes.len() >= declared,
        CodecError::truncated("slice", declared, bytes.len())
    );
    ensure!(
        declared >= schema.min_slice_len(),
        CodecError::truncated("slice fixed area", schema.min_slice_len(), declared)
    );

    let data = &bytes[..declared];
    let version = SliceHeader::from_bytes(data)?.version();
    ensure!(
        version == FORMAT_VERSION,
        CodecError::VersionMismatch {
            found: version,
            expected: FORMAT_VERSION,
        }
    );

    let bitmap = &data[SLICE_HEADER_SIZE..schema.fixed_area_start()];
    for (idx, col) in schema.columns().iter().enumerate() {
        let ty = col.data_type();
        if !ty.is_variable() || null_bit(bitmap, idx) {
            continue;
        }
        let slot_pos = schema.fixed_area_start() + schema.slot_offset(idx);
        validate_variable(data, slot_pos, ty)
            .wrap_err_with(|| format!("column {} ({})", idx, col.name()))?;
    }
    Ok(data)
}

fn validate_variable(section: &[u8], slot_pos: usize, ty: &TypeDescriptor) -> Result<()> {
    let span = var_span(section, slot_pos)?;
    validate_payload(&section[span], ty)
}

fn validate_payload(payload: &[u8], ty: &TypeDescriptor) -> Result<()> {
    match ty.kind() {
        TypeKind::List(element) => {
            let count = read_u32(payload, 0, "list count")? as usize;
            let header_len = list_header_len(count, element).unwrap_or(usize::MAX);
            ensure!(
                payload.len() >= header_len,
                CodecError::truncated("list slots", header_len, payload.len())
            );
            if !element.is_variable() {
                return Ok(());
            }

            let bitmap = &payload[LIST_COUNT_SIZE..];
            let slots_start = LIST_COUNT_SIZE + count.div_ceil(8);
            for idx in 0..count {
                if null_bit(bitmap, idx) {
                    continue;
                }
                validate_variable(payload, slots_start + idx * element.slot_width(), element)
                    .wrap_err_with(|| format!("element {}", idx))?;
            }
            Ok(())
        }
        TypeKind::Tuple(elements) => {
            let bitmap_len = elements.len().div_ceil(8);
            let (offsets, slots_len) = tuple_slot_offsets(elements);
            ensure!(
                payload.len() >= bitmap_len + slots_len,
                CodecError::truncated("tuple slots", bitmap_len + slots_len, payload.len())
            );
            for (idx, (element, offset)) in elements.iter().zip(offsets).enumerate() {
                if !element.is_variable() || null_bit(payload, idx) {
                    continue;
                }
                validate_variable(payload, bitmap_len + offset, element)
                    .wrap_err_with(|| format!("tuple element {}", idx))?;
            }
            Ok(())
        }
        TypeKind::Row(schema) => validate_slice(schema, payload).map(|_| ()),
        _ => Ok(()),
    }
}
