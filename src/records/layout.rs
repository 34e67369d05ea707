//! # Section Layout Helpers
//!
//! A row slice, a list payload and a variable tuple payload all share one
//! shape, called a section here:
//!
//! ```text
//! +------------+-------------+----------------+---------------+
//! | prefix     | null bitmap | slots          | variable data |
//! +------------+-------------+----------------+---------------+
//! ```
//!
//! | Section | Prefix | Offsets relative to |
//! |---------|--------|---------------------|
//! | row slice | 5-byte slice header | slice start |
//! | list | `count: u32` | list payload start |
//! | tuple (variable) | none | tuple payload start |
//! | tuple (fixed, inline) | none | no variable data |
//!
//! A variable slot is `offset: u32 LE` then `length: u32 LE`. These helpers
//! never panic on short input; every read is bounds-checked and reports
//! `Truncated`.

use eyre::Result;
use smallvec::SmallVec;

use crate::config::LIST_COUNT_SIZE;
use crate::error::CodecError;
use crate::types::TypeDescriptor;

/// Slot offsets of tuple elements, measured from the end of the tuple's
/// local null bitmap.
pub(crate) type SlotOffsets = SmallVec<[usize; 8]>;

#[inline]
pub(crate) fn set_null_bit(bitmap: &mut [u8], idx: usize) {
    bitmap[idx / 8] |= 1 << (idx % 8);
}

#[inline]
pub(crate) fn null_bit(bitmap: &[u8], idx: usize) -> bool {
    bitmap
        .get(idx / 8)
        .is_some_and(|byte| byte & (1 << (idx % 8)) != 0)
}

pub(crate) fn read_u32(bytes: &[u8], pos: usize, what: &'static str) -> Result<u32> {
    let raw: [u8; 4] = pos
        .checked_add(4)
        .and_then(|end| bytes.get(pos..end))
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| CodecError::truncated(what, pos.saturating_add(4), bytes.len()))?;
    Ok(u32::from_le_bytes(raw))
}

pub(crate) fn write_u32(dst: &mut [u8], pos: usize, value: u32) {
    dst[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}

/// Resolves the `(offset, length)` slot at `slot_pos` to a byte range of
/// `section`.
pub(crate) fn var_span(section: &[u8], slot_pos: usize) -> Result<std::ops::Range<usize>> {
    let offset = read_u32(section, slot_pos, "variable slot")? as usize;
    let len = read_u32(section, slot_pos + 4, "variable slot")? as usize;
    let end = offset
        .checked_add(len)
        .ok_or_else(|| CodecError::truncated("variable field", usize::MAX, section.len()))?;
    if end > section.len() {
        return Err(CodecError::truncated("variable field", end, section.len()).into());
    }
    Ok(offset..end)
}

/// Bytes of one field: the slot itself for fixed types, the referenced
/// payload for variable ones.
pub(crate) fn field_bytes<'a>(
    section: &'a [u8],
    slot_pos: usize,
    ty: &TypeDescriptor,
) -> Result<&'a [u8]> {
    match ty.wire_width().fixed() {
        Some(width) => slot_pos
            .checked_add(width)
            .and_then(|end| section.get(slot_pos..end))
            .ok_or_else(|| {
                CodecError::truncated("fixed field", slot_pos.saturating_add(width), section.len())
                    .into()
            }),
        None => {
            let span = var_span(section, slot_pos)?;
            Ok(&section[span])
        }
    }
}

pub(crate) fn tuple_slot_offsets(elements: &[TypeDescriptor]) -> (SlotOffsets, usize) {
    let mut offsets = SlotOffsets::with_capacity(elements.len());
    let mut pos = 0;
    for element in elements {
        offsets.push(pos);
        pos += element.slot_width();
    }
    (offsets, pos)
}

/// Bytes taken by a list's count, bitmap and slots, or `None` when `count`
/// elements could not fit in addressable memory.
pub(crate) fn list_header_len(count: usize, element: &TypeDescriptor) -> Option<usize> {
    let slots = count.checked_mul(element.slot_width())?;
    LIST_COUNT_SIZE
        .checked_add(count.div_ceil(8))?
        .checked_add(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_bits_are_lsb_first() {
        let mut bitmap = [0u8; 2];
        set_null_bit(&mut bitmap, 0);
        set_null_bit(&mut bitmap, 9);
        assert_eq!(bitmap, [0b0000_0001, 0b0000_0010]);
        assert!(null_bit(&bitmap, 9));
        assert!(!null_bit(&bitmap, 8));
        assert!(!null_bit(&bitmap, 64));
    }

    #[test]
    fn var_span_rejects_out_of_bounds_pair() {
        let mut section = vec![0u8; 12];
        write_u32(&mut section, 0, 10);
        write_u32(&mut section, 4, 3);
        let err = var_span(&section, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::Truncated { needed: 13, .. })
        ));
    }

    #[test]
    fn var_span_survives_offset_overflow() {
        let mut section = vec![0u8; 8];
        write_u32(&mut section, 0, u32::MAX);
        write_u32(&mut section, 4, u32::MAX);
        assert!(var_span(&section, 0).is_err());
    }

    #[test]
    fn tuple_offsets_mix_fixed_and_variable_slots() {
        let (offsets, total) = tuple_slot_offsets(&[
            TypeDescriptor::int32(),
            TypeDescriptor::string(),
            TypeDescriptor::bool(),
        ]);
        assert_eq!(offsets.as_slice(), &[0, 4, 12]);
        assert_eq!(total, 13);
    }

    #[test]
    fn list_header_len_detects_overflow() {
        assert_eq!(list_header_len(3, &TypeDescriptor::int64()), Some(4 + 1 + 24));
        assert_eq!(list_header_len(usize::MAX, &TypeDescriptor::int64()), None);
    }
}
