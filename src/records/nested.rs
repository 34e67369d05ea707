//! # Nested Payload Views
//!
//! `ListView` and `TupleView` read the payloads of list and tuple fields
//! in place, with the same typed-read rules as `RowView`.
//!
//! ## List Payload
//!
//! ```text
//! +-------------+------------------+--------------------+---------------+
//! | count (u32) | bitmap           | slots              | variable data |
//! |             | [u8; (n+7)/8]    | n * slot width     |               |
//! +-------------+------------------+--------------------+---------------+
//! ```
//!
//! Every element shares one descriptor, so element `i`'s slot sits at
//! `4 + bitmap + i * slot_width`. Variable element offsets are relative to
//! the list payload start.
//!
//! ## Tuple Payload
//!
//! A local bitmap followed by one slot per element. An all-fixed tuple is
//! stored inline in its parent's slot; otherwise the same layout lives in
//! the variable area with local variable data after the slots.

use eyre::{ensure, Result};

use super::layout::{list_header_len, null_bit, read_u32, tuple_slot_offsets, SlotOffsets};
use super::view::{typed_field, FieldValue};
use crate::config::LIST_COUNT_SIZE;
use crate::error::CodecError;
use crate::types::{Nullable, TypeDescriptor, Value};

#[derive(Debug, Clone, Copy)]
pub struct ListView<'a> {
    data: &'a [u8],
    element: &'a TypeDescriptor,
    len: usize,
}

impl<'a> ListView<'a> {
    pub(crate) fn new(data: &'a [u8], element: &'a TypeDescriptor) -> Result<Self> {
        let len = read_u32(data, 0, "list count")? as usize;
        let header_len = list_header_len(len, element).unwrap_or(usize::MAX);
        ensure!(
            data.len() >= header_len,
            CodecError::truncated("list slots", header_len, data.len())
        );
        Ok(Self { data, element, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn element_type(&self) -> &'a TypeDescriptor {
        self.element
    }

    pub fn is_null(&self, idx: usize) -> bool {
        idx < self.len && null_bit(&self.data[LIST_COUNT_SIZE..], idx)
    }

    fn slot_pos(&self, idx: usize) -> usize {
        LIST_COUNT_SIZE + self.len.div_ceil(8) + idx * self.element.slot_width()
    }

    pub fn get<T: FieldValue<'a>>(&self, idx: usize) -> Result<Nullable<T>> {
        ensure!(
            idx < self.len,
            CodecError::IndexOutOfBounds {
                index: idx,
                len: self.len,
            }
        );
        typed_field(idx, self.element, self.is_null(idx), self.data, self.slot_pos(idx))
    }

    pub fn get_value(&self, idx: usize) -> Result<Value<'a>> {
        Ok(self.get::<Value<'a>>(idx)?.unwrap_or(Value::Null))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Value<'a>>> + 'a {
        let view = *self;
        (0..view.len).map(move |i| view.get_value(i))
    }

    pub fn values(&self) -> Result<Vec<Value<'a>>> {
        self.iter().collect()
    }
}

#[derive(Debug, Clone)]
pub struct TupleView<'a> {
    data: &'a [u8],
    elements: &'a [TypeDescriptor],
    slots: SlotOffsets,
}

impl<'a> TupleView<'a> {
    pub(crate) fn new(data: &'a [u8], elements: &'a [TypeDescriptor]) -> Result<Self> {
        let bitmap_len = elements.len().div_ceil(8);
        let (mut slots, slots_len) = tuple_slot_offsets(elements);
        let needed = bitmap_len + slots_len;
        ensure!(
            data.len() >= needed,
            CodecError::truncated("tuple slots", needed, data.len())
        );
        for slot in slots.iter_mut() {
            *slot += bitmap_len;
        }
        Ok(Self {
            data,
            elements,
            slots,
        })
    }

    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    pub fn element_types(&self) -> &'a [TypeDescriptor] {
        self.elements
    }

    pub fn is_null(&self, idx: usize) -> bool {
        idx < self.arity() && null_bit(self.data, idx)
    }

    pub fn get<T: FieldValue<'a>>(&self, idx: usize) -> Result<Nullable<T>> {
        let ty = self.elements.get(idx).ok_or(CodecError::IndexOutOfBounds {
            index: idx,
            len: self.arity(),
        })?;
        typed_field(idx, ty, self.is_null(idx), self.data, self.slots[idx])
    }

    pub fn get_value(&self, idx: usize) -> Result<Value<'a>> {
        Ok(self.get::<Value<'a>>(idx)?.unwrap_or(Value::Null))
    }

    pub fn values(&self) -> Result<Vec<Value<'a>>> {
        (0..self.arity()).map(|i| self.get_value(i)).collect()
    }
}
