//! # Row Slice Codec
//!
//! A row slice is one contiguous, self-describing buffer holding every
//! column of a schema. Column access is O(1): the schema pre-computes each
//! column's slot position, so reading column N never parses columns 0..N.
//!
//! ## Slice Binary Layout
//!
//! ```text
//! +----------------+---------+----------------+----------------+---------------+
//! | total_len u32  | version | null bitmap    | fixed area     | variable data |
//! | (LE)           | u8      | [u8; (N+7)/8]  | one slot/col   | concatenated  |
//! +----------------+---------+----------------+----------------+---------------+
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | **total_len** | Whole slice size, header included; doubles as the chain length prefix |
//! | **version** | Format tag, currently `1` |
//! | **Null Bitmap** | Bit `i % 8` of byte `i / 8` set means column `i` is null |
//! | **Fixed Area** | Fixed-width values in place; `(offset u32, length u32)` for variable ones |
//! | **Variable Data** | Payloads of non-null variable columns in schema order |
//!
//! Variable offsets are measured from the slice start. Null slots are zero
//! filled on encode and never read on decode.
//!
//! ## Storage Classes
//!
//! | Class | Types | Storage |
//! |-------|-------|---------|
//! | **Fixed** | bool, ints, floats, timestamp, date, opaque<N>, all-fixed tuple | In the slot |
//! | **Variable** | string, list, row, tuple with a variable element | Slot points into variable data |
//!
//! ## Module Structure
//!
//! - `header`: zerocopy `SliceHeader`
//! - `layout`: bitmap and slot helpers shared by every section
//! - `encode`: `encode_row`, `encode_row_with`
//! - `validate`: eager recursive bounds checks run on decode
//! - `view`: `RowView` and the `FieldValue` trait
//! - `nested`: `ListView` and `TupleView`
//! - `builder`: `RowBuilder` for incremental construction
//! - `codec`: `RowCodec` bundling a schema with `CodecConfig`

pub mod builder;
pub mod codec;
pub mod encode;
pub mod header;
mod layout;
pub mod nested;
mod validate;
pub mod view;

#[cfg(test)]
mod tests;

pub use builder::RowBuilder;
pub use codec::{decode_row, RowCodec};
pub use encode::{encode_row, encode_row_with};
pub use header::SliceHeader;
pub use nested::{ListView, TupleView};
pub use view::{FieldValue, RowView};
