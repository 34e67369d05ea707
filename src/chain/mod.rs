//! # Multi-Slice Rows and Chain Transport
//!
//! A logical [`Row`] is one or more row slices. Rows move between operators
//! and nodes by appending their slices to a [`BufferChain`] and reading them
//! back by `(offset, size, slice_count)`.
//!
//! ## Zero-Copy Decode
//!
//! `decode_chain` borrows each slice straight out of the chain whenever the
//! chain can present it contiguously. Only a slice that straddles two
//! segments is copied, and `Row::is_borrowed` reports which.
//!
//! ## Usage
//!
//! ```ignore
//! let mut chain = IoBuf::new();
//! let size = encode_chain(&Row::from_slices([&left[..], &right[..]]), &mut chain)?;
//!
//! let row = decode_chain(&chain, 0, size, 2)?;
//! let left = row.view(0, &left_schema)?;
//! let right = row.view(1, &right_schema)?;
//! ```

mod buffer;
mod codec;
mod row;

pub use buffer::{BufferChain, IoBuf};
pub use codec::{decode_chain, encode_chain, encode_slice};
pub use row::Row;
