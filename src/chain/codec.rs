//! # Slice-Chain Framing
//!
//! A row travels as its slices appended back to back. No extra framing is
//! written: every slice starts with its own `total_len`, which the decoder
//! reads as the length prefix.
//!
//! ```text
//! offset                                                    offset + size
//!   |<---------- slice 0 ---------->|<------- slice 1 ------->|
//!   [len0 | ver | bitmap | ...      ][len1 | ver | ...        ]
//! ```
//!
//! The slice count is not on the wire; the receiver passes it in alongside
//! `offset` and `size`. Decoding checks that exactly `slice_count` slices
//! tile the `size` bytes.

use std::borrow::Cow;

use eyre::{bail, ensure, Result, WrapErr};
use tracing::{debug, trace};

use super::buffer::BufferChain;
use super::row::Row;
use crate::config::LENGTH_PREFIX_SIZE;
use crate::error::CodecError;
use crate::records::header::declared_len;

/// Appends every slice of `row` to `chain` and returns the bytes written.
/// All slices are checked before the first append, so a failed call leaves
/// the chain untouched.
pub fn encode_chain<C: BufferChain + ?Sized>(row: &Row<'_>, chain: &mut C) -> Result<usize> {
    let mut framed = Vec::with_capacity(row.slice_count());
    for (idx, slice) in row.slices().enumerate() {
        let declared = framed_len(slice)
            .wrap_err_with(|| format!("slice {} of {}", idx, row.slice_count()))?;
        framed.push(&slice[..declared]);
    }

    let mut total = 0;
    for slice in framed {
        chain.append(slice);
        total += slice.len();
    }
    trace!(
        slices = row.slice_count(),
        bytes = total,
        "encoded row into buffer chain"
    );
    Ok(total)
}

/// Appends one raw slice to `chain`.
pub fn encode_slice<C: BufferChain + ?Sized>(slice: &[u8], chain: &mut C) -> Result<usize> {
    let declared = framed_len(slice)?;
    chain.append(&slice[..declared]);
    trace!(bytes = declared, "encoded slice into buffer chain");
    Ok(declared)
}

fn framed_len(slice: &[u8]) -> Result<usize> {
    let declared = declared_len(slice)?;
    ensure!(
        declared >= LENGTH_PREFIX_SIZE,
        CodecError::truncated("slice length", LENGTH_PREFIX_SIZE, declared)
    );
    ensure!(
        slice.len() >= declared,
        CodecError::truncated("slice", declared, slice.len())
    );
    Ok(declared)
}

/// Reads `slice_count` slices occupying exactly `size` bytes at `offset`.
///
/// `SliceCountMismatch::found` is the number of whole slices that tile the
/// window. A frame cut short, prefix included, is `Truncated` wherever it
/// sits, even past the expected count.
pub fn decode_chain<'c, C: BufferChain + ?Sized>(
    chain: &'c C,
    offset: usize,
    size: usize,
    slice_count: usize,
) -> Result<Row<'c>> {
    let end = offset.checked_add(size).unwrap_or(usize::MAX);
    ensure!(
        chain.len() >= end,
        CodecError::truncated("buffer chain", end, chain.len())
    );

    // Every slice holds at least its prefix, so the window bounds the count.
    let mut row = Row::with_capacity(slice_count.min(size / LENGTH_PREFIX_SIZE));
    let mut pos = offset;
    let mut remaining = size;

    for found in 0..slice_count {
        if remaining == 0 {
            bail!(CodecError::SliceCountMismatch {
                expected: slice_count,
                found,
            });
        }

        let declared = frame_len(chain, pos, remaining)?;
        let slice = chain.read(pos, declared)?;
        if let Cow::Owned(_) = slice {
            debug!(
                offset = pos,
                len = declared,
                "materialized slice spanning chain segments"
            );
        }
        row.push_slice(slice);
        pos += declared;
        remaining -= declared;
    }

    if remaining != 0 {
        let mut found = slice_count;
        while remaining != 0 {
            let declared = frame_len(chain, pos, remaining)?;
            pos += declared;
            remaining -= declared;
            found += 1;
        }
        bail!(CodecError::SliceCountMismatch {
            expected: slice_count,
            found,
        });
    }

    trace!(
        offset,
        size,
        slices = slice_count,
        "decoded row from buffer chain"
    );
    Ok(row)
}

/// Length of the frame at `pos`, checked against the `remaining` window.
fn frame_len<C: BufferChain + ?Sized>(chain: &C, pos: usize, remaining: usize) -> Result<usize> {
    ensure!(
        remaining >= LENGTH_PREFIX_SIZE,
        CodecError::truncated("length prefix", LENGTH_PREFIX_SIZE, remaining)
    );
    let declared = declared_len(&chain.read(pos, LENGTH_PREFIX_SIZE)?)?;
    ensure!(
        declared >= LENGTH_PREFIX_SIZE,
        CodecError::truncated("slice length", LENGTH_PREFIX_SIZE, declared)
    );
    ensure!(
        declared <= remaining,
        CodecError::truncated("slice", declared, remaining)
    );
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::chain::IoBuf;
    use crate::records::encode_row;
    use crate::schema::Schema;
    use crate::types::{TypeDescriptor, Value};

    fn slice_of(len: u32) -> Vec<u8> {
        let mut slice = vec![0u8; len as usize];
        slice[..4].copy_from_slice(&len.to_le_bytes());
        slice
    }

    fn codec_err(err: &eyre::Report) -> &CodecError {
        err.downcast_ref::<CodecError>().unwrap()
    }

    #[test]
    fn single_slice_round_trips_borrowed() {
        let schema = Schema::from_types([TypeDescriptor::int64()]).unwrap();
        let slice = encode_row(&schema, &[Value::Int64(42)]).unwrap();

        let mut chain = IoBuf::new();
        let written = encode_chain(&Row::new(&slice[..]), &mut chain).unwrap();
        assert_eq!(written, slice.len());

        let row = decode_chain(&chain, 0, written, 1).unwrap();
        assert_eq!(row.slice(0), Some(&slice[..]));
        assert!(row.is_borrowed(0));
    }

    #[test]
    fn encode_appends_only_declared_bytes() {
        let mut slice = slice_of(6);
        slice.extend_from_slice(&[0xEE; 3]);

        let mut chain = IoBuf::new();
        assert_eq!(encode_slice(&slice, &mut chain).unwrap(), 6);
        assert_eq!(chain.len(), 6);
    }

    #[test]
    fn encode_rejects_short_slice_without_appending() {
        let good = slice_of(5);
        let mut bad = slice_of(9);
        bad.truncate(7);

        let mut chain = IoBuf::new();
        let err = encode_chain(&Row::from_slices([&good[..], &bad[..]]), &mut chain).unwrap_err();
        assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
        assert!(chain.is_empty());
    }

    #[test]
    fn spanning_slice_is_materialized() {
        let bytes = [slice_of(6), slice_of(8)].concat();
        let chain: IoBuf = [Bytes::copy_from_slice(&bytes[..4]), Bytes::copy_from_slice(&bytes[4..])]
            .into_iter()
            .collect();

        let row = decode_chain(&chain, 0, 14, 2).unwrap();
        assert!(!row.is_borrowed(0));
        assert!(row.is_borrowed(1));
        assert_eq!(row.slice(0), Some(&bytes[..6]));
        assert_eq!(row.slice(1), Some(&bytes[6..]));
    }

    #[test]
    fn decode_at_offset_skips_leading_bytes() {
        let mut chain = IoBuf::new();
        chain.append(b"junk");
        encode_slice(&slice_of(7), &mut chain).unwrap();

        let row = decode_chain(&chain, 4, 7, 1).unwrap();
        assert_eq!(row.total_size(), 7);
    }

    #[test]
    fn chain_shorter_than_range_is_truncated() {
        let chain = IoBuf::from(slice_of(8));
        let err = decode_chain(&chain, 2, 8, 1).unwrap_err();
        assert_eq!(
            codec_err(&err),
            &CodecError::Truncated {
                what: "buffer chain",
                needed: 10,
                available: 8,
            }
        );
    }

    #[test]
    fn declared_length_past_size_is_truncated() {
        let chain = IoBuf::from(slice_of(8));
        let err = decode_chain(&chain, 0, 6, 1).unwrap_err();
        assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
    }

    #[test]
    fn declared_length_below_prefix_is_truncated() {
        let mut bytes = slice_of(8);
        bytes[0] = 2;
        let chain = IoBuf::from(bytes);
        let err = decode_chain(&chain, 0, 8, 1).unwrap_err();
        assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
    }

    #[test]
    fn cut_off_prefix_is_truncated() {
        let bytes = [slice_of(6), vec![0, 0]].concat();
        let chain = IoBuf::from(bytes);
        let err = decode_chain(&chain, 0, 8, 2).unwrap_err();
        assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
    }

    #[test]
    fn too_few_slices_is_count_mismatch() {
        let chain = IoBuf::from(slice_of(6));
        let err = decode_chain(&chain, 0, 6, 2).unwrap_err();
        assert_eq!(
            codec_err(&err),
            &CodecError::SliceCountMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn leftover_slices_are_counted() {
        let chain = IoBuf::from([slice_of(6), slice_of(5), slice_of(4)].concat());
        let err = decode_chain(&chain, 0, 15, 1).unwrap_err();
        assert_eq!(
            codec_err(&err),
            &CodecError::SliceCountMismatch {
                expected: 1,
                found: 3
            }
        );
    }

    #[test]
    fn partial_leftover_is_truncated() {
        let chain = IoBuf::from([slice_of(6), vec![9, 0]].concat());
        let err = decode_chain(&chain, 0, 8, 1).unwrap_err();
        assert!(matches!(codec_err(&err), CodecError::Truncated { .. }));
    }

    #[test]
    fn huge_slice_count_is_count_mismatch() {
        let slice = slice_of(6);
        let chain = IoBuf::from(slice.clone());
        let err = decode_chain(&chain, 0, slice.len(), usize::MAX).unwrap_err();
        assert_eq!(
            codec_err(&err),
            &CodecError::SliceCountMismatch {
                expected: usize::MAX,
                found: 1
            }
        );

        let err = decode_chain(&chain, 0, slice.len(), 1 << 40).unwrap_err();
        assert!(matches!(
            codec_err(&err),
            CodecError::SliceCountMismatch { found: 1, .. }
        ));
    }

    #[test]
    fn zero_slices_in_zero_bytes_is_empty_row() {
        let chain = IoBuf::new();
        let row = decode_chain(&chain, 0, 0, 0).unwrap();
        assert_eq!(row.slice_count(), 0);
    }
}
