//! # Slice Header
//!
//! The first five bytes of every row slice, nested rows included:
//!
//! ```text
//! +---------------------+-----------+
//! | total_len (u32 LE)  | version   |
//! +---------------------+-----------+
//!   bytes 0..4            byte 4
//! ```
//!
//! `total_len` counts the whole slice, header included. The slice-chain
//! framing reads the same field as its length prefix, so a slice can be
//! skipped without knowing its schema.

use eyre::{ensure, Result};
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::{FORMAT_VERSION, LENGTH_PREFIX_SIZE, SLICE_HEADER_SIZE};
use crate::error::CodecError;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct SliceHeader {
    total_len: U32,
    version: u8,
}

const _: () = assert!(std::mem::size_of::<SliceHeader>() == SLICE_HEADER_SIZE);

impl SliceHeader {
    pub fn new(total_len: u32) -> Self {
        Self {
            total_len: U32::new(total_len),
            version: FORMAT_VERSION,
        }
    }

    zerocopy_accessors! {
        total_len: u32,
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= SLICE_HEADER_SIZE,
            CodecError::truncated("slice header", SLICE_HEADER_SIZE, bytes.len())
        );
        Self::ref_from_bytes(&bytes[..SLICE_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse SliceHeader: {:?}", e))
    }

    pub fn from_bytes_mut(bytes: &mut [u8]) -> Result<&mut Self> {
        ensure!(
            bytes.len() >= SLICE_HEADER_SIZE,
            CodecError::truncated("slice header", SLICE_HEADER_SIZE, bytes.len())
        );
        Self::mut_from_bytes(&mut bytes[..SLICE_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to parse SliceHeader: {:?}", e))
    }
}

/// Reads the declared total length from the first four bytes of a slice.
pub fn declared_len(bytes: &[u8]) -> Result<usize> {
    let prefix: [u8; LENGTH_PREFIX_SIZE] = bytes
        .get(..LENGTH_PREFIX_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| CodecError::truncated("length prefix", LENGTH_PREFIX_SIZE, bytes.len()))?;
    Ok(u32::from_le_bytes(prefix) as usize)
}
