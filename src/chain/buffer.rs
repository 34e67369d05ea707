//! # Buffer Chains
//!
//! The transport hands the codec an ordered sequence of byte ranges rather
//! than one flat buffer. `BufferChain` is the seam: append at the end, and
//! read `size` bytes at a logical `offset`. A read that falls inside one
//! segment is borrowed; a read that spans segments is copied, and callers
//! only see a `Cow` either way.
//!
//! `IoBuf` is the in-memory chain used by tests and by callers that
//! assemble frames themselves. Its segments are `bytes::Bytes`, so
//! appending received buffers is zero-copy.
//!
//! ```text
//!   segment 0        segment 1            segment 2
//! [..........][.....................][..........]
//!        ^-- read(8, 20) spans 0..1: copied
//!                  ^-- read(14, 6) inside 1: borrowed
//! ```

use std::borrow::Cow;

use bytes::Bytes;
use eyre::Result;

use crate::error::CodecError;

pub trait BufferChain {
    fn append(&mut self, bytes: &[u8]);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `size` bytes starting at logical `offset`. Fails with
    /// `Truncated` when the range runs past the end of the chain.
    fn read(&self, offset: usize, size: usize) -> Result<Cow<'_, [u8]>>;
}

#[derive(Debug, Clone, Default)]
pub struct IoBuf {
    segments: Vec<Bytes>,
    starts: Vec<usize>,
    len: usize,
}

impl IoBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment without copying. Empty segments are dropped.
    pub fn append_bytes(&mut self, bytes: Bytes) {
        if bytes.is_empty() {
            return;
        }
        self.starts.push(self.len);
        self.len += bytes.len();
        self.segments.push(bytes);
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Bytes] {
        &self.segments
    }

    /// Flattens the chain into one buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out
    }

    fn segment_index(&self, offset: usize) -> usize {
        self.starts.partition_point(|start| *start <= offset) - 1
    }
}

impl BufferChain for IoBuf {
    fn append(&mut self, bytes: &[u8]) {
        self.append_bytes(Bytes::copy_from_slice(bytes));
    }

    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, offset: usize, size: usize) -> Result<Cow<'_, [u8]>> {
        let end = offset
            .checked_add(size)
            .filter(|end| *end <= self.len)
            .ok_or_else(|| {
                CodecError::truncated("buffer chain", offset.saturating_add(size), self.len)
            })?;
        if size == 0 {
            return Ok(Cow::Borrowed(&[]));
        }

        let first = self.segment_index(offset);
        let local = offset - self.starts[first];
        let segment = &self.segments[first];
        if local + size <= segment.len() {
            return Ok(Cow::Borrowed(&segment[local..local + size]));
        }

        let mut out = Vec::with_capacity(size);
        out.extend_from_slice(&segment[local..]);
        for segment in &self.segments[first + 1..] {
            let take = (end - offset - out.len()).min(segment.len());
            out.extend_from_slice(&segment[..take]);
            if out.len() == size {
                break;
            }
        }
        Ok(Cow::Owned(out))
    }
}

impl FromIterator<Bytes> for IoBuf {
    fn from_iter<I: IntoIterator<Item = Bytes>>(iter: I) -> Self {
        let mut buf = IoBuf::new();
        for bytes in iter {
            buf.append_bytes(bytes);
        }
        buf
    }
}

impl From<Vec<u8>> for IoBuf {
    fn from(bytes: Vec<u8>) -> Self {
        std::iter::once(Bytes::from(bytes)).collect()
    }
}
