//! # Logical Row
//!
//! A `Row` is an ordered list of slices that together make one logical
//! row, e.g. the left and right halves of a join output. Each slice is
//! either borrowed from a transport buffer or owned; decoding only owns a
//! slice when the chain could not present it contiguously.

use std::borrow::Cow;

use eyre::Result;
use smallvec::SmallVec;

use crate::error::CodecError;
use crate::records::RowView;
use crate::schema::Schema;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row<'a> {
    slices: SmallVec<[Cow<'a, [u8]>; 2]>,
}

impl<'a> Row<'a> {
    pub fn new(slice: impl Into<Cow<'a, [u8]>>) -> Self {
        let mut row = Self::default();
        row.push_slice(slice);
        row
    }

    pub fn from_slices<I, S>(slices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, [u8]>>,
    {
        Self {
            slices: slices.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn with_capacity(slices: usize) -> Self {
        Self {
            slices: SmallVec::with_capacity(slices),
        }
    }

    pub fn push_slice(&mut self, slice: impl Into<Cow<'a, [u8]>>) {
        self.slices.push(slice.into());
    }

    pub fn slice(&self, idx: usize) -> Option<&[u8]> {
        self.slices.get(idx).map(|s| s.as_ref())
    }

    pub fn slices(&self) -> impl Iterator<Item = &[u8]> {
        self.slices.iter().map(|s| s.as_ref())
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    /// Sum of slice lengths; the number of bytes `encode_chain` appends.
    pub fn total_size(&self) -> usize {
        self.slices.iter().map(|s| s.len()).sum()
    }

    /// True when slice `idx` points into the buffer it was decoded from.
    pub fn is_borrowed(&self, idx: usize) -> bool {
        matches!(self.slices.get(idx), Some(Cow::Borrowed(_)))
    }

    /// Decodes slice `idx` against `schema`.
    pub fn view<'s>(&'s self, idx: usize, schema: &'s Schema) -> Result<RowView<'s>> {
        let slice = self.slice(idx).ok_or(CodecError::IndexOutOfBounds {
            index: idx,
            len: self.slice_count(),
        })?;
        RowView::new(slice, schema)
    }

    /// Copies every borrowed slice so the row outlives its source buffer.
    pub fn into_owned(self) -> Row<'static> {
        Row {
            slices: self
                .slices
                .into_iter()
                .map(|s| Cow::Owned(s.into_owned()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_tracks_slices_in_order() {
        let a = vec![1u8, 2, 3];
        let mut row = Row::new(&a[..]);
        row.push_slice(vec![4u8, 5]);

        assert_eq!(row.slice_count(), 2);
        assert_eq!(row.total_size(), 5);
        assert_eq!(row.slice(1), Some(&[4u8, 5][..]));
        assert!(row.is_borrowed(0));
        assert!(!row.is_borrowed(1));
        assert!(!row.is_borrowed(2));
        assert_eq!(row.slices().collect::<Vec<_>>(), vec![&[1u8, 2, 3][..], &[4u8, 5][..]]);
    }

    #[test]
    fn into_owned_detaches_from_source() {
        let source = vec![9u8; 4];
        let row = Row::from_slices([&source[..2], &source[2..]]);
        let owned = row.into_owned();
        drop(source);

        assert_eq!(owned.slice_count(), 2);
        assert!(!owned.is_borrowed(0));
        assert_eq!(owned.slice(0), Some(&[9u8, 9][..]));
    }

    #[test]
    fn view_of_missing_slice_is_out_of_bounds() {
        let schema = Schema::new(vec![]).unwrap();
        let row = Row::default();
        let err = row.view(0, &schema).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CodecError>(),
            Some(&CodecError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }
}
