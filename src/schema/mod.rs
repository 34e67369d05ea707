//! # Schema Definition
//!
//! A `Schema` is the ordered list of named column types describing one row
//! slice. Position is the addressing key; names are informational and need
//! not be unique.
//!
//! The schema pre-computes the slice layout once so encode, decode and field
//! reads never re-derive it:
//!
//! - `slot_offsets`: byte offset of each column's slot within the fixed area
//! - `fixed_area_size`: sum of all slot widths
//! - `depth`: deepest List/Tuple/Row nesting among the columns
//!
//! Schemas are immutable after construction and shared by `Arc` between the
//! codec and the function-binding registry, so a compiled function and the
//! buffer it reads agree on field order and width.

use std::fmt;
use std::sync::Arc;

use eyre::{Result, WrapErr};

use crate::config::{CodecConfig, SLICE_HEADER_SIZE};
use crate::types::TypeDescriptor;

pub type SchemaRef = Arc<Schema>;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    name: String,
    data_type: TypeDescriptor,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &TypeDescriptor {
        &self.data_type
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    slot_offsets: Vec<usize>,
    fixed_area_size: usize,
    depth: usize,
}

impl Schema {
    /// Builds a schema with the default nesting limit.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        Self::with_config(columns, &CodecConfig::default())
    }

    pub fn with_config(columns: Vec<ColumnDef>, config: &CodecConfig) -> Result<Self> {
        let mut slot_offsets = Vec::with_capacity(columns.len());
        let mut offset = 0;
        let mut depth = 0;

        for (idx, col) in columns.iter().enumerate() {
            col.data_type
                .validate(config.max_nesting_depth())
                .wrap_err_with(|| format!("column {} ({})", idx, col.name))?;
            slot_offsets.push(offset);
            offset += col.data_type.slot_width();
            depth = depth.max(col.data_type.depth());
        }

        Ok(Self {
            columns,
            slot_offsets,
            fixed_area_size: offset,
            depth,
        })
    }

    /// Schema with columns named `col_0`, `col_1`, ... in the given order.
    pub fn from_types(types: impl IntoIterator<Item = TypeDescriptor>) -> Result<Self> {
        Self::new(
            types
                .into_iter()
                .enumerate()
                .map(|(i, t)| ColumnDef::new(format!("col_{}", i), t))
                .collect(),
        )
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> Option<&ColumnDef> {
        self.columns.get(idx)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_type(&self, idx: usize) -> Option<&TypeDescriptor> {
        self.columns.get(idx).map(|c| &c.data_type)
    }

    /// Position of the first column called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.columns.iter().map(|c| &c.data_type)
    }

    pub fn slot_offset(&self, col_idx: usize) -> usize {
        self.slot_offsets[col_idx]
    }

    pub fn fixed_area_size(&self) -> usize {
        self.fixed_area_size
    }

    pub fn null_bitmap_size(column_count: usize) -> usize {
        column_count.div_ceil(8)
    }

    pub fn bitmap_size(&self) -> usize {
        Self::null_bitmap_size(self.columns.len())
    }

    /// Offset of the first fixed-area byte within a slice.
    pub fn fixed_area_start(&self) -> usize {
        SLICE_HEADER_SIZE + self.bitmap_size()
    }

    /// Smallest slice that can hold this schema: header, bitmap and fixed area.
    pub fn min_slice_len(&self) -> usize {
        self.fixed_area_start() + self.fixed_area_size
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Positional shape of this schema: columns renamed `col_0`, `col_1`,
    /// ... with nullability cleared. Two schemas with equal shapes lay out
    /// every slice identically.
    pub fn erased(&self) -> Schema {
        Schema {
            columns: self
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| ColumnDef::new(format!("col_{}", i), c.data_type.erase_nullability()))
                .collect(),
            slot_offsets: self.slot_offsets.clone(),
            fixed_area_size: self.fixed_area_size,
            depth: self.depth,
        }
    }

    pub fn into_ref(self) -> SchemaRef {
        Arc::new(self)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", col.name, col.data_type)?;
            if col.data_type.is_nullable() {
                f.write_str("?")?;
            }
        }
        f.write_str("]")
    }
}
