//! # RowBuilder - Slice Construction
//!
//! `RowBuilder` collects one value per column through typed setters and
//! encodes them with [`encode_row_with`]. Unset columns stay null, so a
//! non-nullable column that was never set fails at `build()` with
//! `SchemaMismatch`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut builder = RowBuilder::new(&schema);
//! builder.set_int32(0, 42)?;
//! builder.set_string(1, "hello")?;
//! let data = builder.build()?;
//!
//! // Reuse builder for next row
//! builder.reset();
//! builder.set_int32(0, 100)?;
//! ```

use std::borrow::Cow;

use eyre::{ensure, Result};

use super::encode::encode_row_with;
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::schema::Schema;
use crate::types::{Date, Timestamp, Value};

pub struct RowBuilder<'a> {
    schema: &'a Schema,
    config: CodecConfig,
    values: Vec<Value<'a>>,
}

impl<'a> RowBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_config(schema, CodecConfig::default())
    }

    pub fn with_config(schema: &'a Schema, config: CodecConfig) -> Self {
        Self {
            schema,
            config,
            values: vec![Value::Null; schema.column_count()],
        }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn reset(&mut self) {
        self.values.fill(Value::Null);
    }

    /// Sets a column from any value; the variant must fit the column's kind.
    pub fn set(&mut self, col_idx: usize, value: impl Into<Value<'a>>) -> Result<()> {
        let ty = self
            .schema
            .column_type(col_idx)
            .ok_or(CodecError::IndexOutOfBounds {
                index: col_idx,
                len: self.schema.column_count(),
            })?;
        let value = value.into();
        ensure!(
            value.fits_kind(ty),
            CodecError::schema_mismatch(format!(
                "column {} is {}, got {}",
                col_idx,
                ty,
                value.variant_name()
            ))
        );
        self.values[col_idx] = value;
        Ok(())
    }

    pub fn set_null(&mut self, col_idx: usize) -> Result<()> {
        self.set(col_idx, Value::Null)
    }

    pub fn set_bool(&mut self, col_idx: usize, value: bool) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_int16(&mut self, col_idx: usize, value: i16) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_int32(&mut self, col_idx: usize, value: i32) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_int64(&mut self, col_idx: usize, value: i64) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_float(&mut self, col_idx: usize, value: f32) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_double(&mut self, col_idx: usize, value: f64) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_timestamp(&mut self, col_idx: usize, value: Timestamp) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_date(&mut self, col_idx: usize, value: Date) -> Result<()> {
        self.set(col_idx, value)
    }

    pub fn set_string(&mut self, col_idx: usize, value: &str) -> Result<()> {
        self.set(col_idx, Value::String(Cow::Owned(value.as_bytes().to_vec())))
    }

    pub fn set_opaque(&mut self, col_idx: usize, value: &[u8]) -> Result<()> {
        self.set(col_idx, Value::Opaque(Cow::Owned(value.to_vec())))
    }

    pub fn set_list(&mut self, col_idx: usize, elements: Vec<Value<'a>>) -> Result<()> {
        self.set(col_idx, Value::List(elements))
    }

    pub fn set_tuple(&mut self, col_idx: usize, elements: Vec<Value<'a>>) -> Result<()> {
        self.set(col_idx, Value::Tuple(elements))
    }

    pub fn set_row(&mut self, col_idx: usize, columns: Vec<Value<'a>>) -> Result<()> {
        self.set(col_idx, Value::Row(columns))
    }

    pub fn values(&self) -> &[Value<'a>] {
        &self.values
    }

    pub fn build(&self) -> Result<Vec<u8>> {
        encode_row_with(self.schema, &self.values, &self.config)
    }
}
