//! # RowCodec
//!
//! Pairs a shared schema with the limits to encode and decode under. Use it
//! where one schema is encoded repeatedly, e.g. a query operator's output.
//!
//! ```ignore
//! let codec = RowCodec::with_config(schema, CodecConfig::new().with_max_slice_len(4096));
//! let bytes = codec.encode(&[Value::Int32(1), Value::from("a")])?;
//! let view = codec.decode(&bytes)?;
//! ```

use eyre::Result;

use super::builder::RowBuilder;
use super::encode::encode_row_with;
use super::view::RowView;
use crate::config::CodecConfig;
use crate::schema::{Schema, SchemaRef};
use crate::types::Value;

#[derive(Debug, Clone)]
pub struct RowCodec {
    schema: SchemaRef,
    config: CodecConfig,
}

impl RowCodec {
    pub fn new(schema: SchemaRef) -> Self {
        Self::with_config(schema, CodecConfig::default())
    }

    pub fn with_config(schema: SchemaRef, config: CodecConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(&self, values: &[Value<'_>]) -> Result<Vec<u8>> {
        encode_row_with(&self.schema, values, &self.config)
    }

    pub fn decode<'a>(&'a self, bytes: &'a [u8]) -> Result<RowView<'a>> {
        RowView::new(bytes, &self.schema)
    }

    pub fn builder(&self) -> RowBuilder<'_> {
        RowBuilder::with_config(&self.schema, self.config)
    }
}

/// Decodes `bytes` as one slice of `schema`.
pub fn decode_row<'a>(schema: &'a Schema, bytes: &'a [u8]) -> Result<RowView<'a>> {
    RowView::new(bytes, schema)
}
