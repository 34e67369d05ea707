//! # rowcodec - Compact SQL Rows and Native Function Bindings
//!
//! The row representation and function type-binding layer of an SQL
//! execution engine:
//!
//! - **Zero-copy reads**: a decoded `RowView` borrows its slice, and
//!   strings, lists and nested rows are views into the same bytes
//! - **Multi-slice rows**: a logical `Row` is one or more slices that travel
//!   back to back over a `BufferChain`
//! - **Typed native calls**: compiled function signatures resolve to the
//!   same `TypeDescriptor`s the codec lays out
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowcodec::{ColumnDef, RowCodec, Schema, TypeDescriptor, Value};
//!
//! let schema = Schema::new(vec![
//!     ColumnDef::new("id", TypeDescriptor::int32()),
//!     ColumnDef::new("name", TypeDescriptor::string().nullable()),
//! ])?;
//! let codec = RowCodec::new(schema.into_ref());
//!
//! let bytes = codec.encode(&[Value::Int32(1), "ab".into()])?;
//! let view = codec.decode(&bytes)?;
//! assert_eq!(view.get::<&str>(1)?.into_option(), Some("ab"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  udf: NativeType -> FunctionRegistry │
//! ├──────────────────────────────────────┤
//! │  chain: Row <-> BufferChain framing  │
//! ├──────────────────────────────────────┤
//! │  records: encode / RowView decode    │
//! ├──────────────────────────────────────┤
//! │  schema + types: descriptors, layout │
//! └──────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`types`]: `TypeDescriptor`, `Value`, `Nullable`, `StringRef`, dates
//! - [`schema`]: `Schema` with pre-computed slot offsets
//! - [`records`]: single-slice encode and zero-copy decode
//! - [`chain`]: multi-slice `Row` and buffer-chain transport
//! - [`udf`]: native type resolution and the function registry
//! - [`config`]: wire constants and `CodecConfig`
//! - [`error`]: `CodecError` taxonomy

#[macro_use]
mod macros;

pub mod chain;
pub mod config;
pub mod error;
pub mod records;
pub mod schema;
pub mod types;
pub mod udf;

pub use chain::{decode_chain, encode_chain, BufferChain, IoBuf, Row};
pub use config::CodecConfig;
pub use error::CodecError;
pub use records::{decode_row, encode_row, RowBuilder, RowCodec, RowView};
pub use schema::{ColumnDef, Schema, SchemaRef};
pub use types::{Date, Nullable, StringRef, Timestamp, TypeDescriptor, TypeKind, Value};
pub use udf::{FunctionRegistry, NativeType, RegistryBuilder};
