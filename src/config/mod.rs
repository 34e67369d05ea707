//! # Codec Configuration
//!
//! Wire constants live in [`constants`] and are fixed for a given format
//! version. The few limits a caller may tighten at runtime are carried by
//! [`CodecConfig`], a small builder-style value passed to [`Schema`] and
//! [`RowCodec`] construction.
//!
//! ## Usage
//!
//! ```ignore
//! use rowcodec::config::CodecConfig;
//!
//! let config = CodecConfig::new()
//!     .with_max_slice_len(64 * 1024)
//!     .with_max_nesting_depth(4);
//! let codec = RowCodec::with_config(schema, config);
//! ```
//!
//! [`Schema`]: crate::schema::Schema
//! [`RowCodec`]: crate::records::RowCodec

pub mod constants;
pub use constants::*;

/// Runtime limits applied by the encoder and by Schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    max_slice_len: usize,
    max_nesting_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecConfig {
    pub const fn new() -> Self {
        Self {
            max_slice_len: MAX_SLICE_LEN,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Caps encoded slice size. Values above [`MAX_SLICE_LEN`] are clamped,
    /// since the length field cannot describe anything larger.
    pub fn with_max_slice_len(mut self, len: usize) -> Self {
        self.max_slice_len = len.min(MAX_SLICE_LEN);
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn max_slice_len(&self) -> usize {
        self.max_slice_len
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }
}
