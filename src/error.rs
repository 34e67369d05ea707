//! # Codec Error Taxonomy
//!
//! All fallible operations return `eyre::Result`. Failures that callers need
//! to tell apart are raised as a [`CodecError`] inside the report, so they can
//! be classified with `downcast_ref`:
//!
//! ```ignore
//! match decode_row(&schema, &bytes) {
//!     Err(e) if matches!(e.downcast_ref::<CodecError>(), Some(CodecError::Truncated { .. })) => {
//!         // ask the transport for the rest of the frame
//!     }
//!     other => other?,
//! }
//! ```
//!
//! | Variant | Raised by | Phase |
//! |---------|-----------|-------|
//! | `InvalidType` | Schema / TypeDescriptor construction | build |
//! | `UnsupportedBinding` | native type resolution | build |
//! | `DuplicateSignature` | function registration | build |
//! | `SchemaMismatch` | encode, argument binding | per call |
//! | `Overflow` | encode | per call |
//! | `Truncated` | decode; chain decode when a frame or prefix is cut short | per call |
//! | `VersionMismatch` | decode | per call |
//! | `SliceCountMismatch` | chain decode when whole slices tile the window but their count differs; `found` is that count | per call |
//! | `TypeMismatch` | typed accessors | per call |
//! | `IndexOutOfBounds` | accessors | per call |
//! | `NoMatchingSignature` | function lookup | per call |

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid type: {reason}")]
    InvalidType { reason: String },

    #[error("schema mismatch: {reason}")]
    SchemaMismatch { reason: String },

    #[error("encoded size {size} exceeds limit of {limit} bytes")]
    Overflow { size: usize, limit: usize },

    #[error("truncated {what}: need {needed} bytes, have {available}")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("unsupported format version {found} (expected {expected})")]
    VersionMismatch { found: u8, expected: u8 },

    #[error("slice count mismatch: expected {expected} slices, found {found}")]
    SliceCountMismatch { expected: usize, found: usize },

    #[error("type mismatch at index {index}: declared {declared}, requested {requested}")]
    TypeMismatch {
        index: usize,
        declared: String,
        requested: &'static str,
    },

    #[error("index {index} out of bounds (len={len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unsupported native binding: {reason}")]
    UnsupportedBinding { reason: String },

    #[error("duplicate signature: {name}({signature}) is already registered")]
    DuplicateSignature { name: String, signature: String },

    #[error("no signature of {name} accepts ({signature})")]
    NoMatchingSignature { name: String, signature: String },
}

impl CodecError {
    pub(crate) fn invalid_type(reason: impl Into<String>) -> Self {
        Self::InvalidType {
            reason: reason.into(),
        }
    }

    pub(crate) fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn truncated(what: &'static str, needed: usize, available: usize) -> Self {
        Self::Truncated {
            what,
            needed,
            available,
        }
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedBinding {
            reason: reason.into(),
        }
    }

    /// True for failures that abort registration or schema construction
    /// rather than a single encode/decode call.
    pub fn is_build_time(&self) -> bool {
        matches!(
            self,
            Self::InvalidType { .. } | Self::UnsupportedBinding { .. } | Self::DuplicateSignature { .. }
        )
    }
}

/// Returns the typed codec failure carried by `report`, if any.
pub fn classify(report: &eyre::Report) -> Option<&CodecError> {
    report.downcast_ref::<CodecError>()
}
