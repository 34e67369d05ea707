//! # Wire Format Constants
//!
//! Every width and limit of the slice layout and the chain framing lives
//! here. Values that depend on each other are co-located and the
//! relationships are enforced with compile-time assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! LENGTH_PREFIX_SIZE (4 bytes, u32 LE)
//!       │
//!       ├─> SLICE_HEADER_SIZE (length prefix + 1 byte version tag)
//!       │     The chain framing reuses the slice's own length field as
//!       │     its prefix, so both must agree on width and byte order.
//!       │
//!       ├─> VAR_SLOT_SIZE (offset u32 + length u32)
//!       │
//!       ├─> LIST_COUNT_SIZE (element count, u32)
//!       │
//!       └─> MAX_SLICE_LEN (largest value the length field can carry)
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `SLICE_HEADER_SIZE == LENGTH_PREFIX_SIZE + VERSION_TAG_SIZE`
//! 2. `VAR_SLOT_SIZE == 2 * LENGTH_PREFIX_SIZE`
//! 3. `MAX_SLICE_LEN` fits the length field

// ============================================================================
// SLICE HEADER
// ============================================================================

/// Current slice format version. Readers reject any other tag.
pub const FORMAT_VERSION: u8 = 1;

/// Width of the total-length field at the start of every slice.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Width of the format version tag following the length field.
pub const VERSION_TAG_SIZE: usize = 1;

/// Bytes preceding the null bitmap in a top-level or nested row slice.
pub const SLICE_HEADER_SIZE: usize = LENGTH_PREFIX_SIZE + VERSION_TAG_SIZE;

/// Largest slice the length field can describe.
pub const MAX_SLICE_LEN: usize = u32::MAX as usize;

const _: () = assert!(
    SLICE_HEADER_SIZE == LENGTH_PREFIX_SIZE + VERSION_TAG_SIZE,
    "SLICE_HEADER_SIZE derivation mismatch"
);

const _: () = assert!(
    MAX_SLICE_LEN as u64 <= u32::MAX as u64,
    "MAX_SLICE_LEN must fit the u32 length field"
);

// ============================================================================
// FIELD LAYOUT
// ============================================================================

/// Fixed-area slot for a variable-width field: `offset: u32` then `length: u32`.
pub const VAR_SLOT_SIZE: usize = 8;

/// Element count prefix of a list payload.
pub const LIST_COUNT_SIZE: usize = 4;

const _: () = assert!(
    VAR_SLOT_SIZE == 2 * LENGTH_PREFIX_SIZE,
    "variable slots hold two u32 values"
);

// ============================================================================
// TYPE NESTING
// ============================================================================

/// Deepest List/Tuple/Row nesting a Schema may declare.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

/// Size of the opaque handle a pointer-to-pointer parameter binds to.
pub const POINTER_WIDTH: usize = std::mem::size_of::<usize>();
