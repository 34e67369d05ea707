//! # Literal Traits
//!
//! Constant values a compiled function may need for a native scalar: the
//! zero used to initialise accumulators, and the bounds used by min/max
//! aggregates. Strings have a zero but no maximum, so they implement
//! `Literal` only.
//!
//! | Type | zero | minimum | maximum |
//! |------|------|---------|---------|
//! | bool | false | | |
//! | i16, i32, i64 | 0 | MIN | MAX |
//! | f32, f64 | 0.0 | lowest finite | highest finite |
//! | Timestamp | 0 ms | 0 ms | i64::MAX ms |
//! | Date | packed 0 | packed 0 | i32::MAX packed |
//! | StringRef | "" | | |

use eyre::Result;

use crate::schema::{ColumnDef, Schema};
use crate::types::{Date, StringRef, Timestamp, TypeDescriptor};

pub trait Literal: Sized {
    fn zero_value() -> Self;
}

pub trait LiteralBounds: Literal {
    fn minimum_value() -> Self;
    fn maximum_value() -> Self;
}

impl Literal for bool {
    fn zero_value() -> Self {
        false
    }
}

macro_rules! numeric_literal {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl Literal for $ty {
                fn zero_value() -> Self {
                    $zero
                }
            }

            impl LiteralBounds for $ty {
                fn minimum_value() -> Self {
                    <$ty>::MIN
                }

                fn maximum_value() -> Self {
                    <$ty>::MAX
                }
            }
        )*
    };
}

numeric_literal! {
    i16 => 0,
    i32 => 0,
    i64 => 0,
    f32 => 0.0,
    f64 => 0.0,
}

impl Literal for Timestamp {
    fn zero_value() -> Self {
        Timestamp::from_millis(0)
    }
}

impl LiteralBounds for Timestamp {
    fn minimum_value() -> Self {
        Timestamp::from_millis(0)
    }

    fn maximum_value() -> Self {
        Timestamp::from_millis(i64::MAX)
    }
}

impl Literal for Date {
    fn zero_value() -> Self {
        Date::from_packed(0)
    }
}

impl LiteralBounds for Date {
    fn minimum_value() -> Self {
        Date::from_packed(0)
    }

    fn maximum_value() -> Self {
        Date::from_packed(i32::MAX)
    }
}

impl Literal for StringRef<'static> {
    fn zero_value() -> Self {
        StringRef::new(b"")
    }
}

/// Joins canonical type names with `", "`.
pub fn signature_string(types: &[TypeDescriptor]) -> String {
    let names: Vec<String> = types.iter().map(TypeDescriptor::type_name).collect();
    names.join(", ")
}

/// Schema with one column per type, named `col_0`, `col_1`, ...
pub fn literal_schema(types: impl IntoIterator<Item = TypeDescriptor>) -> Result<Schema> {
    Schema::new(
        types
            .into_iter()
            .enumerate()
            .map(|(i, ty)| ColumnDef::new(format!("col_{}", i), ty))
            .collect(),
    )
}
