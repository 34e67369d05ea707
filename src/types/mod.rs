//! # Type System
//!
//! The descriptors every other layer agrees on: the slice codec sizes its
//! fixed area from them, typed accessors check against them, and the native
//! binding registry resolves function signatures to them.
//!
//! ## Module Structure
//!
//! - `descriptor`: `TypeDescriptor`, `TypeKind`, `WireWidth`
//! - `nullable`: `Nullable<T>` tagged optional
//! - `temporal`: `Date` and `Timestamp` scalars
//! - `string_ref`: borrowed `StringRef` span
//! - `value`: dynamic `Value<'a>`
//!
//! ## Usage
//!
//! ```ignore
//! use rowcodec::types::{TypeDescriptor, Value};
//!
//! let name = TypeDescriptor::string().nullable();
//! assert!(name.is_variable());
//! let v: Value = "ab".into();
//! ```

mod descriptor;
mod nullable;
mod string_ref;
mod temporal;
mod value;

pub use descriptor::{TypeDescriptor, TypeKind, WireWidth};
pub use nullable::Nullable;
pub use string_ref::StringRef;
pub use temporal::{Date, Timestamp};
pub use value::Value;
