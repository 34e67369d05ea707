//! # Native Type Binding
//!
//! Maps the native signatures of compiled functions onto the descriptors the
//! row codec lays out, so a function and the slices it reads agree on field
//! types, nullability and how each argument is passed.
//!
//! ## Module Structure
//!
//! - `native`: `NativeType` shapes, `resolve` and `CallConv`
//! - `traits`: `Native`/`NativeTuple` and the `ListRef`, `Opaque`,
//!   `Pointer`, `TypedRow` markers
//! - `table`: `TypeTable`, the `TypeId`-keyed registration table
//! - `literal`: zero and bound literals, signature strings, literal schemas
//! - `registry`: `RegistryBuilder` and the frozen `FunctionRegistry`
//! - `glue`: binds `RowView` columns to `CallArg`s
//!
//! ## Usage
//!
//! ```ignore
//! use rowcodec::udf::{BoundCall, FunctionRegistry};
//!
//! let mut builder = FunctionRegistry::builder();
//! builder.register_fn::<(StringRef<'static>, i32), StringRef<'static>>("left")?;
//! let registry = builder.build().into_shared();
//!
//! let left = registry.lookup("left", &[TypeDescriptor::string(), TypeDescriptor::int32()])?;
//! match left.bind_args(view, &[1, 0])? {
//!     BoundCall::Invoke(args) => call(args),
//!     BoundCall::NullResult => Value::Null,
//! }
//! ```

mod glue;
mod literal;
mod native;
mod registry;
mod table;
mod traits;

pub use glue::{BoundCall, CallArg};
pub use literal::{literal_schema, signature_string, Literal, LiteralBounds};
pub use native::{CallConv, NativeType};
pub use registry::{FunctionBinding, FunctionDecl, FunctionRegistry, RegistryBuilder};
pub use table::TypeTable;
pub use traits::{ListRef, Native, NativeTuple, Opaque, Pointer, TypeKey, TypedRow};
