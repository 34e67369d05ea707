//! # Native Type Traits
//!
//! `Native` ties a Rust type to the [`NativeType`] shape a compiled function
//! uses for it. The codec never dispatches through these traits at run time;
//! they exist so registration can derive a signature from a Rust type list.
//!
//! Marker types stand in for shapes that have no owned Rust equivalent:
//!
//! - `ListRef<T>`: a borrowed list of `T`
//! - `Opaque<T>`: `size_of::<T>()` uninterpreted bytes
//! - `Pointer<T>`: a pointer parameter, resolved per the pointer table in
//!   [`native`](super::native)
//! - `TypedRow<(A, B, ..)>`: a nested row whose literal schema is
//!   `[col_0: A, col_1: B, ..]`

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use eyre::Result;

use super::literal;
use super::native::NativeType;
use crate::schema::Schema;
use crate::types::{Date, Nullable, StringRef, Timestamp, TypeDescriptor};

pub trait Native: 'static {
    fn native_type() -> Result<NativeType>;
}

macro_rules! scalar_native {
    ($($ty:ty => $shape:ident),* $(,)?) => {
        $(
            impl Native for $ty {
                fn native_type() -> Result<NativeType> {
                    Ok(NativeType::$shape)
                }
            }
        )*
    };
}

scalar_native! {
    bool => Bool,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    Timestamp => Timestamp,
    Date => Date,
    StringRef<'static> => StringRef,
}

impl<T: Native> Native for Nullable<T> {
    fn native_type() -> Result<NativeType> {
        Ok(NativeType::nullable(T::native_type()?))
    }
}

pub struct ListRef<T>(PhantomData<T>);

impl<T: Native> Native for ListRef<T> {
    fn native_type() -> Result<NativeType> {
        Ok(NativeType::list(T::native_type()?))
    }
}

pub struct Opaque<T>(PhantomData<T>);

impl<T: 'static> Native for Opaque<T> {
    fn native_type() -> Result<NativeType> {
        Ok(NativeType::Opaque(std::mem::size_of::<T>()))
    }
}

pub struct Pointer<T>(PhantomData<T>);

impl<T: Native> Native for Pointer<T> {
    fn native_type() -> Result<NativeType> {
        Ok(NativeType::pointer(T::native_type()?))
    }
}

pub struct TypedRow<T>(PhantomData<T>);

impl<T: NativeTuple> Native for TypedRow<T> {
    fn native_type() -> Result<NativeType> {
        Ok(NativeType::Row(Arc::new(T::literal_schema()?)))
    }
}

/// Identity of a Rust type inside the [`TypeTable`](super::TypeTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An ordered list of native types: a parameter list, or the elements of a
/// multi-value return.
pub trait NativeTuple: 'static {
    fn native_types() -> Result<Vec<NativeType>>;

    fn type_keys() -> Vec<TypeKey>;

    fn descriptors() -> Result<Vec<TypeDescriptor>> {
        Self::native_types()?.iter().map(NativeType::resolve).collect()
    }

    /// `"int32, string"` style rendering of the resolved descriptors.
    fn signature() -> Result<String> {
        Ok(literal::signature_string(&Self::descriptors()?))
    }

    fn literal_schema() -> Result<Schema> {
        literal::literal_schema(Self::descriptors()?)
    }
}

impl NativeTuple for () {
    fn native_types() -> Result<Vec<NativeType>> {
        Ok(Vec::new())
    }

    fn type_keys() -> Vec<TypeKey> {
        Vec::new()
    }
}

macro_rules! tuple_native {
    ($($name:ident),+) => {
        impl<$($name: Native),+> NativeTuple for ($($name,)+) {
            fn native_types() -> Result<Vec<NativeType>> {
                Ok(vec![$($name::native_type()?),+])
            }

            fn type_keys() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$name>()),+]
            }
        }

        impl<$($name: Native),+> Native for ($($name,)+) {
            fn native_type() -> Result<NativeType> {
                Ok(NativeType::Tuple(<Self as NativeTuple>::native_types()?))
            }
        }
    };
}

tuple_native!(A);
tuple_native!(A, B);
tuple_native!(A, B, C);
tuple_native!(A, B, C, D);
tuple_native!(A, B, C, D, E);
tuple_native!(A, B, C, D, E, F);
tuple_native!(A, B, C, D, E, F, G);
tuple_native!(A, B, C, D, E, F, G, H);
