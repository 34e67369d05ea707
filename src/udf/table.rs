//! # Native Type Table
//!
//! Registration table from Rust `TypeId` to the shape and descriptor of the
//! native type. Built-in scalars and their `Nullable` forms are present from
//! the start; composite markers (`ListRef`, `Opaque`, tuples, `TypedRow`)
//! are added with [`TypeTable::register`] before any function that uses
//! them.

use eyre::{bail, Result};
use tracing::debug;

use super::native::NativeType;
use super::traits::{Native, TypeKey};
use crate::error::CodecError;
use crate::types::{Date, Nullable, StringRef, Timestamp, TypeDescriptor};

#[derive(Debug, Clone)]
struct TypeEntry {
    key: TypeKey,
    native: NativeType,
    descriptor: TypeDescriptor,
}

#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: hashbrown::HashMap<std::any::TypeId, TypeEntry>,
}

impl TypeTable {
    /// An empty table. Most callers want [`TypeTable::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.insert_builtin::<bool, Nullable<bool>>(NativeType::Bool, TypeDescriptor::bool());
        table.insert_builtin::<i16, Nullable<i16>>(NativeType::Int16, TypeDescriptor::int16());
        table.insert_builtin::<i32, Nullable<i32>>(NativeType::Int32, TypeDescriptor::int32());
        table.insert_builtin::<i64, Nullable<i64>>(NativeType::Int64, TypeDescriptor::int64());
        table.insert_builtin::<f32, Nullable<f32>>(NativeType::Float, TypeDescriptor::float());
        table.insert_builtin::<f64, Nullable<f64>>(NativeType::Double, TypeDescriptor::double());
        table.insert_builtin::<Timestamp, Nullable<Timestamp>>(
            NativeType::Timestamp,
            TypeDescriptor::timestamp(),
        );
        table.insert_builtin::<Date, Nullable<Date>>(NativeType::Date, TypeDescriptor::date());
        table.insert_builtin::<StringRef<'static>, Nullable<StringRef<'static>>>(
            NativeType::StringRef,
            TypeDescriptor::string(),
        );
        table
    }

    fn insert_builtin<T: 'static, N: 'static>(
        &mut self,
        native: NativeType,
        descriptor: TypeDescriptor,
    ) {
        self.insert(
            TypeKey::of::<N>(),
            NativeType::nullable(native.clone()),
            descriptor.clone().nullable(),
        );
        self.insert(TypeKey::of::<T>(), native, descriptor);
    }

    fn insert(&mut self, key: TypeKey, native: NativeType, descriptor: TypeDescriptor) {
        self.entries.insert(
            key.id(),
            TypeEntry {
                key,
                native,
                descriptor,
            },
        );
    }

    /// Resolves `T` and records it. Re-registering a type replaces nothing
    /// and returns the existing descriptor.
    pub fn register<T: Native>(&mut self) -> Result<TypeDescriptor> {
        let key = TypeKey::of::<T>();
        if let Some(entry) = self.entries.get(&key.id()) {
            return Ok(entry.descriptor.clone());
        }
        let native = T::native_type()?;
        let descriptor = native.resolve()?;
        debug!(rust_type = key.name(), descriptor = %descriptor, "registered native type");
        self.insert(key, native, descriptor.clone());
        Ok(descriptor)
    }

    fn entry(&self, key: TypeKey) -> Result<&TypeEntry> {
        match self.entries.get(&key.id()) {
            Some(entry) => Ok(entry),
            None => bail!(CodecError::unsupported(format!(
                "{} is not a registered native type",
                key
            ))),
        }
    }

    pub fn lookup(&self, key: TypeKey) -> Result<&TypeDescriptor> {
        Ok(&self.entry(key)?.descriptor)
    }

    pub fn descriptor_of<T: 'static>(&self) -> Result<&TypeDescriptor> {
        self.lookup(TypeKey::of::<T>())
    }

    pub fn native(&self, key: TypeKey) -> Result<&NativeType> {
        Ok(&self.entry(key)?.native)
    }

    pub fn native_of<T: 'static>(&self) -> Result<&NativeType> {
        self.native(TypeKey::of::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&std::any::TypeId::of::<T>())
    }

    /// Names of every registered Rust type, unordered.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|e| e.key.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
