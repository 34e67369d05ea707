//! # Function Registry
//!
//! Registration is a two-phase lifecycle:
//!
//! ```text
//! RegistryBuilder::new()          (&mut self, single writer)
//!     .register_type::<ListRef<i64>>()?
//!     .register(FunctionDecl::new("substr").param(..).returns(..))?
//!     .register_fn::<(StringRef, i32), StringRef>("left")?
//!         │
//!         └─ build() ──> FunctionRegistry    (immutable, Send + Sync)
//! ```
//!
//! Every declaration is resolved to descriptors when it is registered, so a
//! bad native shape aborts registration instead of surfacing at call time.
//!
//! ## Overloads
//!
//! A name may carry several signatures. Two signatures conflict when their
//! parameter descriptors are equal after `erase_nullability`: `f(i32)` and
//! `f(Nullable<i32>)` cannot coexist, because the caller cannot tell them
//! apart from the argument types. Lookup uses the same erased comparison.

use std::fmt;
use std::sync::Arc;

use eyre::{bail, Result, WrapErr};
use tracing::debug;

use super::literal::signature_string;
use super::native::{CallConv, NativeType};
use super::table::TypeTable;
use super::traits::{Native, NativeTuple, TypeKey};
use crate::error::CodecError;
use crate::types::TypeDescriptor;

/// A function signature in native shapes, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    name: String,
    params: Vec<NativeType>,
    ret: Option<NativeType>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
        }
    }

    pub fn param(mut self, native: NativeType) -> Self {
        self.params.push(native);
        self
    }

    pub fn params(mut self, natives: impl IntoIterator<Item = NativeType>) -> Self {
        self.params.extend(natives);
        self
    }

    pub fn returns(mut self, native: NativeType) -> Self {
        self.ret = Some(native);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn resolve(self) -> Result<FunctionBinding> {
        let Some(ret) = self.ret else {
            bail!(CodecError::unsupported(format!(
                "{} declares no return type",
                self.name
            )));
        };

        let mut params = Vec::with_capacity(self.params.len());
        for (idx, native) in self.params.iter().enumerate() {
            let ty = native
                .resolve()
                .wrap_err_with(|| format!("parameter {} of {}", idx, self.name))?;
            params.push(ty);
        }
        let ret = ret
            .resolve()
            .wrap_err_with(|| format!("return type of {}", self.name))?;

        Ok(FunctionBinding::new(self.name, params, ret))
    }
}

/// A resolved, registered signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBinding {
    name: String,
    params: Vec<TypeDescriptor>,
    conventions: Vec<CallConv>,
    erased: Vec<TypeDescriptor>,
    ret: TypeDescriptor,
}

impl FunctionBinding {
    fn new(name: String, params: Vec<TypeDescriptor>, ret: TypeDescriptor) -> Self {
        let conventions = params.iter().map(CallConv::of).collect();
        let erased = params.iter().map(TypeDescriptor::erase_nullability).collect();
        Self {
            name,
            params,
            conventions,
            erased,
            ret,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn conventions(&self) -> &[CallConv] {
        &self.conventions
    }

    pub fn return_type(&self) -> &TypeDescriptor {
        &self.ret
    }

    pub fn return_conv(&self) -> CallConv {
        CallConv::of(&self.ret)
    }

    /// `"int32, string"`
    pub fn signature(&self) -> String {
        signature_string(&self.params)
    }

    /// True when `arg_types` match the parameters with nullability ignored.
    pub fn accepts(&self, arg_types: &[TypeDescriptor]) -> bool {
        self.erased.len() == arg_types.len()
            && self
                .erased
                .iter()
                .zip(arg_types)
                .all(|(param, arg)| *param == arg.erase_nullability())
    }
}

impl fmt::Display for FunctionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.name, self.signature(), self.ret)
    }
}

type Overloads = hashbrown::HashMap<String, Vec<FunctionBinding>>;

#[derive(Debug)]
pub struct RegistryBuilder {
    types: TypeTable,
    functions: Overloads,
    bindings: usize,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Starts from the built-in scalar types.
    pub fn new() -> Self {
        Self::with_types(TypeTable::with_builtins())
    }

    pub fn with_types(types: TypeTable) -> Self {
        Self {
            types,
            functions: Overloads::new(),
            bindings: 0,
        }
    }

    pub fn type_table(&self) -> &TypeTable {
        &self.types
    }

    pub fn register_type<T: Native>(&mut self) -> Result<&mut Self> {
        self.types.register::<T>()?;
        Ok(self)
    }

    pub fn register(&mut self, decl: FunctionDecl) -> Result<&mut Self> {
        let binding = decl.resolve()?;
        let overloads = self.functions.entry(binding.name.clone()).or_default();
        if overloads.iter().any(|existing| existing.erased == binding.erased) {
            bail!(CodecError::DuplicateSignature {
                name: binding.name,
                signature: signature_string(&binding.erased),
            });
        }

        debug!(
            function = %binding.name,
            signature = %binding.signature(),
            returns = %binding.ret,
            overloads = overloads.len() + 1,
            "registered function"
        );
        overloads.push(binding);
        self.bindings += 1;
        Ok(self)
    }

    /// Registers `name(Args..) -> Ret`, taking each shape from the type
    /// table. Every type must already be registered.
    pub fn register_fn<Args: NativeTuple, Ret: 'static>(
        &mut self,
        name: &str,
    ) -> Result<&mut Self> {
        let mut decl = FunctionDecl::new(name);
        for key in Args::type_keys() {
            decl = decl.param(self.native(key)?);
        }
        let decl = decl.returns(self.native(TypeKey::of::<Ret>())?);
        self.register(decl)
    }

    fn native(&self, key: TypeKey) -> Result<NativeType> {
        self.types.native(key).cloned()
    }

    pub fn build(self) -> FunctionRegistry {
        debug!(
            functions = self.functions.len(),
            bindings = self.bindings,
            types = self.types.len(),
            "froze function registry"
        );
        FunctionRegistry {
            types: self.types,
            functions: self.functions,
            bindings: self.bindings,
        }
    }
}

/// Immutable set of resolved bindings. Shared across threads through
/// [`FunctionRegistry::into_shared`].
#[derive(Debug)]
pub struct FunctionRegistry {
    types: TypeTable,
    functions: Overloads,
    bindings: usize,
}

impl FunctionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn lookup(&self, name: &str, arg_types: &[TypeDescriptor]) -> Result<&FunctionBinding> {
        self.overloads(name)
            .iter()
            .find(|binding| binding.accepts(arg_types))
            .ok_or_else(|| {
                CodecError::NoMatchingSignature {
                    name: name.to_string(),
                    signature: signature_string(arg_types),
                }
                .into()
            })
    }

    /// Signatures registered under `name`, in registration order.
    pub fn overloads(&self, name: &str) -> &[FunctionBinding] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Total number of bindings across all names.
    pub fn len(&self) -> usize {
        self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings == 0
    }

    pub fn type_table(&self) -> &TypeTable {
        &self.types
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
