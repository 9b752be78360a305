//! Descriptions of types and members backed by `dotnetdll` metadata.
//!
//! - **[`TypeDescription`]**: a type definition inside a loaded resolution.
//! - **[`MethodDescription`](members::MethodDescription)** and friends: members declared on a type.
//! - **[`RuntimeTypeInfo`](runtime::RuntimeTypeInfo)**: a queried type, which may be an
//!   instantiation or a type built from another type.
use crate::resolution::ResolutionS;
use dotnetdll::prelude::{ResolvedDebug, TypeDefinition};
use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    ptr::NonNull,
};

pub mod members;
pub mod runtime;
#[cfg(test)]
pub(crate) mod test_assembly;

#[derive(Clone, Copy)]
pub struct TypeDescription {
    pub resolution: ResolutionS,
    definition_ptr: NonNull<TypeDefinition<'static>>,
}

// SAFETY: both pointers refer to leaked metadata that is never mutated after loading.
unsafe impl Send for TypeDescription {}
unsafe impl Sync for TypeDescription {}

impl TypeDescription {
    pub fn new(resolution: ResolutionS, definition: &'static TypeDefinition<'static>) -> Self {
        Self {
            resolution,
            definition_ptr: NonNull::from(definition),
        }
    }

    pub fn definition(&self) -> &'static TypeDefinition<'static> {
        // SAFETY: definition_ptr is derived from a &'static reference in `new`
        unsafe { &*self.definition_ptr.as_ptr() }
    }

    pub fn type_name(&self) -> String {
        self.definition().nested_type_name(self.resolution.definition())
    }

    pub fn generic_parameter_name(&self, index: u16) -> Option<&'static str> {
        self.definition()
            .generic_parameters
            .get(index as usize)
            .map(|p| p.name.as_ref())
    }
}

impl Debug for TypeDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition().show(self.resolution.definition()))
    }
}

impl PartialEq for TypeDescription {
    fn eq(&self, other: &Self) -> bool {
        self.definition_ptr == other.definition_ptr
    }
}

impl Eq for TypeDescription {}

impl Hash for TypeDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition_ptr.hash(state);
    }
}
