//! Parallel, kind-specific attribute tables keyed by [`NodeId`] (spec.md §3.5).
//!
//! A node record is exactly 16 bytes and has no room for variable-length
//! data. Only the handful of node kinds that actually carry semantic
//! attributes (package/import names, a type declaration's name, a
//! parameter's name and flags) occupy an entry here, so the memory cost is
//! proportional to how many such nodes the source actually contains.

use std::collections::HashMap;

use crate::arena::NodeId;
use crate::BowString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageAttribute {
    pub qualified_name: BowString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAttribute {
    pub qualified_name: BowString,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclarationAttribute {
    pub name: BowString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterAttribute {
    pub name: BowString,
    pub is_varargs: bool,
    pub is_final: bool,
    pub is_receiver: bool,
}

/// Maps a leaf node back to the token it was built from, so callers can
/// compare `original_spelling` against `decoded_text` (spec.md §6.2's
/// `token_at`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRefAttribute {
    pub token_index: u32,
}

/// A type that can be stored in exactly one of [`SideTables`]'s maps.
///
/// Implemented only for the attribute structs above; sealed via the
/// `private` supertrait so downstream crates can read attributes but never
/// add new tables (the arena's memory-layout guarantees depend on the table
/// set being closed).
pub trait Attribute: private::Sealed + Sized + 'static {
    #[doc(hidden)]
    fn table(tables: &SideTables) -> &HashMap<NodeId, Self>;
    #[doc(hidden)]
    fn table_mut(tables: &mut SideTables) -> &mut HashMap<NodeId, Self>;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::PackageAttribute {}
    impl Sealed for super::ImportAttribute {}
    impl Sealed for super::TypeDeclarationAttribute {}
    impl Sealed for super::ParameterAttribute {}
    impl Sealed for super::TokenRefAttribute {}
}

macro_rules! impl_attribute {
    ($ty:ty, $field:ident) => {
        impl Attribute for $ty {
            fn table(tables: &SideTables) -> &HashMap<NodeId, Self> {
                &tables.$field
            }
            fn table_mut(tables: &mut SideTables) -> &mut HashMap<NodeId, Self> {
                &mut tables.$field
            }
        }
    };
}

impl_attribute!(PackageAttribute, packages);
impl_attribute!(ImportAttribute, imports);
impl_attribute!(TypeDeclarationAttribute, type_declarations);
impl_attribute!(ParameterAttribute, parameters);
impl_attribute!(TokenRefAttribute, token_refs);

#[derive(Debug, Default)]
pub struct SideTables {
    packages: HashMap<NodeId, PackageAttribute>,
    imports: HashMap<NodeId, ImportAttribute>,
    type_declarations: HashMap<NodeId, TypeDeclarationAttribute>,
    parameters: HashMap<NodeId, ParameterAttribute>,
    token_refs: HashMap<NodeId, TokenRefAttribute>,
}

impl SideTables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert<A: Attribute>(&mut self, id: NodeId, attr: A) {
        A::table_mut(self).insert(id, attr);
    }

    pub fn get<A: Attribute>(&self, id: NodeId) -> Option<&A> {
        A::table(self).get(&id)
    }

    pub(crate) fn clear(&mut self) {
        self.packages.clear();
        self.imports.clear();
        self.type_declarations.clear();
        self.parameters.clear();
        self.token_refs.clear();
    }

    /// Rough byte accounting used by [`super::Arena::estimated_bytes`].
    pub(crate) fn estimated_bytes(&self) -> usize {
        // Coarse: entry count times a representative attribute size. Exact byte
        // accounting of HashMap internals isn't the point; keeping this
        // proportional to occupancy is.
        (self.packages.len() + self.imports.len() + self.type_declarations.len())
            * std::mem::size_of::<ImportAttribute>()
            + self.parameters.len() * std::mem::size_of::<ParameterAttribute>()
            + self.token_refs.len() * std::mem::size_of::<TokenRefAttribute>()
    }
}
