//! The seam this crate needs onto declared type-variable metadata (bound,
//! value constraints, variance, default), without depending on
//! `strata-semantic`'s `GenericParams` directly — same dependency-inversion
//! shape as `strata_types::ClassHierarchy` (see that crate's `hierarchy.rs`
//! doc comment). `strata-checker` wires a `GenericParams` into this trait
//! when it constructs a solve call.

use strata_types::{TypeId, TypeVarId, TypeVarKind, Variance};

pub trait TypeVarInfo {
    fn bound(&self, var: TypeVarId) -> TypeId;
    /// Empty if the variable is unconstrained (spec §3).
    fn constraints(&self, var: TypeVarId) -> &[TypeId];
    fn default(&self, var: TypeVarId) -> Option<TypeId>;
    fn kind(&self, var: TypeVarId) -> TypeVarKind;
    fn variance(&self, var: TypeVarId) -> Variance;
}

/// A `TypeVarInfo` for variables with no declared bound/constraints/default
/// — every variable behaves as plain and invariant. Useful for tests and
/// for synthetic variables the checker introduces at generic-call sites
/// before it has bothered to look up their declaration.
pub struct PlainVars;

impl TypeVarInfo for PlainVars {
    fn bound(&self, _var: TypeVarId) -> TypeId {
        TypeId::ANY
    }

    fn constraints(&self, _var: TypeVarId) -> &[TypeId] {
        &[]
    }

    fn default(&self, _var: TypeVarId) -> Option<TypeId> {
        None
    }

    fn kind(&self, _var: TypeVarId) -> TypeVarKind {
        TypeVarKind::Plain
    }

    fn variance(&self, _var: TypeVarId) -> Variance {
        Variance::Invariant
    }
}
