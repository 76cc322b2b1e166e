//! Adapts a declaration's `strata_semantic::GenericParams` to the solver's
//! `TypeVarInfo` seam (spec §4.2 inputs: bound, value constraints,
//! default, kind, variance per variable) — the wiring `strata-solver`'s
//! own doc comment says belongs here.

use strata_semantic::GenericParams;
use strata_solver::TypeVarInfo;
use strata_types::{TypeId, TypeVarId, TypeVarKind, Variance};

pub struct GenericParamsInfo<'a>(pub &'a GenericParams);

impl TypeVarInfo for GenericParamsInfo<'_> {
    fn bound(&self, var: TypeVarId) -> TypeId {
        self.0.get(var).map(|d| d.bound).unwrap_or(TypeId::ANY)
    }

    fn constraints(&self, var: TypeVarId) -> &[TypeId] {
        self.0.get(var).map(|d| d.constraints.as_slice()).unwrap_or(&[])
    }

    fn default(&self, var: TypeVarId) -> Option<TypeId> {
        self.0.get(var).and_then(|d| d.default)
    }

    fn kind(&self, var: TypeVarId) -> TypeVarKind {
        self.0.get(var).map(|d| d.kind).unwrap_or(TypeVarKind::Plain)
    }

    fn variance(&self, var: TypeVarId) -> Variance {
        self.0.get(var).map(|d| d.variance).unwrap_or(Variance::Invariant)
    }
}
