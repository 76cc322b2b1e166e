//! Constraint representation (spec §4.2 "Inputs: an ordered list of
//! constraints of the form `Tᵥ ≥ L` (lower) or `Tᵥ ≤ U` (upper)").

use strata_types::{TypeId, TypeVarId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `Tᵥ ≥ L`: a type that must be a subtype of the eventual solution.
    Lower,
    /// `Tᵥ ≤ U`: a type the eventual solution must be a subtype of.
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct Constraint {
    pub var: TypeVarId,
    pub kind: ConstraintKind,
    pub ty: TypeId,
}

impl Constraint {
    pub fn lower(var: TypeVarId, ty: TypeId) -> Self {
        Constraint { var, kind: ConstraintKind::Lower, ty }
    }

    pub fn upper(var: TypeVarId, ty: TypeId) -> Self {
        Constraint { var, kind: ConstraintKind::Upper, ty }
    }
}

/// What the expression checker's call-checking logic (§4.3) builds up per
/// call site before invoking the solver: one entry per type variable that
/// appears on any parameter of the callee, fed from argument types under
/// the declared parameter type, plus (if present) a constraint from the
/// expected return type.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    pub constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        ConstraintSet::default()
    }

    pub fn push(&mut self, c: Constraint) {
        self.constraints.push(c);
    }

    pub fn lower(&mut self, var: TypeVarId, ty: TypeId) {
        self.push(Constraint::lower(var, ty));
    }

    pub fn upper(&mut self, var: TypeVarId, ty: TypeId) {
        self.push(Constraint::upper(var, ty));
    }
}
