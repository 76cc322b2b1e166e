//! Per-class declaration data the `ClassHierarchy` seam (`strata-types`)
//! needs: declared bases, declared type-parameter variance, and — for
//! classes flagged structural (spec §6 "Protocol-like structural classes")
//! — the member signatures subtype checks compare against.

use crate::generics::GenericParams;
use strata_common::interner::Atom;
use strata_types::{TypeId, Variance};

/// A single instance member as seen through attribute access (spec §4.3
/// "Attribute access"). Plain fields are both readable and writable;
/// read-only descriptors (e.g. a property with no setter) clear `writable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub ty: TypeId,
    pub readable: bool,
    pub writable: bool,
}

impl MemberInfo {
    pub fn field(ty: TypeId) -> Self {
        MemberInfo { ty, readable: true, writable: true }
    }

    pub fn read_only(ty: TypeId) -> Self {
        MemberInfo { ty, readable: true, writable: false }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClassInfo {
    pub bases: Vec<strata_common::ids::SymbolId>,
    pub type_params: GenericParams,
    pub structural: bool,
    /// Method-resolution order, computed once by the front-end (spec §9:
    /// "expressed as an explicit method-resolution list attached to each
    /// class symbol, computed once by the front-end"). Most-derived first,
    /// and includes the class itself.
    pub mro: Vec<strata_common::ids::SymbolId>,
    pub structural_members: Vec<(Atom, TypeId)>,
    /// Declared instance members (fields, methods, descriptors) local to
    /// this class — lookup walks `mro` to find inherited ones.
    pub members: Vec<(Atom, MemberInfo)>,
    /// `__slots__`: when present, attribute *mutation* sites (not reads)
    /// are restricted to these names (spec §4.3, §7 `attribute-not-in-slots`).
    pub slots: Option<Vec<Atom>>,
    pub abstract_class: bool,
}

impl ClassInfo {
    pub fn variance_of(&self, param_index: usize) -> Variance {
        self.type_params
            .iter()
            .nth(param_index)
            .map(|p| p.variance)
            .unwrap_or(Variance::Invariant)
    }

    pub fn own_member(&self, name: Atom) -> Option<MemberInfo> {
        self.members.iter().find(|(n, _)| *n == name).map(|(_, m)| *m)
    }
}
