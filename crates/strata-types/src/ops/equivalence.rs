//! Type equivalence (spec §4.1: "Equivalence is mutual subtype; a
//! dedicated path avoids double work").

use crate::hierarchy::ClassHierarchy;
use crate::ops::subtype::SubtypeChecker;
use crate::type_data::TypeId;

pub fn is_equivalent<H: ClassHierarchy>(
    checker: &mut SubtypeChecker<'_, H>,
    a: TypeId,
    b: TypeId,
) -> bool {
    // Identical ids are trivially equivalent without touching the subtype
    // machinery at all — the common case, since interning already
    // collapses structurally-equal constructions to one id.
    a == b || (checker.is_subtype_of(a, b) && checker.is_subtype_of(b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::EmptyHierarchy;
    use crate::interner::TypeInterner;

    #[test]
    fn identical_ids_are_equivalent_without_a_subtype_walk() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        assert!(is_equivalent(&mut checker, TypeId::ANY, TypeId::ANY));
    }

    #[test]
    fn mutual_subtypes_are_equivalent() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        let sym = strata_common::ids::SymbolId(4);
        let a = interner.instance(sym, vec![]);
        let b = interner.instance(sym, vec![]);
        assert!(is_equivalent(&mut checker, a, b));
    }

    #[test]
    fn one_way_subtype_is_not_equivalence() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        assert!(!is_equivalent(&mut checker, TypeId::NEVER, TypeId::NONE));
    }
}
