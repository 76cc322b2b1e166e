//! Union construction and canonicalization (spec §3 invariants: "flat,
//! canonicalized... Never-absorbing, Any-absorbing", "unions are flat and
//! deduplicated under structural equality").

use crate::interner::TypeInterner;
use crate::type_data::{Type, TypeId};

/// Builds the canonical union of `members`, per spec §3/§8 ("Union
/// canonical form"). Never returns a `Type::Union` with fewer than two
/// members — degenerates to the single member, or to `Never` if the input
/// was empty.
pub fn make_union(interner: &TypeInterner, members: impl IntoIterator<Item = TypeId>) -> TypeId {
    let mut flat = Vec::new();
    collect_flat(interner, members, &mut flat);

    if flat.iter().any(|&t| t == TypeId::ANY) {
        return TypeId::ANY;
    }
    flat.retain(|&t| t != TypeId::NEVER);
    dedup_preserve_order(&mut flat);

    match flat.len() {
        0 => TypeId::NEVER,
        1 => flat[0],
        _ => interner.intern(Type::Union(flat)),
    }
}

fn collect_flat(interner: &TypeInterner, members: impl IntoIterator<Item = TypeId>, out: &mut Vec<TypeId>) {
    for m in members {
        if let Type::Union(inner) = &*interner.get(m) {
            let inner = inner.clone();
            collect_flat(interner, inner, out);
        } else {
            out.push(m);
        }
    }
}

fn dedup_preserve_order(items: &mut Vec<TypeId>) {
    let mut seen = rustc_hash::FxHashSet::default();
    items.retain(|t| seen.insert(*t));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_nested_unions() {
        let interner = TypeInterner::new();
        let sym_a = strata_common::ids::SymbolId(1);
        let sym_b = strata_common::ids::SymbolId(2);
        let a = interner.instance(sym_a, vec![]);
        let b = interner.instance(sym_b, vec![]);
        let inner = make_union(&interner, [a, b]);
        let outer = make_union(&interner, [inner, TypeId::NONE]);
        match &*interner.get(outer) {
            Type::Union(members) => assert_eq!(members.len(), 3),
            other => panic!("expected a flat union, got {other:?}"),
        }
    }

    #[test]
    fn never_is_absorbed() {
        let interner = TypeInterner::new();
        let sym = strata_common::ids::SymbolId(1);
        let a = interner.instance(sym, vec![]);
        let u = make_union(&interner, [a, TypeId::NEVER]);
        assert_eq!(u, a);
    }

    #[test]
    fn any_absorbs_the_whole_union() {
        let interner = TypeInterner::new();
        let sym = strata_common::ids::SymbolId(1);
        let a = interner.instance(sym, vec![]);
        let u = make_union(&interner, [a, TypeId::ANY]);
        assert_eq!(u, TypeId::ANY);
    }

    #[test]
    fn duplicate_members_collapse() {
        let interner = TypeInterner::new();
        let sym = strata_common::ids::SymbolId(1);
        let a = interner.instance(sym, vec![]);
        let u = make_union(&interner, [a, a, TypeId::NONE]);
        match &*interner.get(u) {
            Type::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn single_member_degenerates() {
        let interner = TypeInterner::new();
        let sym = strata_common::ids::SymbolId(1);
        let a = interner.instance(sym, vec![]);
        assert_eq!(make_union(&interner, [a]), a);
    }

    #[test]
    fn empty_degenerates_to_never() {
        let interner = TypeInterner::new();
        assert_eq!(make_union(&interner, []), TypeId::NEVER);
    }
}
