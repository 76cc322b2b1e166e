//! Join and meet (spec §4.1): minimal common supertype / greatest common
//! subtype. Both reuse the subtype checker for the cheap "one side already
//! subsumes the other" case before falling back to their distinct rules for
//! nominal instances and callables.

use crate::hierarchy::ClassHierarchy;
use crate::ops::subtype::SubtypeChecker;
use crate::ops::union::make_union;
use crate::type_data::{Callable, Param, Type, TypeId};
use rustc_hash::FxHashSet;
use strata_common::ids::SymbolId;

/// Minimal common supertype. Ties break toward the first operand so output
/// is deterministic (spec §4.1).
pub fn join<H: ClassHierarchy>(checker: &mut SubtypeChecker<'_, H>, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    if checker.is_subtype_of(a, b) {
        return b;
    }
    if checker.is_subtype_of(b, a) {
        return a;
    }
    let interner = checker_interner(checker);
    let ta = interner.get(a).clone();
    let tb = interner.get(b).clone();
    match (&ta, &tb) {
        (Type::Instance { class: ca, .. }, Type::Instance { class: cb, .. }) => {
            if let Some(ancestor) = most_derived_common_ancestor(checker, *ca, *cb) {
                return checker_interner(checker).instance(ancestor, Vec::new());
            }
            make_union(checker_interner(checker), [a, b])
        }
        (Type::Callable(fa), Type::Callable(fb)) => join_callables(checker, fa, fb),
        _ => make_union(checker_interner(checker), [a, b]),
    }
}

/// Greatest common subtype; `Never` when the two types share no values.
pub fn meet<H: ClassHierarchy>(checker: &mut SubtypeChecker<'_, H>, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    if checker.is_subtype_of(a, b) {
        return a;
    }
    if checker.is_subtype_of(b, a) {
        return b;
    }
    let interner = checker_interner(checker);
    let ta = interner.get(a).clone();
    let tb = interner.get(b).clone();
    if let (Type::Callable(fa), Type::Callable(fb)) = (&ta, &tb) {
        return meet_callables(checker, fa, fb);
    }
    TypeId::NEVER
}

fn join_callables<H: ClassHierarchy>(checker: &mut SubtypeChecker<'_, H>, a: &Callable, b: &Callable) -> TypeId {
    let n = a.params.len().min(b.params.len());
    let mut params = Vec::with_capacity(n);
    for i in 0..n {
        // Contravariant position: the joined callable must be safely
        // callable wherever either original was, so each parameter widens
        // to the meet of the two (the narrower of what either accepts).
        let ty = meet(checker, a.params[i].ty, b.params[i].ty);
        params.push(Param { name: a.params[i].name, kind: a.params[i].kind, ty });
    }
    let return_ty = join(checker, a.return_ty, b.return_ty);
    checker_interner(checker).intern(Type::Callable(Box::new(Callable {
        params: params.into(),
        return_ty,
        bound_param_spec: None,
        type_guard: None,
    })))
}

fn meet_callables<H: ClassHierarchy>(checker: &mut SubtypeChecker<'_, H>, a: &Callable, b: &Callable) -> TypeId {
    let n = a.params.len().max(b.params.len());
    let mut params = Vec::with_capacity(n);
    for i in 0..n {
        let (name, kind, ty) = match (a.params.get(i), b.params.get(i)) {
            (Some(pa), Some(pb)) => (pa.name, pa.kind, join(checker, pa.ty, pb.ty)),
            (Some(p), None) | (None, Some(p)) => (p.name, p.kind, p.ty),
            (None, None) => unreachable!(),
        };
        params.push(Param { name, kind, ty });
    }
    let return_ty = meet(checker, a.return_ty, b.return_ty);
    checker_interner(checker).intern(Type::Callable(Box::new(Callable {
        params: params.into(),
        return_ty,
        bound_param_spec: None,
        type_guard: None,
    })))
}

fn most_derived_common_ancestor<H: ClassHierarchy>(
    checker: &SubtypeChecker<'_, H>,
    a: SymbolId,
    b: SymbolId,
) -> Option<SymbolId> {
    let hierarchy = checker_hierarchy(checker);
    let a_chain = ancestor_chain(hierarchy, a);
    let b_chain: FxHashSet<SymbolId> = ancestor_chain(hierarchy, b).into_iter().collect();
    a_chain.into_iter().find(|c| b_chain.contains(c))
}

fn ancestor_chain<H: ClassHierarchy>(hierarchy: &H, class: SymbolId) -> Vec<SymbolId> {
    let mut chain = vec![class];
    let mut visited = FxHashSet::default();
    visited.insert(class);
    let mut frontier = vec![class];
    while let Some(cur) = frontier.pop() {
        for &base in hierarchy.bases(cur) {
            if visited.insert(base) {
                chain.push(base);
                frontier.push(base);
            }
        }
    }
    chain
}

// `SubtypeChecker`'s fields are private to its own module; these accessors
// keep that encapsulation while letting join/meet reach the interner and
// hierarchy it was built with.
fn checker_interner<'a, H: ClassHierarchy>(checker: &SubtypeChecker<'a, H>) -> &'a crate::interner::TypeInterner {
    checker.interner()
}

fn checker_hierarchy<'a, H: ClassHierarchy>(checker: &SubtypeChecker<'a, H>) -> &'a H {
    checker.hierarchy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::EmptyHierarchy;
    use crate::interner::TypeInterner;

    #[test]
    fn join_of_subtype_pair_is_the_wider_type() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        assert_eq!(join(&mut checker, TypeId::NEVER, TypeId::NONE), TypeId::NONE);
    }

    #[test]
    fn meet_of_subtype_pair_is_the_narrower_type() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        assert_eq!(meet(&mut checker, TypeId::NEVER, TypeId::NONE), TypeId::NEVER);
    }

    #[test]
    fn join_of_unrelated_instances_falls_back_to_union() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        let a = interner.instance(SymbolId(1), vec![]);
        let b = interner.instance(SymbolId(2), vec![]);
        let joined = join(&mut checker, a, b);
        match &*interner.get(joined) {
            Type::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected union fallback, got {other:?}"),
        }
    }

    #[test]
    fn meet_of_unrelated_instances_is_never() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        let a = interner.instance(SymbolId(1), vec![]);
        let b = interner.instance(SymbolId(2), vec![]);
        assert_eq!(meet(&mut checker, a, b), TypeId::NEVER);
    }
}
