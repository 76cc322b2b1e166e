//! Subtype checking: spec §4.1 `S ≤ T`.
//!
//! Structural recursion with short-circuits, exactly as spec.md describes.
//! The `(S, T)` visited set breaks cycles on mutually recursive type
//! aliases/structural-protocol members (spec §4.1's explicit MUST, and
//! spec §9's note on cyclic graphs) — same guard shape the teacher uses
//! for alias expansion, generalized to pairs.

use crate::hierarchy::ClassHierarchy;
use crate::interner::TypeInterner;
use crate::type_data::{ParamKind, Type, TypeId, Variance};
use rustc_hash::FxHashSet;

pub struct SubtypeChecker<'a, H: ClassHierarchy> {
    interner: &'a TypeInterner,
    hierarchy: &'a H,
    visited: FxHashSet<(TypeId, TypeId)>,
}

impl<'a, H: ClassHierarchy> SubtypeChecker<'a, H> {
    pub fn new(interner: &'a TypeInterner, hierarchy: &'a H) -> Self {
        SubtypeChecker { interner, hierarchy, visited: FxHashSet::default() }
    }

    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    pub fn hierarchy(&self) -> &'a H {
        self.hierarchy
    }

    pub fn is_subtype_of(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if sub == TypeId::NEVER || sup == TypeId::ANY {
            return true;
        }
        // Any is simultaneously subtype and supertype of everything (§4.1:
        // "Any subtype of everything and supertype of everything").
        if sub == TypeId::ANY {
            return true;
        }
        if !self.visited.insert((sub, sup)) {
            // Already assuming this pair holds further up the recursion —
            // a cyclic alias/protocol is consistent with itself.
            return true;
        }
        let result = self.check(sub, sup);
        self.visited.remove(&(sub, sup));
        result
    }

    fn check(&mut self, sub: TypeId, sup: TypeId) -> bool {
        let sub_ty = self.interner.get(sub).clone();
        let sup_ty = self.interner.get(sup).clone();

        // Unions distribute on the left (every member must hold) and join
        // on the right (at least one member suffices) — spec §4.1.
        if let Type::Union(members) = &sub_ty {
            return members.iter().all(|&m| self.is_subtype_of(m, sup));
        }
        if let Type::Union(members) = &sup_ty {
            return members.iter().any(|&m| self.is_subtype_of(sub, m));
        }

        match (&sub_ty, &sup_ty) {
            (Type::None, Type::None) => true,
            (Type::Literal { fallback, .. }, _) => {
                // "Literal values are subtypes of their nominal fallback."
                let fallback_ty = self.interner.instance(*fallback, Vec::new());
                self.is_subtype_of(fallback_ty, sup)
            }
            (Type::Instance { class: sc, args: sa }, Type::Instance { class: tc, args: ta }) => {
                self.instance_subtype(*sc, sa, *tc, ta)
            }
            (Type::ClassObject { instance: si }, Type::ClassObject { instance: ti }) => {
                self.is_subtype_of(*si, *ti)
            }
            (Type::Tuple(a), Type::Tuple(b)) => crate::ops::tuple::tuple_subtype(self, a, b),
            (Type::TypedMapping(a), Type::TypedMapping(b)) => {
                crate::ops::typed_mapping::typed_mapping_subtype(self, a, b)
            }
            (Type::NamedTuple(a), Type::NamedTuple(b)) => {
                a.declaration == b.declaration
                    || self.named_tuple_as_tuple_subtype(a, sup)
            }
            (Type::NamedTuple(a), Type::Tuple(b)) => {
                crate::ops::tuple::named_tuple_subtype_tuple(self, a, b)
            }
            (Type::Callable(a), Type::Callable(b)) => self.callable_subtype(a, b),
            (Type::Callable(_), Type::Overloaded(sigs)) => {
                sigs.iter().any(|&s| self.is_subtype_of(sub, s))
            }
            (Type::Overloaded(sigs), _) => sigs.iter().all(|&s| self.is_subtype_of(s, sup)),
            // An unsolved type variable reaching the subtype checker is a
            // solver bug, not a type error: the expression/call checker is
            // responsible for substituting solver output before calling
            // here (§4.2). Conservatively reject rather than panic.
            (Type::TypeVar(_), _) => false,
            _ => false,
        }
    }

    fn named_tuple_as_tuple_subtype(
        &mut self,
        a: &crate::type_data::NamedTuple,
        sup: TypeId,
    ) -> bool {
        if let Type::Tuple(b) = self.interner.get(sup).clone() {
            crate::ops::tuple::named_tuple_subtype_tuple(self, a, &b)
        } else {
            false
        }
    }

    fn instance_subtype(
        &mut self,
        sub_class: strata_common::ids::SymbolId,
        sub_args: &[TypeId],
        sup_class: strata_common::ids::SymbolId,
        sup_args: &[TypeId],
    ) -> bool {
        if self.hierarchy.is_structural(sup_class) {
            return self.structural_subtype(sub_class, sub_args, sup_class);
        }
        if !self.hierarchy.is_subclass(sub_class, sup_class) {
            return false;
        }
        // Same class (or an ancestor with the same arity): check each type
        // argument against its position's declared variance.
        if sub_args.len() != sup_args.len() {
            return sup_args.is_empty();
        }
        for (i, (&sa, &ta)) in sub_args.iter().zip(sup_args.iter()).enumerate() {
            let variance = self.hierarchy.variance_of(sup_class, i);
            let ok = match variance {
                Variance::Covariant | Variance::Inferred => self.is_subtype_of(sa, ta),
                Variance::Contravariant => self.is_subtype_of(ta, sa),
                Variance::Invariant => self.is_subtype_of(sa, ta) && self.is_subtype_of(ta, sa),
            };
            if !ok {
                return false;
            }
        }
        true
    }

    fn structural_subtype(
        &mut self,
        sub_class: strata_common::ids::SymbolId,
        _sub_args: &[TypeId],
        sup_class: strata_common::ids::SymbolId,
    ) -> bool {
        // By member signature compatibility rather than nominal ancestry
        // (spec §6). The same `(sub, sup)` visited-pair guard already in
        // effect prevents infinite recursion on recursive protocol members.
        let members = self.hierarchy.structural_members(sup_class);
        for &(name, required_ty) in members {
            let Some(&(_, actual_ty)) = self
                .hierarchy
                .structural_members(sub_class)
                .iter()
                .find(|(n, _)| *n == name)
            else {
                return false;
            };
            if !self.is_subtype_of(actual_ty, required_ty) {
                return false;
            }
        }
        true
    }

    fn callable_subtype(
        &mut self,
        sub: &crate::type_data::Callable,
        sup: &crate::type_data::Callable,
    ) -> bool {
        // Contravariant in parameters, covariant in return (§4.1).
        if !self.is_subtype_of(sub.return_ty, sup.return_ty) {
            return false;
        }
        let mut sub_params = sub.params.iter();
        for sup_param in &sup.params {
            let Some(sub_param) = sub_params.next() else {
                // The supertype's caller offers more arguments than `sub`
                // declares — only fine if the remaining params are optional
                // on the callee side, which we don't have here, so fail
                // conservatively unless `sub` has a `*args`/`**kwargs` catch-all.
                return sub.params.iter().any(|p| {
                    matches!(p.kind, ParamKind::VarArgs | ParamKind::VarKwargs)
                });
            };
            if !kind_compatible(sub_param.kind, sup_param.kind) {
                return false;
            }
            // Narrower caller obligations (sup's declared param type) accept
            // broader callee obligations (sub's declared param type): the
            // callee must accept anything the narrower caller promises to
            // pass, i.e. contravariant — sup's param type must be a subtype
            // of sub's param type.
            if !self.is_subtype_of(sup_param.ty, sub_param.ty) {
                return false;
            }
        }
        true
    }
}

fn kind_compatible(sub: ParamKind, sup: ParamKind) -> bool {
    use ParamKind::*;
    match (sub, sup) {
        (a, b) if a == b => true,
        (PositionalRequired, PositionalOptional) => true,
        (VarArgs, PositionalRequired | PositionalOptional) => true,
        (VarKwargs, KeywordOnly) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::EmptyHierarchy;

    fn checker(interner: &TypeInterner) -> SubtypeChecker<'_, EmptyHierarchy> {
        SubtypeChecker::new(interner, &EmptyHierarchy)
    }

    #[test]
    fn reflexivity_holds_for_any_never_none() {
        let interner = TypeInterner::new();
        let mut c = checker(&interner);
        for t in [TypeId::ANY, TypeId::NEVER, TypeId::NONE] {
            assert!(c.is_subtype_of(t, t));
        }
    }

    #[test]
    fn any_absorbs_both_sides() {
        let interner = TypeInterner::new();
        let mut c = checker(&interner);
        let sym = strata_common::ids::SymbolId(1);
        let int_ty = interner.instance(sym, Vec::new());
        assert!(c.is_subtype_of(TypeId::ANY, int_ty));
        assert!(c.is_subtype_of(int_ty, TypeId::ANY));
    }

    #[test]
    fn never_is_subtype_of_everything() {
        let interner = TypeInterner::new();
        let mut c = checker(&interner);
        let sym = strata_common::ids::SymbolId(1);
        let int_ty = interner.instance(sym, Vec::new());
        assert!(c.is_subtype_of(TypeId::NEVER, int_ty));
        assert!(c.is_subtype_of(TypeId::NEVER, TypeId::NONE));
    }

    #[test]
    fn literal_is_subtype_of_its_fallback() {
        let interner = TypeInterner::new();
        let mut c = checker(&interner);
        let int_class = strata_common::ids::SymbolId(3);
        let lit = interner.literal_int(42, int_class);
        let int_ty = interner.instance(int_class, Vec::new());
        assert!(c.is_subtype_of(lit, int_ty));
        assert!(!c.is_subtype_of(int_ty, lit));
    }

    #[test]
    fn union_distributes_left_and_joins_right() {
        let interner = TypeInterner::new();
        let mut c = checker(&interner);
        let sym = strata_common::ids::SymbolId(1);
        let other = strata_common::ids::SymbolId(2);
        let a = interner.instance(sym, Vec::new());
        let b = interner.instance(other, Vec::new());
        let narrow = interner.intern(Type::Union(vec![a, TypeId::NONE]));
        let wider = interner.intern(Type::Union(vec![a, TypeId::NONE, b]));
        assert!(c.is_subtype_of(narrow, wider));
        assert!(!c.is_subtype_of(wider, narrow));
    }
}
