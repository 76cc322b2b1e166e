//! Alias expansion (spec §4.1: "unfolds declared type aliases exactly
//! once, memoizing to prevent non-termination on recursive aliases").
//!
//! An unexpanded alias reference looks exactly like an ordinary nominal
//! instance (`Type::Instance { class, args }`) — the front-end's symbol
//! table is what distinguishes "this symbol names a class" from "this
//! symbol names an alias declaration". `AliasResolver` is that
//! distinction, injected the same way `ClassHierarchy` is (see
//! `hierarchy.rs`) so this crate never depends on `strata-semantic`.

use crate::interner::TypeInterner;
use crate::ops::substitution::Substitution;
use crate::type_data::{Type, TypeId, TypeVarId};
use rustc_hash::FxHashMap;
use strata_common::ids::SymbolId;

pub trait AliasResolver {
    fn is_alias(&self, symbol: SymbolId) -> bool;
    /// The alias's right-hand side, expressed in terms of its own type
    /// parameters (as `TypeVarId`s in declaration order).
    fn alias_rhs(&self, symbol: SymbolId) -> TypeId;
    fn alias_params(&self, symbol: SymbolId) -> &[TypeVarId];
}

/// Expands `ty` one alias-reference layer at a time, left to right,
/// stopping the moment a given alias declaration has already been unfolded
/// once on the current path — recursive aliases are explicitly permitted
/// (spec §4.1), so the result may still contain further (distinct)
/// unexpanded alias references; callers that need a fully concrete type
/// call `expand_one` again at the point they next inspect the result,
/// rather than looping here, which is exactly what "exactly once" rules
/// out doing eagerly.
pub fn expand_one<R: AliasResolver>(interner: &TypeInterner, resolver: &R, ty: TypeId) -> TypeId {
    let mut memo = FxHashMap::default();
    expand_with_guard(interner, resolver, ty, &mut memo, &mut Vec::new())
}

fn expand_with_guard<R: AliasResolver>(
    interner: &TypeInterner,
    resolver: &R,
    ty: TypeId,
    memo: &mut FxHashMap<SymbolId, TypeId>,
    path: &mut Vec<SymbolId>,
) -> TypeId {
    let Type::Instance { class, args } = &*interner.get(ty) else {
        return ty;
    };
    let class = *class;
    let args = args.clone();
    if !resolver.is_alias(class) {
        return ty;
    }
    if path.contains(&class) {
        // Already unfolding this alias further up the call stack: stop
        // here rather than recursing forever. The caller sees the
        // still-folded reference.
        return ty;
    }
    if let Some(&cached) = memo.get(&class) {
        return cached;
    }
    path.push(class);
    let rhs = resolver.alias_rhs(class);
    let params = resolver.alias_params(class);
    let mut bindings = FxHashMap::default();
    for (param, &arg) in params.iter().zip(args.iter()) {
        bindings.insert(*param, arg);
    }
    let subst = Substitution::new(&bindings);
    let expanded = subst.apply(interner, rhs);
    memo.insert(class, expanded);
    path.pop();
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_data::TypeVarRef;
    use std::collections::HashMap;

    struct FakeAliases {
        rhs: HashMap<SymbolId, TypeId>,
        params: HashMap<SymbolId, Vec<TypeVarId>>,
    }

    impl AliasResolver for FakeAliases {
        fn is_alias(&self, symbol: SymbolId) -> bool {
            self.rhs.contains_key(&symbol)
        }
        fn alias_rhs(&self, symbol: SymbolId) -> TypeId {
            self.rhs[&symbol]
        }
        fn alias_params(&self, symbol: SymbolId) -> &[TypeVarId] {
            self.params.get(&symbol).map(|v| v.as_slice()).unwrap_or(&[])
        }
    }

    #[test]
    fn non_alias_instance_passes_through() {
        let interner = TypeInterner::new();
        let resolver = FakeAliases { rhs: HashMap::new(), params: HashMap::new() };
        let plain = interner.instance(SymbolId(1), vec![]);
        assert_eq!(expand_one(&interner, &resolver, plain), plain);
    }

    #[test]
    fn expands_a_parameterized_alias_one_level() {
        let interner = TypeInterner::new();
        let alias_sym = SymbolId(10);
        let var_id = TypeVarId(0);
        let var = interner.intern(Type::TypeVar(TypeVarRef {
            id: var_id,
            binding_scope: strata_common::ids::ScopeId(0),
            kind: crate::type_data::TypeVarKind::Plain,
        }));
        // alias StrOrT[T] = T | str  (string-ness represented as an opaque
        // instance for this test's purposes)
        let str_sym = SymbolId(2);
        let str_ty = interner.instance(str_sym, vec![]);
        let rhs = crate::ops::union::make_union(&interner, [var, str_ty]);

        let mut rhs_map = HashMap::new();
        rhs_map.insert(alias_sym, rhs);
        let mut params_map = HashMap::new();
        params_map.insert(alias_sym, vec![var_id]);
        let resolver = FakeAliases { rhs: rhs_map, params: params_map };

        let int_ty = interner.instance(SymbolId(1), vec![]);
        let alias_ref = interner.instance(alias_sym, vec![int_ty]);
        let expanded = expand_one(&interner, &resolver, alias_ref);
        match &*interner.get(expanded) {
            Type::Union(members) => {
                assert!(members.contains(&int_ty));
                assert!(members.contains(&str_ty));
            }
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn recursive_alias_does_not_loop() {
        let interner = TypeInterner::new();
        let alias_sym = SymbolId(11);
        // alias Rec = Rec (degenerate self-reference with no params)
        let self_ref = interner.instance(alias_sym, vec![]);
        let mut rhs_map = HashMap::new();
        rhs_map.insert(alias_sym, self_ref);
        let resolver = FakeAliases { rhs: rhs_map, params: HashMap::new() };
        // Must terminate: expanding once returns the unexpanded self
        // reference rather than recursing forever.
        let expanded = expand_one(&interner, &resolver, self_ref);
        assert_eq!(expanded, self_ref);
    }
}
