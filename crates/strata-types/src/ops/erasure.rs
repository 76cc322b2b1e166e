//! Erasure (spec §4.1): removes all type-variable references by
//! substituting `Any`, used to compute the runtime-visible type of a
//! generic value (e.g. the type a gradual boundary exposes once static
//! type parameters are gone).

use crate::interner::TypeInterner;
use crate::type_data::{Type, TypeId};
use rustc_hash::FxHashMap;

pub fn erase(interner: &TypeInterner, ty: TypeId) -> TypeId {
    let mut memo = FxHashMap::default();
    erase_memo(interner, ty, &mut memo)
}

fn erase_memo(interner: &TypeInterner, ty: TypeId, memo: &mut FxHashMap<TypeId, TypeId>) -> TypeId {
    if let Some(&cached) = memo.get(&ty) {
        return cached;
    }
    let data = interner.get(ty).clone();
    let result = match &data {
        Type::TypeVar(_) => TypeId::ANY,
        Type::Instance { class, args } => {
            let new_args: Vec<_> = args.iter().map(|&a| erase_memo(interner, a, memo)).collect();
            interner.intern(Type::Instance { class: *class, args: new_args })
        }
        Type::Union(members) => {
            let new_members: Vec<_> = members.iter().map(|&m| erase_memo(interner, m, memo)).collect();
            crate::ops::union::make_union(interner, new_members)
        }
        Type::Callable(c) => {
            let new_params: Vec<_> = c
                .params
                .iter()
                .map(|p| crate::type_data::Param { name: p.name, kind: p.kind, ty: erase_memo(interner, p.ty, memo) })
                .collect();
            let new_return = erase_memo(interner, c.return_ty, memo);
            interner.intern(Type::Callable(Box::new(crate::type_data::Callable {
                params: new_params.into(),
                return_ty: new_return,
                bound_param_spec: None,
                type_guard: c.type_guard,
            })))
        }
        _ => ty,
    };
    memo.insert(ty, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erases_a_bare_type_variable() {
        let interner = TypeInterner::new();
        let var = interner.intern(Type::TypeVar(crate::type_data::TypeVarRef {
            id: crate::type_data::TypeVarId(0),
            binding_scope: strata_common::ids::ScopeId(0),
            kind: crate::type_data::TypeVarKind::Plain,
        }));
        assert_eq!(erase(&interner, var), TypeId::ANY);
    }

    #[test]
    fn erases_variables_nested_in_a_generic_instance() {
        let interner = TypeInterner::new();
        let var = interner.intern(Type::TypeVar(crate::type_data::TypeVarRef {
            id: crate::type_data::TypeVarId(0),
            binding_scope: strata_common::ids::ScopeId(0),
            kind: crate::type_data::TypeVarKind::Plain,
        }));
        let list_of_var = interner.instance(strata_common::ids::SymbolId(5), vec![var]);
        let erased = erase(&interner, list_of_var);
        match &*interner.get(erased) {
            Type::Instance { args, .. } => assert_eq!(args[0], TypeId::ANY),
            other => panic!("expected instance, got {other:?}"),
        }
    }

    #[test]
    fn leaves_variable_free_types_unchanged() {
        let interner = TypeInterner::new();
        let plain = interner.instance(strata_common::ids::SymbolId(1), vec![]);
        assert_eq!(erase(&interner, plain), plain);
    }
}
