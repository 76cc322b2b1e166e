//! Collects the free type-variable references a type mentions (spec §4.3
//! "Generic call": "instantiates fresh variables for each declared
//! parameter on the callee, feeds constraints from argument types and the
//! expected return type"). Needed to tell a generic callable from an
//! ordinary one before deciding whether a call site needs the solver.

use rustc_hash::FxHashSet;
use strata_types::type_data::{Type, TypeVarId};
use strata_types::{TypeId, TypeInterner};

pub fn free_type_vars(interner: &TypeInterner, ty: TypeId) -> Vec<TypeVarId> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    collect(interner, ty, &mut out, &mut seen);
    out
}

fn collect(interner: &TypeInterner, ty: TypeId, out: &mut Vec<TypeVarId>, seen: &mut FxHashSet<TypeId>) {
    if !seen.insert(ty) {
        return;
    }
    match &*interner.get(ty) {
        Type::TypeVar(v) => out.push(v.id),
        Type::Instance { args, .. } => {
            for &a in args {
                collect(interner, a, out, seen);
            }
        }
        Type::ClassObject { instance } => collect(interner, *instance, out, seen),
        Type::Union(members) | Type::Overloaded(members) => {
            for &m in members {
                collect(interner, m, out, seen);
            }
        }
        Type::Callable(c) => {
            for p in &c.params {
                collect(interner, p.ty, out, seen);
            }
            collect(interner, c.return_ty, out, seen);
        }
        Type::Tuple(shape) => match shape {
            strata_types::type_data::TupleShape::Homogeneous(e) => collect(interner, *e, out, seen),
            strata_types::type_data::TupleShape::Fixed { elements, .. } => {
                for &e in elements {
                    collect(interner, e, out, seen);
                }
            }
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::ids::{ScopeId, SymbolId};
    use strata_types::type_data::{TypeVarKind, TypeVarRef};

    #[test]
    fn finds_a_variable_nested_inside_a_generic_instance() {
        let interner = TypeInterner::new();
        let var_id = TypeVarId(3);
        let var = interner.intern(Type::TypeVar(TypeVarRef { id: var_id, binding_scope: ScopeId(0), kind: TypeVarKind::Plain }));
        let list_of_var = interner.instance(SymbolId(7), vec![var]);
        assert_eq!(free_type_vars(&interner, list_of_var), vec![var_id]);
    }

    #[test]
    fn a_concrete_type_has_no_free_variables() {
        let interner = TypeInterner::new();
        let concrete = interner.instance(SymbolId(1), vec![]);
        assert!(free_type_vars(&interner, concrete).is_empty());
    }
}
