//! Declared-vs-inferred variance checking (spec §6 "variance-check: enforce
//! declared variance against inferred variance at class-declaration time").
//!
//! The inference walks every member signature declared directly on the
//! class (inherited members are the base's own responsibility to have
//! already passed this check) and records, for each of the class's own type
//! parameters, every polarity the parameter was found in: parameter
//! positions of a `Callable` flip the ambient polarity, return positions
//! keep it, and anywhere nested inside another generic instance is treated
//! invariantly since this crate does not track that instance's own
//! parameter variance at the occurrence site.

use rustc_hash::FxHashSet;
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::ids::SymbolId;
use strata_common::span::Span;
use strata_semantic::ClassInfo;
use strata_types::type_data::{Type, TupleShape, TypeVarId};
use strata_types::{TypeId, TypeInterner, Variance};

use crate::context::CheckerContext;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
enum Polarity {
    Covariant,
    Contravariant,
}

impl Polarity {
    fn flip(self) -> Polarity {
        match self {
            Polarity::Covariant => Polarity::Contravariant,
            Polarity::Contravariant => Polarity::Covariant,
        }
    }
}

fn walk(interner: &TypeInterner, ty: TypeId, polarity: Polarity, target: TypeVarId, seen: &mut FxHashSet<(TypeId, Polarity)>, uses: &mut FxHashSet<Polarity>) {
    if !seen.insert((ty, polarity)) {
        return;
    }
    match &*interner.get(ty) {
        Type::TypeVar(v) if v.id == target => {
            uses.insert(polarity);
        }
        Type::TypeVar(_) => {}
        Type::Instance { args, .. } => {
            for &a in args {
                uses.insert(Polarity::Covariant);
                uses.insert(Polarity::Contravariant);
                walk(interner, a, polarity, target, seen, uses);
            }
        }
        Type::ClassObject { instance } => walk(interner, *instance, polarity, target, seen, uses),
        Type::Union(members) | Type::Overloaded(members) => {
            for &m in members {
                walk(interner, m, polarity, target, seen, uses);
            }
        }
        Type::Callable(c) => {
            for p in &c.params {
                walk(interner, p.ty, polarity.flip(), target, seen, uses);
            }
            walk(interner, c.return_ty, polarity, target, seen, uses);
        }
        Type::Tuple(shape) => match shape {
            TupleShape::Homogeneous(e) => walk(interner, *e, polarity, target, seen, uses),
            TupleShape::Fixed { elements, .. } => {
                for &e in elements {
                    walk(interner, e, polarity, target, seen, uses);
                }
            }
        },
        _ => {}
    }
}

/// `None` when the parameter is never used by an own member's signature —
/// an unused parameter has no inferred use to contradict, so it's exempt.
fn inferred_variance(uses: &FxHashSet<Polarity>) -> Option<Variance> {
    match (uses.contains(&Polarity::Covariant), uses.contains(&Polarity::Contravariant)) {
        (true, true) => Some(Variance::Invariant),
        (true, false) => Some(Variance::Covariant),
        (false, true) => Some(Variance::Contravariant),
        (false, false) => None,
    }
}

fn compatible(declared: Variance, inferred: Variance) -> bool {
    match declared {
        Variance::Invariant => true,
        Variance::Covariant => inferred != Variance::Contravariant,
        Variance::Contravariant => inferred != Variance::Covariant,
        Variance::Inferred => true,
    }
}

/// Entry point called from the class-definition statement (spec §4.4) when
/// `variance-check` is enabled. A no-op for classes with no explicitly
/// declared variance on any parameter.
pub fn check_declared_variance(ctx: &CheckerContext<'_>, class: SymbolId, info: &ClassInfo, span: Span) {
    if !ctx.options.variance_check {
        return;
    }
    for (index, param) in info.type_params.iter().enumerate() {
        if param.variance == Variance::Inferred {
            continue;
        }
        let mut uses = FxHashSet::default();
        for (_, member) in &info.members {
            let mut seen = FxHashSet::default();
            walk(ctx.interner, member.ty, Polarity::Covariant, param.id, &mut seen, &mut uses);
        }
        let Some(inferred) = inferred_variance(&uses) else { continue };
        if !compatible(param.variance, inferred) {
            ctx.emit(Diagnostic::warning(
                ErrorKind::VarianceViolation,
                span,
                format!(
                    "type parameter {index} of class {class:?} is declared {:?} but used {:?} in its own members",
                    param.variance, inferred
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::ids::ScopeId;
    use strata_common::options::EngineOptions;
    use strata_common::interner::Atom;
    use strata_semantic::{GenericParams, MemberInfo, SemanticTable, TypeVarDecl};
    use strata_types::type_data::{Callable, Param, ParamKind, TypeVarKind, TypeVarRef};
    use strata_types::TypeInterner;

    fn fixture_builtins() -> crate::BuiltinSymbols {
        crate::BuiltinSymbols {
            int_class: SymbolId(1),
            bool_class: SymbolId(2),
            str_class: SymbolId(3),
            bytes_class: SymbolId(4),
            object_class: SymbolId(5),
            list_class: None,
            set_class: None,
            dict_class: None,
        }
    }

    #[test]
    fn covariant_parameter_used_only_in_return_position_is_fine() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let options = EngineOptions { variance_check: true, ..Default::default() };
        let ctx = CheckerContext::new(&interner, &table, &strata_ast::NodeArena::new(), &options, fixture_builtins());

        let var_id = TypeVarId(1);
        let var = interner.intern(Type::TypeVar(TypeVarRef { id: var_id, binding_scope: ScopeId(0), kind: TypeVarKind::Plain }));
        let getter = interner.intern(Type::Callable(Box::new(Callable {
            params: Default::default(),
            return_ty: var,
            bound_param_spec: None,
            type_guard: None,
        })));

        let mut decl = TypeVarDecl::plain(var_id, TypeId::ANY);
        decl.variance = Variance::Covariant;
        let info = ClassInfo {
            type_params: GenericParams::new(vec![decl]),
            members: vec![(Atom::new("get"), MemberInfo::read_only(getter))],
            ..Default::default()
        };

        check_declared_variance(&ctx, SymbolId(9), &info, Span::dummy());
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn covariant_parameter_used_in_a_parameter_position_is_flagged() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let options = EngineOptions { variance_check: true, ..Default::default() };
        let ctx = CheckerContext::new(&interner, &table, &strata_ast::NodeArena::new(), &options, fixture_builtins());

        let var_id = TypeVarId(1);
        let var = interner.intern(Type::TypeVar(TypeVarRef { id: var_id, binding_scope: ScopeId(0), kind: TypeVarKind::Plain }));
        let setter = interner.intern(Type::Callable(Box::new(Callable {
            params: smallvec::smallvec![Param { name: Atom::new("value"), ty: var, kind: ParamKind::PositionalRequired }],
            return_ty: TypeId::NONE,
            bound_param_spec: None,
            type_guard: None,
        })));

        let mut decl = TypeVarDecl::plain(var_id, TypeId::ANY);
        decl.variance = Variance::Covariant;
        let info = ClassInfo {
            type_params: GenericParams::new(vec![decl]),
            members: vec![(Atom::new("set"), MemberInfo::field(setter))],
            ..Default::default()
        };

        check_declared_variance(&ctx, SymbolId(9), &info, Span::dummy());
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].kind, ErrorKind::VarianceViolation);
    }

    #[test]
    fn variance_check_disabled_by_default_is_a_no_op() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let options = EngineOptions::default();
        let ctx = CheckerContext::new(&interner, &table, &strata_ast::NodeArena::new(), &options, fixture_builtins());

        let var_id = TypeVarId(1);
        let var = interner.intern(Type::TypeVar(TypeVarRef { id: var_id, binding_scope: ScopeId(0), kind: TypeVarKind::Plain }));
        let setter = interner.intern(Type::Callable(Box::new(Callable {
            params: smallvec::smallvec![Param { name: Atom::new("value"), ty: var, kind: ParamKind::PositionalRequired }],
            return_ty: TypeId::NONE,
            bound_param_spec: None,
            type_guard: None,
        })));
        let mut decl = TypeVarDecl::plain(var_id, TypeId::ANY);
        decl.variance = Variance::Covariant;
        let info = ClassInfo {
            type_params: GenericParams::new(vec![decl]),
            members: vec![(Atom::new("set"), MemberInfo::field(setter))],
            ..Default::default()
        };

        check_declared_variance(&ctx, SymbolId(9), &info, Span::dummy());
        assert!(ctx.diagnostics().is_empty());
    }
}
