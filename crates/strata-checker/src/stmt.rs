//! The statement/flow checker (spec §4.4: "the checker walks statements,
//! threading a narrowing environment through branches and loops").
//!
//! Every `check_*` function here either updates `env` in place for the
//! statements that follow, or forks it across the branches a control-flow
//! statement introduces and joins the results back (`narrow::NarrowingEnv::join`,
//! already generalized to N branches). Expression checking itself is never
//! duplicated here — every sub-expression goes through `expr::check_expr`,
//! this module only owns the flow-sensitive bookkeeping around it.

use crate::context::CheckerContext;
use crate::narrow::NarrowingEnv;
use strata_ast::{Expr, FunctionDef, NodeArena, ParamDecl, Stmt};
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::ids::{NodeId, ScopeId, SymbolId};
use strata_common::span::Span;
use strata_semantic::ScopeKind;
use strata_types::TypeId;

/// Bounded widening passes a loop body runs before the checker settles for
/// the environment it converges to (spec §4.4 Loop: "a two-pass scheme with
/// a bounded iteration limit suffices").
const LOOP_WIDEN_PASSES: usize = 2;

fn declared_type_of(ctx: &CheckerContext<'_>, symbol: SymbolId) -> Option<TypeId> {
    ctx.table.symbols.get(symbol).declared_type
}

fn resolve_name_symbol(ctx: &CheckerContext<'_>, scope: ScopeId, node: NodeId) -> Option<SymbolId> {
    if let Some(sym) = ctx.table.symbol_of_node(node) {
        return Some(sym);
    }
    match ctx.arena.expr(node) {
        Expr::Name(atom) => ctx.table.scopes.resolve(scope, *atom),
        _ => None,
    }
}

fn join_envs(ctx: &CheckerContext<'_>, branches: &[NarrowingEnv]) -> NarrowingEnv {
    let mut checker = ctx.subtype_checker();
    NarrowingEnv::join(&mut checker, branches, |s| declared_type_of(ctx, s))
}

/// Binds `value_ty` to a `Name` symbol, applying the rules spec §4.4 lays
/// out for assignment: a `Final` symbol may only be bound once; a declared
/// type (from this statement or the symbol's own declaration) is checked
/// against and becomes the environment entry; otherwise the entry is the
/// inferred type, widened (joined with the prior entry) on rebinding unless
/// redefinition mode is enabled — and module/class-level names always widen
/// regardless of that mode, since a rebind there can be observed from
/// anywhere that reads the name, not just the rest of this flow.
fn assign_name_binding(ctx: &CheckerContext<'_>, env: &mut NarrowingEnv, sym: SymbolId, value_ty: TypeId, stmt_declared: Option<TypeId>, span: Span) {
    let symbol = ctx.table.symbols.get(sym);
    if symbol.is_final() && env.get(sym).is_some() {
        ctx.emit(Diagnostic::error(
            ErrorKind::FinalReassignment,
            span,
            format!("{} is declared final and cannot be reassigned", symbol.name.as_str()),
        ));
    }

    let declared = stmt_declared.or(symbol.declared_type);
    if let Some(declared) = declared {
        if !ctx.is_subtype(value_ty, declared) {
            ctx.emit(Diagnostic::error(
                ErrorKind::IncompatibleAssignment,
                span,
                format!(
                    "Cannot assign {} to a target of declared type {}",
                    crate::display::describe(ctx, value_ty),
                    crate::display::describe(ctx, declared)
                ),
            ));
        }
        env.set(sym, declared);
        return;
    }

    let sticky_scope = matches!(ctx.table.scopes.get(symbol.owning_scope).kind, ScopeKind::Module | ScopeKind::Class);
    match env.get(sym) {
        Some(prior) if sticky_scope || !ctx.options.redefinition_allowed => {
            if !ctx.is_subtype(value_ty, prior) && !ctx.is_subtype(prior, value_ty) {
                ctx.emit(Diagnostic::warning(
                    ErrorKind::NameRedefined,
                    span,
                    format!("Name {} is redefined with an incompatible type", symbol.name.as_str()),
                ));
            }
            env.set(sym, ctx.join(prior, value_ty));
        }
        _ => env.set(sym, value_ty),
    }
}

/// Assigns `value_ty` to an arbitrary assignment target, recursing into
/// tuple/list destructuring and delegating attribute/subscript writes to
/// the helpers `expr.rs` exposes for exactly this purpose.
fn assign_target(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, target: NodeId, value_ty: TypeId, stmt_declared: Option<TypeId>, span: Span) {
    match arena.expr(target) {
        Expr::Name(_) => {
            if let Some(sym) = resolve_name_symbol(ctx, scope, target) {
                assign_name_binding(ctx, env, sym, value_ty, stmt_declared, span);
            }
        }
        Expr::Attribute { value, attr } => {
            crate::expr::assign_attribute_target(ctx, arena, scope, env, *value, *attr, span, value_ty);
        }
        Expr::Subscript { value, index } => {
            crate::expr::assign_subscript_target(ctx, arena, scope, env, *value, *index, span, value_ty);
        }
        Expr::Tuple(elements) | Expr::ListLiteral(elements) => {
            let elem_types = crate::expr::tuple_element_types(ctx, value_ty, elements.len());
            for (&el, ty) in elements.iter().zip(elem_types) {
                assign_target(ctx, arena, scope, env, el, ty, None, span);
            }
        }
        Expr::Starred(inner) => {
            let list_ty = match ctx.builtins.list_class {
                Some(c) => ctx.interner.instance(c, vec![value_ty]),
                None => TypeId::ANY,
            };
            assign_target(ctx, arena, scope, env, *inner, list_ty, None, span);
        }
        _ => {
            crate::expr::check_expr(ctx, arena, scope, env, target, None);
        }
    }
}

fn is_literal_false(arena: &NodeArena, node: NodeId) -> bool {
    matches!(arena.expr(node), Expr::Literal(strata_ast::LiteralKind::Bool(false)))
}

/// Walks every statement in `stmts` in order, threading `env` through.
/// `return_ty` is the enclosing function's declared return type, if any —
/// `None` at module/class scope, where `return` doesn't appear.
pub fn check_block(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, stmts: &[NodeId], return_ty: Option<TypeId>) {
    for &node in stmts {
        check_stmt(ctx, arena, scope, env, node, return_ty);
    }
}

fn check_stmt(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, return_ty: Option<TypeId>) {
    let span = arena.span(node);
    match arena.stmt(node) {
        Stmt::ExprStmt(expr) => {
            crate::expr::check_expr(ctx, arena, scope, env, *expr, None);
        }
        Stmt::Assign { targets, value, declared_type } => {
            let value_ty = crate::expr::check_expr(ctx, arena, scope, env, *value, *declared_type);
            for &target in targets {
                assign_target(ctx, arena, scope, env, target, value_ty, *declared_type, span);
            }
        }
        Stmt::AugAssign { target, op, value } => {
            crate::expr::check_expr(ctx, arena, scope, env, *target, None);
            crate::expr::check_expr(ctx, arena, scope, env, *value, None);
            let result_ty = crate::expr::binary_op_result(ctx, arena, span, *op, *target, *value);
            assign_target(ctx, arena, scope, env, *target, result_ty, None, span);
        }
        // `x: T` with no value. The declared type already lives on the
        // symbol via the front-end; nothing binds in the environment until
        // an actual assignment happens.
        Stmt::AnnotationOnly { .. } => {}
        Stmt::Return(value) => {
            let value_ty = match value {
                Some(v) => crate::expr::check_expr(ctx, arena, scope, env, *v, return_ty),
                None => TypeId::NONE,
            };
            if let Some(expected) = return_ty {
                if !ctx.is_subtype(value_ty, expected) {
                    ctx.emit(Diagnostic::error(
                        ErrorKind::IncompatibleReturn,
                        span,
                        format!(
                            "Returned type {} is not compatible with declared return type {}",
                            crate::display::describe(ctx, value_ty),
                            crate::display::describe(ctx, expected)
                        ),
                    ));
                }
            }
            env.mark_unreachable();
        }
        Stmt::Raise { exc, cause } => {
            if let Some(e) = exc {
                crate::expr::check_expr(ctx, arena, scope, env, *e, None);
            }
            if let Some(c) = cause {
                crate::expr::check_expr(ctx, arena, scope, env, *c, None);
            }
            env.mark_unreachable();
        }
        Stmt::Assert { test, msg } => {
            crate::expr::check_expr(ctx, arena, scope, env, *test, None);
            if let Some(m) = msg {
                crate::expr::check_expr(ctx, arena, scope, env, *m, None);
            }
            let refinement = crate::predicate::narrow_test(ctx, arena, scope, env, *test);
            *env = refinement.then;
            if is_literal_false(arena, *test) {
                env.mark_unreachable();
            }
        }
        Stmt::Del(targets) => {
            for &t in targets {
                match resolve_name_symbol(ctx, scope, t) {
                    Some(sym) => env.delete(sym),
                    None => {
                        crate::expr::check_expr(ctx, arena, scope, env, t, None);
                    }
                }
            }
        }
        Stmt::Pass | Stmt::Break | Stmt::Continue | Stmt::Global(_) | Stmt::Nonlocal(_) => {}
        Stmt::If { test, body, orelse } => {
            crate::expr::check_expr(ctx, arena, scope, env, *test, None);
            let refinement = crate::predicate::narrow_test(ctx, arena, scope, env, *test);
            let mut then_env = refinement.then;
            let mut else_env = refinement.els;
            check_block(ctx, arena, scope, &mut then_env, body, return_ty);
            check_block(ctx, arena, scope, &mut else_env, orelse, return_ty);
            *env = join_envs(ctx, &[then_env, else_env]);
        }
        Stmt::While { test, body, orelse } => {
            let mut loop_env = env.fork();
            for _ in 0..LOOP_WIDEN_PASSES {
                crate::expr::check_expr(ctx, arena, scope, &mut loop_env, *test, None);
                let refinement = crate::predicate::narrow_test(ctx, arena, scope, &loop_env, *test);
                let mut body_env = refinement.then;
                check_block(ctx, arena, scope, &mut body_env, body, return_ty);
                loop_env = join_envs(ctx, &[loop_env.clone(), body_env]);
            }
            crate::expr::check_expr(ctx, arena, scope, &mut loop_env, *test, None);
            let refinement = crate::predicate::narrow_test(ctx, arena, scope, &loop_env, *test);
            let mut else_env = refinement.els;
            check_block(ctx, arena, scope, &mut else_env, orelse, return_ty);
            *env = else_env;
        }
        Stmt::For { target, iter, body, orelse } => {
            let iter_ty = crate::expr::check_expr(ctx, arena, scope, env, *iter, None);
            let elem_ty = crate::expr::iterable_element_type(ctx, iter_ty);
            let mut loop_env = env.fork();
            assign_target(ctx, arena, scope, &mut loop_env, *target, elem_ty, None, span);
            for _ in 0..LOOP_WIDEN_PASSES {
                let mut body_env = loop_env.fork();
                check_block(ctx, arena, scope, &mut body_env, body, return_ty);
                loop_env = join_envs(ctx, &[loop_env.clone(), body_env]);
                assign_target(ctx, arena, scope, &mut loop_env, *target, elem_ty, None, span);
            }
            check_block(ctx, arena, scope, &mut loop_env, orelse, return_ty);
            *env = loop_env;
        }
        Stmt::Try { body, handlers, orelse, finalbody } => {
            let pre_try_env = env.fork();
            let mut try_env = env.fork();
            check_block(ctx, arena, scope, &mut try_env, body, return_ty);

            let mut tail_envs = Vec::new();
            for handler in handlers {
                // An exception may interrupt the try body at any point, so a
                // handler only starts from what held before entering it, not
                // from anything the (possibly partial) try body bound.
                let mut handler_env = pre_try_env.fork();
                if let (Some(exc_ty), Some(name)) = (handler.exc_type, handler.bound_name) {
                    if let Some(sym) = ctx.table.scopes.resolve(scope, name) {
                        handler_env.set(sym, exc_ty);
                    }
                }
                check_block(ctx, arena, scope, &mut handler_env, &handler.body, return_ty);
                tail_envs.push(handler_env);
            }

            let mut orelse_env = try_env.fork();
            check_block(ctx, arena, scope, &mut orelse_env, orelse, return_ty);
            tail_envs.push(orelse_env);

            let mut joined = join_envs(ctx, &tail_envs);
            check_block(ctx, arena, scope, &mut joined, finalbody, return_ty);
            *env = joined;
        }
        Stmt::With { items, body } => {
            for &(ctx_expr, target) in items {
                let cm_ty = crate::expr::check_expr(ctx, arena, scope, env, ctx_expr, None);
                if let Some(target) = target {
                    let bound_ty = resolve_enter_type(ctx, cm_ty);
                    assign_target(ctx, arena, scope, env, target, bound_ty, None, span);
                }
            }
            check_block(ctx, arena, scope, env, body, return_ty);
        }
        Stmt::FunctionDef(func) => {
            let own_symbol = ctx.table.symbol_of_node(node);
            check_function_body(ctx, arena, func, own_symbol);
        }
        Stmt::ClassDef(class) => {
            if let Some(ty) = crate::plugin::class_body_hook(ctx, arena, scope, node, class) {
                ctx.record_type(node, ty);
            }
            if let Some(class_symbol) = ctx.table.symbol_of_node(node).or_else(|| ctx.table.scopes.resolve(scope, class.name)) {
                if let Some(info) = ctx.table.class_info(class_symbol) {
                    crate::variance::check_declared_variance(ctx, class_symbol, info, span);
                }
            }
            let mut class_env = NarrowingEnv::new();
            check_block(ctx, arena, class.scope, &mut class_env, &class.body, None);
        }
    }
}

fn resolve_enter_type(ctx: &CheckerContext<'_>, cm_ty: TypeId) -> TypeId {
    let class = match &*ctx.interner.get(cm_ty) {
        strata_types::type_data::Type::Instance { class, .. } => *class,
        strata_types::type_data::Type::Any => return TypeId::ANY,
        _ => return TypeId::ANY,
    };
    let Some(member) = ctx.table.resolve_member(class, strata_common::interner::Atom::new("__enter__")) else {
        return TypeId::ANY;
    };
    match &*ctx.interner.get(member.ty) {
        strata_types::type_data::Type::Callable(c) => c.return_ty,
        _ => TypeId::ANY,
    }
}

/// Binds parameters (declared types, or the inferred type of a default
/// value), checks defaults against declared parameter types, validates a
/// declared `TypeIs` return against its target parameter (spec §4.4), walks
/// the body, and diagnoses falling off the end of a function whose declared
/// return type doesn't accept `None`.
pub fn check_function_body(ctx: &CheckerContext<'_>, arena: &NodeArena, func: &FunctionDef, own_symbol: Option<SymbolId>) {
    let mut env = NarrowingEnv::new();
    bind_parameters(ctx, arena, func, &mut env);

    if let (Some(target_idx), Some(sym)) = (func.type_guard_target, own_symbol) {
        validate_type_guard_return(ctx, func, target_idx, sym);
    }

    check_block(ctx, arena, func.scope, &mut env, &func.body, func.return_annotation);

    if let Some(ret) = func.return_annotation {
        if env.reachable() && !ctx.is_subtype(TypeId::NONE, ret) {
            ctx.emit(Diagnostic::error(
                ErrorKind::IncompatibleReturn,
                Span::dummy(),
                format!("Function {} is missing a return statement on a path that falls off the end", func.name.as_str()),
            ));
        }
    }
}

fn bind_parameters(ctx: &CheckerContext<'_>, arena: &NodeArena, func: &FunctionDef, env: &mut NarrowingEnv) {
    for param in &func.params {
        let ParamDecl { name, annotation, default, .. } = param;
        let Some(sym) = ctx.table.scopes.resolve(func.scope, *name) else { continue };
        match annotation {
            Some(declared) => {
                // spec §6 `implicit-optional`: a parameter default of `None`
                // widens the effective declared type to `T | None`, even
                // when the annotation itself didn't spell out the union.
                let effective_declared = if ctx.options.implicit_optional && is_none_literal(arena, default) {
                    ctx.join(*declared, TypeId::NONE)
                } else {
                    *declared
                };
                if let Some(default_node) = default {
                    let default_ty = crate::expr::check_expr(ctx, arena, func.scope, env, *default_node, Some(effective_declared));
                    if !ctx.is_subtype(default_ty, effective_declared) {
                        ctx.emit(Diagnostic::error(
                            ErrorKind::IncompatibleAssignment,
                            arena.span(*default_node),
                            format!(
                                "Cannot assign {} to a target of declared type {}",
                                crate::display::describe(ctx, default_ty),
                                crate::display::describe(ctx, effective_declared)
                            ),
                        ));
                    }
                }
                env.set(sym, effective_declared);
            }
            None => {
                if let Some(default_node) = default {
                    let default_ty = crate::expr::check_expr(ctx, arena, func.scope, env, *default_node, None);
                    env.set(sym, default_ty);
                }
            }
        }
    }
}

/// Spec §4.4: a declared `TypeIs[T]` requires `T` to be a subtype of the
/// guarded parameter's own declared type; `TypeGuard[T]`'s one-way narrowing
/// carries no such constraint.
fn validate_type_guard_return(ctx: &CheckerContext<'_>, func: &FunctionDef, target_idx: usize, own_symbol: SymbolId) {
    let Some(declared) = ctx.table.symbols.get(own_symbol).declared_type else { return };
    let Some(guard) = crate::expr::extract_type_guard(ctx, declared) else { return };
    if !crate::expr::is_two_way_guard(&guard) {
        return;
    }
    let Some(param) = func.params.get(target_idx) else { return };
    let Some(param_declared) = param.annotation else { return };
    if !ctx.is_subtype(guard.narrowed, param_declared) {
        ctx.emit(Diagnostic::error(
            ErrorKind::NarrowingTypeGuardInvalid,
            Span::dummy(),
            format!(
                "Type guard narrows to {}, which is not a subtype of the parameter's declared type {}",
                crate::display::describe(ctx, guard.narrowed),
                crate::display::describe(ctx, param_declared)
            ),
        ));
    }
}

/// Entry point for a whole compilation unit (spec §6): walks the module's
/// top-level statements in a fresh environment. Nested `FunctionDef`s and
/// `ClassDef`s recurse into their own bodies as `check_stmt` walks them.
pub fn check_module(ctx: &CheckerContext<'_>, arena: &NodeArena, module_scope: ScopeId, body: &[NodeId]) {
    let mut env = NarrowingEnv::new();
    check_block(ctx, arena, module_scope, &mut env, body, None);
}
