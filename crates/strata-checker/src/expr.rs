//! The expression checker (spec §4.3: "given an AST node for an expression,
//! returns its inferred type, consulting `expected` where the surrounding
//! context supplies one"). Walks post-order, recording every sub-expression's
//! type exactly once via `CheckerContext::record_type` on the way back up —
//! later passes (`predicate.rs`, overload/generic-call resolution) only ever
//! read that map, never recompute it.
//!
//! A handful of tiny `as_*` helpers below are the only places this module
//! pattern-matches on `ctx.interner.get(..)` directly: a match on a
//! `Ref<Type>` keeps that borrow alive for the whole match (Rust extends a
//! match scrutinee's temporary to the match's full body), so any arm that
//! goes on to call `join`/`meet`/`intern` — which need a *mutable* borrow of
//! the same interner — panics. Every `as_*` helper clones the bit of data it
//! needs and returns before the caller does anything else with the interner,
//! the same discipline `predicate.rs` and `generic_call.rs` already follow.

use crate::context::CheckerContext;
use crate::narrow::NarrowingEnv;
use smallvec::SmallVec;
use strata_ast::{Arg, ArgKind, BinOp, BoolOp, CmpOp, ComprehensionClause, ComprehensionKind, Expr, LiteralKind, NodeArena, UnaryOp};
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::ids::{NodeId, ScopeId, SymbolId};
use strata_common::interner::Atom;
use strata_common::span::Span;
use strata_types::type_data::{
    Callable, ExtraItemsPolicy, LiteralValue, Param, ParamKind, TupleShape, Type, TypeGuardKind, TypedMapping,
};
use strata_types::TypeId;

fn is_any(ctx: &CheckerContext<'_>, ty: TypeId) -> bool {
    matches!(&*ctx.interner.get(ty), Type::Any)
}

fn as_instance_class(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<SymbolId> {
    match &*ctx.interner.get(ty) {
        Type::Instance { class, .. } => Some(*class),
        _ => None,
    }
}

fn as_callable(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<Callable> {
    match &*ctx.interner.get(ty) {
        Type::Callable(c) => Some((**c).clone()),
        _ => None,
    }
}

fn as_overload_members(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<Vec<TypeId>> {
    match &*ctx.interner.get(ty) {
        Type::Overloaded(sigs) => Some(sigs.clone()),
        _ => None,
    }
}

fn as_class_object_instance(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<TypeId> {
    match &*ctx.interner.get(ty) {
        Type::ClassObject { instance } => Some(*instance),
        _ => None,
    }
}

fn as_union_members(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<Vec<TypeId>> {
    match &*ctx.interner.get(ty) {
        Type::Union(members) => Some(members.clone()),
        _ => None,
    }
}

fn as_typed_mapping(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<TypedMapping> {
    match &*ctx.interner.get(ty) {
        Type::TypedMapping(m) => Some((**m).clone()),
        _ => None,
    }
}

fn as_literal_fallback(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<SymbolId> {
    match &*ctx.interner.get(ty) {
        Type::Literal { fallback, .. } => Some(*fallback),
        _ => None,
    }
}

fn as_tuple_shape(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<TupleShape> {
    match &*ctx.interner.get(ty) {
        Type::Tuple(t) => Some(t.clone()),
        _ => None,
    }
}

fn as_named_tuple(ctx: &CheckerContext<'_>, ty: TypeId) -> Option<strata_types::type_data::NamedTuple> {
    match &*ctx.interner.get(ty) {
        Type::NamedTuple(nt) => Some((**nt).clone()),
        _ => None,
    }
}

fn class_name(ctx: &CheckerContext<'_>, class: SymbolId) -> String {
    ctx.table.symbols.get(class).name.as_str().to_string()
}

fn bool_instance(ctx: &CheckerContext<'_>) -> TypeId {
    ctx.interner.instance(ctx.builtins.bool_class, vec![])
}

/// Looks up a generic-call's own `GenericParams` by resolving the callee
/// back to a declared symbol (spec §4.3 "Generic call"). Only works for a
/// bare-name callee — a method call (`obj.method(...)`) has no symbol id on
/// its `MemberInfo` to look generics up by, so it falls back to treating the
/// call as non-generic (`VarsInfo::Plain` inside `generic_call::check_generic_call`).
fn callee_generics<'a>(ctx: &CheckerContext<'a>, arena: &NodeArena, callee: NodeId) -> Option<&'a strata_semantic::GenericParams> {
    match arena.expr(callee) {
        Expr::Name(_) => {
            let sym = ctx.table.symbol_of_node(callee)?;
            ctx.table.generics_of(sym)
        }
        _ => None,
    }
}

fn declared_type_of(ctx: &CheckerContext<'_>, symbol: SymbolId) -> Option<TypeId> {
    ctx.table.symbols.get(symbol).declared_type
}

fn name_symbol(ctx: &CheckerContext<'_>, scope: ScopeId, node: NodeId, name: Atom) -> Option<SymbolId> {
    ctx.table.symbol_of_node(node).or_else(|| ctx.table.scopes.resolve(scope, name))
}

/// Entry point: types `node` under `expected` (the surrounding context's
/// expectation, or `None`), recording the result exactly once.
pub fn check_expr(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, expected: Option<TypeId>) -> TypeId {
    let ty = match arena.expr(node) {
        Expr::Name(atom) => check_name(ctx, scope, env, node, *atom),
        Expr::Literal(kind) => check_literal(ctx, scope, kind),
        Expr::Attribute { value, attr } => {
            let owner_ty = check_expr(ctx, arena, scope, env, *value, None);
            resolve_attribute_type(ctx, owner_ty, *attr, arena.span(node), false)
        }
        Expr::Subscript { value, index } => check_subscript(ctx, arena, scope, env, node, *value, *index),
        Expr::Call { callee, args } => check_call(ctx, arena, scope, env, node, *callee, args, expected),
        Expr::BinaryOp { op, left, right } => check_binary_op(ctx, arena, scope, env, node, *op, *left, *right),
        Expr::UnaryOp { op, operand } => check_unary_op(ctx, arena, scope, env, node, *op, *operand),
        Expr::BoolOp { op: _, values } => check_bool_op(ctx, arena, scope, env, values),
        Expr::Compare { left, ops, comparators } => check_compare(ctx, arena, scope, env, *left, ops, comparators),
        Expr::Lambda { params, scope: lambda_scope, body } => check_lambda(ctx, arena, *lambda_scope, env, params, *body, expected),
        Expr::IfExp { test, body, orelse } => check_if_exp(ctx, arena, scope, env, *test, *body, *orelse),
        Expr::Tuple(items) => check_tuple(ctx, arena, scope, env, items),
        Expr::ListLiteral(items) => check_list_literal(ctx, arena, scope, env, items, expected),
        Expr::SetLiteral(items) => check_set_literal(ctx, arena, scope, env, items, expected),
        Expr::DictLiteral(items) => check_dict_literal(ctx, arena, scope, env, node, items, expected),
        Expr::Starred(inner) => check_expr(ctx, arena, scope, env, *inner, None),
        Expr::Await(inner) => check_await(ctx, arena, scope, env, *inner),
        Expr::Yield(inner) => {
            if let Some(v) = inner {
                check_expr(ctx, arena, scope, env, *v, None);
            }
            TypeId::ANY
        }
        Expr::YieldFrom(inner) => {
            check_expr(ctx, arena, scope, env, *inner, None);
            TypeId::ANY
        }
        Expr::NamedExpr { target, value } => check_named_expr(ctx, arena, scope, env, node, *target, *value, expected),
        Expr::Comprehension { kind, element, value, clauses } => {
            check_comprehension(ctx, arena, scope, env, *kind, *element, *value, clauses)
        }
    };
    ctx.record_type(node, ty);
    ty
}

fn check_name(ctx: &CheckerContext<'_>, scope: ScopeId, env: &NarrowingEnv, node: NodeId, atom: Atom) -> TypeId {
    let Some(sym) = name_symbol(ctx, scope, node, atom) else {
        ctx.emit(Diagnostic::error(ErrorKind::NameUndefined, Span::dummy(), format!("Name {} is not defined", atom.as_str())));
        return TypeId::ANY;
    };
    if env.is_deleted(sym) {
        ctx.emit(Diagnostic::warning(
            ErrorKind::PossiblyUndefined,
            Span::dummy(),
            format!("Name {} is possibly undefined at this point", atom.as_str()),
        ));
        return TypeId::ANY;
    }
    if let Some(ty) = env.get(sym) {
        return ty;
    }
    declared_type_of(ctx, sym).unwrap_or(TypeId::ANY)
}

fn check_literal(ctx: &CheckerContext<'_>, scope: ScopeId, kind: &LiteralKind) -> TypeId {
    match kind {
        LiteralKind::Int(v) => ctx.interner.literal_int(*v, ctx.builtins.int_class),
        LiteralKind::Bool(v) => ctx.interner.literal_bool(*v, ctx.builtins.bool_class),
        LiteralKind::Str(s) => ctx.interner.literal_str(s.as_str(), ctx.builtins.str_class),
        LiteralKind::Bytes(b) => ctx.interner.intern(Type::Literal { value: LiteralValue::Bytes(b.clone()), fallback: ctx.builtins.bytes_class }),
        LiteralKind::None => TypeId::NONE,
        LiteralKind::EnumMember { enum_name, member } => match ctx.table.scopes.resolve(scope, *enum_name) {
            Some(class_sym) => ctx.interner.intern(Type::Literal { value: LiteralValue::EnumMember(class_sym, *member), fallback: class_sym }),
            None => TypeId::ANY,
        },
    }
}

fn resolve_attribute_type(ctx: &CheckerContext<'_>, owner_ty: TypeId, attr: Atom, span: Span, for_write: bool) -> TypeId {
    if is_any(ctx, owner_ty) {
        return TypeId::ANY;
    }
    if !for_write {
        if let Some(ty) = crate::plugin::enum_member_attribute(ctx, owner_ty, attr) {
            return ty;
        }
    }
    if let Some(fallback) = as_literal_fallback(ctx, owner_ty) {
        return resolve_attribute_type(ctx, ctx.interner.instance(fallback, vec![]), attr, span, for_write);
    }
    if let Some(class) = as_instance_class(ctx, owner_ty) {
        return match ctx.table.resolve_member(class, attr) {
            Some(member) => {
                if for_write && !member.writable {
                    ctx.emit(Diagnostic::error(ErrorKind::AttributeReadOnly, span, format!("Attribute {} is read-only", attr.as_str())));
                }
                if for_write {
                    if let Some(slots) = ctx.table.class_info(class).and_then(|info| info.slots.as_ref()) {
                        if !slots.contains(&attr) {
                            ctx.emit(Diagnostic::error(
                                ErrorKind::AttributeNotInSlots,
                                span,
                                format!("Attribute {} is not declared in __slots__", attr.as_str()),
                            ));
                        }
                    }
                }
                member.ty
            }
            None => {
                ctx.emit(Diagnostic::error(
                    ErrorKind::AttributeMissing,
                    span,
                    format!("{} has no attribute {}", crate::display::describe(ctx, owner_ty), attr.as_str()),
                ));
                TypeId::ANY
            }
        };
    }
    if let Some(instance) = as_class_object_instance(ctx, owner_ty) {
        // Class-level (not instance-level) attribute access: approximated by
        // resolving through the class's own instance members, since nothing
        // in spec §3 distinguishes a classmethod/staticmethod's shape here.
        return resolve_attribute_type(ctx, instance, attr, span, for_write);
    }
    if let Some(members) = as_union_members(ctx, owner_ty) {
        let resolved: Vec<TypeId> = members.iter().map(|&m| resolve_attribute_type(ctx, m, attr, span, for_write)).collect();
        return resolved.into_iter().reduce(|a, b| ctx.join(a, b)).unwrap_or(TypeId::ANY);
    }
    if let Some(nt) = as_named_tuple(ctx, owner_ty) {
        return match nt.field_names.iter().position(|&n| n == attr) {
            Some(i) => {
                if for_write {
                    ctx.emit(Diagnostic::error(ErrorKind::AttributeReadOnly, span, format!("Attribute {} is read-only", attr.as_str())));
                }
                nt.field_types[i]
            }
            None => {
                ctx.emit(Diagnostic::error(
                    ErrorKind::AttributeMissing,
                    span,
                    format!("{} has no attribute {}", crate::display::describe(ctx, owner_ty), attr.as_str()),
                ));
                TypeId::ANY
            }
        };
    }
    TypeId::ANY
}

fn write_attribute(ctx: &CheckerContext<'_>, owner_ty: TypeId, attr: Atom, span: Span, value_ty: TypeId) {
    if is_any(ctx, owner_ty) {
        return;
    }
    let member_ty = resolve_attribute_type(ctx, owner_ty, attr, span, true);
    if !is_any(ctx, member_ty) && !ctx.is_subtype(value_ty, member_ty) {
        ctx.emit(Diagnostic::error(
            ErrorKind::IncompatibleAssignment,
            span,
            format!(
                "Cannot assign {} to a target of declared type {}",
                crate::display::describe(ctx, value_ty),
                crate::display::describe(ctx, member_ty)
            ),
        ));
    }
}

fn check_subscript(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, value: NodeId, index: NodeId) -> TypeId {
    let value_ty = check_expr(ctx, arena, scope, env, value, None);
    let index_ty = check_expr(ctx, arena, scope, env, index, None);
    subscript_result(ctx, arena, value_ty, index, index_ty, arena.span(node))
}

fn string_literal_key(arena: &NodeArena, node: NodeId) -> Option<Atom> {
    match arena.expr(node) {
        Expr::Literal(LiteralKind::Str(s)) => Some(*s),
        _ => None,
    }
}

fn int_literal_index(arena: &NodeArena, node: NodeId) -> Option<i64> {
    match arena.expr(node) {
        Expr::Literal(LiteralKind::Int(i)) => Some(*i),
        _ => None,
    }
}

fn subscript_result(ctx: &CheckerContext<'_>, arena: &NodeArena, value_ty: TypeId, index_node: NodeId, _index_ty: TypeId, span: Span) -> TypeId {
    if is_any(ctx, value_ty) {
        return TypeId::ANY;
    }
    if let Some(m) = as_typed_mapping(ctx, value_ty) {
        let Some(key) = string_literal_key(arena, index_node) else { return TypeId::ANY };
        return match m.fields.iter().find(|f| f.name == key) {
            Some(field) => field.ty,
            None => match m.extra_items {
                ExtraItemsPolicy::OpenTyped(t) => t,
                ExtraItemsPolicy::Forbidden => {
                    ctx.emit(Diagnostic::error(
                        ErrorKind::TypedMappingExtraKey,
                        span,
                        format!("Key {} is not defined in typed mapping {}", key.as_str(), class_name(ctx, m.declaration)),
                    ));
                    TypeId::ANY
                }
            },
        };
    }
    if let Some(shape) = as_tuple_shape(ctx, value_ty) {
        return match shape {
            TupleShape::Homogeneous(elem) => elem,
            TupleShape::Fixed { elements, .. } => match int_literal_index(arena, index_node) {
                Some(i) if i >= 0 => elements.get(i as usize).copied().unwrap_or(TypeId::ANY),
                _ => elements.into_iter().reduce(|a, b| ctx.join(a, b)).unwrap_or(TypeId::ANY),
            },
        };
    }
    if let Some(nt) = as_named_tuple(ctx, value_ty) {
        return match int_literal_index(arena, index_node) {
            Some(i) if i >= 0 => nt.field_types.get(i as usize).copied().unwrap_or(TypeId::ANY),
            _ => nt.field_types.into_iter().reduce(|a, b| ctx.join(a, b)).unwrap_or(TypeId::ANY),
        };
    }
    if let Some(class) = as_instance_class(ctx, value_ty) {
        if let Some(member) = ctx.table.resolve_member(class, Atom::new("__getitem__")) {
            if let Some(callable) = as_callable(ctx, member.ty) {
                return callable.return_ty;
            }
        }
    }
    TypeId::ANY
}

fn write_subscript(ctx: &CheckerContext<'_>, arena: &NodeArena, container_ty: TypeId, index_node: NodeId, span: Span, value_ty: TypeId) {
    if is_any(ctx, container_ty) {
        return;
    }
    let Some(m) = as_typed_mapping(ctx, container_ty) else { return };
    let Some(key) = string_literal_key(arena, index_node) else { return };
    match m.fields.iter().find(|f| f.name == key) {
        Some(field) => {
            if field.flags.read_only {
                ctx.emit(Diagnostic::error(ErrorKind::TypedMappingReadOnlyWrite, span, format!("Key {} is read-only", key.as_str())));
            }
            if !ctx.is_subtype(value_ty, field.ty) {
                ctx.emit(Diagnostic::error(
                    ErrorKind::IncompatibleAssignment,
                    span,
                    format!(
                        "Cannot assign {} to a target of declared type {}",
                        crate::display::describe(ctx, value_ty),
                        crate::display::describe(ctx, field.ty)
                    ),
                ));
            }
        }
        None => {
            if matches!(m.extra_items, ExtraItemsPolicy::Forbidden) {
                ctx.emit(Diagnostic::error(
                    ErrorKind::TypedMappingExtraKey,
                    span,
                    format!("Key {} is not defined in typed mapping {}", key.as_str(), class_name(ctx, m.declaration)),
                ));
            }
        }
    }
}

fn binop_method_names(op: BinOp) -> (&'static str, &'static str) {
    match op {
        BinOp::Add => ("__add__", "__radd__"),
        BinOp::Sub => ("__sub__", "__rsub__"),
        BinOp::Mul => ("__mul__", "__rmul__"),
        BinOp::Div => ("__truediv__", "__rtruediv__"),
        BinOp::FloorDiv => ("__floordiv__", "__rfloordiv__"),
        BinOp::Mod => ("__mod__", "__rmod__"),
        BinOp::Pow => ("__pow__", "__rpow__"),
        BinOp::MatMul => ("__matmul__", "__rmatmul__"),
        BinOp::BitAnd => ("__and__", "__rand__"),
        BinOp::BitOr => ("__or__", "__ror__"),
        BinOp::BitXor => ("__xor__", "__rxor__"),
        BinOp::LShift => ("__lshift__", "__rlshift__"),
        BinOp::RShift => ("__rshift__", "__rrshift__"),
    }
}

/// Dispatches `receiver_ty.method_name(operand_nodes...)`, assuming every
/// node in `operand_nodes` already has a recorded type (spec §4.3 operator
/// dispatch never re-infers an operand it has already checked). Returns
/// `None` when the receiver has no such dunder method, so the caller can try
/// the reflected method or fall back to `Any`.
fn dispatch_operator_method(ctx: &CheckerContext<'_>, arena: &NodeArena, span: Span, receiver_ty: TypeId, method_name: &str, operand_nodes: &[NodeId]) -> Option<TypeId> {
    let class = as_instance_class(ctx, receiver_ty)?;
    let member = ctx.table.resolve_member(class, Atom::new(method_name))?;
    let callable = as_callable(ctx, member.ty)?;
    let args: Vec<Arg> = operand_nodes.iter().map(|&v| Arg { kind: ArgKind::Positional, value: v }).collect();
    let bound = crate::call::bind_arguments(ctx, &callable, &args, span, false).ok()?;
    let _ = arena;
    Some(crate::generic_call::check_generic_call(ctx, &callable, None, &bound.bindings, |n| ctx.type_of(n).unwrap_or(TypeId::ANY), None, span))
}

/// Computes the result of a binary operator whose operands (`left`, `right`)
/// are already typed. Shared between `Expr::BinaryOp` (which checks the
/// operands itself first) and `Stmt::AugAssign` (whose target/value are
/// already checked by the statement checker).
pub(crate) fn binary_op_result(ctx: &CheckerContext<'_>, arena: &NodeArena, span: Span, op: BinOp, left: NodeId, right: NodeId) -> TypeId {
    let lty = ctx.type_of(left).unwrap_or(TypeId::ANY);
    let rty = ctx.type_of(right).unwrap_or(TypeId::ANY);
    if is_any(ctx, lty) || is_any(ctx, rty) {
        return TypeId::ANY;
    }
    let (method, reflected) = binop_method_names(op);
    if let Some(ty) = dispatch_operator_method(ctx, arena, span, lty, method, &[right]) {
        return ty;
    }
    if let Some(ty) = dispatch_operator_method(ctx, arena, span, rty, reflected, &[left]) {
        return ty;
    }
    TypeId::ANY
}

fn check_binary_op(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, op: BinOp, left: NodeId, right: NodeId) -> TypeId {
    check_expr(ctx, arena, scope, env, left, None);
    check_expr(ctx, arena, scope, env, right, None);
    binary_op_result(ctx, arena, arena.span(node), op, left, right)
}

fn check_unary_op(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, op: UnaryOp, operand: NodeId) -> TypeId {
    let operand_ty = check_expr(ctx, arena, scope, env, operand, None);
    match op {
        UnaryOp::Not => bool_instance(ctx),
        UnaryOp::Neg | UnaryOp::Pos | UnaryOp::Invert => {
            if is_any(ctx, operand_ty) {
                return TypeId::ANY;
            }
            let method = match op {
                UnaryOp::Neg => "__neg__",
                UnaryOp::Pos => "__pos__",
                UnaryOp::Invert => "__invert__",
                UnaryOp::Not => unreachable!(),
            };
            dispatch_operator_method(ctx, arena, arena.span(node), operand_ty, method, &[]).unwrap_or(TypeId::ANY)
        }
    }
}

fn check_bool_op(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, values: &[NodeId]) -> TypeId {
    // `and`/`or` yield whichever operand's value short-circuits to; the
    // checker approximates this with the join of every operand's type
    // rather than modeling which one is picked at runtime.
    let mut acc: Option<TypeId> = None;
    for &v in values {
        let vty = check_expr(ctx, arena, scope, env, v, None);
        acc = Some(match acc {
            Some(a) => ctx.join(a, vty),
            None => vty,
        });
    }
    acc.unwrap_or(TypeId::ANY)
}

fn check_compare(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, left: NodeId, _ops: &[CmpOp], comparators: &[NodeId]) -> TypeId {
    check_expr(ctx, arena, scope, env, left, None);
    for &c in comparators {
        check_expr(ctx, arena, scope, env, c, None);
    }
    // A comparison chain's static type is always `bool` regardless of the
    // operands' dunder methods (spec §4.3); the narrowing a comparison
    // enables is computed separately, from the source expression, by
    // `predicate::narrow_test`.
    bool_instance(ctx)
}

fn check_lambda(ctx: &CheckerContext<'_>, arena: &NodeArena, lambda_scope: ScopeId, env: &mut NarrowingEnv, params: &[Atom], body: NodeId, expected: Option<TypeId>) -> TypeId {
    let expected_callable = expected.and_then(|e| as_callable(ctx, e));
    let mut callable_params: SmallVec<[Param; 4]> = SmallVec::new();
    let mut body_env = env.fork();
    for (i, name) in params.iter().enumerate() {
        let ty = expected_callable.as_ref().and_then(|c| c.params.get(i)).map(|p| p.ty).unwrap_or(TypeId::ANY);
        if let Some(sym) = ctx.table.scopes.resolve(lambda_scope, *name) {
            body_env.set(sym, ty);
        }
        callable_params.push(Param { name: *name, kind: ParamKind::PositionalRequired, ty });
    }
    let return_ty = check_expr(ctx, arena, lambda_scope, &mut body_env, body, expected_callable.as_ref().map(|c| c.return_ty));
    ctx.interner.intern(Type::Callable(Box::new(Callable { params: callable_params, return_ty, bound_param_spec: None, type_guard: None })))
}

fn check_if_exp(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, test: NodeId, body: NodeId, orelse: NodeId) -> TypeId {
    check_expr(ctx, arena, scope, env, test, None);
    let refinement = crate::predicate::narrow_test(ctx, arena, scope, env, test);
    let mut then_env = refinement.then;
    let mut else_env = refinement.els;
    let body_ty = check_expr(ctx, arena, scope, &mut then_env, body, None);
    let else_ty = check_expr(ctx, arena, scope, &mut else_env, orelse, None);
    ctx.join(body_ty, else_ty)
}

fn check_tuple(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, elements: &[NodeId]) -> TypeId {
    let types: Vec<TypeId> = elements.iter().map(|&e| check_expr(ctx, arena, scope, env, e, None)).collect();
    ctx.interner.intern(Type::Tuple(TupleShape::Fixed { elements: types, unpack: None }))
}

fn expected_element_hint(ctx: &CheckerContext<'_>, expected: Option<TypeId>) -> Option<TypeId> {
    let e = expected?;
    match &*ctx.interner.get(e) {
        Type::Instance { args, .. } if args.len() == 1 => Some(args[0]),
        _ => None,
    }
}

fn check_list_literal(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, elements: &[NodeId], expected: Option<TypeId>) -> TypeId {
    let hint = expected_element_hint(ctx, expected);
    let types: Vec<TypeId> = elements.iter().map(|&e| check_expr(ctx, arena, scope, env, e, hint)).collect();
    let elem_ty = types.into_iter().reduce(|a, b| ctx.join(a, b)).unwrap_or(TypeId::ANY);
    match ctx.builtins.list_class {
        Some(c) => ctx.interner.instance(c, vec![elem_ty]),
        None => TypeId::ANY,
    }
}

fn check_set_literal(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, elements: &[NodeId], expected: Option<TypeId>) -> TypeId {
    let hint = expected_element_hint(ctx, expected);
    let types: Vec<TypeId> = elements.iter().map(|&e| check_expr(ctx, arena, scope, env, e, hint)).collect();
    let elem_ty = types.into_iter().reduce(|a, b| ctx.join(a, b)).unwrap_or(TypeId::ANY);
    match ctx.builtins.set_class {
        Some(c) => ctx.interner.instance(c, vec![elem_ty]),
        None => TypeId::ANY,
    }
}

fn check_dict_literal(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, items: &[(NodeId, NodeId)], expected: Option<TypeId>) -> TypeId {
    let typed_mapping = expected.and_then(|e| as_typed_mapping(ctx, e).map(|m| (e, m)));
    if let Some((expected_ty, m)) = typed_mapping {
        let mut seen: Vec<Atom> = Vec::new();
        for &(k, v) in items {
            let key_name = string_literal_key(arena, k);
            check_expr(ctx, arena, scope, env, k, None);
            let Some(key_name) = key_name else {
                check_expr(ctx, arena, scope, env, v, None);
                continue;
            };
            match m.fields.iter().find(|f| f.name == key_name) {
                Some(field) => {
                    let vty = check_expr(ctx, arena, scope, env, v, Some(field.ty));
                    if !ctx.is_subtype(vty, field.ty) {
                        ctx.emit(Diagnostic::error(
                            ErrorKind::IncompatibleAssignment,
                            arena.span(v),
                            format!(
                                "Cannot assign {} to a target of declared type {}",
                                crate::display::describe(ctx, vty),
                                crate::display::describe(ctx, field.ty)
                            ),
                        ));
                    }
                    seen.push(key_name);
                }
                None => {
                    check_expr(ctx, arena, scope, env, v, None);
                    if matches!(m.extra_items, ExtraItemsPolicy::Forbidden) {
                        ctx.emit(Diagnostic::error(
                            ErrorKind::TypedMappingExtraKey,
                            arena.span(k),
                            format!("Key {} is not defined in typed mapping {}", key_name.as_str(), class_name(ctx, m.declaration)),
                        ));
                    }
                }
            }
        }
        for field in &m.fields {
            if field.flags.required && !seen.contains(&field.name) {
                ctx.emit(Diagnostic::error(
                    ErrorKind::TypedMappingMissingRequired,
                    arena.span(node),
                    format!("Missing required key {} in typed mapping {}", field.name.as_str(), class_name(ctx, m.declaration)),
                ));
            }
        }
        return expected_ty;
    }

    let mut key_ty: Option<TypeId> = None;
    let mut val_ty: Option<TypeId> = None;
    for &(k, v) in items {
        let kt = check_expr(ctx, arena, scope, env, k, None);
        let vt = check_expr(ctx, arena, scope, env, v, None);
        key_ty = Some(key_ty.map(|a| ctx.join(a, kt)).unwrap_or(kt));
        val_ty = Some(val_ty.map(|a| ctx.join(a, vt)).unwrap_or(vt));
    }
    match ctx.builtins.dict_class {
        Some(c) => ctx.interner.instance(c, vec![key_ty.unwrap_or(TypeId::ANY), val_ty.unwrap_or(TypeId::ANY)]),
        None => TypeId::ANY,
    }
}

fn check_await(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, inner: NodeId) -> TypeId {
    let awaited_ty = check_expr(ctx, arena, scope, env, inner, None);
    if is_any(ctx, awaited_ty) {
        return TypeId::ANY;
    }
    if let Some(class) = as_instance_class(ctx, awaited_ty) {
        if let Some(member) = ctx.table.resolve_member(class, Atom::new("__await__")) {
            if let Some(callable) = as_callable(ctx, member.ty) {
                return callable.return_ty;
            }
        }
    }
    TypeId::ANY
}

fn check_named_expr(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, target: Atom, value: NodeId, expected: Option<TypeId>) -> TypeId {
    let vty = check_expr(ctx, arena, scope, env, value, expected);
    if let Some(sym) = name_symbol(ctx, scope, node, target) {
        env.set(sym, vty);
    }
    vty
}

pub(crate) fn iterable_element_type(ctx: &CheckerContext<'_>, iter_ty: TypeId) -> TypeId {
    if let Some(args) = match &*ctx.interner.get(iter_ty) {
        Type::Instance { args, .. } if args.len() == 1 => Some(args.clone()),
        _ => None,
    } {
        return args[0];
    }
    if let Some(shape) = as_tuple_shape(ctx, iter_ty) {
        return match shape {
            TupleShape::Homogeneous(e) => e,
            TupleShape::Fixed { elements, .. } => elements.into_iter().reduce(|a, b| ctx.join(a, b)).unwrap_or(TypeId::ANY),
        };
    }
    TypeId::ANY
}

fn check_comprehension(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &mut NarrowingEnv,
    kind: ComprehensionKind,
    element: NodeId,
    value: Option<NodeId>,
    clauses: &[ComprehensionClause],
) -> TypeId {
    let mut local_env = env.fork();
    for clause in clauses {
        let iter_ty = check_expr(ctx, arena, scope, &mut local_env, clause.iter, None);
        let elem_ty = iterable_element_type(ctx, iter_ty);
        if let Some(sym) = ctx.table.symbol_of_node(clause.target) {
            local_env.set(sym, elem_ty);
        }
        for &cond in &clause.conditions {
            check_expr(ctx, arena, scope, &mut local_env, cond, None);
            let refinement = crate::predicate::narrow_test(ctx, arena, scope, &local_env, cond);
            local_env = refinement.then;
        }
    }
    match kind {
        ComprehensionKind::Dict => {
            let key_ty = check_expr(ctx, arena, scope, &mut local_env, element, None);
            let val_ty = value.map(|v| check_expr(ctx, arena, scope, &mut local_env, v, None)).unwrap_or(TypeId::ANY);
            match ctx.builtins.dict_class {
                Some(c) => ctx.interner.instance(c, vec![key_ty, val_ty]),
                None => TypeId::ANY,
            }
        }
        ComprehensionKind::List => {
            let elem_ty = check_expr(ctx, arena, scope, &mut local_env, element, None);
            match ctx.builtins.list_class {
                Some(c) => ctx.interner.instance(c, vec![elem_ty]),
                None => TypeId::ANY,
            }
        }
        ComprehensionKind::Set => {
            let elem_ty = check_expr(ctx, arena, scope, &mut local_env, element, None);
            match ctx.builtins.set_class {
                Some(c) => ctx.interner.instance(c, vec![elem_ty]),
                None => TypeId::ANY,
            }
        }
        ComprehensionKind::Generator => check_expr(ctx, arena, scope, &mut local_env, element, None),
    }
}

fn check_call(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, node: NodeId, callee: NodeId, args: &[Arg], expected: Option<TypeId>) -> TypeId {
    if let Expr::Name(name) = arena.expr(callee) {
        if name.as_str() == "reveal_type" && args.len() == 1 && matches!(args[0].kind, ArgKind::Positional) {
            let ty = check_expr(ctx, arena, scope, env, args[0].value, None);
            ctx.emit(Diagnostic::note(ErrorKind::RevealedType, arena.span(node), format!("Revealed type is {}", crate::display::describe(ctx, ty))));
            return ty;
        }
    }

    if let Some(result) = crate::plugin::try_call_hook(ctx, arena, scope, env, callee, args, arena.span(node)) {
        return result;
    }

    let callee_ty = check_expr(ctx, arena, scope, env, callee, None);
    let span = arena.span(node);

    if is_any(ctx, callee_ty) {
        for a in args {
            check_expr(ctx, arena, scope, env, a.value, None);
        }
        return TypeId::ANY;
    }
    if let Some(callable) = as_callable(ctx, callee_ty) {
        return check_callable_call(ctx, arena, scope, env, callee, &callable, args, expected, span);
    }
    if let Some(sigs) = as_overload_members(ctx, callee_ty) {
        for a in args {
            check_expr(ctx, arena, scope, env, a.value, None);
        }
        let callables: Vec<Callable> = sigs.iter().filter_map(|&s| as_callable(ctx, s)).collect();
        return crate::overload::resolve_overload(ctx, &callables, args, span).return_ty;
    }
    if let Some(instance_ty) = as_class_object_instance(ctx, callee_ty) {
        return check_construction_call(ctx, arena, scope, env, instance_ty, args, span);
    }
    for a in args {
        check_expr(ctx, arena, scope, env, a.value, None);
    }
    TypeId::ANY
}

fn check_callable_call(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &mut NarrowingEnv,
    callee: NodeId,
    callable: &Callable,
    args: &[Arg],
    expected: Option<TypeId>,
    span: Span,
) -> TypeId {
    let Ok(bound) = crate::call::bind_arguments(ctx, callable, args, span, true) else {
        for a in args {
            if ctx.type_of(a.value).is_none() {
                check_expr(ctx, arena, scope, env, a.value, None);
            }
        }
        return TypeId::ANY;
    };
    for b in &bound.bindings {
        if ctx.type_of(b.value).is_none() {
            let param_ty = callable.params[b.param_index].ty;
            check_expr(ctx, arena, scope, env, b.value, Some(param_ty));
        }
    }
    for b in &bound.bindings {
        let param = &callable.params[b.param_index];
        if !crate::freevars::free_type_vars(ctx.interner, param.ty).is_empty() {
            continue;
        }
        let actual = ctx.type_of(b.value).unwrap_or(TypeId::ANY);
        if !ctx.is_subtype(actual, param.ty) {
            ctx.emit(Diagnostic::error(
                ErrorKind::IncompatibleArgument,
                arena.span(b.value),
                format!(
                    "Argument of type {} is not compatible with parameter of type {}",
                    crate::display::describe(ctx, actual),
                    crate::display::describe(ctx, param.ty)
                ),
            ));
        }
    }
    let generics = callee_generics(ctx, arena, callee);
    crate::generic_call::check_generic_call(ctx, callable, generics, &bound.bindings, |n| ctx.type_of(n).unwrap_or(TypeId::ANY), expected, span)
}

fn check_construction_call(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, instance_ty: TypeId, args: &[Arg], span: Span) -> TypeId {
    if let Some(mapping) = as_typed_mapping(ctx, instance_ty) {
        return crate::plugin::construct_typed_mapping(ctx, arena, scope, env, instance_ty, &mapping, args, span);
    }
    let Some(class) = as_instance_class(ctx, instance_ty) else {
        for a in args {
            check_expr(ctx, arena, scope, env, a.value, None);
        }
        return instance_ty;
    };
    if let Some(info) = ctx.table.class_info(class) {
        if info.abstract_class {
            ctx.emit(Diagnostic::error(ErrorKind::AbstractInstantiation, span, format!("Cannot instantiate abstract class {}", class_name(ctx, class))));
        }
    }
    let Some(init) = ctx.table.resolve_member(class, Atom::new("__init__")) else {
        for a in args {
            check_expr(ctx, arena, scope, env, a.value, None);
        }
        return instance_ty;
    };
    // `resolve_member` yields `__init__` the way any attribute access would:
    // already bound, with `self` excluded from its parameter list.
    let Some(callable) = as_callable(ctx, init.ty) else {
        for a in args {
            check_expr(ctx, arena, scope, env, a.value, None);
        }
        return instance_ty;
    };
    let Ok(bound) = crate::call::bind_arguments(ctx, &callable, args, span, true) else {
        for a in args {
            if ctx.type_of(a.value).is_none() {
                check_expr(ctx, arena, scope, env, a.value, None);
            }
        }
        return instance_ty;
    };
    for b in &bound.bindings {
        if ctx.type_of(b.value).is_none() {
            let param_ty = callable.params[b.param_index].ty;
            check_expr(ctx, arena, scope, env, b.value, Some(param_ty));
        }
    }
    for b in &bound.bindings {
        let param = &callable.params[b.param_index];
        if !crate::freevars::free_type_vars(ctx.interner, param.ty).is_empty() {
            continue;
        }
        let actual = ctx.type_of(b.value).unwrap_or(TypeId::ANY);
        if !ctx.is_subtype(actual, param.ty) {
            ctx.emit(Diagnostic::error(
                ErrorKind::IncompatibleArgument,
                arena.span(b.value),
                format!(
                    "Argument of type {} is not compatible with parameter of type {}",
                    crate::display::describe(ctx, actual),
                    crate::display::describe(ctx, param.ty)
                ),
            ));
        }
    }
    instance_ty
}

/// Assigns `value_ty` to an assignment target, recursing into tuple/list
/// destructuring and dispatching attribute/subscript writes to their own
/// read-only/slots/typed-mapping diagnostics. Exposed to `stmt.rs`, which
/// owns the narrowing-environment bookkeeping (`Final` reassignment, name
/// redefinition) a plain expression target doesn't need.
pub(crate) fn assign_attribute_target(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, value: NodeId, attr: Atom, span: Span, value_ty: TypeId) {
    let owner_ty = check_expr(ctx, arena, scope, env, value, None);
    write_attribute(ctx, owner_ty, attr, span, value_ty);
}

pub(crate) fn assign_subscript_target(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &mut NarrowingEnv, container: NodeId, index: NodeId, span: Span, value_ty: TypeId) {
    let container_ty = check_expr(ctx, arena, scope, env, container, None);
    check_expr(ctx, arena, scope, env, index, None);
    write_subscript(ctx, arena, container_ty, index, span, value_ty);
}

pub(crate) fn tuple_element_types(ctx: &CheckerContext<'_>, value_ty: TypeId, count: usize) -> Vec<TypeId> {
    match as_tuple_shape(ctx, value_ty) {
        Some(TupleShape::Fixed { elements, .. }) if elements.len() == count => elements,
        Some(TupleShape::Homogeneous(e)) => vec![e; count],
        _ => vec![TypeId::ANY; count],
    }
}

/// Finds the enclosing function's own declared `TypeGuard`/`TypeIs` (spec
/// §4.4), if any — used to validate `TypeIs`'s two-way bound against the
/// guarded parameter's own declared type.
pub(crate) fn extract_type_guard(ctx: &CheckerContext<'_>, return_ty: TypeId) -> Option<strata_types::type_data::TypeGuard> {
    match &*ctx.interner.get(return_ty) {
        Type::Callable(c) => c.type_guard,
        _ => None,
    }
}

pub(crate) fn is_two_way_guard(guard: &strata_types::type_data::TypeGuard) -> bool {
    matches!(guard.kind, TypeGuardKind::TwoWay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinSymbols;
    use strata_common::diagnostics::ErrorKind;
    use strata_common::ids::SymbolId as Sym;
    use strata_common::options::EngineOptions;
    use strata_semantic::class_info::MemberInfo;
    use strata_semantic::symbol::{Symbol, SymbolKind};
    use strata_semantic::{ClassInfo, Scope, ScopeKind, SemanticTable};
    use strata_types::type_data::{FieldFlags, TypedMappingField};
    use strata_types::interner::TypeInterner;

    fn fixture_builtins() -> BuiltinSymbols {
        BuiltinSymbols {
            int_class: Sym(1),
            bool_class: Sym(2),
            str_class: Sym(3),
            bytes_class: Sym(4),
            object_class: Sym(5),
            list_class: None,
            set_class: None,
            dict_class: None,
        }
    }

    #[test]
    fn reading_an_undefined_name_diagnoses_and_yields_any() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let node = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("missing")));
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();

        let ty = check_expr(&ctx, &arena, module, &mut env, node, None);
        assert!(matches!(&*interner.get(ty), Type::Any));
        let diags = ctx.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::NameUndefined);
    }

    #[test]
    fn a_name_narrowed_in_the_environment_is_read_back_over_its_declared_type() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let int_ty = interner.instance(Sym(1), vec![]);
        let str_ty = interner.instance(Sym(3), vec![]);
        let mut sym = Symbol::new(Atom::new("x"), SymbolKind::Variable, module, Span::dummy());
        sym.declared_type = Some(int_ty);
        let x_sym = table.symbols.push(sym);
        table.scopes.get_mut(module).declare(Atom::new("x"), x_sym);

        let node = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("x")));
        table.bind_node(node, x_sym);
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        env.set(x_sym, str_ty);

        let ty = check_expr(&ctx, &arena, module, &mut env, node, None);
        assert_eq!(ty, str_ty);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn an_int_literal_infers_a_literal_type_falling_back_to_int() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();
        let module = ScopeId(0);

        let node = arena.push_expr(Span::dummy(), Expr::Literal(LiteralKind::Int(3)));
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();

        let ty = check_expr(&ctx, &arena, module, &mut env, node, None);
        match &*interner.get(ty) {
            Type::Literal { value: LiteralValue::Int(3), fallback } => assert_eq!(*fallback, Sym(1)),
            other => panic!("expected a literal int type, got {other:?}"),
        }
    }

    #[test]
    fn reveal_type_emits_a_note_carrying_the_current_inferred_type_and_returns_it_unchanged() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let arg = arena.push_expr(Span::dummy(), Expr::Literal(LiteralKind::Int(1)));
        let callee = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("reveal_type")));
        let call = arena.push_expr(Span::dummy(), Expr::Call { callee, args: vec![Arg { kind: ArgKind::Positional, value: arg }] });

        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        let ty = check_expr(&ctx, &arena, module, &mut env, call, None);

        let arg_ty = ctx.type_of(arg).unwrap();
        assert_eq!(ty, arg_ty);
        let diags = ctx.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::RevealedType);
    }

    #[test]
    fn accessing_a_missing_attribute_on_an_instance_is_diagnosed() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let class = Sym(10);
        table.declare_class(class, ClassInfo { mro: vec![class], ..Default::default() });
        let instance_ty = interner.instance(class, vec![]);

        let mut sym = Symbol::new(Atom::new("obj"), SymbolKind::Variable, module, Span::dummy());
        sym.declared_type = Some(instance_ty);
        let obj_sym = table.symbols.push(sym);
        table.scopes.get_mut(module).declare(Atom::new("obj"), obj_sym);

        let recv = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("obj")));
        table.bind_node(recv, obj_sym);
        let node = arena.push_expr(Span::dummy(), Expr::Attribute { value: recv, attr: Atom::new("missing") });

        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        let ty = check_expr(&ctx, &arena, module, &mut env, node, None);
        assert!(matches!(&*interner.get(ty), Type::Any));
        let diags = ctx.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::AttributeMissing);
    }

    #[test]
    fn attribute_access_resolves_through_the_mro() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let base = Sym(10);
        let derived = Sym(11);
        let str_ty = interner.instance(Sym(3), vec![]);
        table.declare_class(base, ClassInfo { members: vec![(Atom::new("name"), MemberInfo::field(str_ty))], ..Default::default() });
        table.declare_class(derived, ClassInfo { bases: vec![base], mro: vec![derived, base], ..Default::default() });
        let instance_ty = interner.instance(derived, vec![]);

        let mut sym = Symbol::new(Atom::new("obj"), SymbolKind::Variable, module, Span::dummy());
        sym.declared_type = Some(instance_ty);
        let obj_sym = table.symbols.push(sym);
        table.scopes.get_mut(module).declare(Atom::new("obj"), obj_sym);

        let recv = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("obj")));
        table.bind_node(recv, obj_sym);
        let node = arena.push_expr(Span::dummy(), Expr::Attribute { value: recv, attr: Atom::new("name") });

        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        let ty = check_expr(&ctx, &arena, module, &mut env, node, None);
        assert_eq!(ty, str_ty);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn typed_mapping_subscript_reads_a_declared_key_and_diagnoses_an_extra_one() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let int_ty = interner.instance(Sym(1), vec![]);
        let mapping_decl = Sym(20);
        let mapping_ty = interner.intern(Type::TypedMapping(Box::new(TypedMapping {
            declaration: mapping_decl,
            fields: vec![TypedMappingField { name: Atom::new("x"), ty: int_ty, flags: FieldFlags::required_mutable() }],
            extra_items: ExtraItemsPolicy::Forbidden,
        })));

        let mut sym = Symbol::new(Atom::new("d"), SymbolKind::Variable, module, Span::dummy());
        sym.declared_type = Some(mapping_ty);
        let d_sym = table.symbols.push(sym);
        table.scopes.get_mut(module).declare(Atom::new("d"), d_sym);

        let recv = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("d")));
        table.bind_node(recv, d_sym);
        let key_x = arena.push_expr(Span::dummy(), Expr::Literal(LiteralKind::Str(Atom::new("x"))));
        let read_x = arena.push_expr(Span::dummy(), Expr::Subscript { value: recv, index: key_x });

        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        let ty = check_expr(&ctx, &arena, module, &mut env, read_x, None);
        assert_eq!(ty, int_ty);
        assert!(ctx.diagnostics().is_empty());

        let recv2 = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("d")));
        table.bind_node(recv2, d_sym);
        let key_z = arena.push_expr(Span::dummy(), Expr::Literal(LiteralKind::Str(Atom::new("z"))));
        let read_z = arena.push_expr(Span::dummy(), Expr::Subscript { value: recv2, index: key_z });
        let mut env2 = NarrowingEnv::new();
        check_expr(&ctx, &arena, module, &mut env2, read_z, None);
        let diags = ctx.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::TypedMappingExtraKey);
    }

    #[test]
    fn binary_op_dispatches_to_the_left_operands_dunder_method() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let class = Sym(30);
        let int_ty = interner.instance(Sym(1), vec![]);
        let add_callable = interner.intern(Type::Callable(Box::new(Callable {
            params: smallvec::smallvec![Param { name: Atom::new("other"), kind: ParamKind::PositionalRequired, ty: int_ty }],
            return_ty: int_ty,
            bound_param_spec: None,
            type_guard: None,
        })));
        table.declare_class(class, ClassInfo { members: vec![(Atom::new("__add__"), MemberInfo::field(add_callable))], ..Default::default() });
        let instance_ty = interner.instance(class, vec![]);

        let mut lsym = Symbol::new(Atom::new("a"), SymbolKind::Variable, module, Span::dummy());
        lsym.declared_type = Some(instance_ty);
        let a_sym = table.symbols.push(lsym);
        table.scopes.get_mut(module).declare(Atom::new("a"), a_sym);

        let left = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("a")));
        table.bind_node(left, a_sym);
        let right = arena.push_expr(Span::dummy(), Expr::Literal(LiteralKind::Int(1)));
        let node = arena.push_expr(Span::dummy(), Expr::BinaryOp { op: BinOp::Add, left, right });

        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        let ty = check_expr(&ctx, &arena, module, &mut env, node, None);
        assert_eq!(ty, int_ty);
        assert!(ctx.diagnostics().is_empty());
    }
}
