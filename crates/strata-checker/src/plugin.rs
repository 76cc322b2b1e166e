//! Plugin hooks (spec §4.6): interception points for a small, fixed set of
//! domain-specific inference rules the general checker doesn't cover on its
//! own — typed-mapping construction, a structural partial-application
//! transform, and attribute access on enum-member literals. Spec §4.6 frames
//! these as "pure functions receiving read-only views of the relevant AST
//! fragment and current inference context"; there is no dynamic
//! registration here, just the fixed set SPEC_FULL §10 names, the same way
//! `expr.rs`'s `reveal_type` special case is just a name check rather than a
//! general mechanism.

use crate::context::CheckerContext;
use crate::narrow::NarrowingEnv;
use strata_ast::{Arg, ArgKind, ClassDef, Expr, NodeArena, Stmt};
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::ids::{NodeId, ScopeId, SymbolId};
use strata_common::interner::Atom;
use strata_common::span::Span;
use strata_types::type_data::{Callable, ExtraItemsPolicy, FieldFlags, LiteralValue, Param, Type, TypedMapping, TypedMappingField};
use strata_types::TypeId;

fn class_name(ctx: &CheckerContext<'_>, class: SymbolId) -> String {
    ctx.table.symbols.get(class).name.as_str().to_string()
}

/// Call-expression plugin dispatch, consulted by `expr::check_call` before
/// ordinary callee resolution. Recognizes `partial(f, ...)` by name; any
/// other callee falls through to ordinary call checking.
pub fn try_call_hook(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &mut NarrowingEnv,
    callee: NodeId,
    args: &[Arg],
    span: Span,
) -> Option<TypeId> {
    let Expr::Name(name) = arena.expr(callee) else { return None };
    match name.as_str() {
        "partial" => partial_application(ctx, arena, scope, env, args, span),
        _ => None,
    }
}

/// `partial(f, *bound_args, **bound_kwargs)`: binds the given arguments
/// against `f`'s leading parameters and returns a `Callable` with those
/// parameters removed, the rest of the signature unchanged (spec §8
/// scenario 6 "Overloaded partial-application plugin").
fn partial_application(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &mut NarrowingEnv,
    args: &[Arg],
    span: Span,
) -> Option<TypeId> {
    let (func_arg, rest) = args.split_first()?;
    if !matches!(func_arg.kind, ArgKind::Positional) {
        return None;
    }
    let func_ty = crate::expr::check_expr(ctx, arena, scope, env, func_arg.value, None);
    let callable = match &*ctx.interner.get(func_ty) {
        Type::Callable(c) => (**c).clone(),
        _ => return None,
    };

    let mut remaining = callable.params.clone();
    for arg in rest {
        match arg.kind {
            ArgKind::Positional => {
                let Some(pos) = remaining.iter().position(|p| {
                    matches!(p.kind, strata_types::type_data::ParamKind::PositionalRequired | strata_types::type_data::ParamKind::PositionalOptional)
                }) else {
                    crate::expr::check_expr(ctx, arena, scope, env, arg.value, None);
                    continue;
                };
                let param_ty = remaining[pos].ty;
                let arg_ty = crate::expr::check_expr(ctx, arena, scope, env, arg.value, Some(param_ty));
                if !ctx.is_subtype(arg_ty, param_ty) {
                    ctx.emit(Diagnostic::error(
                        ErrorKind::IncompatibleArgument,
                        arena.span(arg.value),
                        format!(
                            "Argument of type {} is not compatible with parameter of type {}",
                            crate::display::describe(ctx, arg_ty),
                            crate::display::describe(ctx, param_ty)
                        ),
                    ));
                }
                remaining.remove(pos);
            }
            ArgKind::Keyword(name) => {
                let Some(pos) = remaining.iter().position(|p| p.name == name) else {
                    crate::expr::check_expr(ctx, arena, scope, env, arg.value, None);
                    continue;
                };
                let param_ty = remaining[pos].ty;
                let arg_ty = crate::expr::check_expr(ctx, arena, scope, env, arg.value, Some(param_ty));
                if !ctx.is_subtype(arg_ty, param_ty) {
                    ctx.emit(Diagnostic::error(
                        ErrorKind::IncompatibleArgument,
                        arena.span(arg.value),
                        format!(
                            "Argument of type {} is not compatible with parameter of type {}",
                            crate::display::describe(ctx, arg_ty),
                            crate::display::describe(ctx, param_ty)
                        ),
                    ));
                }
                remaining.remove(pos);
            }
            ArgKind::Starred | ArgKind::DoubleStarred => {
                crate::expr::check_expr(ctx, arena, scope, env, arg.value, None);
            }
        }
    }
    let _ = span;

    Some(ctx.interner.intern(Type::Callable(Box::new(Callable {
        params: remaining,
        return_ty: callable.return_ty,
        bound_param_spec: callable.bound_param_spec,
        type_guard: None,
    }))))
}

/// Typed-mapping construction via a direct call on the mapping's own class
/// object, e.g. `Movie(title="Alien", year=1979)` — spec §4.6 "call-
/// expression inference... to implement typed-dict constructors". Keyword
/// arguments bind to declared fields exactly like a `TypedMapping`-expected
/// dict literal (`expr::check_dict_literal`); this is the call-site
/// counterpart of that same field-checking logic.
pub fn construct_typed_mapping(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &mut NarrowingEnv,
    instance_ty: TypeId,
    mapping: &TypedMapping,
    args: &[Arg],
    span: Span,
) -> TypeId {
    let mut seen: Vec<Atom> = Vec::new();
    for arg in args {
        match arg.kind {
            ArgKind::Keyword(name) => match mapping.fields.iter().find(|f| f.name == name) {
                Some(field) => {
                    let vty = crate::expr::check_expr(ctx, arena, scope, env, arg.value, Some(field.ty));
                    if !ctx.is_subtype(vty, field.ty) {
                        ctx.emit(Diagnostic::error(
                            ErrorKind::IncompatibleArgument,
                            arena.span(arg.value),
                            format!(
                                "Argument of type {} is not compatible with parameter of type {}",
                                crate::display::describe(ctx, vty),
                                crate::display::describe(ctx, field.ty)
                            ),
                        ));
                    }
                    seen.push(name);
                }
                None => {
                    crate::expr::check_expr(ctx, arena, scope, env, arg.value, None);
                    if matches!(mapping.extra_items, ExtraItemsPolicy::Forbidden) {
                        ctx.emit(Diagnostic::error(
                            ErrorKind::TypedMappingExtraKey,
                            span,
                            format!("Key {} is not defined in typed mapping {}", name.as_str(), class_name(ctx, mapping.declaration)),
                        ));
                    }
                }
            },
            _ => {
                crate::expr::check_expr(ctx, arena, scope, env, arg.value, None);
            }
        }
    }
    for field in &mapping.fields {
        if field.flags.required && !seen.contains(&field.name) {
            ctx.emit(Diagnostic::error(
                ErrorKind::TypedMappingMissingRequired,
                span,
                format!("Missing required key {} in typed mapping {}", field.name.as_str(), class_name(ctx, mapping.declaration)),
            ));
        }
    }
    instance_ty
}

/// Class-body interception (spec §4.6's first hook kind): recognizes the
/// common `class Movie(TypedDict): title: str` declaration style and
/// synthesizes the `TypedMapping` the class acts as a constructor for, from
/// its `AnnotationOnly` field declarations. Returns the class's "class
/// object" type for recording on the declaring statement; `None` when
/// `class` isn't a `TypedDict` subclass (the ordinary class-body walk in
/// `stmt.rs` handles everything else).
pub fn class_body_hook(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, node: NodeId, class: &ClassDef) -> Option<TypeId> {
    let is_typed_dict = class.bases.iter().any(|&b| matches!(arena.expr(b), Expr::Name(name) if name.as_str() == "TypedDict"));
    if !is_typed_dict {
        return None;
    }
    let declaration = ctx.table.symbol_of_node(node).or_else(|| ctx.table.scopes.resolve(scope, class.name))?;

    let mut fields = Vec::new();
    for &stmt_node in &class.body {
        if let Stmt::AnnotationOnly { target, declared_type } = arena.stmt(stmt_node) {
            if let Expr::Name(field_name) = arena.expr(*target) {
                fields.push(TypedMappingField { name: *field_name, ty: *declared_type, flags: FieldFlags::required_mutable() });
            }
        }
    }

    let mapping = TypedMapping { declaration, fields, extra_items: ExtraItemsPolicy::Forbidden };
    let instance = ctx.interner.intern(Type::TypedMapping(Box::new(mapping)));
    Some(ctx.interner.intern(Type::ClassObject { instance }))
}

/// Attribute-access interception on enum-member literals (spec §4.6's third
/// hook kind, "attribute access on specific nominal classes"): `.name`
/// yields the member's own name as a string literal. `.value` isn't
/// resolved here — nothing in the declared `Type` model records an enum
/// member's underlying value type, so that access falls through to ordinary
/// attribute resolution on the literal's nominal fallback.
pub fn enum_member_attribute(ctx: &CheckerContext<'_>, owner_ty: TypeId, attr: Atom) -> Option<TypeId> {
    let member = match &*ctx.interner.get(owner_ty) {
        Type::Literal { value: LiteralValue::EnumMember(_, member), .. } => *member,
        _ => return None,
    };
    match attr.as_str() {
        "name" => Some(ctx.interner.literal_str(member.as_str(), ctx.builtins.str_class)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinSymbols;
    use smallvec::smallvec;
    use strata_ast::{ClassDef, NodeArena};
    use strata_common::ids::SymbolId as Sym;
    use strata_common::options::EngineOptions;
    use strata_common::span::Span;
    use strata_semantic::symbol::{Symbol, SymbolKind};
    use strata_semantic::{Scope, ScopeKind, SemanticTable};
    use strata_types::interner::TypeInterner;
    use strata_types::type_data::ParamKind;

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
    fn partial_removes_the_bound_leading_parameter() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let module = table.scopes.push(Scope::new(ScopeKind::Module, None));
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();

        let int_ty = interner.instance(Sym(1), vec![]);
        let str_ty = interner.instance(Sym(3), vec![]);
        let callable_ty = interner.intern(Type::Callable(Box::new(Callable {
            params: smallvec![
                Param { name: Atom::new("a"), kind: ParamKind::PositionalRequired, ty: int_ty },
                Param { name: Atom::new("b"), kind: ParamKind::PositionalRequired, ty: str_ty },
            ],
            return_ty: int_ty,
            bound_param_spec: None,
            type_guard: None,
        })));

        let f_node = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("f")));
        table.symbols.push(Symbol::new(Atom::new("f"), SymbolKind::Variable, module, Span::dummy()));
        table.bind_node(f_node, Sym(0));
        let a_node = arena.push_expr(Span::dummy(), Expr::Literal(strata_ast::LiteralKind::Int(1)));
        let partial_callee = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("partial")));

        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let mut env = NarrowingEnv::new();
        env.set(Sym(0), callable_ty);

        let args = vec![
            Arg { kind: ArgKind::Positional, value: f_node },
            Arg { kind: ArgKind::Positional, value: a_node },
        ];
        let result_ty = try_call_hook(&ctx, &arena, module, &mut env, partial_callee, &args, Span::dummy())
            .expect("partial() is recognized by name");
        match &*interner.get(result_ty) {
            Type::Callable(c) => {
                assert_eq!(c.params.len(), 1);
                assert_eq!(c.params[0].name.as_str(), "b");
            }
            other => panic!("expected Callable, got {other:?}"),
        }
    }

    #[test]
    fn class_body_hook_ignores_non_typed_dict_bases() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let mut arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());

        let base_node = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("object")));
        let class_scope = ScopeId(0);
        let class = ClassDef { name: Atom::new("Plain"), bases: vec![base_node], body: vec![], scope: class_scope };
        let node = arena.push_stmt(Span::dummy(), Stmt::ClassDef(class.clone()));

        assert!(class_body_hook(&ctx, &arena, class_scope, node, &class).is_none());
    }

    #[test]
    fn enum_member_name_attribute_yields_a_string_literal() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());

        let enum_ty = interner.intern(Type::Literal { value: LiteralValue::EnumMember(Sym(7), Atom::new("RED")), fallback: Sym(7) });
        let ty = enum_member_attribute(&ctx, enum_ty, Atom::new("name")).expect("name is handled");
        match &*interner.get(ty) {
            Type::Literal { value: LiteralValue::Str(s), .. } => assert_eq!(s.as_str(), "RED"),
            other => panic!("expected a string literal, got {other:?}"),
        }
        assert!(enum_member_attribute(&ctx, enum_ty, Atom::new("value")).is_none());
    }
}
