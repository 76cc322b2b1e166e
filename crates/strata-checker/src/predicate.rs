//! Predicate analysis for conditional branches (spec §4.4: "predicate
//! analysis produces two refinements of the environment (then/else)").
//!
//! Runs *after* the expression checker has already inferred a type for
//! `test` and every sub-expression reachable from it (the node-to-type map
//! is consulted, never recomputed), so this module only ever reads types,
//! symbols and the narrowing environment — it never calls back into
//! `expr::check_expr`.

use crate::context::CheckerContext;
use crate::guard;
use crate::narrow::NarrowingEnv;
use strata_ast::{ArgKind, BoolOp, CmpOp, Expr, LiteralKind, NodeArena, UnaryOp};
use strata_common::ids::{NodeId, ScopeId, SymbolId};
use strata_types::type_data::{FieldFlags, Type, TypedMapping};
use strata_types::TypeId;

/// The two environments a predicate produces: the branch taken when `test`
/// is truthy, and the branch taken when it is falsy.
pub struct Refinement {
    pub then: NarrowingEnv,
    pub els: NarrowingEnv,
}

/// Resolves the binding a simple `Name` expression reads, preferring the
/// front-end's node-to-symbol map (spec §6) and falling back to ordinary
/// scope resolution — the same two-step lookup `expr::check_expr` uses for
/// `Expr::Name`.
fn name_binding(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, node: NodeId) -> Option<SymbolId> {
    if let Some(sym) = ctx.table.symbol_of_node(node) {
        return Some(sym);
    }
    let Expr::Name(atom) = arena.expr(node) else { return None };
    ctx.table.scopes.resolve(scope, *atom)
}

/// Top-level entry: computes the then/else refinement of `env` for `test`.
pub fn narrow_test(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &NarrowingEnv, test: NodeId) -> Refinement {
    match arena.expr(test) {
        Expr::UnaryOp { op: UnaryOp::Not, operand } => {
            let inner = narrow_test(ctx, arena, scope, env, *operand);
            Refinement { then: inner.els, els: inner.then }
        }
        Expr::BoolOp { op: BoolOp::And, values } => narrow_and(ctx, arena, scope, env, values),
        Expr::BoolOp { op: BoolOp::Or, values } => narrow_or(ctx, arena, scope, env, values),
        Expr::Compare { left, ops, comparators } if ops.len() == 1 => {
            narrow_compare(ctx, arena, scope, env, *left, ops[0], comparators[0])
        }
        Expr::Compare { left, ops, comparators } => {
            // A chained comparison desugars to the conjunction of its
            // adjacent pairs (spec §4.3 "Operator").
            let mut operands = vec![*left];
            operands.extend(comparators.iter().copied());
            let pairs: Vec<(NodeId, CmpOp, NodeId)> =
                ops.iter().enumerate().map(|(i, &op)| (operands[i], op, operands[i + 1])).collect();
            let mut cur = env.fork();
            let mut thens = Vec::new();
            for (l, op, r) in &pairs {
                let r = narrow_compare_pair(ctx, arena, scope, &cur, *l, *op, *r);
                cur = r.then.fork();
                thens.push(r);
            }
            let then = cur;
            let els = thens.into_iter().next().map(|r| r.els).unwrap_or_else(|| env.fork());
            Refinement { then, els }
        }
        Expr::Call { callee, args } => narrow_call(ctx, arena, scope, env, test, *callee, args),
        _ => narrow_truthiness(ctx, env, test),
    }
}

fn narrow_and(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &NarrowingEnv, values: &[NodeId]) -> Refinement {
    // then = every value's then-narrowing applied in sequence.
    // else = NOT(v0) OR (v0 AND NOT v1) OR (v0 AND v1 AND NOT v2) ...,
    // joined two-way at each step so a read afterwards never sees a type
    // narrower than the pre-narrowing one (spec §8 narrowing soundness).
    let mut cur = env.fork();
    let mut els_accum: Option<NarrowingEnv> = None;
    for &v in values {
        let r = narrow_test(ctx, arena, scope, &cur, v);
        els_accum = Some(match els_accum {
            None => r.els.fork(),
            Some(prior) => {
                let mut checker = ctx.subtype_checker();
                NarrowingEnv::join(&mut checker, &[prior, r.els.fork()], |sym| env.get(sym))
            }
        });
        cur = r.then;
    }
    Refinement { then: cur, els: els_accum.unwrap_or_else(|| env.fork()) }
}

fn narrow_or(ctx: &CheckerContext<'_>, arena: &NodeArena, scope: ScopeId, env: &NarrowingEnv, values: &[NodeId]) -> Refinement {
    // Dual of `narrow_and`: else is the sequential refinement (every value
    // must be false), then is the join across "this value held" branches.
    let mut cur = env.fork();
    let mut then_accum: Option<NarrowingEnv> = None;
    for &v in values {
        let r = narrow_test(ctx, arena, scope, &cur, v);
        then_accum = Some(match then_accum {
            None => r.then.fork(),
            Some(prior) => {
                let mut checker = ctx.subtype_checker();
                NarrowingEnv::join(&mut checker, &[prior, r.then.fork()], |sym| env.get(sym))
            }
        });
        cur = r.els;
    }
    Refinement { then: then_accum.unwrap_or_else(|| env.fork()), els: cur }
}

fn narrow_compare(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &NarrowingEnv,
    left: NodeId,
    op: CmpOp,
    right: NodeId,
) -> Refinement {
    narrow_compare_pair(ctx, arena, scope, env, left, op, right).into()
}

struct PairRefinement {
    then: NarrowingEnv,
    els: NarrowingEnv,
}

impl From<PairRefinement> for Refinement {
    fn from(p: PairRefinement) -> Self {
        Refinement { then: p.then, els: p.els }
    }
}

fn is_none_literal(arena: &NodeArena, node: NodeId) -> bool {
    matches!(arena.expr(node), Expr::Literal(LiteralKind::None))
}

/// `d["k"] = v` / `"k" in d`-style presence checks: narrows a bound
/// `TypedMapping` so that field's `required` flag reads `true` afterwards
/// (spec §6 TypedDict "extra-items policy"; SPEC_FULL §10 TypedDict access).
fn narrow_mapping_key_presence(ctx: &CheckerContext<'_>, prior: TypeId, key: &str) -> TypeId {
    let Type::TypedMapping(m) = &*ctx.interner.get(prior) else { return prior };
    if !m.fields.iter().any(|f| f.name.as_str() == key) {
        return prior;
    }
    let fields = m
        .fields
        .iter()
        .map(|f| {
            if f.name.as_str() == key {
                strata_types::type_data::TypedMappingField { name: f.name, ty: f.ty, flags: FieldFlags { required: true, ..f.flags } }
            } else {
                f.clone()
            }
        })
        .collect();
    let narrowed = TypedMapping { declaration: m.declaration, fields, extra_items: m.extra_items.clone() };
    ctx.interner.intern(Type::TypedMapping(Box::new(narrowed)))
}

fn narrow_compare_pair(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &NarrowingEnv,
    left: NodeId,
    op: CmpOp,
    right: NodeId,
) -> PairRefinement {
    let mut then = env.fork();
    let mut els = env.fork();

    // `x is None` / `x == None` / their negations.
    if matches!(op, CmpOp::Is | CmpOp::Eq | CmpOp::IsNot | CmpOp::NotEq) {
        let target_node = if is_none_literal(arena, right) {
            Some(left)
        } else if is_none_literal(arena, left) {
            Some(right)
        } else {
            None
        };
        if let Some(target_node) = target_node {
            let positive = matches!(op, CmpOp::Is | CmpOp::Eq);
            if let Some(sym) = name_binding(ctx, arena, scope, target_node) {
                if let Some(prior) = env.get(sym) {
                    if positive {
                        then.set(sym, TypeId::NONE);
                        els.set(sym, guard::narrow_exclude(ctx, prior, TypeId::NONE));
                    } else {
                        then.set(sym, guard::narrow_exclude(ctx, prior, TypeId::NONE));
                        els.set(sym, TypeId::NONE);
                    }
                    return PairRefinement { then, els };
                }
            }
        }
    }

    // `"key" in mapping` / `"key" not in mapping`.
    if matches!(op, CmpOp::In | CmpOp::NotIn) {
        if let Expr::Literal(LiteralKind::Str(key)) = arena.expr(left) {
            if let Some(sym) = name_binding(ctx, arena, scope, right) {
                if let Some(prior) = env.get(sym) {
                    let narrowed = narrow_mapping_key_presence(ctx, prior, key.as_str());
                    if narrowed != prior {
                        if op == CmpOp::In {
                            then.set(sym, narrowed);
                        } else {
                            els.set(sym, narrowed);
                        }
                        return PairRefinement { then, els };
                    }
                }
            }
        }
    }

    PairRefinement { then, els }
}

fn narrow_truthiness(ctx: &CheckerContext<'_>, env: &NarrowingEnv, test: NodeId) -> Refinement {
    let then = env.fork();
    let els = env.fork();
    let Some(sym) = ctx.table.symbol_of_node(test) else {
        return Refinement { then, els };
    };
    let Some(prior) = env.get(sym) else {
        return Refinement { then, els };
    };
    // A truthy branch rules out `None` (the only statically-known-falsy
    // member a union can carry); the falsy branch keeps the original type,
    // since other members of `T` may also be falsy values of `T`.
    let mut then = then;
    then.set(sym, guard::narrow_exclude(ctx, prior, TypeId::NONE));
    Refinement { then, els }
}

fn narrow_call(
    ctx: &CheckerContext<'_>,
    arena: &NodeArena,
    scope: ScopeId,
    env: &NarrowingEnv,
    call_node: NodeId,
    callee: NodeId,
    args: &[strata_ast::Arg],
) -> Refinement {
    let mut then = env.fork();
    let mut els = env.fork();

    // `isinstance(x, C)` / `isinstance(x, (C, D))`.
    if let Expr::Name(name) = arena.expr(callee) {
        if name.as_str() == "isinstance" && args.len() == 2 && args[0].kind == ArgKind::Positional {
            if let Some(sym) = name_binding(ctx, arena, scope, args[0].value) {
                if let (Some(prior), Some(class_ty)) = (env.get(sym), ctx.type_of(args[1].value)) {
                    if let Some(instance_ty) = class_object_instance(ctx, class_ty) {
                        then.set(sym, ctx.meet(prior, instance_ty));
                        els.set(sym, guard::narrow_exclude(ctx, prior, instance_ty));
                        return Refinement { then, els };
                    }
                }
            }
        }
    }

    // A declared `TypeGuard[T]`/`TypeIs[T]` callee (spec §4.4).
    if let Some(callee_ty) = ctx.type_of(callee) {
        if let Some(tg) = type_guard_of(ctx, callee_ty) {
            if let Some(bound) = crate::call::bind_arguments(ctx, &tg_callable(ctx, callee_ty), args, arena.span(call_node), false).ok() {
                if let Some(arg) = bound.bindings.iter().find(|b| b.param_index == tg.target_param) {
                    if let Some(sym) = name_binding(ctx, arena, scope, arg.value) {
                        if let Some(prior) = env.get(sym) {
                            guard::apply_type_guard(ctx, &mut then, &tg, sym, true, prior);
                            guard::apply_type_guard(ctx, &mut els, &tg, sym, false, prior);
                            return Refinement { then, els };
                        }
                    }
                }
            }
        }
    }

    Refinement { then, els }
}

fn class_object_instance(ctx: &CheckerContext<'_>, class_ty: TypeId) -> Option<TypeId> {
    match &*ctx.interner.get(class_ty) {
        Type::ClassObject { instance } => Some(*instance),
        _ => None,
    }
}

fn type_guard_of(ctx: &CheckerContext<'_>, callee_ty: TypeId) -> Option<strata_types::type_data::TypeGuard> {
    match &*ctx.interner.get(callee_ty) {
        Type::Callable(c) => c.type_guard,
        Type::Overloaded(sigs) => sigs.iter().find_map(|&s| type_guard_of(ctx, s)),
        _ => None,
    }
}

fn tg_callable(ctx: &CheckerContext<'_>, callee_ty: TypeId) -> strata_types::type_data::Callable {
    match &*ctx.interner.get(callee_ty) {
        Type::Callable(c) => (**c).clone(),
        Type::Overloaded(sigs) => sigs
            .iter()
            .find_map(|&s| match &*ctx.interner.get(s) {
                Type::Callable(c) if c.type_guard.is_some() => Some((**c).clone()),
                _ => None,
            })
            .expect("type_guard_of already confirmed one signature carries a guard"),
        _ => unreachable!("only called after type_guard_of confirmed a Callable/Overloaded"),
    }
}
