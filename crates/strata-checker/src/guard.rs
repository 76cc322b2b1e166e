//! Type-guard narrowing (spec §4.4): applies a declared `TypeGuard[T]`
//! (one-way) or `TypeIs[T]` (two-way) result to the narrowing environment
//! at the call site that invoked the guard function.

use crate::context::CheckerContext;
use crate::narrow::NarrowingEnv;
use strata_common::ids::SymbolId;
use strata_types::type_data::{Type, TypeGuard, TypeGuardKind};
use strata_types::TypeId;

/// Removes every union member that is a subtype of `excluded` from `prior`.
/// Used for the falsy branch of `TypeIs` (spec SPEC_FULL §10: negates to
/// `¬T`) and, more generally, anywhere a predicate rules a member out
/// rather than in (`is not None`, a failed `isinstance`). Non-union types
/// can't be narrowed by exclusion without a dedicated negation type (spec
/// §3 has none), so they pass through unchanged.
pub fn narrow_exclude(ctx: &CheckerContext<'_>, prior: TypeId, excluded: TypeId) -> TypeId {
    let Type::Union(members) = &*ctx.interner.get(prior) else {
        return prior;
    };
    let remaining: Vec<TypeId> = members.iter().copied().filter(|&m| !ctx.is_subtype(m, excluded)).collect();
    if remaining.is_empty() {
        return TypeId::NEVER;
    }
    strata_types::ops::union::make_union(ctx.interner, remaining)
}

/// Applies `guard`'s narrowing to `target` in `env`, given whether the call
/// site is in the truthy or falsy continuation.
pub fn apply_type_guard(ctx: &CheckerContext<'_>, env: &mut NarrowingEnv, guard: &TypeGuard, target: SymbolId, truthy: bool, prior: TypeId) {
    match (guard.kind, truthy) {
        (TypeGuardKind::OneWay, true) => env.set(target, guard.narrowed),
        (TypeGuardKind::OneWay, false) => {
            // One-way: the falsy branch carries no extra information.
        }
        (TypeGuardKind::TwoWay, true) => env.set(target, guard.narrowed),
        (TypeGuardKind::TwoWay, false) => env.set(target, narrow_exclude(ctx, prior, guard.narrowed)),
    }
}
