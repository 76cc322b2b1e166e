//! Overload dispatch (spec §4.5): the 6-step resolution algorithm.
//!
//! Steps 1-2 (argument types, shape/subtype matching) reuse `call::
//! bind_arguments`; steps 3-5 (Any-absorption union-of-returns) are this
//! module's core; step 6 (unreachable-overload at declaration time) is
//! `check_unreachable_overloads`, run once per declaration rather than per
//! call site.

use crate::call::bind_arguments;
use crate::context::CheckerContext;
use strata_ast::Arg;
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::span::Span;
use strata_types::type_data::{Callable, Type};
use strata_types::TypeId;

pub struct OverloadResult {
    pub return_ty: TypeId,
    /// Set when the Any-absorption rule (spec §4.5 step 5) fired: more
    /// than one signature matched only because an argument carried `Any`.
    pub ambiguous: bool,
}

/// Spec §4.5 steps 1-5: resolves a call against an ordered overload list.
pub fn resolve_overload(ctx: &CheckerContext<'_>, overloads: &[Callable], args: &[Arg], call_span: Span) -> OverloadResult {
    let mut exact_matches: Vec<&Callable> = Vec::new();
    let mut any_matches: Vec<&Callable> = Vec::new();

    for callable in overloads {
        let Ok(bound) = bind_arguments(ctx, callable, args, call_span, false) else { continue };
        let mut used_any = false;
        let mut ok = true;
        for b in &bound.bindings {
            let param = &callable.params[b.param_index];
            let Some(actual) = ctx.type_of(b.value) else { continue };
            if matches!(&*ctx.interner.get(actual), Type::Any) {
                used_any = true;
            }
            if !ctx.is_subtype(actual, param.ty) {
                ok = false;
                break;
            }
        }
        if !ok {
            continue;
        }
        if used_any {
            any_matches.push(callable);
        } else {
            exact_matches.push(callable);
        }
    }

    // Step 3: the first fully (non-Any-dependent) matching signature wins,
    // in declaration order.
    if let Some(first) = exact_matches.first() {
        return OverloadResult { return_ty: first.return_ty, ambiguous: false };
    }

    if any_matches.len() == 1 {
        return OverloadResult { return_ty: any_matches[0].return_ty, ambiguous: false };
    }

    if any_matches.len() > 1 {
        let returns: Vec<TypeId> = any_matches.iter().map(|c| c.return_ty).collect();
        let all_equivalent = returns.windows(2).all(|w| ctx.is_subtype(w[0], w[1]) && ctx.is_subtype(w[1], w[0]));
        let return_ty = if all_equivalent {
            returns[0]
        } else {
            strata_types::ops::union::make_union(ctx.interner, returns)
        };
        if !all_equivalent {
            ctx.emit(Diagnostic::warning(
                ErrorKind::AmbiguousOverload,
                call_span,
                format!("Call is ambiguous between {} overloads under an Any-typed argument", any_matches.len()),
            ));
        }
        return OverloadResult { return_ty, ambiguous: !all_equivalent };
    }

    ctx.emit(Diagnostic::error(ErrorKind::NoOverloadMatch, call_span, "No overload matches this call"));
    OverloadResult { return_ty: TypeId::ANY, ambiguous: false }
}

/// Spec §4.5 step 6: flags an earlier overload that is strictly more
/// general than a later one — the later signature can never be selected,
/// since step 3 always stops at the first match.
pub fn check_unreachable_overloads(ctx: &CheckerContext<'_>, overloads: &[Callable], decl_span: Span) {
    for earlier_idx in 0..overloads.len() {
        for later_idx in (earlier_idx + 1)..overloads.len() {
            if subsumes(ctx, &overloads[earlier_idx], &overloads[later_idx]) {
                ctx.emit(Diagnostic::warning(
                    ErrorKind::UnreachableOverload,
                    decl_span,
                    format!("Overload #{} is unreachable: overload #{} always matches first", later_idx + 1, earlier_idx + 1),
                ));
            }
        }
    }
}

/// `earlier` subsumes `later` when every argument `later` would accept is
/// also accepted by `earlier` (contravariant in parameters) and `earlier`'s
/// return is at least as specific (covariant) — the same shape as callable
/// subtyping (`strata_types::ops::subtype`), since "this overload always
/// matches first" is exactly "this signature is a supertype of the next".
fn subsumes(ctx: &CheckerContext<'_>, earlier: &Callable, later: &Callable) -> bool {
    if earlier.params.len() != later.params.len() {
        return false;
    }
    earlier
        .params
        .iter()
        .zip(later.params.iter())
        .all(|(e, l)| e.kind == l.kind && ctx.is_subtype(l.ty, e.ty))
        && ctx.is_subtype(later.return_ty, earlier.return_ty)
}
