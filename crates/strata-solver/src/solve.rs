//! The fixpoint solver (spec §4.2 "Algorithm").
//!
//! Lower witnesses join, upper witnesses meet, repeated to a fixpoint
//! (constraints on one variable may mention another, so a later round can
//! narrow an earlier round's witness once that other variable's tentative
//! solution is known). Termination follows spec §4.2's "each iteration
//! strictly reduces the product of witness-pair sizes under a height
//! metric" — in practice the round count is bounded by the number of
//! variables plus one, since each round can only ever tighten, never
//! widen, a witness.

use crate::constraint::{Constraint, ConstraintKind};
use crate::info::TypeVarInfo;
use rustc_hash::{FxHashMap, FxHashSet};
use strata_types::ops::substitution::Substitution;
use strata_types::{ClassHierarchy, SubtypeChecker, TypeId, TypeVarId, TypeVarKind, Variance};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// No value satisfies the witnesses for this variable (§4.2: "failure"
    /// at the end of the per-variable solve step).
    Unsatisfiable(TypeVarId),
    /// Spec §4.2: "recursion across nested generic calls is gated by a
    /// depth cap (diagnostic on exceedance)" — reported as
    /// `ErrorKind::InternalDepthExceeded` by the caller.
    DepthExceeded,
}

/// The solver's output: spec §4.2 "a substitution mapping every free
/// variable to a concrete type". `fallback` records which variables were
/// solved via the Any-fallback branch (spec: "Any under a fallback flag"),
/// so callers that implement `gradual-any-is-error` can diagnose them.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    bindings: FxHashMap<TypeVarId, TypeId>,
    fallback: FxHashSet<TypeVarId>,
}

impl Solution {
    pub fn get(&self, var: TypeVarId) -> Option<TypeId> {
        self.bindings.get(&var).copied()
    }

    pub fn used_fallback(&self, var: TypeVarId) -> bool {
        self.fallback.contains(&var)
    }

    pub fn bindings(&self) -> &FxHashMap<TypeVarId, TypeId> {
        &self.bindings
    }

    pub fn substitution(&self) -> Substitution<'_> {
        Substitution::new(&self.bindings)
    }
}

const MAX_FIXPOINT_ROUNDS: usize = 64;

/// Solves `constraints` for every variable in `vars`. `depth` is the
/// caller's current nested-generic-call depth; exceeding `max_depth`
/// aborts with `DepthExceeded` rather than attempting to solve (spec §4.2).
pub fn solve<H: ClassHierarchy, V: TypeVarInfo>(
    checker: &mut SubtypeChecker<'_, H>,
    info: &V,
    vars: &[TypeVarId],
    constraints: &[Constraint],
    depth: usize,
    max_depth: usize,
) -> Result<Solution, SolveError> {
    if depth > max_depth {
        return Err(SolveError::DepthExceeded);
    }

    let mut lower: FxHashMap<TypeVarId, TypeId> = FxHashMap::default();
    let mut upper: FxHashMap<TypeVarId, TypeId> = FxHashMap::default();
    let mut contributed: FxHashSet<TypeVarId> = FxHashSet::default();

    for round in 0..MAX_FIXPOINT_ROUNDS {
        let mut changed = false;
        // Tentative point solution so far, used to substitute into
        // constraint types that mention other free variables before
        // joining/meeting this round.
        let tentative: FxHashMap<TypeVarId, TypeId> = vars
            .iter()
            .filter_map(|&v| lower.get(&v).or_else(|| upper.get(&v)).map(|&t| (v, t)))
            .collect();
        let subst = Substitution::new(&tentative);

        for c in constraints {
            contributed.insert(c.var);
            let ty = subst.apply(checker.interner(), c.ty);
            match c.kind {
                ConstraintKind::Lower => {
                    let next = match lower.get(&c.var) {
                        Some(&existing) => strata_types::ops::join_meet::join(checker, existing, ty),
                        None => ty,
                    };
                    if lower.get(&c.var) != Some(&next) {
                        lower.insert(c.var, next);
                        changed = true;
                    }
                }
                ConstraintKind::Upper => {
                    let next = match upper.get(&c.var) {
                        Some(&existing) => strata_types::ops::join_meet::meet(checker, existing, ty),
                        None => ty,
                    };
                    if upper.get(&c.var) != Some(&next) {
                        upper.insert(c.var, next);
                        changed = true;
                    }
                }
            }
        }

        if !changed || round == vars.len() {
            break;
        }
    }

    let mut bindings = FxHashMap::default();
    let mut fallback = FxHashSet::default();

    for &var in vars {
        let lo = lower.get(&var).copied();
        let hi = upper.get(&var).copied();

        if !contributed.contains(&var) {
            let solution = if let Some(default) = info.default(var) {
                default
            } else if info.kind(var) == TypeVarKind::Bounded {
                info.bound(var)
            } else if info.variance(var) == Variance::Invariant {
                TypeId::NEVER
            } else {
                fallback.insert(var);
                TypeId::ANY
            };
            bindings.insert(var, solution);
            continue;
        }

        let value_constraints = info.constraints(var);
        if !value_constraints.is_empty() {
            let pick = value_constraints.iter().copied().find(|&candidate| {
                let lower_ok = lo.is_none_or(|l| checker.is_subtype_of(l, candidate));
                let upper_ok = hi.is_none_or(|u| checker.is_subtype_of(candidate, u));
                lower_ok && upper_ok
            });
            match pick {
                Some(v) => {
                    bindings.insert(var, v);
                }
                None => return Err(SolveError::Unsatisfiable(var)),
            }
            continue;
        }

        let solution = match (lo, hi) {
            (Some(l), Some(u)) => {
                if checker.is_subtype_of(l, u) {
                    l
                } else {
                    u
                }
            }
            (Some(l), None) => l,
            (None, Some(u)) => u,
            (None, None) => unreachable!("contributed implies at least one witness"),
        };
        bindings.insert(var, solution);
    }

    Ok(Solution { bindings, fallback })
}
