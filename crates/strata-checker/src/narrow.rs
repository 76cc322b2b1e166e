//! The narrowing environment (spec §4.4: "a map from binding identity (not
//! name) to the current narrowed type, paired with a reachability flag").
//!
//! Keyed by `SymbolId` rather than `Atom` so two distinct bindings that
//! happen to share a name (shadowing across scopes) never collide — the
//! same identity discipline `strata-types` uses for `TypeId`.

use rustc_hash::{FxHashMap, FxHashSet};
use strata_common::ids::SymbolId;
use strata_types::TypeId;

#[derive(Clone, Debug)]
pub struct NarrowingEnv {
    bindings: FxHashMap<SymbolId, TypeId>,
    /// Spec §4.4 "`del`": deleted bindings read as possibly-undefined
    /// rather than simply absent, so they're tracked separately from
    /// "never bound in this branch".
    deleted: FxHashSet<SymbolId>,
    reachable: bool,
}

impl Default for NarrowingEnv {
    fn default() -> Self {
        NarrowingEnv { bindings: FxHashMap::default(), deleted: FxHashSet::default(), reachable: true }
    }
}

impl NarrowingEnv {
    pub fn new() -> Self {
        NarrowingEnv::default()
    }

    pub fn get(&self, symbol: SymbolId) -> Option<TypeId> {
        self.bindings.get(&symbol).copied()
    }

    pub fn is_deleted(&self, symbol: SymbolId) -> bool {
        self.deleted.contains(&symbol)
    }

    pub fn set(&mut self, symbol: SymbolId, ty: TypeId) {
        self.deleted.remove(&symbol);
        self.bindings.insert(symbol, ty);
    }

    pub fn delete(&mut self, symbol: SymbolId) {
        self.bindings.remove(&symbol);
        self.deleted.insert(symbol);
    }

    pub fn reachable(&self) -> bool {
        self.reachable
    }

    pub fn mark_unreachable(&mut self) {
        self.reachable = false;
    }

    /// A branch's private copy of the environment to mutate independently
    /// (spec §3 "per-branch snapshots at control-flow joins").
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Spec §4.4 "Join of two environments", generalized to N branches for
    /// `if`/`elif`/`elif`/`else` chains and exception handler fan-out alike.
    /// `declared` supplies the binding's declared (or previously widened)
    /// type for entries not narrowed in every live branch — reverting to it
    /// is what "possibly-undefined... flagged" resolves to at the type
    /// level (the possibly-undefined *diagnostic* is a flow-checker
    /// concern, raised by the caller, not by this merge).
    pub fn join<H: strata_types::ClassHierarchy>(
        checker: &mut strata_types::SubtypeChecker<'_, H>,
        branches: &[NarrowingEnv],
        declared: impl Fn(SymbolId) -> Option<TypeId>,
    ) -> NarrowingEnv {
        let live: Vec<&NarrowingEnv> = branches.iter().filter(|b| b.reachable).collect();
        if live.is_empty() {
            let mut unreachable = branches.first().cloned().unwrap_or_default();
            unreachable.mark_unreachable();
            return unreachable;
        }

        let mut keys: FxHashSet<SymbolId> = FxHashSet::default();
        for b in &live {
            keys.extend(b.bindings.keys().copied());
        }

        let mut result = NarrowingEnv::new();
        for key in keys {
            let mut joined: Option<TypeId> = None;
            let mut present_everywhere = true;
            for b in &live {
                match b.bindings.get(&key) {
                    Some(&t) => {
                        joined = Some(match joined {
                            Some(acc) => strata_types::ops::join_meet::join(checker, acc, t),
                            None => t,
                        });
                    }
                    None => present_everywhere = false,
                }
            }
            let Some(joined) = joined else { continue };
            if present_everywhere {
                result.set(key, joined);
            } else if let Some(decl) = declared(key) {
                result.set(key, decl);
            } else {
                result.set(key, joined);
            }
        }
        result
    }
}
