//! Scopes (spec §3 "Scopes"): a tree, module → class → function →
//! comprehension/lambda, each owning a `name -> symbol-id` mapping.
//!
//! Type-variable scopes are a separate namespace keyed by generic
//! declaration site (spec §3: "Type-variable scopes are independent of
//! name scopes") — see `declared_types.rs`.

use rustc_hash::FxHashMap;
use strata_common::ids::{ScopeId, SymbolId};
use strata_common::interner::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
    /// Comprehension or lambda body — its own scope per spec §3, nested
    /// under the function/module that contains it.
    ComprehensionOrLambda,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    names: FxHashMap<Atom, SymbolId>,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope { kind, parent, names: FxHashMap::default() }
    }

    pub fn declare(&mut self, name: Atom, symbol: SymbolId) {
        self.names.insert(name, symbol);
    }

    pub fn lookup_local(&self, name: Atom) -> Option<SymbolId> {
        self.names.get(&name).copied()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena::default()
    }

    pub fn push(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Resolves `name` through the scope chain starting at `scope`,
    /// walking up through `parent` links (spec §4.3 "Name lookup").
    pub fn resolve(&self, scope: ScopeId, name: Atom) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id);
            if let Some(sym) = s.lookup_local(name) {
                return Some(sym);
            }
            current = s.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_through_the_parent_chain() {
        let mut arena = ScopeArena::new();
        let module = arena.push(Scope::new(ScopeKind::Module, None));
        let func = arena.push(Scope::new(ScopeKind::Function, Some(module)));
        arena.get_mut(module).declare(Atom::new("g"), SymbolId(1));
        arena.get_mut(func).declare(Atom::new("local"), SymbolId(2));

        assert_eq!(arena.resolve(func, Atom::new("local")), Some(SymbolId(2)));
        assert_eq!(arena.resolve(func, Atom::new("g")), Some(SymbolId(1)));
        assert_eq!(arena.resolve(func, Atom::new("missing")), None);
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let mut arena = ScopeArena::new();
        let module = arena.push(Scope::new(ScopeKind::Module, None));
        let func = arena.push(Scope::new(ScopeKind::Function, Some(module)));
        arena.get_mut(module).declare(Atom::new("x"), SymbolId(1));
        arena.get_mut(func).declare(Atom::new("x"), SymbolId(2));
        assert_eq!(arena.resolve(func, Atom::new("x")), Some(SymbolId(2)));
    }
}
