//! Symbols (spec §3 "Symbols"): declared kind, declared type, inference
//! status, owning scope, definition site, and modifier flags.
//!
//! Flag representation follows the teacher's `symbol_flags`/`flow_flags`
//! bitflags-module convention (visible via `tsz-binder`'s imports of
//! `symbol_flags` in `state.rs`, even though that module's own source was
//! outside the retrieval pack) rather than a struct of `bool` fields.

use strata_common::ids::{ScopeId, SymbolId};
use strata_common::interner::Atom;
use strata_common::span::Span;
use strata_types::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Module,
    Class,
    Variable,
    Function,
    Alias,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SymbolFlags: u16 {
        /// Spec §6: "Final ... markers".
        const FINAL = 1 << 0;
        /// Spec §6: "... and class-variable markers".
        const CLASS_VAR = 1 << 1;
        const ABSTRACT = 1 << 2;
        /// Member of an `@overload` group (spec §3 Symbols: "overload-group member").
        const OVERLOAD_GROUP_MEMBER = 1 << 3;
        /// Spec §6: "override markers".
        const OVERRIDE = 1 << 4;
        /// Spec §6: "deprecation notices".
        const DEPRECATED = 1 << 5;
        /// Class flagged structural (spec §6: "Protocol-like structural classes").
        const STRUCTURAL = 1 << 6;
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Atom,
    pub kind: SymbolKind,
    pub declared_type: Option<TypeId>,
    pub inferred: bool,
    pub owning_scope: ScopeId,
    pub def_span: Span,
    pub flags: SymbolFlags,
}

impl Symbol {
    pub fn new(name: Atom, kind: SymbolKind, owning_scope: ScopeId, def_span: Span) -> Self {
        Symbol {
            name,
            kind,
            declared_type: None,
            inferred: false,
            owning_scope,
            def_span,
            flags: SymbolFlags::empty(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.flags.contains(SymbolFlags::FINAL)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(SymbolFlags::ABSTRACT)
    }
}

/// An append-only table of symbols, indexed by `SymbolId`. Built once by
/// the front-end and only read by the engine (spec §3 "Lifecycles").
#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, s)| (SymbolId(i as u32), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_symbols_get_sequential_ids() {
        let mut arena = SymbolArena::new();
        let a = arena.push(Symbol::new(Atom::new("x"), SymbolKind::Variable, ScopeId(0), Span::dummy()));
        let b = arena.push(Symbol::new(Atom::new("y"), SymbolKind::Variable, ScopeId(0), Span::dummy()));
        assert_eq!(a.0, 0);
        assert_eq!(b.0, 1);
        assert_eq!(arena.get(a).name.as_str(), "x");
    }

    #[test]
    fn final_flag_roundtrips() {
        let mut sym = Symbol::new(Atom::new("x"), SymbolKind::Variable, ScopeId(0), Span::dummy());
        assert!(!sym.is_final());
        sym.flags.insert(SymbolFlags::FINAL);
        assert!(sym.is_final());
    }
}
