//! Declared type aliases (spec §6: "Alias declarations (parameterized or
//! not), possibly recursive").
//!
//! Stores each alias's right-hand side and parameter list, keyed by the
//! alias's own `SymbolId`, and implements `strata_types::ops::expansion::
//! AliasResolver` so `strata-types`'s alias-expansion code can unfold
//! references without this crate handing it anything but the trait.

use rustc_hash::FxHashMap;
use strata_common::ids::SymbolId;
use strata_types::TypeVarId;
use strata_types::{TypeId, ops::expansion::AliasResolver};

#[derive(Clone, Debug)]
pub struct AliasDecl {
    pub rhs: TypeId,
    pub params: Vec<TypeVarId>,
}

#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    aliases: FxHashMap<SymbolId, AliasDecl>,
}

impl AliasTable {
    pub fn new() -> Self {
        AliasTable::default()
    }

    pub fn declare(&mut self, symbol: SymbolId, decl: AliasDecl) {
        self.aliases.insert(symbol, decl);
    }

    pub fn get(&self, symbol: SymbolId) -> Option<&AliasDecl> {
        self.aliases.get(&symbol)
    }
}

impl AliasResolver for AliasTable {
    fn is_alias(&self, symbol: SymbolId) -> bool {
        self.aliases.contains_key(&symbol)
    }

    fn alias_rhs(&self, symbol: SymbolId) -> TypeId {
        self.aliases[&symbol].rhs
    }

    fn alias_params(&self, symbol: SymbolId) -> &[TypeVarId] {
        self.aliases.get(&symbol).map(|a| a.params.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undeclared_symbol_is_not_an_alias() {
        let table = AliasTable::new();
        assert!(!table.is_alias(SymbolId(5)));
    }

    #[test]
    fn declared_alias_round_trips() {
        let mut table = AliasTable::new();
        let sym = SymbolId(1);
        table.declare(sym, AliasDecl { rhs: TypeId::ANY, params: vec![TypeVarId(0)] });
        assert!(table.is_alias(sym));
        assert_eq!(table.alias_rhs(sym), TypeId::ANY);
        assert_eq!(table.alias_params(sym), &[TypeVarId(0)]);
    }
}
