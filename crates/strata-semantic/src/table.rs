//! The read-only semantic table (spec §3 "Lifecycles": "symbol tables are
//! built once by the front-end and read by the engine"; spec §6 "Input
//! contract from the front-end").
//!
//! `SemanticTable` is the single value the checker is handed per
//! compilation unit: symbols, scopes, per-class declaration data, declared
//! aliases, and the module import graph. It implements
//! `strata_types::ClassHierarchy` directly so a `SubtypeChecker` can be
//! built from a `&SemanticTable` with no adapter type.

use crate::class_info::ClassInfo;
use crate::generics::GenericParams;
use crate::scope::ScopeArena;
use crate::symbol::SymbolArena;
use crate::alias::AliasTable;
use rustc_hash::FxHashMap;
use strata_common::ids::SymbolId;
use strata_common::interner::Atom;
use strata_types::ops::expansion::AliasResolver;
use strata_types::{ClassHierarchy, TypeId, TypeVarId, Variance};

#[derive(Debug, Default)]
pub struct SemanticTable {
    pub symbols: SymbolArena,
    pub scopes: ScopeArena,
    pub aliases: AliasTable,
    classes: FxHashMap<SymbolId, ClassInfo>,
    /// Generic parameter lists for non-class declaration sites (functions,
    /// aliases); class generics live inside `ClassInfo::type_params`.
    generics: FxHashMap<SymbolId, GenericParams>,
    /// Module import edges (spec §6: "module import edges"), `importer ->
    /// imported`.
    import_edges: Vec<(SymbolId, SymbolId)>,
    /// Spec §3 Symbols/§6: "a mapping from names and AST nodes to symbols".
    /// Populated by the front-end for every `Name`/binding-introducing AST
    /// node; the checker consults this rather than re-resolving through
    /// `ScopeArena` at every use site.
    node_symbols: FxHashMap<strata_common::ids::NodeId, SymbolId>,
}

impl SemanticTable {
    pub fn new() -> Self {
        SemanticTable::default()
    }

    pub fn declare_class(&mut self, symbol: SymbolId, info: ClassInfo) {
        self.classes.insert(symbol, info);
    }

    pub fn class_info(&self, symbol: SymbolId) -> Option<&ClassInfo> {
        self.classes.get(&symbol)
    }

    pub fn declare_generics(&mut self, symbol: SymbolId, params: GenericParams) {
        self.generics.insert(symbol, params);
    }

    pub fn generics_of(&self, symbol: SymbolId) -> Option<&GenericParams> {
        self.generics.get(&symbol)
    }

    pub fn add_import_edge(&mut self, importer: SymbolId, imported: SymbolId) {
        self.import_edges.push((importer, imported));
    }

    pub fn import_edges(&self) -> &[(SymbolId, SymbolId)] {
        &self.import_edges
    }

    pub fn bind_node(&mut self, node: strata_common::ids::NodeId, symbol: SymbolId) {
        self.node_symbols.insert(node, symbol);
    }

    pub fn symbol_of_node(&self, node: strata_common::ids::NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    /// Resolves an instance attribute by walking `class`'s method
    /// resolution order (spec §4.3: "instance attribute access consults
    /// the nominal class's method resolution order"), most-derived first.
    pub fn resolve_member(&self, class: SymbolId, name: Atom) -> Option<crate::class_info::MemberInfo> {
        let info = self.classes.get(&class)?;
        if let Some(m) = info.own_member(name) {
            return Some(m);
        }
        for &ancestor in &info.mro {
            if ancestor == class {
                continue;
            }
            if let Some(m) = self.classes.get(&ancestor).and_then(|a| a.own_member(name)) {
                return Some(m);
            }
        }
        None
    }
}

impl ClassHierarchy for SemanticTable {
    fn variance_of(&self, class: SymbolId, param_index: usize) -> Variance {
        self.classes.get(&class).map(|c| c.variance_of(param_index)).unwrap_or(Variance::Invariant)
    }

    fn type_param_count(&self, class: SymbolId) -> usize {
        self.classes.get(&class).map(|c| c.type_params.len()).unwrap_or(0)
    }

    fn bases(&self, class: SymbolId) -> &[SymbolId] {
        self.classes.get(&class).map(|c| c.bases.as_slice()).unwrap_or(&[])
    }

    fn is_structural(&self, class: SymbolId) -> bool {
        self.classes.get(&class).map(|c| c.structural).unwrap_or(false)
    }

    fn structural_members(&self, class: SymbolId) -> &[(Atom, TypeId)] {
        self.classes.get(&class).map(|c| c.structural_members.as_slice()).unwrap_or(&[])
    }
}

/// So a `SubtypeChecker`/alias-expansion call site can be built directly
/// from a `&SemanticTable` without an adapter type, same as `ClassHierarchy`
/// above.
impl AliasResolver for SemanticTable {
    fn is_alias(&self, symbol: SymbolId) -> bool {
        self.aliases.is_alias(symbol)
    }

    fn alias_rhs(&self, symbol: SymbolId) -> TypeId {
        self.aliases.alias_rhs(symbol)
    }

    fn alias_params(&self, symbol: SymbolId) -> &[TypeVarId] {
        self.aliases.alias_params(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generics::TypeVarDecl;
    use strata_types::TypeVarId;

    #[test]
    fn is_subclass_walks_declared_bases() {
        let mut table = SemanticTable::new();
        let object = SymbolId(0);
        let base = SymbolId(1);
        let derived = SymbolId(2);
        table.declare_class(object, ClassInfo::default());
        table.declare_class(base, ClassInfo { bases: vec![object], ..Default::default() });
        table.declare_class(derived, ClassInfo { bases: vec![base], ..Default::default() });
        assert!(table.is_subclass(derived, object));
        assert!(!table.is_subclass(object, derived));
    }

    #[test]
    fn variance_of_reads_declared_generic_params() {
        let mut table = SemanticTable::new();
        let class = SymbolId(0);
        let mut decl = TypeVarDecl::plain(TypeVarId(0), TypeId::ANY);
        decl.variance = Variance::Covariant;
        table.declare_class(
            class,
            ClassInfo { type_params: GenericParams::new(vec![decl]), ..Default::default() },
        );
        assert_eq!(table.variance_of(class, 0), Variance::Covariant);
        // Out-of-range / undeclared falls back to invariant, the
        // conservative default (spec §4.1 default-case safety).
        assert_eq!(table.variance_of(class, 5), Variance::Invariant);
    }

    #[test]
    fn resolve_member_walks_mro_to_an_inherited_member() {
        use crate::class_info::MemberInfo;
        use strata_common::interner::Atom;

        let mut table = SemanticTable::new();
        let base = SymbolId(0);
        let derived = SymbolId(1);
        table.declare_class(
            base,
            ClassInfo { members: vec![(Atom::new("x"), MemberInfo::field(TypeId::ANY))], ..Default::default() },
        );
        table.declare_class(derived, ClassInfo { bases: vec![base], mro: vec![derived, base], ..Default::default() });

        assert_eq!(table.resolve_member(derived, Atom::new("x")), Some(MemberInfo::field(TypeId::ANY)));
        assert_eq!(table.resolve_member(derived, Atom::new("missing")), None);
    }

    #[test]
    fn resolve_member_prefers_the_most_derived_override() {
        use crate::class_info::MemberInfo;
        use strata_common::interner::Atom;

        let mut table = SemanticTable::new();
        let base = SymbolId(0);
        let derived = SymbolId(1);
        table.declare_class(
            base,
            ClassInfo { members: vec![(Atom::new("x"), MemberInfo::field(TypeId::ANY))], ..Default::default() },
        );
        table.declare_class(
            derived,
            ClassInfo {
                bases: vec![base],
                mro: vec![derived, base],
                members: vec![(Atom::new("x"), MemberInfo::field(TypeId::NONE))],
                ..Default::default()
            },
        );

        assert_eq!(table.resolve_member(derived, Atom::new("x")), Some(MemberInfo::field(TypeId::NONE)));
    }
}
