//! Resolves the fixed set of builtin class symbols the checker needs by
//! name (spec §4.3 "Literal: ... yields a literal type whose nominal
//! fallback is the obvious class") without hard-coding symbol ids, since
//! assigning symbol ids is the front-end's job (§1 Non-goals).

use strata_common::ids::{ScopeId, SymbolId};
use strata_common::interner::Atom;
use strata_semantic::SemanticTable;

#[derive(Clone, Copy, Debug)]
pub struct BuiltinSymbols {
    pub int_class: SymbolId,
    pub bool_class: SymbolId,
    pub str_class: SymbolId,
    pub bytes_class: SymbolId,
    pub object_class: SymbolId,
    /// Containers aren't named in spec §3/§4.3 directly (only `Tuple` is a
    /// first-class `Type` variant); list/set/dict literals fall back to
    /// `Any`-parameterized instances of these when the front-end's builtin
    /// module declares them, and to plain `Any` when it doesn't.
    pub list_class: Option<SymbolId>,
    pub set_class: Option<SymbolId>,
    pub dict_class: Option<SymbolId>,
}

impl BuiltinSymbols {
    /// Resolves each builtin name in `builtin_scope` (expected to be the
    /// outermost scope of the builtin module every unit implicitly imports,
    /// spec §6 "module import edges"). Returns `None` if any of the
    /// required scalar classes is missing — a front-end contract violation.
    pub fn resolve(table: &SemanticTable, builtin_scope: ScopeId) -> Option<Self> {
        let get = |name: &str| table.scopes.resolve(builtin_scope, Atom::new(name));
        Some(BuiltinSymbols {
            int_class: get("int")?,
            bool_class: get("bool")?,
            str_class: get("str")?,
            bytes_class: get("bytes")?,
            object_class: get("object")?,
            list_class: get("list"),
            set_class: get("set"),
            dict_class: get("dict"),
        })
    }
}
