//! The read-only semantic table (spec §3 "Symbols"/"Scopes", §6 input
//! contract) consumed by the checker. Built once by an external front-end;
//! nothing in this crate mutates a `SemanticTable` after it is handed to
//! `strata-checker`.

pub mod alias;
pub mod class_info;
pub mod generics;
pub mod scope;
pub mod symbol;
pub mod table;

pub use alias::{AliasDecl, AliasTable};
pub use class_info::{ClassInfo, MemberInfo};
pub use generics::{DefaultOutOfScope, GenericParams, TypeVarDecl};
pub use scope::{Scope, ScopeArena, ScopeKind};
pub use symbol::{Symbol, SymbolArena, SymbolFlags, SymbolKind};
pub use table::SemanticTable;
