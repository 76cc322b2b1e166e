//! Type representation and type operations (spec §3, §4.1).
//!
//! This crate owns the `Type` arena and the pure operations over it
//! (subtype, equivalence, join, meet, substitution, erasure, alias
//! expansion). It knows nothing about symbols, scopes, or the AST beyond
//! the bare ids `strata-common` defines — `strata-semantic` and
//! `strata-checker` build on top of it, not the other way around.

pub mod flags;
pub mod hierarchy;
pub mod interner;
pub mod ops;
pub mod type_data;

pub use flags::TypeFlags;
pub use hierarchy::{ClassHierarchy, EmptyHierarchy};
pub use interner::TypeInterner;
pub use ops::SubtypeChecker;
pub use type_data::*;
