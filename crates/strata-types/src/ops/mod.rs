//! Type operations (spec §4.1): pure functions over `Type`; no type is
//! mutated after construction.

pub mod equivalence;
pub mod erasure;
pub mod expansion;
pub mod join_meet;
pub mod substitution;
pub mod subtype;
pub mod tuple;
pub mod typed_mapping;
pub mod union;

pub use equivalence::is_equivalent;
pub use erasure::erase;
pub use expansion::{expand_one, AliasResolver};
pub use join_meet::{join, meet};
pub use substitution::Substitution;
pub use subtype::SubtypeChecker;
pub use union::make_union;
