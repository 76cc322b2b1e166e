//! Identity tokens shared across crate boundaries.
//!
//! `strata-types` needs to refer to a class symbol without depending on
//! `strata-semantic` (which itself depends on `strata-types` for declared
//! types), and `strata-ast` needs a stable node identity that both the
//! semantic table and the checker key their maps by. Centralizing the raw
//! `u32` newtypes here keeps the crate graph acyclic: every downstream crate
//! can hold a `SymbolId` or `NodeId` without pulling in the crate that owns
//! the full data the id points at.

use serde::Serialize;

macro_rules! index_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub u32);

        impl $name {
            pub const NONE: $name = $name(u32::MAX);

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == u32::MAX
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(i: usize) -> Self {
                $name(i as u32)
            }
        }
    };
}

index_id!(NodeId);
index_id!(SymbolId);
index_id!(ScopeId);
