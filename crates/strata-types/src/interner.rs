//! The type arena: the `TypeInterner` that owns every `Type` value.
//!
//! The interface this module exposes (`TypeInterner::new`, constructor
//! methods like `literal_str`, well-known constants like `TypeId::ANY`) is
//! grounded on the usage visible across the teacher's solver test suite
//! (`tsz-solver/src/tests/type_law_tests.rs` and siblings) — the solver
//! crate's own implementation was filtered out of the retrieval pack, so
//! the body here is an original implementation of that interface, built
//! the way the teacher's checker-side arena (`type_def.rs`) is built: a
//! flat `Vec<Type>` plus a dedup table, indexed by `TypeId`.
//!
//! Interning matters for two reasons spec §3/§4 call out directly: type
//! equality needs to be cheap (an index compare, after a one-time
//! structural dedup) and the subtype/substitution visited-set needs a
//! stable identity to key on.

use crate::type_data::{Type, TypeId};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

pub struct TypeInterner {
    inner: RefCell<InternerInner>,
}

struct InternerInner {
    types: Vec<Type>,
    dedup: FxHashMap<Type, TypeId>,
}

macro_rules! well_known {
    ($($name:ident => $variant:expr, $idx:expr;)*) => {
        impl TypeId {
            $(pub const $name: TypeId = TypeId($idx);)*
        }
    };
}

// Fixed slots for the handful of singleton types, so call sites can write
// `TypeId::ANY` without touching the interner — matches the constants the
// teacher's test suite expects (`TypeId::ANY`, `TypeId::NEVER`, ...).
well_known! {
    ANY => Type::Any, 0;
    NEVER => Type::Never, 1;
    NONE => Type::None, 2;
}

const FIXED_SLOT_COUNT: usize = 3;

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let types = vec![Type::Any, Type::Never, Type::None];
        TypeInterner { inner: RefCell::new(InternerInner { types, dedup: FxHashMap::default() }) }
    }

    /// Interns `ty`, returning the existing id if an equal type was already
    /// interned. This is the only way a `TypeId` comes into existence.
    pub fn intern(&self, ty: Type) -> TypeId {
        match &ty {
            Type::Any => return TypeId::ANY,
            Type::Never => return TypeId::NEVER,
            Type::None => return TypeId::NONE,
            _ => {}
        }
        let mut inner = self.inner.borrow_mut();
        if let Some(&id) = inner.dedup.get(&ty) {
            return id;
        }
        let id = TypeId(inner.types.len() as u32);
        inner.types.push(ty.clone());
        inner.dedup.insert(ty, id);
        id
    }

    /// Looks up the `Type` a `TypeId` refers to. Panics on an id from a
    /// different interner — callers never hold a `TypeId` across interners
    /// in practice, since there is exactly one per compilation unit (§5).
    pub fn get(&self, id: TypeId) -> std::cell::Ref<'_, Type> {
        std::cell::Ref::map(self.inner.borrow(), |inner| &inner.types[id.index()])
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= FIXED_SLOT_COUNT
    }

    pub fn literal_int(&self, v: i64, fallback: strata_common::ids::SymbolId) -> TypeId {
        self.intern(Type::Literal { value: crate::type_data::LiteralValue::Int(v), fallback })
    }

    pub fn literal_bool(&self, v: bool, fallback: strata_common::ids::SymbolId) -> TypeId {
        self.intern(Type::Literal { value: crate::type_data::LiteralValue::Bool(v), fallback })
    }

    pub fn literal_str(&self, v: &str, fallback: strata_common::ids::SymbolId) -> TypeId {
        let atom = strata_common::interner::Atom::new(v);
        self.intern(Type::Literal { value: crate::type_data::LiteralValue::Str(atom), fallback })
    }

    pub fn instance(&self, class: strata_common::ids::SymbolId, args: Vec<TypeId>) -> TypeId {
        self.intern(Type::Instance { class, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_never_none_are_fixed_singletons() {
        let interner = TypeInterner::new();
        assert_eq!(interner.intern(Type::Any), TypeId::ANY);
        assert_eq!(interner.intern(Type::Never), TypeId::NEVER);
        assert_eq!(interner.intern(Type::None), TypeId::NONE);
    }

    #[test]
    fn structurally_equal_types_dedup() {
        let interner = TypeInterner::new();
        let sym = strata_common::ids::SymbolId(7);
        let a = interner.literal_str("x", sym);
        let b = interner.literal_str("x", sym);
        assert_eq!(a, b);
        let c = interner.literal_str("y", sym);
        assert_ne!(a, c);
    }

    #[test]
    fn provenance_is_not_part_of_the_dedup_key() {
        // Provenance lives outside `Type` entirely (see `type_data::Provenance`),
        // so two structurally identical types always collapse to one id
        // regardless of where in the source each occurrence came from.
        let interner = TypeInterner::new();
        let sym = strata_common::ids::SymbolId(1);
        let a = interner.instance(sym, vec![TypeId::ANY]);
        let b = interner.instance(sym, vec![TypeId::ANY]);
        assert_eq!(a, b);
    }
}
