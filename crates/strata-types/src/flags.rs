//! Fast-membership flags cached alongside every interned type.
//!
//! Mirrors the teacher's `tsz-checker/src/types/flags.rs`: rather than
//! matching on the `Type` enum to answer "is this nullable", "is this a
//! union", etc., each `TypeId` carries a small bitset computed once at
//! construction time. Composite flags (`NULLABLE`, `STRUCTURED`) are unions
//! of the primitive ones, same pattern as the teacher's `type_flags` module.

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u32 {
        const ANY          = 1 << 0;
        const NEVER        = 1 << 1;
        const NONE         = 1 << 2;
        const INSTANCE     = 1 << 3;
        const CLASS_OBJECT = 1 << 4;
        const TUPLE        = 1 << 5;
        const TYPED_MAPPING = 1 << 6;
        const NAMED_TUPLE  = 1 << 7;
        const UNION        = 1 << 8;
        const CALLABLE     = 1 << 9;
        const OVERLOADED   = 1 << 10;
        const TYPE_VAR     = 1 << 11;
        const LITERAL      = 1 << 12;
        const PARTIAL      = 1 << 13;

        const NULLABLE      = Self::NONE.bits();
        const STRUCTURED    = Self::TUPLE.bits() | Self::TYPED_MAPPING.bits() | Self::NAMED_TUPLE.bits();
        const GRADUAL_EDGE  = Self::ANY.bits() | Self::NEVER.bits();
        const CALLABLE_LIKE = Self::CALLABLE.bits() | Self::OVERLOADED.bits();
    }
}

impl TypeFlags {
    #[inline]
    pub fn is_any_or_never(self) -> bool {
        self.intersects(Self::GRADUAL_EDGE)
    }
}
