//! The `Type` enum: spec §3's tagged sum of every representable type.
//!
//! Structural equality on `Type` ignores source provenance (the `Span`
//! carried for diagnostics), matching spec §3's invariant. Large variants
//! are boxed, same discipline the teacher applies in `type_def.rs`, to keep
//! `std::mem::size_of::<Type>()` small and cache-friendly in the arena's
//! backing `Vec`.

use crate::flags::TypeFlags;
use smallvec::SmallVec;
use strata_common::interner::Atom;
use strata_common::ids::SymbolId;
use strata_common::span::Span;

/// Identity of an interned type. Cheap to copy, compares by arena index —
/// never by walking the `Type` tree (see `interner.rs`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A compile-time-known scalar value, per spec §3 "Literal".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Int(i64),
    Bool(bool),
    Str(Atom),
    Bytes(Vec<u8>),
    /// An enum member: the owning enum's class symbol plus the member name.
    EnumMember(SymbolId, Atom),
}

/// Required/optional/read-only flag for a single typed-mapping field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldFlags {
    pub required: bool,
    pub read_only: bool,
}

impl FieldFlags {
    pub const fn required_mutable() -> Self {
        FieldFlags { required: true, read_only: false }
    }
}

/// Whether a typed mapping accepts keys it does not declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtraItemsPolicy {
    Forbidden,
    OpenTyped(TypeId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedMappingField {
    pub name: Atom,
    pub ty: TypeId,
    pub flags: FieldFlags,
}

/// Nominal identity for a typed mapping: its declaration site, since two
/// mappings with identical fields declared at different sites are distinct
/// types (spec §3: "nominal identity by declaration site").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedMapping {
    pub declaration: SymbolId,
    pub fields: Vec<TypedMappingField>,
    pub extra_items: ExtraItemsPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedTuple {
    pub declaration: SymbolId,
    pub field_names: Vec<Atom>,
    pub field_types: Vec<TypeId>,
}

/// A tuple unpack segment `*Ts` inside a fixed-arity tuple, where `Ts`
/// binds to a variadic type variable. At most one per tuple (spec §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnpackSegment {
    pub position: usize,
    pub variable: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TupleShape {
    /// `(T1, ..., Tn)`, optionally containing one `*Ts` unpack segment.
    Fixed { elements: Vec<TypeId>, unpack: Option<UnpackSegment> },
    /// `(T, ...)`
    Homogeneous(TypeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    PositionalRequired,
    PositionalOptional,
    KeywordOnly,
    VarArgs,
    VarKwargs,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Atom,
    pub kind: ParamKind,
    pub ty: TypeId,
}

/// Spec §4.4: a declared narrowing on a callable's return type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeGuardKind {
    /// `TypeGuard[T]`: one-way narrowing on a truthy return.
    OneWay,
    /// `TypeIs[T]`: two-way narrowing; the falsy branch narrows to `¬T`.
    TwoWay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeGuard {
    pub kind: TypeGuardKind,
    pub narrowed: TypeId,
    /// Index of the parameter the guard applies to (first positional, or
    /// the parameter bound by keyword — resolved by the caller).
    pub target_param: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Callable {
    pub params: SmallVec<[Param; 4]>,
    pub return_ty: TypeId,
    pub bound_param_spec: Option<TypeId>,
    pub type_guard: Option<TypeGuard>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variance {
    Covariant,
    Contravariant,
    Invariant,
    Inferred,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeVarKind {
    Plain,
    Bounded,
    ValueConstrained,
    Variadic,
    ParamSpec,
}

/// Identity of a declared type variable: scoped by declaration site, not by
/// name (spec §3: "id-based, not name-based").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeVarId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVarRef {
    pub id: TypeVarId,
    pub binding_scope: strata_common::ids::ScopeId,
    pub kind: TypeVarKind,
}

/// Internal-only inference placeholders. Never observed past the
/// expression checker / solver boundary (spec §3: "never leak to
/// diagnostics").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unresolved {
    /// A type variable awaiting solver output.
    PendingSolve(TypeVarId),
    /// An expression whose type could not yet be computed (cycle guard).
    Deferred,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Any,
    Never,
    None,
    Instance { class: SymbolId, args: Vec<TypeId> },
    ClassObject { instance: TypeId },
    Tuple(TupleShape),
    TypedMapping(Box<TypedMapping>),
    NamedTuple(Box<NamedTuple>),
    /// Canonicalized: flat, deduplicated, at least two non-union members,
    /// never contains `Never` (spec §3 invariants).
    Union(Vec<TypeId>),
    Callable(Box<Callable>),
    /// Non-empty, never nests (spec §3 invariant).
    Overloaded(Vec<TypeId>),
    TypeVar(TypeVarRef),
    Literal { value: LiteralValue, fallback: SymbolId },
    Unresolved(Unresolved),
}

impl Type {
    pub fn flags(&self) -> TypeFlags {
        match self {
            Type::Any => TypeFlags::ANY,
            Type::Never => TypeFlags::NEVER,
            Type::None => TypeFlags::NONE,
            Type::Instance { .. } => TypeFlags::INSTANCE,
            Type::ClassObject { .. } => TypeFlags::CLASS_OBJECT,
            Type::Tuple(_) => TypeFlags::TUPLE,
            Type::TypedMapping(_) => TypeFlags::TYPED_MAPPING,
            Type::NamedTuple(_) => TypeFlags::NAMED_TUPLE,
            Type::Union(_) => TypeFlags::UNION,
            Type::Callable(_) => TypeFlags::CALLABLE,
            Type::Overloaded(_) => TypeFlags::OVERLOADED,
            Type::TypeVar(_) => TypeFlags::TYPE_VAR,
            Type::Literal { .. } => TypeFlags::LITERAL,
            Type::Unresolved(_) => TypeFlags::PARTIAL,
        }
    }
}

/// Source provenance for a type occurrence, kept out of `Type` itself so
/// that structural equality (used for interning and union dedup) never has
/// to ignore it by convention — it simply isn't part of the hashed/compared
/// key. Stored alongside the `Type` in the arena's parallel `spans` vector.
#[derive(Clone, Copy, Debug, Default)]
pub struct Provenance(pub Span);
