//! Diagnostic accumulation types.
//!
//! The engine never raises on a type error (§7 of the design notes): it
//! records a `Diagnostic` and keeps checking, substituting `Any` for the
//! offending sub-expression so later checks stay informative. The one
//! exception is `ErrorKind::InternalConsistency`, reserved for reaching a
//! branch the implementation believes is unreachable.

pub mod data;

use crate::span::Span;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

/// Every diagnostic the engine can emit, tagged so tooling and tests can
/// assert on *kind* rather than parse the rendered message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IncompatibleAssignment,
    IncompatibleReturn,
    IncompatibleArgument,
    CallArity,
    UnexpectedKeyword,
    DuplicateKeyword,
    MissingArgument,
    NoOverloadMatch,
    UnreachableOverload,
    AmbiguousOverload,
    AttributeMissing,
    AttributeReadOnly,
    AttributeNotInSlots,
    NameUndefined,
    NameRedefined,
    PossiblyUndefined,
    TypeVariableUnsolved,
    TypeVariableDefaultOutOfScope,
    VarianceViolation,
    AbstractInstantiation,
    FinalReassignment,
    TypedMappingExtraKey,
    TypedMappingMissingRequired,
    TypedMappingReadOnlyWrite,
    NarrowingTypeGuardInvalid,
    RecursiveAliasCycle,
    InternalDepthExceeded,
    /// `reveal_type(...)` (§2 Diagnostics Bus: "revealed-type notes"); always
    /// `Severity::Note`, never fails a build on its own.
    RevealedType,
    /// Not a user-facing error: an invariant the implementation believed
    /// could not fail, failed. Aborts the compilation unit.
    InternalConsistency,
}

impl ErrorKind {
    pub const fn code(self) -> u32 {
        data::code_for(self)
    }

    pub const fn default_severity(self) -> Severity {
        match self {
            ErrorKind::RevealedType => Severity::Note,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Diagnostic { severity, kind, span, message: message.into(), related: Vec::new() }
    }

    pub fn error(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, span, message)
    }

    pub fn warning(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, span, message)
    }

    pub fn note(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, kind, span, message)
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push(RelatedInfo { span, message: message.into() });
        self
    }

    /// Sort key used to make the diagnostics stream stable across re-runs:
    /// source position, then error kind, then message text.
    pub fn sort_key(&self) -> (Span, u32, &str) {
        (self.span, self.kind.code(), self.message.as_str())
    }
}

pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
