//! Statement node shapes (spec §4.4: "the checker walks statements").

use strata_common::ids::{NodeId, ScopeId};
use strata_common::interner::Atom;
use strata_types::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    KeywordOnly,
    VarArgs,
    VarKwargs,
}

#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Atom,
    pub kind: ParamKind,
    /// `None` when unannotated — the checker infers a declared type only
    /// for defaulted parameters (spec §4.3's parameter/default handling).
    pub annotation: Option<TypeId>,
    pub default: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: Atom,
    pub params: Vec<ParamDecl>,
    pub return_annotation: Option<TypeId>,
    pub body: Vec<NodeId>,
    pub is_async: bool,
    /// Declared narrowing kind recognized on the *return* annotation
    /// (spec §4.4 `TypeGuard`/`TypeIs`) — `None` for ordinary functions.
    /// Carried here rather than re-derived because the guard's target
    /// parameter is positional-index-relative to `params`.
    pub type_guard_target: Option<usize>,
    /// The function's own `Function` scope, where `params` and every name
    /// bound in `body` are declared — lets the checker resolve a parameter's
    /// symbol by name without a separate per-parameter id list.
    pub scope: ScopeId,
}

#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: Atom,
    pub bases: Vec<NodeId>,
    pub body: Vec<NodeId>,
    /// The class body's own `Class` scope (spec §3), where attributes
    /// assigned directly in `body` are declared.
    pub scope: ScopeId,
}

#[derive(Clone, Debug)]
pub struct ExceptHandler {
    pub exc_type: Option<TypeId>,
    pub bound_name: Option<Atom>,
    pub body: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    ExprStmt(NodeId),
    /// Plain assignment, `AnnAssign` (declared type present), and multi-
    /// target assignment all collapse to one shape: spec §4.4 only
    /// distinguishes "with a declared type" from "without".
    Assign { targets: Vec<NodeId>, value: NodeId, declared_type: Option<TypeId> },
    AugAssign { target: NodeId, op: crate::expr::BinOp, value: NodeId },
    /// `x: T` with no value — declares without binding (spec §4.4's
    /// declared-type entry still applies to later assignments to `x`).
    AnnotationOnly { target: NodeId, declared_type: TypeId },
    Return(Option<NodeId>),
    Raise { exc: Option<NodeId>, cause: Option<NodeId> },
    Assert { test: NodeId, msg: Option<NodeId> },
    Del(Vec<NodeId>),
    Pass,
    Break,
    Continue,
    Global(Vec<Atom>),
    Nonlocal(Vec<Atom>),
    If { test: NodeId, body: Vec<NodeId>, orelse: Vec<NodeId> },
    While { test: NodeId, body: Vec<NodeId>, orelse: Vec<NodeId> },
    For { target: NodeId, iter: NodeId, body: Vec<NodeId>, orelse: Vec<NodeId> },
    Try { body: Vec<NodeId>, handlers: Vec<ExceptHandler>, orelse: Vec<NodeId>, finalbody: Vec<NodeId> },
    With { items: Vec<(NodeId, Option<NodeId>)>, body: Vec<NodeId> },
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
}
