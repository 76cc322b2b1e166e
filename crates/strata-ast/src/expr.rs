//! Expression node shapes (spec §4.3: "given an AST node ... returns the
//! inferred type"). Each variant holds child `NodeId`s rather than nested
//! values, so the checker's node-to-type map (written post-order) can be
//! consulted for any sub-expression without re-walking.

use smallvec::SmallVec;
use strata_common::ids::NodeId;
use strata_common::interner::Atom;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Invert,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Is,
    IsNot,
    In,
    NotIn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    Positional,
    Keyword(Atom),
    /// `*args`-style unpack at a call site.
    Starred,
    /// `**kwargs`-style unpack at a call site (spec §4.3: "keyword-dictionary
    /// unpacking").
    DoubleStarred,
}

#[derive(Clone, Copy, Debug)]
pub struct Arg {
    pub kind: ArgKind,
    pub value: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub enum ComprehensionKind {
    List,
    Set,
    Generator,
    /// Dict comprehension: the element node is a `DictItem`-shaped pair
    /// handled by storing both key and value ids on `Comprehension`.
    Dict,
}

#[derive(Clone, Debug)]
pub struct ComprehensionClause {
    pub target: NodeId,
    pub iter: NodeId,
    pub conditions: SmallVec<[NodeId; 2]>,
}

#[derive(Clone, Debug)]
pub enum LiteralKind {
    Int(i64),
    Bool(bool),
    Str(Atom),
    Bytes(Vec<u8>),
    None,
    /// `Enum.MEMBER` read through a literal-known path.
    EnumMember { enum_name: Atom, member: Atom },
}

#[derive(Clone, Debug)]
pub enum Expr {
    Name(Atom),
    Literal(LiteralKind),
    Attribute { value: NodeId, attr: Atom },
    /// `a[b]`, also used for `TypedDict`-shaped string-key reads.
    Subscript { value: NodeId, index: NodeId },
    Call { callee: NodeId, args: Vec<Arg> },
    BinaryOp { op: BinOp, left: NodeId, right: NodeId },
    UnaryOp { op: UnaryOp, operand: NodeId },
    BoolOp { op: BoolOp, values: Vec<NodeId> },
    /// Comparison chains desugar to conjunctions at the checker, but the
    /// AST keeps the original chain shape (spec §4.3).
    Compare { left: NodeId, ops: Vec<CmpOp>, comparators: Vec<NodeId> },
    /// `lambda params: body`; `params` lists parameter binding identities
    /// in declaration order (the semantic table supplies their types).
    /// `scope` is the lambda's own `ComprehensionOrLambda` scope (spec §3),
    /// where each of `params` is declared by name — the checker resolves a
    /// parameter's symbol through it rather than threading a separate id
    /// list alongside `params`.
    Lambda { params: Vec<Atom>, scope: strata_common::ids::ScopeId, body: NodeId },
    IfExp { test: NodeId, body: NodeId, orelse: NodeId },
    Tuple(Vec<NodeId>),
    ListLiteral(Vec<NodeId>),
    SetLiteral(Vec<NodeId>),
    DictLiteral(Vec<(NodeId, NodeId)>),
    Starred(NodeId),
    Await(NodeId),
    Yield(Option<NodeId>),
    YieldFrom(NodeId),
    /// `name := value`; narrows/binds exactly like a statement-level
    /// assignment (spec SPEC_FULL §10 "Walrus").
    NamedExpr { target: Atom, value: NodeId },
    Comprehension { kind: ComprehensionKind, element: NodeId, value: Option<NodeId>, clauses: Vec<ComprehensionClause> },
    /// `reveal_type(x)` (SPEC_FULL §10): carries no special payload beyond
    /// the inner expression — the checker special-cases the callee name.
}
