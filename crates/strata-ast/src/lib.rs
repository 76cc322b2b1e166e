//! Minimal AST node shapes the checker consumes.
//!
//! Scanning and parsing are explicitly out of scope (spec §1): this crate
//! does not produce an AST, it only defines the node shapes a front-end
//! hands the engine — expressions, statements, and the flat `NodeId`-keyed
//! arena they live in. Surface syntax (exact token grammar, concrete
//! syntax nodes) is deliberately not represented; only the semantic shape
//! the expression/statement checker needs to walk is.

pub mod expr;
pub mod node;
pub mod stmt;

pub use expr::{Arg, ArgKind, BinOp, BoolOp, CmpOp, ComprehensionClause, ComprehensionKind, Expr, LiteralKind, UnaryOp};
pub use node::{Module, Node, NodeArena, NodeKind};
pub use stmt::{ClassDef, ExceptHandler, FunctionDef, ParamDecl, ParamKind, Stmt};
