//! The node arena: a single `NodeId` space shared by every expression and
//! statement, so the checker's node-to-type map (spec §6 "a node-to-type
//! mapping") and the semantic table's node-to-symbol map (spec §6 "an AST
//! in which every node has a stable identity usable as a map key") both key
//! off the same id without caring which arena a node lives in.
//!
//! Built once by the front-end (out of scope, §1) and only ever read here.

use crate::expr::Expr;
use crate::stmt::Stmt;
use strata_common::ids::NodeId;
use strata_common::span::Span;

#[derive(Clone, Debug)]
pub enum NodeKind {
    Expr(Expr),
    Stmt(Stmt),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena::default()
    }

    pub fn push(&mut self, span: Span, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { span, kind });
        id
    }

    pub fn push_expr(&mut self, span: Span, expr: Expr) -> NodeId {
        self.push(span, NodeKind::Expr(expr))
    }

    pub fn push_stmt(&mut self, span: Span, stmt: Stmt) -> NodeId {
        self.push(span, NodeKind::Stmt(stmt))
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn expr(&self, id: NodeId) -> &Expr {
        match &self.get(id).kind {
            NodeKind::Expr(e) => e,
            NodeKind::Stmt(_) => panic!("node {id:?} is a statement, not an expression"),
        }
    }

    pub fn stmt(&self, id: NodeId) -> &Stmt {
        match &self.get(id).kind {
            NodeKind::Stmt(s) => s,
            NodeKind::Expr(_) => panic!("node {id:?} is an expression, not a statement"),
        }
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A single compilation unit's top-level statement list, plus the arena
/// those statements (and everything nested under them) live in.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub arena: NodeArena,
    pub body: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use strata_common::interner::Atom;

    #[test]
    fn pushed_nodes_get_sequential_ids() {
        let mut arena = NodeArena::new();
        let a = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("x")));
        let b = arena.push_expr(Span::dummy(), Expr::Name(Atom::new("y")));
        assert_eq!(a.0, 0);
        assert_eq!(b.0, 1);
        match arena.expr(a) {
            Expr::Name(name) => assert_eq!(name.as_str(), "x"),
            other => panic!("expected Name, got {other:?}"),
        }
    }

    #[test]
    #[should_panic]
    fn expr_on_a_statement_node_panics() {
        let mut arena = NodeArena::new();
        let s = arena.push_stmt(Span::dummy(), crate::stmt::Stmt::Pass);
        arena.expr(s);
    }
}
