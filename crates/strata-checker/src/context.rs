//! The value every checking function is threaded through: the interner,
//! the read-only semantic table, engine options, and the two mutable
//! outputs the engine produces (spec §5: "the per-unit diagnostics buffer
//! (append-only), and the node-to-type mapping (write-once per node;
//! second writes are a logic error and MUST assert)").

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use strata_ast::NodeArena;
use strata_common::diagnostics::Diagnostic;
use strata_common::ids::NodeId;
use strata_common::options::EngineOptions;
use strata_semantic::SemanticTable;
use strata_types::{SubtypeChecker, TypeId, TypeInterner};

use crate::builtins::BuiltinSymbols;

/// Maximum nesting depth of generic-call solving before the engine gives
/// up and reports `internal-depth-exceeded` (spec §4.2).
pub const MAX_SOLVE_DEPTH: usize = 64;

pub struct CheckerContext<'a> {
    pub interner: &'a TypeInterner,
    pub table: &'a SemanticTable,
    pub arena: &'a NodeArena,
    pub options: &'a EngineOptions,
    pub builtins: BuiltinSymbols,
    diagnostics: RefCell<Vec<Diagnostic>>,
    node_types: RefCell<FxHashMap<NodeId, TypeId>>,
    solve_depth: RefCell<usize>,
}

impl<'a> CheckerContext<'a> {
    pub fn new(
        interner: &'a TypeInterner,
        table: &'a SemanticTable,
        arena: &'a NodeArena,
        options: &'a EngineOptions,
        builtins: BuiltinSymbols,
    ) -> Self {
        CheckerContext {
            interner,
            table,
            arena,
            options,
            builtins,
            diagnostics: RefCell::new(Vec::new()),
            node_types: RefCell::new(FxHashMap::default()),
            solve_depth: RefCell::new(0),
        }
    }

    pub fn subtype_checker(&self) -> SubtypeChecker<'_, SemanticTable> {
        SubtypeChecker::new(self.interner, self.table)
    }

    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        self.subtype_checker().is_subtype_of(sub, sup)
    }

    pub fn join(&self, a: TypeId, b: TypeId) -> TypeId {
        strata_types::ops::join_meet::join(&mut self.subtype_checker(), a, b)
    }

    pub fn meet(&self, a: TypeId, b: TypeId) -> TypeId {
        strata_types::ops::join_meet::meet(&mut self.subtype_checker(), a, b)
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Records the inferred type of `node`. Spec §5: a second write to the
    /// same node is an implementation bug, not a user-facing error.
    pub fn record_type(&self, node: NodeId, ty: TypeId) {
        let mut map = self.node_types.borrow_mut();
        let prior = map.insert(node, ty);
        assert!(prior.is_none(), "node {node:?} was type-checked twice");
    }

    pub fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.node_types.borrow().get(&node).copied()
    }

    /// Diagnostics sorted per spec §7: "sorted by source position then by
    /// kind", making the stream stable across re-runs on unchanged input.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = self.diagnostics.borrow().clone();
        out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        out
    }

    pub fn node_types(&self) -> FxHashMap<NodeId, TypeId> {
        self.node_types.borrow().clone()
    }

    /// Enters one level of nested-generic-call solving, returning the
    /// depth to pass to `strata_solver::solve`. Callers must call
    /// `exit_solve` on every path out, including early returns — `scoped`
    /// is the safe way to do that.
    pub fn scoped_solve_depth<R>(&self, f: impl FnOnce(usize) -> R) -> R {
        let depth = {
            let mut d = self.solve_depth.borrow_mut();
            *d += 1;
            *d
        };
        let result = f(depth);
        *self.solve_depth.borrow_mut() -= 1;
        result
    }
}
