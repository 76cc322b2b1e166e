//! Argument-to-parameter binding (spec §4.3 "Call": "matches arguments to
//! parameters honoring positional-only, positional-or-keyword, keyword-only,
//! `*args`, `**kwargs`, default presence, and keyword-dictionary
//! unpacking").
//!
//! Binding is kept separate from constraint-building/solving (`overload.rs`
//! drives both): overload resolution needs to try a binding against many
//! candidate signatures without committing to diagnostics for the ones
//! that don't end up chosen.

use crate::context::CheckerContext;
use strata_ast::{Arg, ArgKind};
use strata_common::diagnostics::{Diagnostic, ErrorKind};
use strata_common::ids::NodeId;
use strata_common::span::Span;
use strata_types::type_data::{Callable, ParamKind};

#[derive(Clone, Copy, Debug)]
pub struct BoundArg {
    pub param_index: usize,
    pub value: NodeId,
}

pub struct CallMatch {
    pub bindings: Vec<BoundArg>,
}

/// Binds `args` against `callable`'s declared parameters. When `emit` is
/// false (overload-candidate probing, spec §4.5 step 2) no diagnostics are
/// recorded even on failure; the caller only inspects the `Result`.
pub fn bind_arguments(ctx: &CheckerContext<'_>, callable: &Callable, args: &[Arg], call_span: Span, emit: bool) -> Result<CallMatch, ()> {
    let mut bindings = Vec::new();
    let mut used = vec![false; callable.params.len()];
    let mut positional_cursor = 0usize;
    let mut ok = true;

    let varargs_index = callable.params.iter().position(|p| p.kind == ParamKind::VarArgs);
    let varkwargs_index = callable.params.iter().position(|p| p.kind == ParamKind::VarKwargs);

    for arg in args {
        match arg.kind {
            ArgKind::Positional | ArgKind::Starred => {
                while positional_cursor < callable.params.len() {
                    let kind = callable.params[positional_cursor].kind;
                    if matches!(kind, ParamKind::PositionalRequired | ParamKind::PositionalOptional | ParamKind::VarArgs) {
                        break;
                    }
                    positional_cursor += 1;
                }
                if positional_cursor >= callable.params.len() {
                    if emit {
                        ctx.emit(Diagnostic::error(
                            ErrorKind::CallArity,
                            call_span,
                            format!("Expected {} arguments, but got more", callable.params.len()),
                        ));
                    }
                    ok = false;
                    continue;
                }
                let idx = positional_cursor;
                bindings.push(BoundArg { param_index: idx, value: arg.value });
                if callable.params[idx].kind != ParamKind::VarArgs {
                    used[idx] = true;
                    positional_cursor += 1;
                }
                // A `*args` parameter absorbs every remaining positional
                // argument, so the cursor stays put (each subsequent
                // positional arg binds to the same catch-all index).
            }
            ArgKind::Keyword(name) => {
                let found = callable.params.iter().position(|p| {
                    p.name == name && matches!(p.kind, ParamKind::PositionalOptional | ParamKind::PositionalRequired | ParamKind::KeywordOnly)
                });
                match found {
                    Some(idx) => {
                        if used[idx] && emit {
                            ctx.emit(Diagnostic::error(ErrorKind::DuplicateKeyword, call_span, format!("Duplicate keyword argument {name}")));
                        }
                        if used[idx] {
                            ok = false;
                        }
                        used[idx] = true;
                        bindings.push(BoundArg { param_index: idx, value: arg.value });
                    }
                    None => {
                        if let Some(kwidx) = varkwargs_index {
                            bindings.push(BoundArg { param_index: kwidx, value: arg.value });
                        } else {
                            if emit {
                                ctx.emit(Diagnostic::error(ErrorKind::UnexpectedKeyword, call_span, format!("No parameter named {name}")));
                            }
                            ok = false;
                        }
                    }
                }
            }
            ArgKind::DoubleStarred => {
                // `**mapping` unpack: the mapping's value type (already
                // checked to be compatible with the callee's keyword domain
                // by the expression checker before calling here, spec
                // §4.3) could supply any still-open keyword parameter, so
                // conservatively mark them all satisfied.
                if let Some(kwidx) = varkwargs_index {
                    bindings.push(BoundArg { param_index: kwidx, value: arg.value });
                }
                for (i, p) in callable.params.iter().enumerate() {
                    if !used[i] && matches!(p.kind, ParamKind::KeywordOnly | ParamKind::PositionalOptional | ParamKind::PositionalRequired) {
                        used[i] = true;
                    }
                }
            }
        }
    }

    for (i, p) in callable.params.iter().enumerate() {
        if !used[i] && p.kind == ParamKind::PositionalRequired && Some(i) != varargs_index {
            if emit {
                ctx.emit(Diagnostic::error(ErrorKind::MissingArgument, call_span, format!("Missing required argument {}", p.name)));
            }
            ok = false;
        }
    }

    if ok {
        Ok(CallMatch { bindings })
    } else {
        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinSymbols;
    use smallvec::smallvec;
    use strata_ast::NodeArena;
    use strata_common::ids::SymbolId;
    use strata_common::interner::Atom;
    use strata_common::options::EngineOptions;
    use strata_semantic::SemanticTable;
    use strata_types::interner::TypeInterner;
    use strata_types::type_data::Param;
    use strata_types::TypeId;

    fn fixture_ctx<'a>(interner: &'a TypeInterner, table: &'a SemanticTable, arena: &'a NodeArena, options: &'a EngineOptions) -> CheckerContext<'a> {
        CheckerContext::new(
            interner,
            table,
            arena,
            options,
            BuiltinSymbols {
                int_class: SymbolId(1),
                bool_class: SymbolId(2),
                str_class: SymbolId(3),
                bytes_class: SymbolId(4),
                object_class: SymbolId(5),
                list_class: None,
                set_class: None,
                dict_class: None,
            },
        )
    }

    #[test]
    fn positional_args_bind_in_order() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = fixture_ctx(&interner, &table, &arena, &options);

        let callable = Callable {
            params: smallvec![
                Param { name: Atom::new("a"), kind: ParamKind::PositionalRequired, ty: TypeId::ANY },
                Param { name: Atom::new("b"), kind: ParamKind::PositionalRequired, ty: TypeId::ANY },
            ],
            return_ty: TypeId::ANY,
            bound_param_spec: None,
            type_guard: None,
        };
        let args = vec![Arg { kind: ArgKind::Positional, value: NodeId(0) }, Arg { kind: ArgKind::Positional, value: NodeId(1) }];
        let result = bind_arguments(&ctx, &callable, &args, Span::dummy(), true).unwrap();
        assert_eq!(result.bindings.len(), 2);
        assert_eq!(result.bindings[0].param_index, 0);
        assert_eq!(result.bindings[1].param_index, 1);
    }

    #[test]
    fn missing_required_argument_fails() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = fixture_ctx(&interner, &table, &arena, &options);

        let callable = Callable {
            params: smallvec![Param { name: Atom::new("a"), kind: ParamKind::PositionalRequired, ty: TypeId::ANY }],
            return_ty: TypeId::ANY,
            bound_param_spec: None,
            type_guard: None,
        };
        assert!(bind_arguments(&ctx, &callable, &[], Span::dummy(), false).is_err());
    }

    #[test]
    fn keyword_argument_binds_by_name() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = fixture_ctx(&interner, &table, &arena, &options);

        let callable = Callable {
            params: smallvec![Param { name: Atom::new("x"), kind: ParamKind::KeywordOnly, ty: TypeId::ANY }],
            return_ty: TypeId::ANY,
            bound_param_spec: None,
            type_guard: None,
        };
        let args = vec![Arg { kind: ArgKind::Keyword(Atom::new("x")), value: NodeId(0) }];
        let result = bind_arguments(&ctx, &callable, &args, Span::dummy(), true).unwrap();
        assert_eq!(result.bindings[0].param_index, 0);
    }

    #[test]
    fn unexpected_keyword_without_var_kwargs_fails() {
        let interner = TypeInterner::new();
        let table = SemanticTable::new();
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = fixture_ctx(&interner, &table, &arena, &options);

        let callable = Callable { params: smallvec![], return_ty: TypeId::ANY, bound_param_spec: None, type_guard: None };
        let args = vec![Arg { kind: ArgKind::Keyword(Atom::new("z")), value: NodeId(0) }];
        assert!(bind_arguments(&ctx, &callable, &args, Span::dummy(), false).is_err());
    }
}
