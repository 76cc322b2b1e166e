//! Renders a `TypeId` as the short text diagnostics embed (spec §7: every
//! diagnostic message names the offending type). Not a pretty-printer for
//! tooling — just enough structure to make error text legible, the same
//! scope the teacher's own `type_to_string`-style helpers stick to.

use crate::context::CheckerContext;
use strata_common::interner::Atom;
use strata_types::type_data::{LiteralValue, ParamKind, TupleShape, Type};
use strata_types::TypeId;

pub fn describe(ctx: &CheckerContext<'_>, ty: TypeId) -> String {
    describe_inner(ctx, ty, 0)
}

fn class_name(ctx: &CheckerContext<'_>, class: strata_common::ids::SymbolId) -> String {
    ctx.table
        .symbols
        .get(class)
        .name
        .as_str()
        .to_string()
}

fn describe_inner(ctx: &CheckerContext<'_>, ty: TypeId, depth: u32) -> String {
    if depth > 8 {
        return "...".to_string();
    }
    match &*ctx.interner.get(ty) {
        Type::Any => "Any".to_string(),
        Type::Never => "Never".to_string(),
        Type::None => "None".to_string(),
        Type::Instance { class, args } => {
            let name = class_name(ctx, *class);
            if args.is_empty() {
                name
            } else {
                let parts: Vec<String> = args.iter().map(|&a| describe_inner(ctx, a, depth + 1)).collect();
                format!("{name}[{}]", parts.join(", "))
            }
        }
        Type::ClassObject { instance } => format!("type[{}]", describe_inner(ctx, *instance, depth + 1)),
        Type::Tuple(TupleShape::Fixed { elements, .. }) => {
            let parts: Vec<String> = elements.iter().map(|&e| describe_inner(ctx, e, depth + 1)).collect();
            format!("tuple[{}]", parts.join(", "))
        }
        Type::Tuple(TupleShape::Homogeneous(elem)) => format!("tuple[{}, ...]", describe_inner(ctx, *elem, depth + 1)),
        Type::TypedMapping(m) => {
            let name = class_name(ctx, m.declaration);
            format!("TypedDict({name})")
        }
        Type::NamedTuple(n) => class_name(ctx, n.declaration),
        Type::Union(members) => {
            let parts: Vec<String> = members.iter().map(|&m| describe_inner(ctx, m, depth + 1)).collect();
            parts.join(" | ")
        }
        Type::Callable(c) => {
            let params: Vec<String> = c
                .params
                .iter()
                .map(|p| match p.kind {
                    ParamKind::VarArgs => format!("*{}", describe_inner(ctx, p.ty, depth + 1)),
                    ParamKind::VarKwargs => format!("**{}", describe_inner(ctx, p.ty, depth + 1)),
                    _ => describe_inner(ctx, p.ty, depth + 1),
                })
                .collect();
            format!("({}) -> {}", params.join(", "), describe_inner(ctx, c.return_ty, depth + 1))
        }
        Type::Overloaded(sigs) => {
            let parts: Vec<String> = sigs.iter().map(|&s| describe_inner(ctx, s, depth + 1)).collect();
            format!("overload[{}]", parts.join(", "))
        }
        Type::TypeVar(v) => format!("T@{}", v.id.0),
        Type::Literal { value, .. } => describe_literal(value),
        Type::Unresolved(_) => "<unresolved>".to_string(),
    }
}

fn describe_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Int(i) => format!("Literal[{i}]"),
        LiteralValue::Bool(b) => format!("Literal[{b}]"),
        LiteralValue::Str(s) => format!("Literal[{s:?}]", s = s.as_str()),
        LiteralValue::Bytes(b) => format!("Literal[b\"{}\"]", String::from_utf8_lossy(b)),
        LiteralValue::EnumMember(_, member) => format!("Literal[{}]", atom_str(*member)),
    }
}

fn atom_str(a: Atom) -> &'static str {
    a.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinSymbols;
    use strata_ast::NodeArena;
    use strata_common::ids::SymbolId;
    use strata_common::options::EngineOptions;
    use strata_semantic::symbol::{Symbol, SymbolKind};
    use strata_semantic::SemanticTable;
    use strata_common::span::Span;
    use strata_types::interner::TypeInterner;

    fn fixture_builtins() -> BuiltinSymbols {
        BuiltinSymbols {
            int_class: SymbolId(0),
            bool_class: SymbolId(1),
            str_class: SymbolId(2),
            bytes_class: SymbolId(3),
            object_class: SymbolId(4),
            list_class: None,
            set_class: None,
            dict_class: None,
        }
    }

    #[test]
    fn renders_a_nominal_instance_by_symbol_name() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let sym = table.symbols.push(Symbol::new(Atom::new("int"), SymbolKind::Class, strata_common::ids::ScopeId(0), Span::dummy()));
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let ty = interner.instance(sym, vec![]);
        assert_eq!(describe(&ctx, ty), "int");
    }

    #[test]
    fn renders_a_union_with_pipes() {
        let interner = TypeInterner::new();
        let mut table = SemanticTable::new();
        let int_sym = table.symbols.push(Symbol::new(Atom::new("int"), SymbolKind::Class, strata_common::ids::ScopeId(0), Span::dummy()));
        let arena = NodeArena::new();
        let options = EngineOptions::default();
        let ctx = CheckerContext::new(&interner, &table, &arena, &options, fixture_builtins());
        let int_ty = interner.instance(int_sym, vec![]);
        let u = strata_types::ops::union::make_union(&interner, [int_ty, TypeId::NONE]);
        assert_eq!(describe(&ctx, u), "int | None");
    }
}
