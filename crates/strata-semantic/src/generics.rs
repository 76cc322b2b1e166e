//! Declared generic parameter lists (spec §3 "Type-variable ecosystem", §6
//! "Generic parameter lists with bounds, value constraints, variance hints,
//! defaults, variadic and parameter-spec kinds").
//!
//! A `GenericParams` value is attached to whatever declares it — a class, a
//! function, or a type-alias symbol — and is keyed independently of the
//! name-scope tree (spec §3: "Type-variable scopes are independent of name
//! scopes and are keyed by generic-declaration site").

use strata_types::{TypeId, TypeVarId, TypeVarKind, Variance};

/// One declared type parameter.
#[derive(Clone, Debug)]
pub struct TypeVarDecl {
    pub id: TypeVarId,
    pub bound: TypeId,
    /// Empty if unconstrained (spec §3).
    pub constraints: Vec<TypeId>,
    pub variance: Variance,
    pub default: Option<TypeId>,
    pub kind: TypeVarKind,
}

impl TypeVarDecl {
    pub fn plain(id: TypeVarId, bound: TypeId) -> Self {
        TypeVarDecl {
            id,
            bound,
            constraints: Vec::new(),
            variance: Variance::Inferred,
            default: None,
            kind: TypeVarKind::Plain,
        }
    }
}

/// The ordered parameter list of a single generic declaration site. Order
/// matters: defaults may only reference earlier entries (spec §3).
#[derive(Clone, Debug, Default)]
pub struct GenericParams {
    params: Vec<TypeVarDecl>,
}

/// Why a `GenericParams` list failed validation (spec §6
/// `type-variable-default-out-of-scope`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultOutOfScope {
    pub offending: TypeVarId,
    pub referenced: TypeVarId,
}

impl GenericParams {
    pub fn new(params: Vec<TypeVarDecl>) -> Self {
        GenericParams { params }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeVarDecl> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, id: TypeVarId) -> Option<&TypeVarDecl> {
        self.params.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<TypeVarId> {
        self.params.iter().map(|p| p.id).collect()
    }

    /// Checks the §3 invariant: "default types may reference earlier
    /// declared variables in the same parameter list but not later ones".
    /// `free_vars_of` extracts the free type-variable ids a `TypeId`
    /// mentions — injected so this crate need not depend on the solver's
    /// occurs-check walker.
    pub fn validate_default_order(
        &self,
        free_vars_of: impl Fn(TypeId) -> Vec<TypeVarId>,
    ) -> Result<(), DefaultOutOfScope> {
        let mut seen = Vec::with_capacity(self.params.len());
        for decl in &self.params {
            if let Some(default) = decl.default {
                for referenced in free_vars_of(default) {
                    if referenced == decl.id {
                        continue;
                    }
                    if !seen.contains(&referenced) {
                        return Err(DefaultOutOfScope { offending: decl.id, referenced });
                    }
                }
            }
            seen.push(decl.id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_types::TypeId;

    #[test]
    fn default_referencing_earlier_param_is_valid() {
        let t = TypeVarDecl::plain(TypeVarId(0), TypeId::ANY);
        let mut u = TypeVarDecl::plain(TypeVarId(1), TypeId::ANY);
        u.default = Some(TypeId::NONE); // stands in for "references T"
        let params = GenericParams::new(vec![t, u]);
        // free_vars_of reports TypeId::NONE as referencing TypeVarId(0),
        // which was declared before TypeVarId(1): valid.
        let result = params.validate_default_order(|ty| if ty == TypeId::NONE { vec![TypeVarId(0)] } else { vec![] });
        assert!(result.is_ok());
    }

    #[test]
    fn default_referencing_a_later_param_is_rejected() {
        let mut t = TypeVarDecl::plain(TypeVarId(0), TypeId::ANY);
        t.default = Some(TypeId::NONE); // stands in for "references U"
        let u = TypeVarDecl::plain(TypeVarId(1), TypeId::ANY);
        let params = GenericParams::new(vec![t, u]);
        let result = params.validate_default_order(|ty| if ty == TypeId::NONE { vec![TypeVarId(1)] } else { vec![] });
        assert_eq!(
            result,
            Err(DefaultOutOfScope { offending: TypeVarId(0), referenced: TypeVarId(1) })
        );
    }
}
