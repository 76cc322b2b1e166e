//! Typed-mapping (`TypedDict`-shape) subtyping: width/depth rules (spec §4.1
//! "a subtype may add keys only if the supertype permits extra items;
//! required/optional/read-only flags must satisfy width and depth rules").
//!
//! The rules here follow the standard structural-record discipline: a
//! read-only field is covariant (depth), a mutable field is invariant (an
//! assignment through the supertype's view must stay safe from either
//! side), and width only grows toward an "open" supertype.

use crate::hierarchy::ClassHierarchy;
use crate::ops::subtype::SubtypeChecker;
use crate::type_data::{ExtraItemsPolicy, TypedMapping};

pub fn typed_mapping_subtype<H: ClassHierarchy>(
    checker: &mut SubtypeChecker<'_, H>,
    sub: &TypedMapping,
    sup: &TypedMapping,
) -> bool {
    for sup_field in &sup.fields {
        let Some(sub_field) = sub.fields.iter().find(|f| f.name == sup_field.name) else {
            return false; // missing required (or any) key the supertype names
        };
        if sup_field.flags.required && !sub_field.flags.required {
            return false;
        }
        let depth_ok = if sup_field.flags.read_only {
            checker.is_subtype_of(sub_field.ty, sup_field.ty)
        } else {
            checker.is_subtype_of(sub_field.ty, sup_field.ty)
                && checker.is_subtype_of(sup_field.ty, sub_field.ty)
        };
        if !depth_ok {
            return false;
        }
    }
    if matches!(sup.extra_items, ExtraItemsPolicy::Forbidden) {
        let has_extra = sub
            .fields
            .iter()
            .any(|f| !sup.fields.iter().any(|sf| sf.name == f.name));
        if has_extra {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::EmptyHierarchy;
    use crate::interner::TypeInterner;
    use crate::type_data::{FieldFlags, TypedMappingField};
    use strata_common::ids::SymbolId;
    use strata_common::interner::Atom;

    fn field(name: &str, ty: crate::type_data::TypeId, flags: FieldFlags) -> TypedMappingField {
        TypedMappingField { name: Atom::new(name), ty, flags }
    }

    #[test]
    fn subtype_may_add_keys_when_supertype_is_open() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        let sup = TypedMapping {
            declaration: SymbolId(1),
            fields: vec![field("x", crate::type_data::TypeId::ANY, FieldFlags::required_mutable())],
            extra_items: ExtraItemsPolicy::OpenTyped(crate::type_data::TypeId::ANY),
        };
        let sub = TypedMapping {
            declaration: SymbolId(2),
            fields: vec![
                field("x", crate::type_data::TypeId::ANY, FieldFlags::required_mutable()),
                field("y", crate::type_data::TypeId::ANY, FieldFlags::required_mutable()),
            ],
            extra_items: ExtraItemsPolicy::Forbidden,
        };
        assert!(typed_mapping_subtype(&mut checker, &sub, &sup));
    }

    #[test]
    fn forbidden_extra_items_rejects_additional_keys() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        let sup = TypedMapping {
            declaration: SymbolId(1),
            fields: vec![field("x", crate::type_data::TypeId::ANY, FieldFlags::required_mutable())],
            extra_items: ExtraItemsPolicy::Forbidden,
        };
        let sub = TypedMapping {
            declaration: SymbolId(2),
            fields: vec![
                field("x", crate::type_data::TypeId::ANY, FieldFlags::required_mutable()),
                field("y", crate::type_data::TypeId::ANY, FieldFlags::required_mutable()),
            ],
            extra_items: ExtraItemsPolicy::Forbidden,
        };
        assert!(!typed_mapping_subtype(&mut checker, &sub, &sup));
    }

    #[test]
    fn missing_required_key_fails() {
        let interner = TypeInterner::new();
        let mut checker = SubtypeChecker::new(&interner, &EmptyHierarchy);
        let sup = TypedMapping {
            declaration: SymbolId(1),
            fields: vec![field("x", crate::type_data::TypeId::ANY, FieldFlags::required_mutable())],
            extra_items: ExtraItemsPolicy::Forbidden,
        };
        let sub = TypedMapping { declaration: SymbolId(2), fields: vec![], extra_items: ExtraItemsPolicy::Forbidden };
        assert!(!typed_mapping_subtype(&mut checker, &sub, &sup));
    }
}
