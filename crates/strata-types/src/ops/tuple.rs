//! Tuple subtyping: fixed/homogeneous shapes and unpack-segment matching
//! (spec §3 "Tuple", §4.1 "Tuples: unify element counts; variadic unpack
//! segments match homogeneous or prefix/suffix bindings").

use crate::hierarchy::ClassHierarchy;
use crate::ops::subtype::SubtypeChecker;
use crate::type_data::{NamedTuple, TupleShape};

pub fn tuple_subtype<H: ClassHierarchy>(
    checker: &mut SubtypeChecker<'_, H>,
    sub: &TupleShape,
    sup: &TupleShape,
) -> bool {
    match (sub, sup) {
        (TupleShape::Homogeneous(a), TupleShape::Homogeneous(b)) => checker.is_subtype_of(*a, *b),
        (TupleShape::Fixed { elements, unpack: None }, TupleShape::Homogeneous(elem)) => {
            elements.iter().all(|&e| checker.is_subtype_of(e, *elem))
        }
        (TupleShape::Homogeneous(_), TupleShape::Fixed { .. }) => {
            // An unbounded homogeneous tuple can never satisfy a fixed
            // arity: its length isn't known at check time.
            false
        }
        (
            TupleShape::Fixed { elements: sub_elems, unpack: sub_unpack },
            TupleShape::Fixed { elements: sup_elems, unpack: sup_unpack },
        ) => fixed_subtype(checker, sub_elems, *sub_unpack, sup_elems, *sup_unpack),
    }
}

fn fixed_subtype<H: ClassHierarchy>(
    checker: &mut SubtypeChecker<'_, H>,
    sub_elems: &[crate::type_data::TypeId],
    sub_unpack: Option<crate::type_data::UnpackSegment>,
    sup_elems: &[crate::type_data::TypeId],
    sup_unpack: Option<crate::type_data::UnpackSegment>,
) -> bool {
    // No unpack segment on either side: plain element-count + pointwise
    // subtype check.
    if sub_unpack.is_none() && sup_unpack.is_none() {
        if sub_elems.len() != sup_elems.len() {
            return false;
        }
        return sub_elems
            .iter()
            .zip(sup_elems)
            .all(|(&a, &b)| checker.is_subtype_of(a, b));
    }
    // With an unpack segment present, match fixed prefix/suffix around it
    // and require the middle to line up structurally (ambiguity here is
    // rejected by the solver before this point ever sees two differently
    // shaped unpack segments — §4.2's variadic sub-solver).
    let (sub_prefix, sub_suffix) = split_around_unpack(sub_elems, sub_unpack);
    let (sup_prefix, sup_suffix) = split_around_unpack(sup_elems, sup_unpack);
    if sub_prefix.len() < sup_prefix.len() || sub_suffix.len() < sup_suffix.len() {
        return false;
    }
    let prefix_ok = sup_prefix
        .iter()
        .zip(sub_prefix)
        .all(|(&b, &a)| checker.is_subtype_of(a, b));
    let suffix_ok = sup_suffix
        .iter()
        .rev()
        .zip(sub_suffix.iter().rev())
        .all(|(&b, &a)| checker.is_subtype_of(a, b));
    prefix_ok && suffix_ok
}

fn split_around_unpack(
    elements: &[crate::type_data::TypeId],
    unpack: Option<crate::type_data::UnpackSegment>,
) -> (&[crate::type_data::TypeId], &[crate::type_data::TypeId]) {
    match unpack {
        Some(seg) => (&elements[..seg.position], &elements[seg.position..]),
        None => (elements, &[]),
    }
}

pub fn named_tuple_subtype_tuple<H: ClassHierarchy>(
    checker: &mut SubtypeChecker<'_, H>,
    named: &NamedTuple,
    sup: &TupleShape,
) -> bool {
    let as_fixed = TupleShape::Fixed { elements: named.field_types.clone(), unpack: None };
    tuple_subtype(checker, &as_fixed, sup)
}
