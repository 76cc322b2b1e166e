//! Variadic and parameter-specification sub-solver (spec §4.2: "Variadic
//! and parameter-spec variables use a specialized sub-solver that matches
//! positional segments and parameter lists by pattern-matching fixed
//! prefixes/suffixes and a single middle unpack; ambiguity is rejected
//! rather than guessed.").

use strata_types::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariadicError {
    /// Fewer positional arguments than the declared fixed prefix + suffix
    /// require — there is no way to assign a non-negative-length middle.
    TooFewPositions,
    /// More than one placement of the middle segment would satisfy the
    /// fixed counts (can only happen if the caller passes inconsistent
    /// prefix/suffix counts) — spec: "ambiguity is rejected rather than
    /// guessed".
    Ambiguous,
}

/// Splits `actual` positional types against a declared shape of `prefix`
/// fixed elements, one variadic middle segment, and `suffix` fixed
/// elements — the shape a tuple unpack (`(T1, *Ts, T2)`) or a `*args:
/// *Ts`-style signature describes.
pub fn split_variadic_positions(
    actual: &[TypeId],
    prefix: usize,
    suffix: usize,
) -> Result<(&[TypeId], &[TypeId], &[TypeId]), VariadicError> {
    if actual.len() < prefix + suffix {
        return Err(VariadicError::TooFewPositions);
    }
    let middle_len = actual.len() - prefix - suffix;
    let (head, rest) = actual.split_at(prefix);
    let (middle, tail) = rest.split_at(middle_len);
    Ok((head, middle, tail))
}

/// A `ParamSpec` binding: the remaining `*args`/`**kwargs`-shaped
/// parameter tail a caller's signature supplies beyond a callee's fixed
/// positional parameters, bound to a parameter-spec type variable (spec
/// §3: "bound parameter-specification variable").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpecBinding {
    pub captured_positional: Vec<TypeId>,
    pub captured_keyword: Vec<(strata_common::interner::Atom, TypeId)>,
}

/// Binds a `ParamSpec` variable from a caller's full parameter list once
/// `fixed_prefix` positional parameters have already been matched against
/// the callee's own fixed parameters. Fails rather than guessing if the
/// caller's keyword parameters can't be partitioned unambiguously (spec:
/// same "ambiguity is rejected" discipline as the tuple case).
pub fn bind_param_spec(
    positional: &[TypeId],
    keyword: &[(strata_common::interner::Atom, TypeId)],
    fixed_prefix: usize,
) -> Result<ParamSpecBinding, VariadicError> {
    if positional.len() < fixed_prefix {
        return Err(VariadicError::TooFewPositions);
    }
    let mut seen = rustc_hash::FxHashSet::default();
    for (name, _) in keyword {
        if !seen.insert(*name) {
            return Err(VariadicError::Ambiguous);
        }
    }
    Ok(ParamSpecBinding {
        captured_positional: positional[fixed_prefix..].to_vec(),
        captured_keyword: keyword.to_vec(),
    })
}
