//! Stable numeric codes and message templates for each [`super::ErrorKind`].
//!
//! Codes are assigned once and never reused, the same discipline compilers
//! use for their diagnostic catalogs: a code in a saved log should always
//! mean the same thing, even after the message text around it changes.

use super::ErrorKind;

pub const fn code_for(kind: ErrorKind) -> u32 {
    match kind {
        ErrorKind::IncompatibleAssignment => 1001,
        ErrorKind::IncompatibleReturn => 1002,
        ErrorKind::IncompatibleArgument => 1003,
        ErrorKind::CallArity => 1010,
        ErrorKind::UnexpectedKeyword => 1011,
        ErrorKind::DuplicateKeyword => 1012,
        ErrorKind::MissingArgument => 1013,
        ErrorKind::NoOverloadMatch => 1020,
        ErrorKind::UnreachableOverload => 1021,
        ErrorKind::AmbiguousOverload => 1022,
        ErrorKind::AttributeMissing => 1030,
        ErrorKind::AttributeReadOnly => 1031,
        ErrorKind::AttributeNotInSlots => 1032,
        ErrorKind::NameUndefined => 1040,
        ErrorKind::NameRedefined => 1041,
        ErrorKind::PossiblyUndefined => 1042,
        ErrorKind::TypeVariableUnsolved => 1050,
        ErrorKind::TypeVariableDefaultOutOfScope => 1051,
        ErrorKind::VarianceViolation => 1060,
        ErrorKind::AbstractInstantiation => 1061,
        ErrorKind::FinalReassignment => 1062,
        ErrorKind::TypedMappingExtraKey => 1070,
        ErrorKind::TypedMappingMissingRequired => 1071,
        ErrorKind::TypedMappingReadOnlyWrite => 1072,
        ErrorKind::NarrowingTypeGuardInvalid => 1080,
        ErrorKind::RecursiveAliasCycle => 1081,
        ErrorKind::InternalDepthExceeded => 1090,
        ErrorKind::RevealedType => 1100,
        ErrorKind::InternalConsistency => 9999,
    }
}

pub const fn message_template(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::IncompatibleAssignment => "Cannot assign {0} to a target of declared type {1}",
        ErrorKind::IncompatibleReturn => "Returned type {0} is not compatible with declared return type {1}",
        ErrorKind::IncompatibleArgument => "Argument of type {0} is not compatible with parameter of type {1}",
        ErrorKind::CallArity => "Expected {0} arguments, but got {1}",
        ErrorKind::UnexpectedKeyword => "No parameter named {0}",
        ErrorKind::DuplicateKeyword => "Duplicate keyword argument {0}",
        ErrorKind::MissingArgument => "Missing required argument {0}",
        ErrorKind::NoOverloadMatch => "No overload matches this call",
        ErrorKind::UnreachableOverload => "This overload will never be matched because an earlier, more general overload always matches first",
        ErrorKind::AmbiguousOverload => "Call is ambiguous between overloads {0} under an Any-typed argument",
        ErrorKind::AttributeMissing => "{0} has no attribute {1}",
        ErrorKind::AttributeReadOnly => "Attribute {0} is read-only",
        ErrorKind::AttributeNotInSlots => "Attribute {0} is not declared in __slots__",
        ErrorKind::NameUndefined => "Name {0} is not defined",
        ErrorKind::NameRedefined => "Name {0} is redefined with an incompatible type",
        ErrorKind::PossiblyUndefined => "Name {0} is possibly undefined at this point",
        ErrorKind::TypeVariableUnsolved => "Type variable {0} could not be solved",
        ErrorKind::TypeVariableDefaultOutOfScope => "Default for type variable {0} references a later type parameter",
        ErrorKind::VarianceViolation => "Declared variance of {0} does not match its inferred use",
        ErrorKind::AbstractInstantiation => "Cannot instantiate abstract class {0}",
        ErrorKind::FinalReassignment => "{0} is declared final and cannot be reassigned",
        ErrorKind::TypedMappingExtraKey => "Key {0} is not defined in typed mapping {1}",
        ErrorKind::TypedMappingMissingRequired => "Missing required key {0} in typed mapping {1}",
        ErrorKind::TypedMappingReadOnlyWrite => "Key {0} is read-only",
        ErrorKind::NarrowingTypeGuardInvalid => "Type guard narrows to {0}, which is not a subtype of the parameter's declared type {1}",
        ErrorKind::RecursiveAliasCycle => "Type alias {0} is circular",
        ErrorKind::InternalDepthExceeded => "Exceeded maximum recursion depth while {0}",
        ErrorKind::RevealedType => "Revealed type is {0}",
        ErrorKind::InternalConsistency => "internal error: reached an impossible state ({0})",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_code() {
        let kinds = [
            ErrorKind::IncompatibleAssignment,
            ErrorKind::IncompatibleReturn,
            ErrorKind::IncompatibleArgument,
            ErrorKind::CallArity,
            ErrorKind::NoOverloadMatch,
            ErrorKind::InternalConsistency,
        ];
        let mut codes: Vec<u32> = kinds.iter().map(|k| code_for(*k)).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }
}
