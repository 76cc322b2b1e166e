//! The constraint solver (spec §4.2): infers type-variable bindings from an
//! ordered list of upper/lower constraints, plus a specialized sub-solver
//! for variadic and parameter-spec variables.

pub mod constraint;
pub mod info;
pub mod solve;
pub mod variadic;

pub use constraint::{Constraint, ConstraintKind, ConstraintSet};
pub use info::{PlainVars, TypeVarInfo};
pub use solve::{solve, Solution, SolveError};
pub use variadic::{bind_param_spec, split_variadic_positions, ParamSpecBinding, VariadicError};
