use thiserror::Error;

/// Errors surfaced to callers by parsing and checked arithmetic.
///
/// Internal invariant violations (escaped borrows, non-exact interpolation
/// divisions, oversized quotient digits) are defects in the engine itself and
/// panic instead of returning a variant of this enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BigIntError {
    /// The input string is not a valid decimal integer.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,
}
