//! Error type shared by every numeric operation.

use thiserror::Error;

/// Error type for numeric operations
///
/// Exactly three kinds: zero divisors, domain violations, and malformed
/// call shapes. Anything a caller could fix by supplying a different value
/// of the right type is `Math`; anything structurally wrong with the call
/// (bad literal, bad option name, amount of the wrong kind) is `Argument`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("math error: {0}")]
    Math(String),

    #[error("argument error: {0}")]
    Argument(String),
}

impl NumError {
    /// Domain violation with context
    pub fn math(msg: impl Into<String>) -> Self {
        NumError::Math(msg.into())
    }

    /// Malformed call with context
    pub fn argument(msg: impl Into<String>) -> Self {
        NumError::Argument(msg.into())
    }
}

/// Result alias used throughout the crate
pub type NumResult<T> = Result<T, NumError>;
