//! Error kinds the expression core distinguishes.
//!
//! Mirrors the four failure modes the original evaluator recognized, but
//! surfaced as an explicit `Result` rather than a null-returning C++ API.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The tree could not be parsed: bracket mismatch, undefined name, wrong
    /// arity, illegal operand types, malformed assignment LHS.
    #[error("syntax error")]
    Syntax,
    /// Evaluation succeeded structurally but hit a domain violation (div by
    /// zero, sqrt of a negative fraction, singular matrix inverse, NaN).
    #[error("math error")]
    Math,
    /// Dynamic-array growth failed; the calling edit is aborted and the
    /// previous tree remains valid.
    #[error("out of memory")]
    OutOfMemory,
    /// Recursion depth guard tripped. Surfaced to callers as `Syntax` per
    /// the propagation policy, kept distinct here so callers can log it.
    #[error("stack exhausted")]
    StackExhausted,
}

impl EvalError {
    /// The error kind a caller outside the evaluator should see.
    pub fn surfaced(self) -> EvalError {
        match self {
            EvalError::StackExhausted => EvalError::Syntax,
            other => other,
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;
