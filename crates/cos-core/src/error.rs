use thiserror::Error;

use crate::validate::Violation;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown workflow state: {0}")]
    UnknownState(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// A spec that failed validation. Must block rendering; never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("ui spec violates its contract ({} violation(s)): {}", .violations.len(), summarize(.violations))]
pub struct ContractViolation {
    pub violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("decision is not Allow")]
    NotAllow,
    #[error("decision is not Halt")]
    NotHalt,
    #[error("rif must be 0 (got {0})")]
    RifNonZero(u32),
    #[error("converged must be true")]
    NotConverged,
    #[error("structurality must be >= {min} (got {got})")]
    StructuralityTooLow { got: u8, min: u8 },
}
