use cos_core::{Action, WorkflowState};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{action} is not allowed in state {state}")]
    NotAllowed { state: WorkflowState, action: Action },
    #[error("evidence required before validation")]
    MissingEvidence,
    #[error("invariants required before validation")]
    MissingInvariants,
}
