use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Lifecycle state of a workflow. Owned by the orchestrator; this crate only
/// reads it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Draft,
    Validated,
    Planned,
    Converged,
    Halted,
    Executed,
}

impl WorkflowState {
    pub const ALL: [WorkflowState; 6] = [
        WorkflowState::Draft,
        WorkflowState::Validated,
        WorkflowState::Planned,
        WorkflowState::Converged,
        WorkflowState::Halted,
        WorkflowState::Executed,
    ];

    pub fn is_terminal(self) -> bool {
        match self {
            WorkflowState::Halted | WorkflowState::Executed => true,
            WorkflowState::Draft
            | WorkflowState::Validated
            | WorkflowState::Planned
            | WorkflowState::Converged => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowState::Draft => "Draft",
            WorkflowState::Validated => "Validated",
            WorkflowState::Planned => "Planned",
            WorkflowState::Converged => "Converged",
            WorkflowState::Halted => "Halted",
            WorkflowState::Executed => "Executed",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the variant name in any ASCII case. Anything else is rejected,
/// never mapped to a default state.
impl FromStr for WorkflowState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s.trim();
        WorkflowState::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(n))
            .ok_or_else(|| ParseError::UnknownState(n.to_string()))
    }
}

/// Opaque action token. What an action does lives with the orchestrator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    AttachEvidence,
    AttachInvariants,
    Validate,
    Plan,
    RunHypersim,
    Halt,
    Execute,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::AttachEvidence,
        Action::AttachInvariants,
        Action::Validate,
        Action::Plan,
        Action::RunHypersim,
        Action::Halt,
        Action::Execute,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::AttachEvidence => "AttachEvidence",
            Action::AttachInvariants => "AttachInvariants",
            Action::Validate => "Validate",
            Action::Plan => "Plan",
            Action::RunHypersim => "RunHypersim",
            Action::Halt => "Halt",
            Action::Execute => "Execute",
        }
    }

    /// Human label for buttons.
    pub fn label(self) -> &'static str {
        match self {
            Action::AttachEvidence => "Attach evidence",
            Action::AttachInvariants => "Attach invariants",
            Action::Validate => "Validate",
            Action::Plan => "Plan",
            Action::RunHypersim => "Run hypersim",
            Action::Halt => "Halt",
            Action::Execute => "Execute",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(n))
            .ok_or_else(|| ParseError::UnknownAction(n.to_string()))
    }
}
