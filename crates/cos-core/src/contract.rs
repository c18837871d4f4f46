use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::model::{Action, WorkflowState};

/// What the presentation layer is allowed to offer in one state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub state: WorkflowState,
    pub allowed: Vec<Action>,
}

impl Contract {
    pub fn permits(&self, action: Action) -> bool {
        self.allowed.contains(&action)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// The single table of authorized actions per state. Total over
/// `WorkflowState`; callers must not add to the result.
pub fn generate_contract(state: WorkflowState) -> Contract {
    let allowed = match state {
        WorkflowState::Draft => vec![Action::AttachEvidence, Action::AttachInvariants, Action::Validate],
        WorkflowState::Validated => vec![Action::Plan],
        WorkflowState::Planned => vec![Action::RunHypersim, Action::Halt],
        WorkflowState::Converged => vec![Action::Execute],
        WorkflowState::Halted => vec![],
        WorkflowState::Executed => vec![],
    };

    Contract { state, allowed }
}

/// Contract for a state name arriving over an untyped boundary.
/// Unknown names are an error, not an empty contract: an empty contract
/// would read as a terminal state.
pub fn contract_for_tag(tag: &str) -> Result<Contract, ParseError> {
    let state = tag.parse::<WorkflowState>()?;
    Ok(generate_contract(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_allows_evidence_attachment() {
        let contract = generate_contract(WorkflowState::Draft);
        assert!(contract.permits(Action::AttachEvidence));
        assert!(contract.permits(Action::AttachInvariants));
        assert!(contract.permits(Action::Validate));
    }

    #[test]
    fn executed_allows_nothing() {
        let contract = generate_contract(WorkflowState::Executed);
        assert!(contract.allowed.is_empty());
        assert!(contract.is_terminal());
    }

    #[test]
    fn planned_keeps_table_order() {
        let contract = generate_contract(WorkflowState::Planned);
        assert_eq!(contract.allowed, vec![Action::RunHypersim, Action::Halt]);
    }

    #[test]
    fn tag_lookup_matches_typed_lookup() {
        assert_eq!(contract_for_tag("validated").unwrap(), generate_contract(WorkflowState::Validated));
    }

    #[test]
    fn unknown_tag_fails_loudly() {
        let err = contract_for_tag("Archived").unwrap_err();
        assert_eq!(err, ParseError::UnknownState("Archived".into()));
    }
}
