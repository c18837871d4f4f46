use crate::contract::Contract;
use crate::model::{Action, WorkflowState};
use crate::proof::{Decision, ProofArtifact};
use crate::ui::{Step, UiNode, UiSpec, UI_SPEC_VERSION};

/// Build the UI description for a contract.
///
/// Every action placed in the tree is taken from `contract.allowed`; the
/// per-state lists below only select which of the granted actions go in which
/// row. The proof picks informational panels and nothing else.
///
/// `intent` is accepted for a future layout chooser and does not affect the
/// output.
pub fn generate_ui_spec(contract: &Contract, proof: &ProofArtifact, intent: Option<&str>) -> UiSpec {
    let _ = intent;

    let mut nodes = vec![UiNode::StateBadge];
    match contract.state {
        WorkflowState::Draft => {
            let intake = action_row(contract, &[Action::AttachEvidence, Action::AttachInvariants]);
            nodes.push(UiNode::card("Evidence intake", intake.into_iter().collect()));
            nodes.extend(action_row(contract, &[Action::Validate]));
        }
        WorkflowState::Validated => {
            nodes.push(UiNode::stepper(vec![
                Step::new("Evidence attached", vec![]),
                Step::new("Invariants attached", vec![]),
                Step::new("Plan", action_row(contract, &[Action::Plan]).into_iter().collect()),
            ]));
        }
        WorkflowState::Planned => {
            nodes.push(proof_panel(proof));
            let hypersim = action_row(contract, &[Action::RunHypersim, Action::Halt]);
            nodes.push(UiNode::card("Hypersim", hypersim.into_iter().collect()));
        }
        WorkflowState::Converged => {
            nodes.push(UiNode::ProofPanel);
            nodes.extend(action_row(contract, &[Action::Execute]));
        }
        WorkflowState::Halted => {
            nodes.push(UiNode::HaltPanel);
        }
        WorkflowState::Executed => {
            nodes.push(UiNode::ProofPanel);
        }
    }

    UiSpec {
        version: UI_SPEC_VERSION.to_string(),
        state: contract.state,
        nodes,
        allowed_actions: contract.allowed.clone(),
    }
}

/// Row of the granted actions that also appear in `wanted`, in contract
/// order. `None` when nothing is granted.
fn action_row(contract: &Contract, wanted: &[Action]) -> Option<UiNode> {
    let actions: Vec<Action> = contract.allowed.iter().copied().filter(|a| wanted.contains(a)).collect();
    if actions.is_empty() {
        return None;
    }
    Some(UiNode::ActionRow { actions })
}

fn proof_panel(proof: &ProofArtifact) -> UiNode {
    match proof.decision {
        Decision::Allow => UiNode::ProofPanel,
        Decision::Halt => UiNode::HaltPanel,
    }
}
