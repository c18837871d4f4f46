use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::error::ContractViolation;
use crate::model::{Action, WorkflowState};
use crate::ui::{UiNode, UiSpec};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Violation {
    /// An action row references an action the allowed set does not contain.
    /// `path` points at the first occurrence.
    UnauthorizedAction { action: Action, path: String },
    /// The spec's own allowed snapshot grants more than the contract.
    WidenedAllowance { action: Action },
    StateMismatch { spec: WorkflowState, contract: WorkflowState },
}

impl Violation {
    pub fn action(&self) -> Option<Action> {
        match self {
            Violation::UnauthorizedAction { action, .. } | Violation::WidenedAllowance { action } => Some(*action),
            Violation::StateMismatch { .. } => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnauthorizedAction { action, path } => write!(f, "{action} is not allowed (at {path})"),
            Violation::WidenedAllowance { action } => write!(f, "allowed_actions lists {action}, which the contract does not grant"),
            Violation::StateMismatch { spec, contract } => write!(f, "spec is for {spec} but contract is for {contract}"),
        }
    }
}

/// Check every action referenced anywhere in the tree against
/// `spec.allowed_actions`. Empty means valid.
///
/// Does not assume the spec came from `generate_ui_spec`. One violation per
/// distinct offending action, ordered by first occurrence.
pub fn validate_ui_spec(spec: &UiSpec) -> Vec<Violation> {
    unauthorized(&referenced_actions(&spec.nodes), &spec.allowed_actions)
}

/// Like `validate_ui_spec`, but against an independently derived contract, so a
/// spec that widened its own `allowed_actions` is caught too.
pub fn validate_against_contract(spec: &UiSpec, contract: &Contract) -> Vec<Violation> {
    let mut violations = Vec::new();
    if spec.state != contract.state {
        violations.push(Violation::StateMismatch { spec: spec.state, contract: contract.state });
    }
    let mut widened: Vec<Action> = Vec::new();
    for action in &spec.allowed_actions {
        if !contract.permits(*action) && !widened.contains(action) {
            widened.push(*action);
        }
    }
    violations.extend(widened.into_iter().map(|action| Violation::WidenedAllowance { action }));
    violations.extend(unauthorized(&referenced_actions(&spec.nodes), &contract.allowed));
    violations
}

/// Every action in every `ActionRow`, depth first, with its path.
pub fn referenced_actions(nodes: &[UiNode]) -> Vec<(Action, String)> {
    let mut out = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        walk(node, format!("nodes[{i}]"), &mut out);
    }
    out
}

fn walk(node: &UiNode, path: String, out: &mut Vec<(Action, String)>) {
    match node {
        UiNode::StateBadge | UiNode::ProofPanel | UiNode::HaltPanel => {}
        UiNode::ActionRow { actions } => {
            for (k, action) in actions.iter().enumerate() {
                out.push((*action, format!("{path}.actions[{k}]")));
            }
        }
        UiNode::Card { body, .. } => {
            for (i, child) in body.iter().enumerate() {
                walk(child, format!("{path}.body[{i}]"), out);
            }
        }
        UiNode::Stepper { steps } => {
            for (j, step) in steps.iter().enumerate() {
                for (i, child) in step.body.iter().enumerate() {
                    walk(child, format!("{path}.steps[{j}].body[{i}]"), out);
                }
            }
        }
    }
}

fn unauthorized(referenced: &[(Action, String)], allowed: &[Action]) -> Vec<Violation> {
    let mut violations: Vec<Violation> = Vec::new();
    for (action, path) in referenced {
        if allowed.contains(action) {
            continue;
        }
        if violations.iter().any(|v| v.action() == Some(*action)) {
            continue;
        }
        violations.push(Violation::UnauthorizedAction { action: *action, path: path.clone() });
    }
    violations
}

/// A spec that passed `validate_against_contract`. Presentation adapters only
/// accept this type, so a failed validation cannot reach rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedSpec {
    spec: UiSpec,
}

impl ValidatedSpec {
    pub fn new(spec: UiSpec, contract: &Contract) -> Result<Self, ContractViolation> {
        let violations = validate_against_contract(&spec, contract);
        if !violations.is_empty() {
            return Err(ContractViolation { violations });
        }
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &UiSpec {
        &self.spec
    }

    pub fn into_inner(self) -> UiSpec {
        self.spec
    }

    /// Actions of every action row in tree order: the complete set of
    /// affordances an adapter may show.
    pub fn offered_actions(&self) -> Vec<Action> {
        referenced_actions(&self.spec.nodes).into_iter().map(|(a, _)| a).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::generate_contract;
    use crate::ui::{Step, UI_SPEC_VERSION};

    fn spec(state: WorkflowState, allowed: Vec<Action>, nodes: Vec<UiNode>) -> UiSpec {
        UiSpec { version: UI_SPEC_VERSION.into(), state, nodes, allowed_actions: allowed }
    }

    #[test]
    fn empty_tree_is_valid() {
        assert!(validate_ui_spec(&spec(WorkflowState::Halted, vec![], vec![])).is_empty());
    }

    #[test]
    fn reports_path_of_first_occurrence() {
        let s = spec(
            WorkflowState::Draft,
            vec![Action::Validate],
            vec![
                UiNode::StateBadge,
                UiNode::card("c", vec![UiNode::ActionRow { actions: vec![Action::Validate, Action::Plan] }]),
                UiNode::ActionRow { actions: vec![Action::Plan] },
            ],
        );
        assert_eq!(
            validate_ui_spec(&s),
            vec![Violation::UnauthorizedAction { action: Action::Plan, path: "nodes[1].body[0].actions[1]".into() }]
        );
    }

    #[test]
    fn violations_follow_tree_order() {
        let s = spec(
            WorkflowState::Draft,
            vec![],
            vec![UiNode::stepper(vec![
                Step::new("a", vec![UiNode::ActionRow { actions: vec![Action::Halt] }]),
                Step::new("b", vec![UiNode::ActionRow { actions: vec![Action::Execute, Action::Halt] }]),
            ])],
        );
        let actions: Vec<_> = validate_ui_spec(&s).iter().filter_map(Violation::action).collect();
        assert_eq!(actions, vec![Action::Halt, Action::Execute]);
    }

    #[test]
    fn widened_snapshot_is_caught_against_contract() {
        // The tree agrees with its own snapshot, but the snapshot lies.
        let s = spec(
            WorkflowState::Draft,
            vec![Action::Validate, Action::Execute],
            vec![UiNode::ActionRow { actions: vec![Action::Execute] }],
        );
        assert!(validate_ui_spec(&s).is_empty());

        let violations = validate_against_contract(&s, &generate_contract(WorkflowState::Draft));
        assert_eq!(
            violations,
            vec![
                Violation::WidenedAllowance { action: Action::Execute },
                Violation::UnauthorizedAction { action: Action::Execute, path: "nodes[0].actions[0]".into() },
            ]
        );
    }

    #[test]
    fn state_mismatch_is_reported() {
        let s = spec(WorkflowState::Converged, vec![], vec![]);
        let violations = validate_against_contract(&s, &generate_contract(WorkflowState::Executed));
        assert_eq!(
            violations,
            vec![Violation::StateMismatch { spec: WorkflowState::Converged, contract: WorkflowState::Executed }]
        );
    }

    #[test]
    fn validated_spec_refuses_violations() {
        let s = spec(
            WorkflowState::Validated,
            vec![Action::Plan],
            vec![UiNode::ActionRow { actions: vec![Action::Execute] }],
        );
        let err = ValidatedSpec::new(s, &generate_contract(WorkflowState::Validated)).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.to_string().contains("Execute is not allowed (at nodes[0].actions[0])"));
    }
}
