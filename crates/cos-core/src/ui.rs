use serde::{Deserialize, Serialize};

use crate::model::{Action, WorkflowState};

pub const UI_SPEC_VERSION: &str = "1";

/// One node of the UI description. Children are owned; the structure is a
/// tree and is rebuilt for every generation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum UiNode {
    StateBadge,
    ProofPanel,
    HaltPanel,
    Card { title: String, body: Vec<UiNode> },
    /// The only place interactive affordances may come from.
    ActionRow { actions: Vec<Action> },
    Stepper { steps: Vec<Step> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub title: String,
    pub body: Vec<UiNode>,
}

impl UiNode {
    pub fn card(title: impl Into<String>, body: Vec<UiNode>) -> Self {
        UiNode::Card { title: title.into(), body }
    }

    pub fn stepper(steps: Vec<Step>) -> Self {
        UiNode::Stepper { steps }
    }
}

impl Step {
    pub fn new(title: impl Into<String>, body: Vec<UiNode>) -> Self {
        Self { title: title.into(), body }
    }
}

/// Renderable description for one (contract, proof) pair. Never mutated after
/// generation; a new state means a new spec.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiSpec {
    pub version: String,
    pub state: WorkflowState,
    pub nodes: Vec<UiNode>,
    /// Snapshot of the contract's allowed set at generation time.
    pub allowed_actions: Vec<Action>,
}
