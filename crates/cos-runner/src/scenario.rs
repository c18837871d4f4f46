use std::path::Path;

use anyhow::{anyhow, Context, Result};
use cos_core::{generate_ui_spec, Action, ProofArtifact, ValidatedSpec, WorkflowState};
use cos_workflow::{AnyWorkflow, Command, HaltReason, SubjectId, WorkflowError, WorkflowId};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub workflow_id: String,
    pub subject: String,
    pub steps: Vec<ScenarioStep>,
    pub expect: ScenarioExpected,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioStep {
    pub action: String,
    /// Evidence, invariants, plan text or halt message, depending on the action.
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioExpected {
    pub final_state: WorkflowState,
    #[serde(default)]
    pub rejected_action: Option<Action>,
    #[serde(default)]
    pub halt_code: Option<String>,
}

#[derive(Debug)]
pub struct ScenarioResult {
    pub final_state: WorkflowState,
    /// States in the order they were entered, starting with Draft.
    pub visited: Vec<WorkflowState>,
    /// Action refused by the contract, with the state it was attempted in.
    pub rejected: Option<(WorkflowState, Action)>,
    pub halt_code: Option<String>,
}

pub fn load_scenario(dir: &Path) -> Result<Scenario> {
    let p = dir.join("scenario.yaml");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read scenario.yaml: {}", p.display()))?;
    let sc: Scenario = serde_yaml::from_str(&s).with_context(|| "parse scenario.yaml")?;
    Ok(sc)
}

pub fn load_proof(dir: &Path) -> Result<ProofArtifact> {
    let p = dir.join("proof.json");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Drive a workflow through the scenario's steps.
///
/// Before every step the spec for the current state is generated and must
/// validate; a step whose action the contract refuses ends the run and is
/// reported, not treated as an error.
pub fn simulate(dir: &Path) -> Result<ScenarioResult> {
    let sc = load_scenario(dir)?;
    let proof = load_proof(dir)?;
    info!(scenario = %sc.scenario_id, steps = sc.steps.len(), "simulating");

    let mut wf = AnyWorkflow::new(WorkflowId::from(sc.workflow_id.clone()), SubjectId::from(sc.subject.clone()));
    let mut visited = vec![wf.state()];
    let mut rejected = None;

    for step in &sc.steps {
        let state = wf.state();
        let contract = wf.contract();
        let spec = generate_ui_spec(&contract, &proof, None);
        let validated = ValidatedSpec::new(spec, &contract)
            .with_context(|| format!("{}: spec for {state} failed validation", sc.scenario_id))?;

        let cmd = command_for(step, &proof)?;
        let action = cmd.action();
        debug!(%state, %action, offered = validated.offered_actions().contains(&action), "step");

        match wf.clone().apply(cmd) {
            Ok(next) => {
                if next.state() != state {
                    visited.push(next.state());
                }
                wf = next;
            }
            Err(WorkflowError::NotAllowed { state, action }) => {
                warn!(%state, %action, "action refused by contract");
                rejected = Some((state, action));
                break;
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!("{}: {action} from {state}", sc.scenario_id)));
            }
        }
    }

    Ok(ScenarioResult {
        final_state: wf.state(),
        visited,
        rejected,
        halt_code: wf.halt_reason().map(|r| r.code.clone()),
    })
}

fn command_for(step: &ScenarioStep, proof: &ProofArtifact) -> Result<Command> {
    let action: Action = step.action.parse()?;
    let input = || {
        step.input
            .clone()
            .ok_or_else(|| anyhow!("step {action} needs an input"))
    };
    let cmd = match action {
        Action::AttachEvidence => Command::AttachEvidence(input()?),
        Action::AttachInvariants => Command::AttachInvariants(input()?),
        Action::Validate => Command::Validate,
        Action::Plan => Command::Plan(input()?),
        Action::RunHypersim => Command::RunHypersim(proof.clone()),
        Action::Halt => Command::Halt(HaltReason::new("USER_CANCEL", input()?)),
        Action::Execute => Command::Execute,
    };
    Ok(cmd)
}
