use cos_core::{generate_contract, Action, Contract, ProofArtifact, WorkflowState};

use crate::error::WorkflowError;
use crate::ids::{SubjectId, WorkflowId};
use crate::stage::{Converged, Draft, Executed, Halted, Planned, Validated};
use crate::workflow::{HaltReason, Workflow};

/// An action together with the data it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AttachEvidence(String),
    AttachInvariants(String),
    Validate,
    Plan(String),
    RunHypersim(ProofArtifact),
    Halt(HaltReason),
    Execute,
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::AttachEvidence(_) => Action::AttachEvidence,
            Command::AttachInvariants(_) => Action::AttachInvariants,
            Command::Validate => Action::Validate,
            Command::Plan(_) => Action::Plan,
            Command::RunHypersim(_) => Action::RunHypersim,
            Command::Halt(_) => Action::Halt,
            Command::Execute => Action::Execute,
        }
    }
}

/// A workflow whose stage is only known at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyWorkflow {
    Draft(Workflow<Draft>),
    Validated(Workflow<Validated>),
    Planned(Workflow<Planned>),
    Converged(Workflow<Converged>),
    Halted(Workflow<Halted>),
    Executed(Workflow<Executed>),
}

impl AnyWorkflow {
    pub fn new(id: WorkflowId, subject: SubjectId) -> Self {
        AnyWorkflow::Draft(Workflow::new(id, subject))
    }

    pub fn state(&self) -> WorkflowState {
        match self {
            AnyWorkflow::Draft(wf) => wf.state(),
            AnyWorkflow::Validated(wf) => wf.state(),
            AnyWorkflow::Planned(wf) => wf.state(),
            AnyWorkflow::Converged(wf) => wf.state(),
            AnyWorkflow::Halted(wf) => wf.state(),
            AnyWorkflow::Executed(wf) => wf.state(),
        }
    }

    pub fn contract(&self) -> Contract {
        generate_contract(self.state())
    }

    pub fn id(&self) -> &WorkflowId {
        match self {
            AnyWorkflow::Draft(wf) => wf.id(),
            AnyWorkflow::Validated(wf) => wf.id(),
            AnyWorkflow::Planned(wf) => wf.id(),
            AnyWorkflow::Converged(wf) => wf.id(),
            AnyWorkflow::Halted(wf) => wf.id(),
            AnyWorkflow::Executed(wf) => wf.id(),
        }
    }

    pub fn halt_reason(&self) -> Option<&HaltReason> {
        match self {
            AnyWorkflow::Halted(wf) => wf.reason(),
            _ => None,
        }
    }

    /// Apply one command. The contract for the current state is checked first;
    /// the stage's own methods then decide the next stage.
    pub fn apply(self, cmd: Command) -> Result<AnyWorkflow, WorkflowError> {
        let state = self.state();
        let action = cmd.action();
        if !self.contract().permits(action) {
            return Err(WorkflowError::NotAllowed { state, action });
        }
        let refuse = WorkflowError::NotAllowed { state, action };

        match self {
            AnyWorkflow::Draft(wf) => match cmd {
                Command::AttachEvidence(e) => Ok(AnyWorkflow::Draft(wf.attach_evidence(e))),
                Command::AttachInvariants(i) => Ok(AnyWorkflow::Draft(wf.attach_invariants(i))),
                Command::Validate => wf.validate().map(AnyWorkflow::Validated),
                _ => Err(refuse),
            },
            AnyWorkflow::Validated(wf) => match cmd {
                Command::Plan(p) => Ok(AnyWorkflow::Planned(wf.plan(p))),
                _ => Err(refuse),
            },
            AnyWorkflow::Planned(wf) => match cmd {
                Command::RunHypersim(proof) => Ok(match wf.run_hypersim(proof) {
                    Ok(converged) => AnyWorkflow::Converged(converged),
                    Err(halted) => AnyWorkflow::Halted(halted),
                }),
                Command::Halt(reason) => Ok(AnyWorkflow::Halted(wf.halt(reason))),
                _ => Err(refuse),
            },
            AnyWorkflow::Converged(wf) => match cmd {
                Command::Execute => Ok(AnyWorkflow::Executed(wf.execute())),
                _ => Err(refuse),
            },
            AnyWorkflow::Halted(_) | AnyWorkflow::Executed(_) => Err(refuse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_core::Decision;

    #[test]
    fn terminal_states_refuse_everything() {
        let halted = AnyWorkflow::new(WorkflowId::from("w1"), SubjectId::from("s"))
            .apply(Command::AttachEvidence("e".into()))
            .and_then(|wf| wf.apply(Command::AttachInvariants("i".into())))
            .and_then(|wf| wf.apply(Command::Validate))
            .and_then(|wf| wf.apply(Command::Plan("p".into())))
            .and_then(|wf| wf.apply(Command::Halt(HaltReason::new("STOP", "stop"))))
            .unwrap();
        assert_eq!(halted.state(), WorkflowState::Halted);

        let err = halted.apply(Command::Plan("again".into())).unwrap_err();
        assert_eq!(err, WorkflowError::NotAllowed { state: WorkflowState::Halted, action: Action::Plan });
    }

    #[test]
    fn hypersim_rejection_lands_in_halted() {
        let wf = AnyWorkflow::new(WorkflowId::from("w1"), SubjectId::from("s"))
            .apply(Command::AttachEvidence("e".into()))
            .and_then(|wf| wf.apply(Command::AttachInvariants("i".into())))
            .and_then(|wf| wf.apply(Command::Validate))
            .and_then(|wf| wf.apply(Command::Plan("p".into())))
            .and_then(|wf| {
                wf.apply(Command::RunHypersim(ProofArtifact::new("w1", Decision::Halt, 2, false, 30, "diverged")))
            })
            .unwrap();
        assert_eq!(wf.state(), WorkflowState::Halted);
        assert_eq!(wf.halt_reason().unwrap().code, "HYPERSIM_REJECTED");
    }
}
