use std::marker::PhantomData;

use cos_core::{generate_contract, Contract, ProofArtifact, WorkflowState};

use crate::error::WorkflowError;
use crate::ids::{SubjectId, WorkflowId};
use crate::stage::{Converged, Draft, Executed, Halted, Planned, Stage, Validated};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaltReason {
    pub code: String,
    pub message: String,
}

impl HaltReason {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }
}

/// Deletion workflow in stage `S`. Each stage only has the methods its
/// contract grants.
///
/// Executing straight from a draft does not compile:
///
/// ```compile_fail
/// use cos_workflow::{stage::Draft, SubjectId, Workflow, WorkflowId};
///
/// let wf = Workflow::<Draft>::new(WorkflowId::from("w1"), SubjectId::from("acct-1"));
/// let _ = wf.execute();
/// ```
///
/// Neither does running hypersim before a plan exists:
///
/// ```compile_fail
/// use cos_core::{Decision, ProofArtifact};
/// use cos_workflow::{stage::Draft, SubjectId, Workflow, WorkflowId};
///
/// let wf = Workflow::<Draft>::new(WorkflowId::from("w1"), SubjectId::from("acct-1"));
/// let _ = wf.run_hypersim(ProofArtifact::new("w1", Decision::Allow, 0, true, 90, "ok"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workflow<S: Stage> {
    id: WorkflowId,
    subject: SubjectId,
    evidence: Option<String>,
    invariants: Option<String>,
    plan: Option<String>,
    proof: Option<ProofArtifact>,
    halt: Option<HaltReason>,
    _stage: PhantomData<S>,
}

impl<S: Stage> Workflow<S> {
    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn state(&self) -> WorkflowState {
        S::STATE
    }

    pub fn contract(&self) -> Contract {
        generate_contract(S::STATE)
    }

    pub fn evidence(&self) -> Option<&str> {
        self.evidence.as_deref()
    }

    pub fn invariants(&self) -> Option<&str> {
        self.invariants.as_deref()
    }

    pub fn plan_text(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    /// Last proof received from hypersim, if any.
    pub fn proof(&self) -> Option<&ProofArtifact> {
        self.proof.as_ref()
    }

    fn advance<T: Stage>(self) -> Workflow<T> {
        Workflow {
            id: self.id,
            subject: self.subject,
            evidence: self.evidence,
            invariants: self.invariants,
            plan: self.plan,
            proof: self.proof,
            halt: self.halt,
            _stage: PhantomData,
        }
    }
}

impl Workflow<Draft> {
    pub fn new(id: WorkflowId, subject: SubjectId) -> Self {
        Workflow {
            id,
            subject,
            evidence: None,
            invariants: None,
            plan: None,
            proof: None,
            halt: None,
            _stage: PhantomData,
        }
    }

    pub fn attach_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn attach_invariants(mut self, invariants: impl Into<String>) -> Self {
        self.invariants = Some(invariants.into());
        self
    }

    pub fn validate(self) -> Result<Workflow<Validated>, WorkflowError> {
        if self.evidence.is_none() {
            return Err(WorkflowError::MissingEvidence);
        }
        if self.invariants.is_none() {
            return Err(WorkflowError::MissingInvariants);
        }
        Ok(self.advance())
    }
}

impl Workflow<Validated> {
    pub fn plan(mut self, plan: impl Into<String>) -> Workflow<Planned> {
        self.plan = Some(plan.into());
        self.advance()
    }
}

impl Workflow<Planned> {
    /// Feed the convergence proof computed for this plan.
    ///
    /// Converges only when the proof belongs to this workflow and satisfies the
    /// allow invariants; any other proof halts the workflow.
    pub fn run_hypersim(mut self, proof: ProofArtifact) -> Result<Workflow<Converged>, Workflow<Halted>> {
        if proof.workflow_id != self.id.as_str() {
            self.halt = Some(HaltReason::new(
                "PROOF_MISMATCH",
                format!("proof is for workflow {}, not {}", proof.workflow_id, self.id.as_str()),
            ));
            self.proof = Some(proof);
            return Err(self.advance());
        }

        match proof.validate_allow_invariants() {
            Ok(()) => {
                self.proof = Some(proof);
                Ok(self.advance())
            }
            Err(e) => {
                self.halt = Some(HaltReason::new("HYPERSIM_REJECTED", e.to_string()));
                self.proof = Some(proof);
                Err(self.advance())
            }
        }
    }

    pub fn halt(mut self, reason: HaltReason) -> Workflow<Halted> {
        self.halt = Some(reason);
        self.advance()
    }
}

impl Workflow<Converged> {
    pub fn execute(self) -> Workflow<Executed> {
        self.advance()
    }
}

impl Workflow<Halted> {
    pub fn reason(&self) -> Option<&HaltReason> {
        self.halt.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_core::{Action, Decision};

    fn draft() -> Workflow<Draft> {
        Workflow::new(WorkflowId::from("w1"), SubjectId::from("acct-1"))
    }

    fn allow_proof() -> ProofArtifact {
        ProofArtifact::new("w1", Decision::Allow, 0, true, 90, "All futures converged")
    }

    #[test]
    fn typestate_enforces_sequence() {
        let executed = draft()
            .attach_evidence("ticket-42")
            .attach_invariants("inv_v1")
            .validate()
            .unwrap()
            .plan("drop rows for acct-1")
            .run_hypersim(allow_proof())
            .unwrap()
            .execute();

        assert_eq!(executed.state(), WorkflowState::Executed);
        assert_eq!(executed.subject(), &SubjectId::from("acct-1"));
        assert_eq!(executed.proof(), Some(&allow_proof()));
        assert!(executed.contract().is_terminal());
    }

    #[test]
    fn validate_requires_evidence_then_invariants() {
        assert_eq!(draft().validate().unwrap_err(), WorkflowError::MissingEvidence);
        assert_eq!(draft().attach_evidence("e").validate().unwrap_err(), WorkflowError::MissingInvariants);
    }

    #[test]
    fn planned_can_halt() {
        let planned = draft().attach_evidence("e").attach_invariants("i").validate().unwrap().plan("p");
        assert!(planned.contract().permits(Action::Halt));
        let halted = planned.halt(HaltReason::new("USER_CANCEL", "User cancelled"));
        assert_eq!(halted.state(), WorkflowState::Halted);
        assert_eq!(halted.reason().unwrap().code, "USER_CANCEL");
    }

    #[test]
    fn failing_proof_halts() {
        let planned = draft().attach_evidence("e").attach_invariants("i").validate().unwrap().plan("p");
        let mut proof = allow_proof();
        proof.structurality = 50;
        let halted = planned.run_hypersim(proof).unwrap_err();
        assert_eq!(halted.reason().unwrap().code, "HYPERSIM_REJECTED");
        assert!(halted.reason().unwrap().message.contains("structurality"));
    }

    #[test]
    fn proof_for_another_workflow_halts() {
        let planned = draft().attach_evidence("e").attach_invariants("i").validate().unwrap().plan("p");
        let mut proof = allow_proof();
        proof.workflow_id = "w2".into();
        let halted = planned.run_hypersim(proof).unwrap_err();
        assert_eq!(halted.reason().unwrap().code, "PROOF_MISMATCH");
    }
}
