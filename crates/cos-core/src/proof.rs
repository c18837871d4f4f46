use serde::{Deserialize, Serialize};

use crate::error::ProofError;

/// Minimum structurality score for an Allow decision.
pub const MIN_STRUCTURALITY: u8 = 80;

/// The convergence gate's verdict.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Decision {
    Allow,
    Halt,
}

/// Hypersim exploration stats.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetUsed {
    pub max_futures: u32,
    pub max_depth: u32,
    /// Retries and rollbacks allowed.
    pub repair_budget: u32,
    pub explored_futures: u32,
    /// Futures dropped for violating invariants.
    pub pruned_futures: u32,
}

/// Record produced by the orchestrator explaining why a transition is, or is
/// not, safe. Read here only to pick informational panels; it never widens
/// what a contract allows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofArtifact {
    pub workflow_id: String,
    pub decision: Decision,
    /// Remaining invalid futures.
    pub rif: u32,
    pub converged: bool,
    /// 0..=100. Out-of-range values are passed through for display.
    pub structurality: u8,
    /// Human explanation. Display only.
    pub reason: String,

    #[serde(default)]
    pub invariant_set_id: String,
    #[serde(default)]
    pub budget: BudgetUsed,
    #[serde(default)]
    pub execution_boundary_fingerprint: String,
}

impl ProofArtifact {
    pub fn new(
        workflow_id: impl Into<String>,
        decision: Decision,
        rif: u32,
        converged: bool,
        structurality: u8,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            decision,
            rif,
            converged,
            structurality,
            reason: reason.into(),
            invariant_set_id: String::new(),
            budget: BudgetUsed::default(),
            execution_boundary_fingerprint: String::new(),
        }
    }

    pub fn validate_allow_invariants(&self) -> Result<(), ProofError> {
        if self.decision != Decision::Allow {
            return Err(ProofError::NotAllow);
        }
        if self.rif != 0 {
            return Err(ProofError::RifNonZero(self.rif));
        }
        if !self.converged {
            return Err(ProofError::NotConverged);
        }
        if self.structurality < MIN_STRUCTURALITY {
            return Err(ProofError::StructuralityTooLow {
                got: self.structurality,
                min: MIN_STRUCTURALITY,
            });
        }
        Ok(())
    }

    /// A halt is always a correct stop; only the decision is checked.
    pub fn validate_halt_invariants(&self) -> Result<(), ProofError> {
        if self.decision != Decision::Halt {
            return Err(ProofError::NotHalt);
        }
        Ok(())
    }

    pub fn validate_invariants(&self) -> Result<(), ProofError> {
        match self.decision {
            Decision::Allow => self.validate_allow_invariants(),
            Decision::Halt => self.validate_halt_invariants(),
        }
    }
}
