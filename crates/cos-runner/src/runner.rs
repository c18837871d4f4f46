use std::path::{Path, PathBuf};

use anyhow::Result;
use cos_core::{
    generate_contract, generate_ui_spec, ContractViolation, PresentationAdapter, ProofArtifact, UiSpec, ValidatedSpec,
    WorkflowState,
};
use cos_proof_log::{FsProofLog, LineIssue, ProofLog};
use cos_render::{Rendered, TextAdapter};
use tracing::{debug, error, info};

use crate::Config;

pub struct Runner {
    pub repo_root: PathBuf,
    pub cfg: Config,
    pub proofs: FsProofLog,
}

impl Runner {
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        let cfg_path = Config::config_path(&repo_root);
        let cfg = if cfg_path.exists() {
            Config::load_from(&cfg_path)?
        } else {
            let project_id = repo_root.file_name().and_then(|s| s.to_str()).unwrap_or("repo");
            let cfg = Config::default_for_repo(project_id);
            cfg.save_to(&cfg_path)?;
            cfg
        };

        let proofs = FsProofLog::new(cfg.proof_log_path(&repo_root));
        debug!(config = %cfg_path.display(), proof_log = %proofs.path().display(), "runner opened");

        Ok(Self { repo_root, cfg, proofs })
    }

    pub fn init_repo(repo_root: &Path) -> Result<()> {
        let cfg_path = Config::config_path(repo_root);
        if !cfg_path.exists() {
            let project_id = repo_root.file_name().and_then(|s| s.to_str()).unwrap_or("repo");
            Config::default_for_repo(project_id).save_to(&cfg_path)?;
        }
        Ok(())
    }

    /// One cycle up to validation: state -> contract -> spec -> validated spec.
    pub fn build_spec(&self, state: WorkflowState, proof: &ProofArtifact, intent: Option<&str>) -> Result<ValidatedSpec> {
        let contract = generate_contract(state);
        let spec = generate_ui_spec(&contract, proof, intent);
        debug!(%state, allowed = ?contract.allowed, nodes = spec.nodes.len(), "spec generated");
        ValidatedSpec::new(spec, &contract).map_err(|v| blocked(state, v))
    }

    /// Check a spec that came from outside against the contract re-derived
    /// from its own state.
    pub fn check_spec(&self, spec: UiSpec) -> Result<ValidatedSpec> {
        let state = spec.state;
        let contract = generate_contract(state);
        ValidatedSpec::new(spec, &contract).map_err(|v| blocked(state, v))
    }

    pub fn present(&self, state: WorkflowState, proof: &ProofArtifact, intent: Option<&str>) -> Result<Rendered> {
        let validated = self.build_spec(state, proof, intent)?;
        let mut adapter = TextAdapter::new(Some(proof.clone()), self.cfg.render.show_proof_details);
        let rendered = adapter.render(&validated);
        info!(%state, buttons = rendered.buttons.len(), "spec rendered");
        Ok(rendered)
    }

    pub fn record_proof(&self, proof: &ProofArtifact) -> Result<String> {
        self.proofs.append(proof)
    }

    pub fn verify_proofs(&self) -> Result<Vec<LineIssue>> {
        self.proofs.verify()
    }
}

fn blocked(state: WorkflowState, v: ContractViolation) -> anyhow::Error {
    error!(%state, violations = v.violations.len(), "rendering blocked: {}", v);
    anyhow::Error::new(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_core::{Action, Decision, UiNode};
    use tempfile::tempdir;

    fn proof() -> ProofArtifact {
        ProofArtifact::new("w1", Decision::Allow, 0, true, 90, "ok")
    }

    fn runner(dir: &Path) -> Runner {
        let mut cfg = Config::default_for_repo("test");
        cfg.proof_log.root = ".cos/proofs".into();
        cfg.save_to(&Config::config_path(dir)).unwrap();
        Runner::open(dir.to_path_buf()).unwrap()
    }

    #[test]
    fn open_writes_default_config() {
        let dir = tempdir().unwrap();
        let r = Runner::open(dir.path().to_path_buf()).unwrap();
        assert!(Config::config_path(dir.path()).exists());
        assert_eq!(r.cfg.proof_log.root, "~/.cos/proofs");
    }

    #[test]
    fn present_planned_offers_hypersim_and_halt() {
        let dir = tempdir().unwrap();
        let r = runner(dir.path());
        let rendered = r.present(WorkflowState::Planned, &proof(), None).unwrap();
        let actions: Vec<Action> = rendered.buttons.iter().map(|b| b.action).collect();
        assert_eq!(actions, vec![Action::RunHypersim, Action::Halt]);
    }

    #[test]
    fn tampered_spec_is_blocked() {
        let dir = tempdir().unwrap();
        let r = runner(dir.path());
        let mut spec = r.build_spec(WorkflowState::Validated, &proof(), None).unwrap().into_inner();
        spec.nodes.push(UiNode::ActionRow { actions: vec![Action::Execute] });
        spec.allowed_actions.push(Action::Execute);

        let err = r.check_spec(spec).unwrap_err();
        let violation = err.downcast_ref::<ContractViolation>().unwrap();
        assert_eq!(violation.violations.len(), 2);
    }

    #[test]
    fn records_and_verifies_proofs() {
        let dir = tempdir().unwrap();
        let r = runner(dir.path());
        let digest = r.record_proof(&proof()).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(r.proofs.path().starts_with(dir.path()));
        assert!(r.verify_proofs().unwrap().is_empty());
    }
}
