use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cos_core::ProofArtifact;
use tracing::{debug, info, warn};

use crate::ndjson::{artifact_digest, Ndjson};

/// Append-only audit trail of proof artifacts. Entries are never rewritten.
pub trait ProofLog: Send + Sync {
    /// Append an artifact whose invariants hold for its decision. Returns its digest.
    fn append(&self, artifact: &ProofArtifact) -> Result<String>;
    fn read_all(&self) -> Result<Vec<ProofArtifact>>;
    /// Re-check every line; an empty result means the log is sound.
    fn verify(&self) -> Result<Vec<LineIssue>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIssue {
    /// 1-based.
    pub line: usize,
    pub problem: String,
}

#[derive(Clone)]
pub struct FsProofLog {
    pub path: PathBuf,
}

impl FsProofLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let s = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read proof log {}", self.path.display()))?;
        Ok(s.lines().map(str::to_string).collect())
    }
}

impl ProofLog for FsProofLog {
    fn append(&self, artifact: &ProofArtifact) -> Result<String> {
        artifact
            .validate_invariants()
            .with_context(|| format!("refusing to log proof for workflow {}", artifact.workflow_id))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let line = Ndjson::serialize_entry(artifact)?;
        let digest = artifact_digest(artifact)?;

        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open proof log {}", self.path.display()))?;
        // One write per entry so concurrent appenders cannot split a line.
        f.write_all(format!("{line}\n").as_bytes())
            .with_context(|| format!("append to proof log {}", self.path.display()))?;

        info!(workflow_id = %artifact.workflow_id, decision = ?artifact.decision, %digest, "proof appended");
        Ok(digest)
    }

    fn read_all(&self) -> Result<Vec<ProofArtifact>> {
        let mut out = Vec::new();
        for (i, line) in self.read_lines()?.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let a = Ndjson::deserialize_entry(line).with_context(|| format!("proof log line {}", i + 1))?;
            out.push(a);
        }
        debug!(entries = out.len(), path = %self.path.display(), "proof log read");
        Ok(out)
    }

    fn verify(&self) -> Result<Vec<LineIssue>> {
        let mut issues = Vec::new();
        for (i, line) in self.read_lines()?.iter().enumerate() {
            let n = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            if !Ndjson::is_valid_json(line) {
                issues.push(LineIssue { line: n, problem: "not valid JSON".into() });
                continue;
            }
            let artifact = match Ndjson::deserialize_entry(line) {
                Ok(a) => a,
                Err(e) => {
                    issues.push(LineIssue { line: n, problem: format!("{e:#}") });
                    continue;
                }
            };
            if let Err(e) = artifact.validate_invariants() {
                issues.push(LineIssue { line: n, problem: e.to_string() });
            }
        }
        for issue in &issues {
            warn!(line = issue.line, problem = %issue.problem, "proof log issue");
        }
        Ok(issues)
    }
}
