use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub project: ProjectConfig,
    pub proof_log: ProofLogConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    pub id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofLogConfig {
    /// Tilde-expanded; relative paths are taken from the repo root.
    pub root: String,
    #[serde(default = "default_log_file")]
    pub file: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub show_proof_details: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { show_proof_details: true }
    }
}

fn default_log_file() -> String {
    "proofs.ndjson".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn default_for_repo(project_id: &str) -> Self {
        Self {
            project: ProjectConfig { id: project_id.to_string() },
            proof_log: ProofLogConfig {
                root: "~/.cos/proofs".to_string(),
                file: default_log_file(),
            },
            render: RenderConfig::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse cos.toml")?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Log file for this project: `<root>/<project id>/<file>`.
    pub fn proof_log_path(&self, repo_root: &Path) -> PathBuf {
        let root = PathBuf::from(shellexpand::tilde(&self.proof_log.root).to_string());
        let root = if root.is_absolute() { root } else { repo_root.join(root) };
        root.join(&self.project.id).join(&self.proof_log.file)
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".cos").join("cos.toml")
    }
}
