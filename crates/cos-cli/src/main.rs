use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cos_core::{contract_for_tag, ProofArtifact, UiSpec, WorkflowState};
use cos_runner::{scenario, Runner};

#[derive(Parser)]
#[command(name = "cos", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create .cos/cos.toml in the current directory
    Init,

    /// Print the actions allowed in a workflow state
    Contract {
        #[arg(long)]
        state: String,
    },

    /// Generate and validate the UI spec for a state, print it as JSON
    Spec {
        #[arg(long)]
        state: String,
        #[arg(long)]
        proof: PathBuf,
        #[arg(long)]
        intent: Option<String>,
    },

    /// Validate a UI spec JSON file against the contract for its state
    Validate {
        #[arg(long)]
        spec: PathBuf,
    },

    /// Render the UI for a state as text, optionally pressing a button
    Present {
        #[arg(long)]
        state: String,
        #[arg(long)]
        proof: PathBuf,
        #[arg(long)]
        intent: Option<String>,
        #[arg(long)]
        press: Option<usize>,
    },

    /// Simulate a fixture scenario directory
    Scenario {
        #[arg(long)]
        dir: PathBuf,
    },

    /// Append a proof artifact to the project proof log
    ProofAppend {
        #[arg(long)]
        file: PathBuf,
    },

    /// Re-check every entry of the project proof log
    ProofVerify,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;
    tracing::debug!(cwd = %repo_root.display(), "cos starting");

    match cli.cmd {
        Command::Init => {
            Runner::init_repo(&repo_root)?;
            println!("Initialized COS in {}", repo_root.display());
        }
        Command::Contract { state } => {
            let contract = contract_for_tag(&state)?;
            println!("{}:", contract.state);
            if contract.is_terminal() {
                println!("  (terminal: no actions)");
            }
            for a in &contract.allowed {
                println!("  - {}", a);
            }
        }
        Command::Spec { state, proof, intent } => {
            let r = Runner::open(repo_root)?;
            let state: WorkflowState = state.parse()?;
            let proof = read_proof(&proof)?;
            let validated = r.build_spec(state, &proof, intent.as_deref())?;
            println!("{}", serde_json::to_string_pretty(validated.spec())?);
        }
        Command::Validate { spec } => {
            let r = Runner::open(repo_root)?;
            let s = std::fs::read_to_string(&spec).with_context(|| format!("read {}", spec.display()))?;
            let parsed: UiSpec = serde_json::from_str(&s).with_context(|| format!("parse {}", spec.display()))?;
            let validated = r.check_spec(parsed)?;
            println!("OK: {} ({} action(s) offered)", validated.spec().state, validated.offered_actions().len());
        }
        Command::Present { state, proof, intent, press } => {
            let r = Runner::open(repo_root)?;
            let state: WorkflowState = state.parse()?;
            let proof = read_proof(&proof)?;
            let rendered = r.present(state, &proof, intent.as_deref())?;
            print!("{}", rendered.text);
            if let Some(index) = press {
                let forwarded = rendered.press(index, &mut |a| println!("-> {}", a));
                if forwarded.is_none() {
                    return Err(anyhow!("no button [{}] on this screen", index));
                }
            }
        }
        Command::Scenario { dir } => {
            let res = scenario::simulate(&dir)?;
            let path = res.visited.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" -> ");
            println!("{}", path);
            if let Some((state, action)) = res.rejected {
                println!("refused: {} in {}", action, state);
            }
            if let Some(code) = res.halt_code {
                println!("halt: {}", code);
            }
        }
        Command::ProofAppend { file } => {
            let r = Runner::open(repo_root)?;
            let proof = read_proof(&file)?;
            let digest = r.record_proof(&proof)?;
            println!("Appended {} ({})", proof.workflow_id, digest);
        }
        Command::ProofVerify => {
            let r = Runner::open(repo_root)?;
            let issues = r.verify_proofs()?;
            if issues.is_empty() {
                println!("OK");
            } else {
                for i in &issues {
                    println!("line {}: {}", i.line, i.problem);
                }
                return Err(anyhow!("{} bad line(s) in {}", issues.len(), r.proofs.path().display()));
            }
        }
    }

    Ok(())
}

fn read_proof(path: &Path) -> anyhow::Result<ProofArtifact> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse proof {}", path.display()))
}
