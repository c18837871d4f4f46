use anyhow::{Context, Result};
use cos_core::ProofArtifact;
use sha2::{Digest, Sha256};

/// One proof artifact per line, each line a complete JSON document.
pub struct Ndjson;

impl Ndjson {
    pub fn serialize_entry(a: &ProofArtifact) -> Result<String> {
        serde_json::to_string(a).context("serialize proof artifact")
    }

    pub fn deserialize_entry(line: &str) -> Result<ProofArtifact> {
        serde_json::from_str::<ProofArtifact>(line).context("deserialize proof artifact")
    }

    pub fn is_valid_json(line: &str) -> bool {
        serde_json::from_str::<serde_json::Value>(line).is_ok()
    }
}

/// sha256 of the artifact's NDJSON line, hex encoded.
pub fn artifact_digest(a: &ProofArtifact) -> Result<String> {
    let line = Ndjson::serialize_entry(a)?;
    let mut hasher = Sha256::new();
    hasher.update(line.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
