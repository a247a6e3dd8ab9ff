//! Hardhat compilation artifacts.
//!
//! Hardhat writes one JSON file per contract under
//! `artifacts/contracts/<Name>.sol/<Name>.json` holding the ABI and the
//! creation bytecode. A flat `<root>/<Name>.json` layout is accepted too.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::Bytes;

/// A compiled contract: ABI plus creation bytecode.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub abi: Arc<JsonAbi>,
    pub bytecode: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: Option<String>,
    abi: JsonAbi,
    #[serde(default)]
    bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact document. `path` is only used in error messages.
    pub fn parse(name: &str, path: &Path, text: &str) -> Result<Self> {
        let bad = |reason: String| Error::BadArtifact {
            path: path.to_path_buf(),
            reason,
        };
        let raw: RawArtifact = serde_json::from_str(text).map_err(|e| bad(e.to_string()))?;
        if raw.bytecode.is_empty() {
            return Err(bad("empty bytecode (abstract contract or interface)".to_string()));
        }
        Ok(Self {
            contract_name: raw.contract_name.unwrap_or_else(|| name.to_string()),
            abi: Arc::new(raw.abi),
            bytecode: raw.bytecode,
        })
    }
}

/// Artifact lookup rooted at a Hardhat `artifacts/` directory.
#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing candidate path for `name`.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        [
            self.root
                .join("contracts")
                .join(format!("{name}.sol"))
                .join(format!("{name}.json")),
            self.root.join(format!("{name}.json")),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    pub async fn load(&self, name: &str) -> Result<Artifact> {
        let path = self.locate(name).ok_or_else(|| Error::ArtifactNotFound {
            name: name.to_string(),
            root: self.root.clone(),
        })?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::ArtifactIo {
                path: path.clone(),
                source,
            })?;
        let artifact = Artifact::parse(name, &path, &text)?;
        tracing::debug!(contract = name, path = %path.display(), "Loaded artifact");
        Ok(artifact)
    }
}
