//! Runtime settings.
//!
//! Optional TOML file; every key has a default. CLI flags are layered on top
//! by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crowdsale_sdk::contracts::{CrowdSale, GameloftToken};
use crowdsale_sdk::rpc::{RpcClient, DEFAULT_RPC_URL};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stages::StageOptions;
use crate::tasks::DEFAULT_MAX_TASKS;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "input_data";
/// Default Hardhat artifacts directory.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// JSON-RPC endpoint of a node with unlocked accounts.
    pub rpc_url: String,
    pub data_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    /// Accounts taken from the node: the owner plus the other signers.
    pub signer_count: usize,
    /// Signer that receives sale proceeds. Never the owner.
    pub collector_index: usize,
    /// Upper bound on pools / investors registered in one run.
    pub max_tasks: usize,
    pub poll_interval_ms: u64,
    pub confirmation_timeout_secs: u64,
    pub token_contract: String,
    pub sale_contract: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            signer_count: 5,
            collector_index: 3,
            max_tasks: DEFAULT_MAX_TASKS,
            poll_interval_ms: 250,
            confirmation_timeout_secs: 120,
            token_contract: GameloftToken::<RpcClient>::CONTRACT_NAME.to_string(),
            sale_contract: CrowdSale::<RpcClient>::CONTRACT_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Parse a settings file. Unknown keys are rejected.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| Error::Settings(e.message().to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.signer_count < 2 {
            return Err(Error::Settings(format!(
                "signer_count must be at least 2, got {}",
                self.signer_count
            )));
        }
        if self.collector_index == 0 || self.collector_index >= self.signer_count {
            return Err(Error::Settings(format!(
                "collector_index must be between 1 and {}, got {}",
                self.signer_count - 1,
                self.collector_index
            )));
        }
        if self.max_tasks == 0 {
            return Err(Error::Settings("max_tasks must be positive".into()));
        }
        if self.poll_interval_ms == 0 || self.confirmation_timeout_secs == 0 {
            return Err(Error::Settings(
                "poll_interval_ms and confirmation_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn stage_options(&self) -> StageOptions {
        StageOptions {
            signer_count: self.signer_count,
            collector_index: self.collector_index,
            max_tasks: self.max_tasks,
            token_contract: self.token_contract.clone(),
            sale_contract: self.sale_contract.clone(),
        }
    }

    pub fn rpc_client(&self) -> crowdsale_sdk::Result<RpcClient> {
        Ok(RpcClient::new(&self.rpc_url)?
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_confirmation_timeout(Duration::from_secs(self.confirmation_timeout_secs)))
    }
}
