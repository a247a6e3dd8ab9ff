//! File-backed hand-off store shared by the stages.
//!
//! Everything lives as JSON in one data directory. The deployment record
//! (`deployedAddresses.json`) keeps the `glTokenAddress` /
//! `crowdSaleAddress` keys and adds `version` and `stage`, making the
//! stage ordering checkable. Files written before the stage tag existed are
//! read as version 0 and their stage is inferred from what they contain.

use std::fmt;
use std::path::{Path, PathBuf};

use crowdsale_sdk::Address;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub const ACCOUNTS_FILE: &str = "account.json";
pub const DEPLOYED_FILE: &str = "deployedAddresses.json";

/// Schema version written by this build.
pub const STATE_VERSION: u32 = 1;

/// Workflow progress, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Uninitialized,
    AccountsWritten,
    TokenDeployed,
    SaleDeployedAndFunded,
    RoundsConfigured,
    InvestorsSet,
}

impl Stage {
    /// The state the store must be in before this stage may run.
    pub fn prerequisite(self) -> Stage {
        match self {
            Stage::Uninitialized | Stage::AccountsWritten => Stage::Uninitialized,
            Stage::TokenDeployed => Stage::AccountsWritten,
            Stage::SaleDeployedAndFunded => Stage::TokenDeployed,
            Stage::RoundsConfigured => Stage::SaleDeployedAndFunded,
            Stage::InvestorsSet => Stage::RoundsConfigured,
        }
    }

    /// CLI command that moves the store into this state.
    pub fn command(self) -> &'static str {
        match self {
            Stage::Uninitialized => "-",
            Stage::AccountsWritten => "accounts",
            Stage::TokenDeployed => "deploy-token",
            Stage::SaleDeployedAndFunded => "deploy-sale",
            Stage::RoundsConfigured => "set-round",
            Stage::InvestorsSet => "set-investor",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Uninitialized => "uninitialized",
            Stage::AccountsWritten => "accounts_written",
            Stage::TokenDeployed => "token_deployed",
            Stage::SaleDeployedAndFunded => "sale_deployed_and_funded",
            Stage::RoundsConfigured => "rounds_configured",
            Stage::InvestorsSet => "investors_set",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted deployment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gl_token_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crowd_sale_address: Option<Address>,
}

impl DeploymentState {
    pub fn new(stage: Stage) -> Self {
        Self {
            version: STATE_VERSION,
            stage,
            ..Default::default()
        }
    }

    /// Stage implied by a version-0 record.
    fn inferred_stage(&self, accounts_written: bool) -> Stage {
        if self.crowd_sale_address.is_some() {
            Stage::SaleDeployedAndFunded
        } else if self.gl_token_address.is_some() {
            Stage::TokenDeployed
        } else if accounts_written {
            Stage::AccountsWritten
        } else {
            Stage::Uninitialized
        }
    }

    /// Refuse to run `stage` unless the store sits at its prerequisite.
    /// With `force`, any later state is accepted too (re-running a stage).
    pub fn begin(&self, stage: Stage, force: bool) -> Result<()> {
        let required = stage.prerequisite();
        if self.stage == required || (force && self.stage >= required) {
            if self.stage != required {
                tracing::warn!(%stage, current = %self.stage, "Re-running stage");
            }
            return Ok(());
        }
        Err(Error::OutOfOrder {
            stage,
            current: self.stage,
            required,
        })
    }

    pub fn require_token(&self) -> Result<Address> {
        self.gl_token_address.ok_or(Error::MissingPrerequisite {
            file: DEPLOYED_FILE.to_string(),
            field: "glTokenAddress".to_string(),
            command: Stage::TokenDeployed.command(),
        })
    }

    pub fn require_crowd_sale(&self) -> Result<Address> {
        self.crowd_sale_address.ok_or(Error::MissingPrerequisite {
            file: DEPLOYED_FILE.to_string(),
            field: "crowdSaleAddress".to_string(),
            command: Stage::SaleDeployedAndFunded.command(),
        })
    }
}

/// Ordered signer addresses; index 0 is the owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountList(Vec<Address>);

impl AccountList {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self(accounts)
    }

    pub fn owner(&self) -> Option<Address> {
        self.0.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<Address> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.0
    }
}

/// The data directory holding inputs and hand-off files.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn exists(&self, file: &str) -> bool {
        self.path(file).is_file()
    }

    /// Read a file as an untyped JSON document.
    pub async fn read_document(&self, file: &str) -> Result<Value> {
        self.read_json(file).await
    }

    pub async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.path(file);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| Error::Parse { path, source })
    }

    /// Overwrite `file` with compact JSON.
    pub async fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.path(file);
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| Error::Write {
                path: self.root.clone(),
                source,
            })?;
        let text = serde_json::to_string(value).map_err(|source| Error::Parse {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| Error::Write { path, source })
    }

    pub async fn load_accounts(&self) -> Result<AccountList> {
        if !self.exists(ACCOUNTS_FILE) {
            return Err(Error::MissingPrerequisite {
                file: ACCOUNTS_FILE.to_string(),
                field: "accounts".to_string(),
                command: Stage::AccountsWritten.command(),
            });
        }
        self.read_json(ACCOUNTS_FILE).await
    }

    pub async fn save_accounts(&self, accounts: &AccountList) -> Result<()> {
        self.write_json(ACCOUNTS_FILE, accounts).await
    }

    /// Load the deployment record, upgrading version-0 files in memory.
    /// A missing file is an empty version-0 record.
    pub async fn load_state(&self) -> Result<DeploymentState> {
        let mut state = if self.exists(DEPLOYED_FILE) {
            self.read_json::<DeploymentState>(DEPLOYED_FILE).await?
        } else {
            DeploymentState::default()
        };
        if state.version > STATE_VERSION {
            return Err(Error::UnsupportedVersion {
                file: DEPLOYED_FILE.to_string(),
                found: state.version,
                supported: STATE_VERSION,
            });
        }
        if state.version == 0 {
            state.stage = state.inferred_stage(self.exists(ACCOUNTS_FILE));
            state.version = STATE_VERSION;
        }
        Ok(state)
    }

    pub async fn save_state(&self, state: &DeploymentState) -> Result<()> {
        self.write_json(DEPLOYED_FILE, state).await?;
        tracing::debug!(stage = %state.stage, "Deployment state saved");
        Ok(())
    }
}
