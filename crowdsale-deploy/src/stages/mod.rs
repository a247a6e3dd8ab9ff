//! The five workflow stages.
//!
//! Every stage follows the same shape: check the deployment record, load and
//! validate its inputs, and only then talk to the chain. The record is
//! updated once the stage's transactions are confirmed.

pub mod accounts;
pub mod investors;
pub mod rounds;
pub mod sale;
pub mod token;

use crowdsale_sdk::artifact::Artifacts;
use crowdsale_sdk::chain::Chain;
use crowdsale_sdk::contract::{Contract, ContractFactory};
use crowdsale_sdk::contracts::{CrowdSale, GameloftToken};
use crowdsale_sdk::Address;

use crate::error::{Error, Result};
use crate::store::{AccountList, DataDir, ACCOUNTS_FILE};
use crate::tasks::DEFAULT_MAX_TASKS;

/// Knobs shared by all stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    pub signer_count: usize,
    pub collector_index: usize,
    pub max_tasks: usize,
    pub token_contract: String,
    pub sale_contract: String,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            signer_count: 5,
            collector_index: 3,
            max_tasks: DEFAULT_MAX_TASKS,
            token_contract: "GameloftToken".to_string(),
            sale_contract: "CrowdSale".to_string(),
        }
    }
}

/// Everything a stage needs: the chain, the data directory and artifacts.
#[derive(Debug, Clone)]
pub struct Context<C> {
    pub chain: C,
    pub data: DataDir,
    pub artifacts: Artifacts,
    pub options: StageOptions,
}

impl<C: Chain> Context<C> {
    pub fn new(chain: C, data: DataDir, artifacts: Artifacts, options: StageOptions) -> Self {
        Self {
            chain,
            data,
            artifacts,
            options,
        }
    }

    /// The first `signer_count` node accounts, in node order.
    pub async fn signers(&self) -> Result<AccountList> {
        let needed = self.options.signer_count;
        let mut accounts = self.chain.accounts().await?;
        if accounts.len() < needed {
            return Err(Error::NotEnoughAccounts {
                needed,
                available: accounts.len(),
            });
        }
        accounts.truncate(needed);
        Ok(AccountList::new(accounts))
    }

    /// The node's first account, which the accounts stage records as owner.
    pub async fn node_owner(&self) -> Result<Address> {
        let accounts = self.chain.accounts().await?;
        accounts.first().copied().ok_or(Error::NotEnoughAccounts {
            needed: 1,
            available: 0,
        })
    }

    /// The fund collector within a signer list.
    pub fn collector(&self, accounts: &AccountList) -> Result<Address> {
        let index = self.options.collector_index;
        accounts.get(index).ok_or_else(|| Error::BadConfig {
            file: ACCOUNTS_FILE.to_string(),
            reason: format!(
                "collector index {index} out of range ({} accounts recorded)",
                accounts.len()
            ),
        })
    }

    pub async fn factory(&self, contract: &str, from: Address) -> Result<ContractFactory<C>> {
        let artifact = self.artifacts.load(contract).await?;
        Ok(ContractFactory::new(self.chain.clone(), artifact, from))
    }

    /// Handle to an already deployed token.
    pub async fn bind_token(&self, address: Address, from: Address) -> Result<GameloftToken<C>> {
        let artifact = self.artifacts.load(&self.options.token_contract).await?;
        Ok(GameloftToken::new(Contract::new(
            self.chain.clone(),
            artifact.abi,
            address,
            from,
        )))
    }

    /// Handle to an already deployed sale.
    pub async fn bind_sale(&self, address: Address, from: Address) -> Result<CrowdSale<C>> {
        let artifact = self.artifacts.load(&self.options.sale_contract).await?;
        Ok(CrowdSale::new(Contract::new(
            self.chain.clone(),
            artifact.abi,
            address,
            from,
        )))
    }
}

/// The owner of a recorded signer list.
pub(crate) fn owner(accounts: &AccountList) -> Result<Address> {
    accounts.owner().ok_or_else(|| Error::BadConfig {
        file: ACCOUNTS_FILE.to_string(),
        reason: "no accounts recorded".to_string(),
    })
}
