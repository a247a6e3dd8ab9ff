use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{address_arg, amount_arg, expect_address, expect_uint};
use crate::chain::{Chain, Receipt};
use crate::contract::{Contract, ContractFactory};
use crate::error::Result;
use crate::{Address, U256};

/// Arguments of one `createPool` call, as written in `round.json`.
///
/// Values stay raw JSON; the contract ABI decides their wire types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDefinition {
    pub pool_id: Value,
    pub name: Value,
    pub total_percent: Value,
    pub timestamps: Vec<Value>,
    pub ratios: Vec<Value>,
}

impl PoolDefinition {
    /// Pool id for log lines: strings unquoted, anything else as JSON.
    pub fn label(&self) -> String {
        match &self.pool_id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Handle to a deployed `CrowdSale`.
#[derive(Debug, Clone)]
pub struct CrowdSale<C> {
    contract: Contract<C>,
}

impl<C: Chain> CrowdSale<C> {
    pub const CONTRACT_NAME: &'static str = "CrowdSale";

    pub fn new(contract: Contract<C>) -> Self {
        Self { contract }
    }

    /// `constructor(token, collector, rate)`.
    pub async fn deploy(
        factory: &ContractFactory<C>,
        token: Address,
        collector: Address,
        rate: &Value,
    ) -> Result<Self> {
        let contract = factory
            .deploy(&[address_arg(token), address_arg(collector), rate.clone()])
            .await?;
        Ok(Self::new(contract))
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn connect(&self, from: Address) -> Self {
        Self::new(self.contract.connect(from))
    }

    pub async fn rate(&self) -> Result<U256> {
        expect_uint(self.contract.call("rate", &[]).await?, "rate")
    }

    pub async fn token(&self) -> Result<Address> {
        expect_address(self.contract.call("token", &[]).await?, "token")
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        expect_uint(
            self.contract.call("balanceOf", &[address_arg(account)]).await?,
            "balanceOf",
        )
    }

    pub async fn create_pool(&self, pool: &PoolDefinition) -> Result<Receipt> {
        self.contract
            .send(
                "createPool",
                &[
                    pool.pool_id.clone(),
                    pool.name.clone(),
                    pool.total_percent.clone(),
                    Value::Array(pool.timestamps.clone()),
                    Value::Array(pool.ratios.clone()),
                ],
            )
            .await
    }

    pub async fn set_investor(&self, round_id: &Value, investor: Address, flag: bool) -> Result<Receipt> {
        self.contract
            .send("setInvestor", &[round_id.clone(), address_arg(investor), json!(flag)])
            .await
    }

    pub async fn buy_token(&self, round_id: &Value, beneficiary: Address) -> Result<Receipt> {
        self.contract
            .send("buyToken", &[round_id.clone(), address_arg(beneficiary)])
            .await
    }

    pub async fn buy_specific_amount_of_token(
        &self,
        round_id: &Value,
        beneficiary: Address,
        amount: U256,
    ) -> Result<Receipt> {
        self.contract
            .send(
                "buySpecificAmountOfToken",
                &[
                    round_id.clone(),
                    address_arg(beneficiary),
                    amount_arg(amount),
                ],
            )
            .await
    }
}
