use serde_json::{json, Value};

use super::{address_arg, amount_arg, expect_string, expect_uint};
use crate::chain::{Chain, Receipt};
use crate::contract::{Contract, ContractFactory};
use crate::error::Result;
use crate::{Address, U256};

/// Handle to a deployed `GameloftToken`.
#[derive(Debug, Clone)]
pub struct GameloftToken<C> {
    contract: Contract<C>,
}

impl<C: Chain> GameloftToken<C> {
    pub const CONTRACT_NAME: &'static str = "GameloftToken";

    pub fn new(contract: Contract<C>) -> Self {
        Self { contract }
    }

    /// `constructor(name, symbol, owner, initialSupply, decimal)`.
    ///
    /// Supply and decimals are passed through as given and coerced to the
    /// ABI's declared integer types.
    pub async fn deploy(
        factory: &ContractFactory<C>,
        name: &str,
        symbol: &str,
        owner: Address,
        initial_supply: &Value,
        decimal: &Value,
    ) -> Result<Self> {
        let contract = factory
            .deploy(&[
                json!(name),
                json!(symbol),
                address_arg(owner),
                initial_supply.clone(),
                decimal.clone(),
            ])
            .await?;
        Ok(Self::new(contract))
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn connect(&self, from: Address) -> Self {
        Self::new(self.contract.connect(from))
    }

    pub async fn name(&self) -> Result<String> {
        expect_string(self.contract.call("name", &[]).await?, "name")
    }

    pub async fn symbol(&self) -> Result<String> {
        expect_string(self.contract.call("symbol", &[]).await?, "symbol")
    }

    pub async fn decimals(&self) -> Result<U256> {
        expect_uint(self.contract.call("decimals", &[]).await?, "decimals")
    }

    pub async fn total_supply(&self) -> Result<U256> {
        expect_uint(self.contract.call("totalSupply", &[]).await?, "totalSupply")
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        expect_uint(
            self.contract.call("balanceOf", &[address_arg(account)]).await?,
            "balanceOf",
        )
    }

    pub async fn transfer(&self, to: Address, amount: U256) -> Result<Receipt> {
        self.contract
            .send("transfer", &[address_arg(to), amount_arg(amount)])
            .await
    }
}
