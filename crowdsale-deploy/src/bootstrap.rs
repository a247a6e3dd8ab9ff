//! In-process deployment for integration tests.
//!
//! Runs the token and sale stages back to back from the same input files as
//! the CLI, but keeps the handles in memory and never reads or writes
//! `deployedAddresses.json`, so every call yields an independent pair.

use crowdsale_sdk::chain::Chain;
use crowdsale_sdk::contracts::{CrowdSale, GameloftToken, PoolDefinition};
use crowdsale_sdk::Address;

use crate::error::Result;
use crate::inputs::{load_rounds, SaleConfig, TokenConfig, ROUNDS_FILE};
use crate::stages::{sale, token, Context};
use crate::store::AccountList;

/// A freshly deployed and funded token/sale pair.
#[derive(Debug, Clone)]
pub struct Deployment<C> {
    pub signers: AccountList,
    pub owner: Address,
    pub collector: Address,
    pub token: GameloftToken<C>,
    pub sale: CrowdSale<C>,
    pub token_config: TokenConfig,
    pub sale_config: SaleConfig,
    /// Contents of `round.json`, empty when the file is absent.
    pub rounds: Vec<PoolDefinition>,
}

impl<C: Chain> Deployment<C> {
    /// Signer `index`, if the node provided that many.
    pub fn signer(&self, index: usize) -> Option<Address> {
        self.signers.get(index)
    }
}

pub async fn deploy_fresh<C: Chain>(ctx: &Context<C>) -> Result<Deployment<C>> {
    let token_config = TokenConfig::load(&ctx.data).await?;
    let sale_config = SaleConfig::load(&ctx.data).await?;
    let rounds = if ctx.data.exists(ROUNDS_FILE) {
        load_rounds(&ctx.data).await?
    } else {
        Vec::new()
    };

    let signers = ctx.signers().await?;
    let owner = crate::stages::owner(&signers)?;
    let collector = ctx.collector(&signers)?;

    let token = token::deploy_token(ctx, owner, &token_config).await?;
    let sale = sale::deploy_sale(ctx, owner, token.address(), collector, &sale_config.rate).await?;
    sale::fund_sale(&token, sale.address()).await?;

    Ok(Deployment {
        signers,
        owner,
        collector,
        token,
        sale,
        token_config,
        sale_config,
        rounds,
    })
}
