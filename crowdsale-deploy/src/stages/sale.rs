use crowdsale_sdk::chain::{Chain, Receipt};
use crowdsale_sdk::contracts::{CrowdSale, GameloftToken};
use crowdsale_sdk::Address;
use serde_json::Value;

use super::{owner, Context};
use crate::error::Result;
use crate::inputs::SaleConfig;
use crate::store::Stage;

pub async fn deploy_sale<C: Chain>(
    ctx: &Context<C>,
    owner: Address,
    token: Address,
    collector: Address,
    rate: &Value,
) -> Result<CrowdSale<C>> {
    let factory = ctx.factory(&ctx.options.sale_contract, owner).await?;
    let sale = CrowdSale::deploy(&factory, token, collector, rate).await?;
    tracing::info!(address = %sale.address(), %token, %collector, "Deployed CrowdSale");
    Ok(sale)
}

/// Move the token's whole supply into the sale. `token` must be bound to the
/// holder of that supply.
pub async fn fund_sale<C: Chain>(token: &GameloftToken<C>, sale: Address) -> Result<Receipt> {
    let supply = token.total_supply().await?;
    let receipt = token.transfer(sale, supply).await?;
    tracing::info!(%sale, %supply, tx = %receipt.transaction_hash, "Funded CrowdSale");
    Ok(receipt)
}

/// `deploy-sale`: deploy the sale against the recorded token and fund it.
///
/// `token` is the handle from a preceding in-process token deployment; when
/// absent the recorded `glTokenAddress` is bound instead.
pub async fn run<C: Chain>(
    ctx: &Context<C>,
    token: Option<GameloftToken<C>>,
    force: bool,
) -> Result<CrowdSale<C>> {
    let mut state = ctx.data.load_state().await?;
    state.begin(Stage::SaleDeployedAndFunded, force)?;

    let config = SaleConfig::load(&ctx.data).await?;
    let accounts = ctx.data.load_accounts().await?;
    let owner = owner(&accounts)?;
    let collector = ctx.collector(&accounts)?;
    let token = match token {
        Some(token) => token.connect(owner),
        None => ctx.bind_token(state.require_token()?, owner).await?,
    };

    let sale = deploy_sale(ctx, owner, token.address(), collector, &config.rate).await?;
    // An unfunded sale: a failed transfer must leave the stage re-runnable.
    state.crowd_sale_address = Some(sale.address());
    state.stage = Stage::TokenDeployed;
    ctx.data.save_state(&state).await?;

    fund_sale(&token, sale.address()).await?;
    state.stage = Stage::SaleDeployedAndFunded;
    ctx.data.save_state(&state).await?;
    Ok(sale)
}
