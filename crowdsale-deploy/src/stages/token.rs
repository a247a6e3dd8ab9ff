use crowdsale_sdk::chain::Chain;
use crowdsale_sdk::contracts::GameloftToken;
use crowdsale_sdk::Address;

use super::{owner, Context};
use crate::error::Result;
use crate::inputs::TokenConfig;
use crate::store::Stage;

/// Deploy the token with `owner` as both deployer and initial holder.
pub async fn deploy_token<C: Chain>(
    ctx: &Context<C>,
    owner: Address,
    config: &TokenConfig,
) -> Result<GameloftToken<C>> {
    let factory = ctx.factory(&ctx.options.token_contract, owner).await?;
    let token = GameloftToken::deploy(
        &factory,
        &config.name,
        &config.symbol,
        owner,
        &config.initial_supply,
        &config.decimal,
    )
    .await?;
    tracing::info!(address = %token.address(), "Deployed Gameloft Token");
    Ok(token)
}

/// `deploy-token`: validate `gameloftToken.json`, deploy, record the address.
///
/// A new token invalidates any sale recorded against the previous one.
pub async fn run<C: Chain>(ctx: &Context<C>, force: bool) -> Result<GameloftToken<C>> {
    let mut state = ctx.data.load_state().await?;
    state.begin(Stage::TokenDeployed, force)?;

    let config = TokenConfig::load(&ctx.data).await?;
    let accounts = ctx.data.load_accounts().await?;
    let owner = owner(&accounts)?;

    let token = deploy_token(ctx, owner, &config).await?;

    state.gl_token_address = Some(token.address());
    state.crowd_sale_address = None;
    state.stage = Stage::TokenDeployed;
    ctx.data.save_state(&state).await?;
    Ok(token)
}
