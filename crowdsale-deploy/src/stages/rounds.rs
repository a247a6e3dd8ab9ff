use crowdsale_sdk::chain::Chain;
use crowdsale_sdk::contracts::{CrowdSale, PoolDefinition};

use super::{owner, Context};
use crate::error::{Error, Result};
use crate::inputs::load_rounds;
use crate::store::Stage;
use crate::tasks::{SequentialTasks, TaskReport};

/// Register `pools` one by one, in the given order.
pub async fn register_pools<C: Chain>(
    sale: &CrowdSale<C>,
    pools: Vec<PoolDefinition>,
    limit: usize,
) -> Result<Vec<TaskReport>> {
    let tasks = pools.into_iter().map(|pool| (pool.label(), pool)).collect();
    SequentialTasks::new("pools", limit, tasks)?
        .run(move |pool| async move {
            let receipt = sale.create_pool(&pool).await?;
            tracing::info!(pool = %pool.label(), "Set round");
            Ok::<_, Error>(receipt.transaction_hash)
        })
        .await
}

/// `set-round`: register every pool in `round.json` with the recorded sale.
pub async fn run<C: Chain>(ctx: &Context<C>, force: bool) -> Result<Vec<TaskReport>> {
    let mut state = ctx.data.load_state().await?;
    let sale_address = state.require_crowd_sale()?;
    state.begin(Stage::RoundsConfigured, force)?;

    let pools = load_rounds(&ctx.data).await?;
    let accounts = ctx.data.load_accounts().await?;
    let sale = ctx.bind_sale(sale_address, owner(&accounts)?).await?;

    let reports = register_pools(&sale, pools, ctx.options.max_tasks).await?;
    state.stage = Stage::RoundsConfigured;
    ctx.data.save_state(&state).await?;
    Ok(reports)
}
