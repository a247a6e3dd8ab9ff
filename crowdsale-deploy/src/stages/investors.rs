use crowdsale_sdk::chain::Chain;
use crowdsale_sdk::contracts::CrowdSale;
use crowdsale_sdk::Address;

use super::{owner, Context};
use crate::error::{Error, Result};
use crate::inputs::InvestorConfig;
use crate::store::{AccountList, Stage};
use crate::tasks::{SequentialTasks, TaskReport};

/// Flag each address as an investor in `config.round_id`.
pub async fn register_investors<C: Chain>(
    sale: &CrowdSale<C>,
    config: &InvestorConfig,
    investors: Vec<Address>,
    limit: usize,
) -> Result<Vec<TaskReport>> {
    let label = config.round_label();
    let (round_id, round) = (&config.round_id, label.as_str());
    let tasks = investors
        .into_iter()
        .map(|address| (address.to_string(), address))
        .collect();
    SequentialTasks::new("investors", limit, tasks)?
        .run(move |investor| async move {
            let receipt = sale.set_investor(round_id, investor, true).await?;
            tracing::info!(round = %round, %investor, "Set investor");
            Ok::<_, Error>(receipt.transaction_hash)
        })
        .await
}

/// `set-investor`: apply `investor.json`, or the named preset when absent.
///
/// `account.json` is only read when some investor is given by account index.
pub async fn run<C: Chain>(
    ctx: &Context<C>,
    preset: &str,
    force: bool,
) -> Result<Vec<TaskReport>> {
    let mut state = ctx.data.load_state().await?;
    let sale_address = state.require_crowd_sale()?;
    state.begin(Stage::InvestorsSet, force)?;

    let config = InvestorConfig::load_or_preset(&ctx.data, preset).await?;
    let (investors, owner) = if config.needs_accounts() {
        let accounts = ctx.data.load_accounts().await?;
        (config.resolve(&accounts)?, owner(&accounts)?)
    } else {
        // Literal addresses only; account.json is not consulted.
        (config.resolve(&AccountList::default())?, ctx.node_owner().await?)
    };
    let sale = ctx.bind_sale(sale_address, owner).await?;

    let reports = register_investors(&sale, &config, investors, ctx.options.max_tasks).await?;
    state.stage = Stage::InvestorsSet;
    ctx.data.save_state(&state).await?;
    Ok(reports)
}
