use crowdsale_sdk::chain::Chain;

use super::Context;
use crate::error::Result;
use crate::store::{AccountList, DeploymentState, Stage};

/// Record the node's signers and start a fresh deployment record.
pub async fn provision<C: Chain>(ctx: &Context<C>, force: bool) -> Result<AccountList> {
    ctx.data.load_state().await?.begin(Stage::AccountsWritten, force)?;

    let accounts = ctx.signers().await?;
    ctx.data.save_accounts(&accounts).await?;
    ctx.data
        .save_state(&DeploymentState::new(Stage::AccountsWritten))
        .await?;

    for (index, address) in accounts.as_slice().iter().enumerate() {
        tracing::info!(index, %address, "Signer");
    }
    Ok(accounts)
}
