//! crowdsale-deploy: run one stage of the crowdsale deployment.
//!
//!   crowdsale-deploy accounts
//!   crowdsale-deploy deploy          (accounts, token and sale in one run)
//!   crowdsale-deploy set-round
//!   crowdsale-deploy set-investor
//!
//! Talks to a development node with unlocked accounts (RPC_URL, default
//! http://127.0.0.1:8545).

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use crowdsale_deploy::inputs::InvestorConfig;
use crowdsale_deploy::settings::Settings;
use crowdsale_deploy::stages::{self, Context};
use crowdsale_deploy::store::{DataDir, ACCOUNTS_FILE, DEPLOYED_FILE};
use crowdsale_deploy::tasks::TaskReport;
use crowdsale_sdk::artifact::Artifacts;
use crowdsale_sdk::rpc::RpcClient;

#[derive(Parser)]
#[command(name = "crowdsale-deploy", about = "Staged deployment of the GameloftToken crowdsale")]
struct Args {
    /// Settings file (TOML)
    #[arg(long, env = "CROWDSALE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint
    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Directory holding the JSON inputs and hand-off files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Hardhat artifacts directory
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Re-run a stage that has already completed
    #[arg(long, global = true)]
    force: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record the node's signers in account.json
    Accounts,
    /// Record signers, deploy the token, then deploy and fund the sale
    Deploy,
    /// Deploy GameloftToken from gameloftToken.json
    DeployToken,
    /// Deploy CrowdSale from crowdsale.json and move the token supply into it
    DeploySale,
    /// Register every pool in round.json
    SetRound,
    /// Flag investors for a round
    SetInvestor {
        /// Policy applied when investor.json is absent
        #[arg(long, default_value = InvestorConfig::ROUND_ONE)]
        preset: String,
    },
    /// Show the recorded deployment
    Status,
}

fn settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(url) = &args.rpc_url {
        settings.rpc_url = url.clone();
    }
    if let Some(dir) = &args.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(dir) = &args.artifacts {
        settings.artifacts_dir = dir.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn summarize(reports: &[TaskReport]) {
    for report in reports {
        tracing::debug!(task = %report.label, outcome = %report.outcome, "Task report");
    }
    tracing::info!(count = reports.len(), "All tasks confirmed");
}

async fn status(ctx: &Context<RpcClient>) -> Result<()> {
    let state = ctx.data.load_state().await?;
    println!("data dir:         {}", ctx.data.root().display());
    println!("stage:            {} (schema v{})", state.stage, state.version);
    match state.gl_token_address {
        Some(address) => println!("glTokenAddress:   {address}"),
        None => println!("glTokenAddress:   -"),
    }
    match state.crowd_sale_address {
        Some(address) => println!("crowdSaleAddress: {address}"),
        None => println!("crowdSaleAddress: -"),
    }
    if ctx.data.exists(ACCOUNTS_FILE) {
        let accounts = ctx.data.load_accounts().await?;
        for (index, address) in accounts.as_slice().iter().enumerate() {
            println!("signer {index}:         {address}");
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let settings = settings(&args)?;
    let chain = settings.rpc_client()?;
    let ctx = Context::new(
        chain,
        DataDir::new(&settings.data_dir),
        Artifacts::new(&settings.artifacts_dir),
        settings.stage_options(),
    );
    let force = args.force;

    match args.command {
        Command::Accounts => {
            stages::accounts::provision(&ctx, force).await?;
        }
        Command::Deploy => {
            stages::accounts::provision(&ctx, force).await?;
            let token = stages::token::run(&ctx, force).await?;
            stages::sale::run(&ctx, Some(token), force).await?;
        }
        Command::DeployToken => {
            stages::token::run(&ctx, force).await?;
        }
        Command::DeploySale => {
            stages::sale::run(&ctx, None, force).await?;
        }
        Command::SetRound => {
            let reports = stages::rounds::run(&ctx, force).await?;
            summarize(&reports);
        }
        Command::SetInvestor { preset } => {
            let reports = stages::investors::run(&ctx, &preset, force).await?;
            summarize(&reports);
        }
        Command::Status => return status(&ctx).await,
    }

    tracing::info!(
        file = %ctx.data.path(DEPLOYED_FILE).display(),
        "Deployment record updated"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crowdsale_deploy=info,crowdsale_sdk=info".into()),
        )
        .init();

    run(Args::parse()).await
}
