use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_logic::setup_logger;
use dotenv::dotenv;
use loot_forge::mint::MintRequest;
use loot_forge::{LootForgeConfig, PipelineOrchestrator, PipelineRequest};
use serde::Serialize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chains/loot-forge/config.toml")]
    config: String,
    /// Log everything at debug level instead of warnings only.
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roll loot, render its image and publish the metadata
    Generate,
    /// Mint a token to an address, subject to the daily allowance
    Mint {
        #[arg(long)]
        address: String,
        #[arg(long)]
        token_id: String,
    },
    /// Report whether an address may still mint today
    Allowance {
        #[arg(long)]
        address: String,
    },
    /// Handle a raw `{address, tokenID, mint}` request body
    Request {
        #[arg(long)]
        json: String,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct AllowanceBody {
    address: String,
    allowed: bool,
}

async fn run(args: Args) -> Result<serde_json::Value> {
    info!("Loading config from: {}", args.config);
    let config = LootForgeConfig::load(&args.config)?;
    let orchestrator = PipelineOrchestrator::connect(&config)?;

    let value = match args.command {
        Command::Generate => serde_json::to_value(orchestrator.generate().await?)?,
        Command::Mint { address, token_id } => {
            let request = MintRequest::parse(&address, &token_id)?;
            serde_json::to_value(orchestrator.mint(&request).await?)?
        }
        Command::Allowance { address } => {
            let request = MintRequest::parse(&address, "0")?;
            let allowed = orchestrator
                .has_daily_mint_allowance(&request.address)
                .await?;
            serde_json::to_value(AllowanceBody { address, allowed })?
        }
        Command::Request { json } => {
            let request: PipelineRequest =
                serde_json::from_str(&json).context("Malformed request body")?;
            serde_json::to_value(orchestrator.handle(request).await?)?
        }
    };

    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    let log_guard = setup_logger(args.verbose);

    match run(args).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            error!("Request failed: {:#}", e);
            let body = ErrorBody {
                error: format!("{:#}", e),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
            drop(log_guard);
            std::process::exit(1);
        }
    }
}
