use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod signer;

use commands::{chains::ChainsArgs, claim::ClaimArgs, quote::QuoteArgs};

#[derive(Parser)]
#[command(name = "link-claim")]
#[command(about = "CLI tool for claiming payment links, same-chain or cross-chain", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the YAML config (defaults to <config dir>/link-claim/config.yaml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Backend proxy base URL, overriding the config file
    #[arg(long, global = true)]
    proxy_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the destination chains and tokens offered for a link's chain
    Chains(ChainsArgs),

    /// Quote a cross-chain route for a link
    Quote(QuoteArgs),

    /// Claim a link through the relays
    Claim(ClaimArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config::CliConfig::load(cli.config.as_deref(), cli.proxy_url)?;

    match cli.command {
        Commands::Chains(args) => commands::chains::execute(&config, args),
        Commands::Quote(args) => commands::quote::execute(&config, args).await,
        Commands::Claim(args) => commands::claim::execute(&config, args).await,
    }
}
