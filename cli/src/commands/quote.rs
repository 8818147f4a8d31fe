use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::Args;
use link_claim_client::{ClaimClient, RouteKey};
use link_claim_core::ChainId;

use super::LinkArgs;
use crate::config::CliConfig;

#[derive(Args)]
pub struct QuoteArgs {
    #[command(flatten)]
    link: LinkArgs,

    /// Destination chain
    #[arg(long)]
    to_chain: ChainId,

    /// Destination token
    #[arg(long)]
    to_token: String,

    /// Recipient on the destination chain, if already known
    #[arg(long, default_value = "")]
    recipient: String,

    /// Print the route as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(config: &CliConfig, args: QuoteArgs) -> Result<()> {
    let details = args.link.details()?;
    let to_token = Address::from_str(&args.to_token)
        .with_context(|| format!("Invalid destination token: {}", args.to_token))?;

    let client = ClaimClient::with_config(config.client_config()?);
    let key = RouteKey::new(args.to_chain, to_token);

    println!("Quoting {} {} on chain {} -> {}...", details.display_amount(), details.token_symbol, details.chain_id, key);
    let route = client
        .quote(&details, key, &args.recipient)
        .await
        .with_context(|| format!("No route to {}", key))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        println!("\nRoute found:");
        println!("  Receive at least: {} {}", route.display_amount(), route.to_token_symbol);
        println!("  Token:            {} ({})", route.to_token_name, route.to_token);
        println!("  Chain:            {}", route.to_chain);
    }
    Ok(())
}
