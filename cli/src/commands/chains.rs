use anyhow::Result;
use clap::Args;
use link_claim_core::{ChainId, ChainTokenCatalog};

use crate::config::CliConfig;

#[derive(Args)]
pub struct ChainsArgs {
    /// Chain the link was created on
    #[arg(long)]
    origin: ChainId,

    /// Print as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn execute(config: &CliConfig, args: ChainsArgs) -> Result<()> {
    let registry = config.chain_registry();
    let mut catalog = ChainTokenCatalog::new(args.origin, &registry, config.destinations.clone());

    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog.chains())?);
        return Ok(());
    }

    let chains = catalog.chains().to_vec();
    println!("Destinations for links on chain {}:", args.origin);
    for chain in chains {
        let label = if chain.chain_id == args.origin {
            " (origin, native claim)"
        } else {
            ""
        };
        println!("\n  {} [{}]{}", chain.name, chain.chain_id, label);

        catalog.select_chain(chain.chain_id);
        match catalog.tokens() {
            Some(tokens) => {
                for token in tokens {
                    println!("    {:<8} {} ({} decimals)", token.symbol, token.address, token.decimals);
                }
            }
            None if chain.chain_id != args.origin => println!("    no tokens listed"),
            None => {}
        }
    }

    let mainnet = if registry.is_mainnet(args.origin) { "mainnet" } else { "testnet" };
    println!("\nOrigin chain is treated as {}", mainnet);
    Ok(())
}
