use std::{str::FromStr, sync::Arc};

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use clap::Args;
use link_claim_client::{ClaimClient, ClaimOutcome, RecipientSource, RouteRefresh};
use link_claim_core::ChainId;

use super::LinkArgs;
use crate::{config::CliConfig, signer::DetachedSigner};

#[derive(Args)]
pub struct ClaimArgs {
    #[command(flatten)]
    link: LinkArgs,

    /// Recipient address or `.eth` name
    #[arg(long, short = 'r')]
    recipient: String,

    /// Destination chain for a cross-chain claim
    #[arg(long)]
    to_chain: Option<ChainId>,

    /// Destination token for a cross-chain claim (defaults to the chain's first token)
    #[arg(long)]
    to_token: Option<String>,
}

pub async fn execute(config: &CliConfig, args: ClaimArgs) -> Result<()> {
    let details = args.link.details()?;
    let origin = details.chain_id;

    let client = ClaimClient::with_config(config.client_config()?);
    let session = client.open_session(
        details,
        config.destinations.clone(),
        Arc::new(DetachedSigner::new(None, origin)),
        Arc::new(config.name_resolver()),
    );

    let mut progress = session.progress();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let stage = *progress.borrow_and_update();
            if !stage.is_idle() {
                println!("  ... {}", stage);
            }
        }
    });

    // Quotes use the typed-in recipient as their destination address
    session.set_manual_entry(true).await;
    session.set_manual_address(args.recipient.clone()).await;

    if let Some(chain_id) = args.to_chain {
        session.select_chain(chain_id).await;
        if let Some(token) = &args.to_token {
            let token = Address::from_str(token)
                .with_context(|| format!("Invalid destination token: {}", token))?;
            let selection = session.select_token(token).await;
            if selection.destination_token.map(|t| t.address) != Some(token) {
                bail!("Token {} is not offered on chain {}", token, chain_id);
            }
        }

        match session.refresh_route().await {
            RouteRefresh::Ready(route) => println!(
                "Route: at least {} {} on chain {}",
                route.display_amount(),
                route.to_token_symbol,
                route.to_chain
            ),
            RouteRefresh::Failed(error) => bail!("{} ({})", error, error.kind()),
            RouteRefresh::NotNeeded | RouteRefresh::Stale => {}
        }
    }

    println!("Claiming {} to {}...", session.link().link, args.recipient);
    let outcome = session.claim(RecipientSource::Manual(args.recipient)).await;
    printer.abort();

    match outcome {
        ClaimOutcome::Claimed(result) => {
            println!("\nClaimed ({})", result.strategy);
            println!("  Recipient: {}", result.recipient);
            for hash in &result.tx_hashes {
                println!("  Tx:        {}", hash);
            }
            if let Some(settled) = &result.settled {
                println!(
                    "  Settled:   at least {} {} on {}",
                    settled.display_amount(),
                    settled.token_symbol,
                    settled.chain_name
                );
            }
            Ok(())
        }
        ClaimOutcome::Failed(error) => bail!("{} ({})", error, error.kind()),
        ClaimOutcome::Busy => bail!("A claim is already in progress"),
    }
}
