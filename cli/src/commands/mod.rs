pub mod chains;
pub mod claim;
pub mod quote;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::Args;
use link_claim_client::LinkClaimDetails;
use link_claim_core::ChainId;

/// The link being claimed, as printed by the link creator.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Full claim link, including the `#p=` key fragment
    #[arg(long)]
    link: String,

    /// Chain the link was created on
    #[arg(long)]
    chain_id: ChainId,

    /// Escrowed token (omit for the native asset)
    #[arg(long, default_value_t = Address::ZERO)]
    token_address: Address,

    #[arg(long, default_value = "ETH")]
    token_symbol: String,

    #[arg(long, default_value_t = 18)]
    token_decimals: u8,

    /// Amount in token units, e.g. 12.5
    #[arg(long)]
    amount: String,

    /// Address that created the link
    #[arg(long)]
    sender: Address,
}

impl LinkArgs {
    pub fn details(&self) -> Result<LinkClaimDetails> {
        LinkClaimDetails::from_display_amount(
            self.link.clone(),
            self.chain_id,
            self.token_address,
            self.token_symbol.clone(),
            self.token_decimals,
            &self.amount,
            self.sender,
        )
        .with_context(|| format!("Invalid link amount: {}", self.amount))
    }
}
