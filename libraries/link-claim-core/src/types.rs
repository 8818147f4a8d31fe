//! Data model shared by the catalog, the route cache and the claim executor.

use alloy_primitives::{Address, B256, U256};
#[cfg(feature = "serialize_serde")]
use serde::{Deserialize, Serialize};

use crate::{
    amount::{format_units, parse_units},
    error::ClaimError,
    strategy::SettlementStrategy,
};

pub use alloy_primitives::ChainId;

/// Everything known about the link being claimed.
///
/// Built once when a claim session starts and shared read-only afterwards.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClaimDetails {
    /// The full shareable link, including the key fragment
    pub link: String,
    /// Chain the funds are escrowed on
    pub chain_id: ChainId,
    /// Escrowed token contract (zero address for the native asset)
    pub token_address: Address,
    pub token_symbol: String,
    pub token_decimals: u8,
    /// Claimable amount in the token's smallest unit
    pub amount: U256,
    /// Address that created the link
    pub sender_address: Address,
}

impl LinkClaimDetails {
    /// Build details from a human readable amount such as `"12.5"`.
    pub fn from_display_amount(
        link: impl Into<String>,
        chain_id: ChainId,
        token_address: Address,
        token_symbol: impl Into<String>,
        token_decimals: u8,
        amount: &str,
        sender_address: Address,
    ) -> Result<Self, ClaimError> {
        let amount = parse_units(amount, token_decimals)
            .map_err(|e| ClaimError::unknown(format!("Invalid link amount: {}", e)))?;

        Ok(Self {
            link: link.into(),
            chain_id,
            token_address,
            token_symbol: token_symbol.into(),
            token_decimals,
            amount,
            sender_address,
        })
    }

    /// Claimable amount scaled by the token decimals.
    pub fn display_amount(&self) -> String {
        format_units(self.amount, self.token_decimals)
    }
}

/// A chain the claimer may receive funds on.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOption {
    pub chain_id: ChainId,
    pub name: String,
    pub icon_uri: String,
}

/// A token the claimer may receive on a destination chain.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOption {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[cfg_attr(feature = "serialize_serde", serde(default, rename = "logoURI"))]
    pub logo_uri: String,
}

/// One entry of the cross-chain destination catalog.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationChain {
    pub chain_id: ChainId,
    pub name: String,
    #[cfg_attr(feature = "serialize_serde", serde(default, rename = "chainIconURI"))]
    pub icon_uri: String,
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub tokens: Vec<TokenOption>,
}

/// Static metadata for a known chain.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDetails {
    pub chain_id: ChainId,
    pub name: String,
    #[cfg_attr(feature = "serialize_serde", serde(default))]
    pub icon_uri: String,
    /// Whether this is a production network (as opposed to a testnet)
    pub mainnet: bool,
}

/// Cache key for a route: the exact destination it was quoted for.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub chain_id: ChainId,
    pub token: Address,
}

impl RouteKey {
    pub fn new(chain_id: ChainId, token: Address) -> Self {
        Self { chain_id, token }
    }
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.token)
    }
}

/// A priced bridge/swap plan from the escrowed token to a destination token.
///
/// Only valid for the `(to_chain, to_token)` pair it was computed for.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub from_chain: ChainId,
    pub from_token: Address,
    pub from_amount: U256,
    pub to_chain: ChainId,
    pub to_token: Address,
    /// Minimum guaranteed output, in the destination token's smallest unit
    pub to_amount_min: U256,
    pub to_token_decimals: u8,
    pub to_token_name: String,
    pub to_token_symbol: String,
}

impl Route {
    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.to_chain, self.to_token)
    }

    /// Minimum output scaled by the destination token decimals.
    pub fn display_amount(&self) -> String {
        format_units(self.to_amount_min, self.to_token_decimals)
    }
}

/// The destination the claimer picked.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub destination_chain: ChainId,
    /// `None` claims the escrowed asset as-is on the origin chain
    pub destination_token: Option<TokenOption>,
}

impl Selection {
    /// Key of the route this selection needs, if it needs one.
    pub fn route_key(&self) -> Option<RouteKey> {
        self.destination_token
            .as_ref()
            .map(|token| RouteKey::new(self.destination_chain, token.address))
    }
}

/// Where cross-chain funds actually landed.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledDestination {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub token_address: Address,
    pub token_name: String,
    pub token_symbol: String,
    pub amount_min: U256,
    pub decimals: u8,
}

impl SettledDestination {
    pub fn from_route(route: &Route, chain_name: impl Into<String>) -> Self {
        Self {
            chain_id: route.to_chain,
            chain_name: chain_name.into(),
            token_address: route.to_token,
            token_name: route.to_token_name.clone(),
            token_symbol: route.to_token_symbol.clone(),
            amount_min: route.to_amount_min,
            decimals: route.to_token_decimals,
        }
    }

    pub fn display_amount(&self) -> String {
        format_units(self.amount_min, self.decimals)
    }
}

/// Outcome of a successful claim.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimResult {
    pub tx_hashes: Vec<B256>,
    pub recipient: Address,
    pub strategy: SettlementStrategy,
    /// Set only for cross-chain claims
    pub settled: Option<SettledDestination>,
}

impl ClaimResult {
    /// Minimum amount received on the destination chain, for cross-chain claims.
    pub fn display_amount(&self) -> Option<String> {
        self.settled.as_ref().map(SettledDestination::display_amount)
    }

    pub fn is_cross_chain(&self) -> bool {
        self.settled.is_some()
    }
}
