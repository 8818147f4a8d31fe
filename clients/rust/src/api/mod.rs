//! API traits for the external collaborators of a claim.
//!
//! The claim flow talks to four services: a bridge/swap quote service, the
//! gasless relays, the claimer's wallet, and a name resolver. Each is an
//! async trait so sessions can run against HTTP clients or test doubles.

pub mod names;
pub mod quote;
pub mod relay;

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use link_claim_core::{ChainId, LinkClaimDetails, Route};

use crate::errors::ServiceResult;

pub use names::StaticNameResolver;
pub use quote::{RouteRequest, SquidQuoteClient};
pub use relay::{CrossChainClaimRequest, HttpRelayClient, RelayReceipt, SameChainClaimRequest};

/// Bridge/swap quote service.
#[async_trait]
pub trait QuoteApi: Send + Sync {
    /// Price a route from the escrowed token to a destination token.
    async fn fetch_route(&self, request: &RouteRequest) -> ServiceResult<Route>;
}

/// Gasless claim relays.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Claim on the origin chain without the claimer paying gas.
    async fn claim_gasless(&self, request: &SameChainClaimRequest) -> ServiceResult<RelayReceipt>;

    /// Claim and bridge the funds to another chain and token.
    async fn claim_cross_chain_gasless(
        &self,
        request: &CrossChainClaimRequest,
    ) -> ServiceResult<RelayReceipt>;
}

/// Unsigned claim transaction built for a link and recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedClaimTx {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// EIP-1559 fee parameters. Unset fields are left to the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeParams {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub gas_limit: Option<u64>,
}

/// A transaction ready for signing and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub chain_id: ChainId,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub fees: FeeParams,
}

impl TransactionRequest {
    pub fn new(chain_id: ChainId, tx: UnsignedClaimTx, fees: FeeParams) -> Self {
        Self {
            chain_id,
            to: tx.to,
            value: tx.value,
            data: tx.data,
            fees,
        }
    }
}

/// The claimer's wallet.
#[async_trait]
pub trait SigningEnvironment: Send + Sync {
    /// Address of the connected account, if any.
    async fn account(&self) -> ServiceResult<Option<Address>>;

    /// Chain the wallet is currently on.
    async fn active_chain(&self) -> ServiceResult<ChainId>;

    /// Ask the wallet to move to another chain. May be refused by the user.
    async fn switch_active_chain(&self, chain_id: ChainId) -> ServiceResult<()>;

    /// Build the claim transaction for a link.
    async fn prepare_transaction(
        &self,
        link: &LinkClaimDetails,
        recipient: Address,
    ) -> ServiceResult<UnsignedClaimTx>;

    /// Current fee parameters for a chain.
    async fn estimate_fees(&self, chain_id: ChainId) -> ServiceResult<FeeParams>;

    /// Sign and submit. Returns the transaction hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> ServiceResult<B256>;

    /// Wait until the transaction is confirmed.
    async fn wait_for_receipt(&self, hash: B256, chain_id: ChainId) -> ServiceResult<()>;
}

/// Resolves human readable names (e.g. `alice.eth`) to addresses.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> ServiceResult<Option<Address>>;
}

/// The set of collaborators a claim session works with.
#[derive(Clone)]
pub struct ClaimServices {
    pub quotes: Arc<dyn QuoteApi>,
    pub relay: Arc<dyn RelayApi>,
    pub signer: Arc<dyn SigningEnvironment>,
    pub names: Arc<dyn NameResolver>,
}

impl ClaimServices {
    pub fn new(
        quotes: Arc<dyn QuoteApi>,
        relay: Arc<dyn RelayApi>,
        signer: Arc<dyn SigningEnvironment>,
        names: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            quotes,
            relay,
            signer,
            names,
        }
    }
}

impl std::fmt::Debug for ClaimServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimServices").finish_non_exhaustive()
    }
}
