//! Link Claim Client
//!
//! Async orchestration for claiming payment links: picking a destination
//! chain and token, quoting bridge routes, and settling the claim directly,
//! through the same-chain relay, or through the cross-chain relay.
//!
//! # Features
//!
//! - **Clean API**: Async traits for the quote service, relays, wallet and name resolution
//! - **Single-flight Quotes**: One quote fetch per destination, shared by concurrent callers
//! - **Observable Progress**: Claim stages published over a watch channel
//! - **Classified Errors**: Every failure maps onto a closed set of user-facing kinds
//!
//! # Example
//!
//! ```ignore
//! use link_claim_client::{ClaimClient, ClaimOutcome, RecipientSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ClaimClient::new("https://claims.example.com/api/proxy")?;
//!     let session = client.open_session(details, destinations, wallet, names);
//!
//!     match session.claim(RecipientSource::ConnectedSigner(account)).await {
//!         ClaimOutcome::Claimed(result) => println!("claimed in {:?}", result.tx_hashes),
//!         ClaimOutcome::Failed(error) => println!("{}", error),
//!         ClaimOutcome::Busy => {}
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod executor;
pub mod network;
pub mod progress;
pub mod session;

// Re-exports for convenient access
pub use api::{
    ClaimServices, FeeParams, NameResolver, QuoteApi, RelayApi, SigningEnvironment,
    StaticNameResolver, TransactionRequest, UnsignedClaimTx,
};
pub use cache::{QuoteContext, RouteQuoteCache};
pub use client::ClaimClient;
pub use config::{ClaimClientConfig, ClaimClientConfigBuilder, ConfigError, ServiceEndpoints, TimingConfig};
pub use errors::{ErrorCategory, ServiceError, ServiceResult};
pub use executor::{ClaimExecutor, ClaimOutcome, SettlementPlan};
pub use network::NetworkAligner;
pub use progress::ProgressStateMachine;
pub use session::{ClaimSession, RouteRefresh};

pub use link_claim_core::{
    ChainPolicy, ChainRegistry, ClaimError, ClaimErrorKind, ClaimProgress, ClaimResult,
    DestinationChain, LinkClaimDetails, RecipientSource, Route, RouteKey, Selection,
    SettlementStrategy, TokenOption,
};
