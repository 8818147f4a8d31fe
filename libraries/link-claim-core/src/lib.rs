//! Link Claim Core
//!
//! Synchronous building blocks for claiming a payment link, optionally
//! bridging the escrowed funds to another chain and token.
//!
//! Nothing in this crate performs I/O. The async orchestration (quote
//! fetching, relays, wallets) lives in `link-claim-client` and drives the
//! types defined here.

pub mod amount;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod progress;
pub mod recipient;
pub mod session;
pub mod strategy;
pub mod types;

pub use amount::{format_units, parse_units, AmountError};
pub use catalog::{ChainRegistry, ChainTokenCatalog};
pub use classify::{ErrorClassifier, FailureSource};
pub use error::{ClaimError, ClaimErrorKind};
pub use progress::ClaimProgress;
pub use recipient::{RecipientInput, RecipientSource, ALIAS_SUFFIXES};
pub use session::{SessionEvent, SessionState};
pub use strategy::{ChainPolicy, SettlementStrategy};
pub use types::{
    ChainDetails, ChainId, ChainOption, ClaimResult, DestinationChain, LinkClaimDetails, Route,
    RouteKey, Selection, SettledDestination, TokenOption,
};
