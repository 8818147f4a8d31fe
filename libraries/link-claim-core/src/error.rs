//! Closed error taxonomy for the claim flow.
//!
//! Every failure on the claim path maps to exactly one [`ClaimErrorKind`].
//! The message carried by [`ClaimError`] is meant to be shown to the user.

#[cfg(feature = "serialize_serde")]
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};
use thiserror::Error;

#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum ClaimErrorKind {
    /// Destination address rejected (invalid form, unknown alias, or refused by the quote service)
    #[strum(serialize = "InvalidRecipientError")]
    InvalidRecipient,
    /// Amount below the bridge minimum
    #[strum(serialize = "InsufficientAmountError")]
    InsufficientAmount,
    /// No route for the chosen chain and token
    #[strum(serialize = "RouteNotFoundError")]
    RouteNotFound,
    #[strum(serialize = "NetworkSwitchError")]
    NetworkSwitch,
    /// Claim kind forbidden on the origin chain
    #[strum(serialize = "UnsupportedChainError")]
    UnsupportedChain,
    /// Signing, submission or confirmation failed
    #[strum(serialize = "TransactionFailure")]
    TransactionFailure,
    #[strum(serialize = "UnknownError")]
    Unknown,
}

impl ClaimErrorKind {
    /// Message shown when nothing more specific is known.
    pub fn default_message(&self) -> &'static str {
        match self {
            ClaimErrorKind::InvalidRecipient => "Please enter a valid recipient address",
            ClaimErrorKind::InsufficientAmount => {
                "This link can not be claimed cross-chain, it does not meet the minimum amount."
            }
            ClaimErrorKind::RouteNotFound => "No route found for the chosen chain and token",
            ClaimErrorKind::NetworkSwitch => "Error switching network",
            ClaimErrorKind::UnsupportedChain => "This chain does not support this kind of claim",
            ClaimErrorKind::TransactionFailure => "Something went wrong while claiming",
            ClaimErrorKind::Unknown => "Something unexpected went wrong",
        }
    }

    /// Whether the failure was caught before any service call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClaimErrorKind::InvalidRecipient | ClaimErrorKind::UnsupportedChain
        )
    }
}

/// A classified, user-presentable claim failure.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClaimError {
    kind: ClaimErrorKind,
    message: String,
}

impl ClaimError {
    pub fn new(kind: ClaimErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ClaimErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn invalid_recipient(message: impl Into<String>) -> Self {
        Self::new(ClaimErrorKind::InvalidRecipient, message)
    }

    pub fn route_not_found() -> Self {
        ClaimErrorKind::RouteNotFound.into()
    }

    pub fn network_switch() -> Self {
        ClaimErrorKind::NetworkSwitch.into()
    }

    pub fn unsupported_chain(message: impl Into<String>) -> Self {
        Self::new(ClaimErrorKind::UnsupportedChain, message)
    }

    pub fn transaction_failure(message: impl Into<String>) -> Self {
        Self::new(ClaimErrorKind::TransactionFailure, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ClaimErrorKind::Unknown, message)
    }
}

impl From<ClaimErrorKind> for ClaimError {
    fn from(kind: ClaimErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}
