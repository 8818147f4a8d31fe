//! Best-effort mapping of upstream failure text onto [`ClaimErrorKind`].
//!
//! The quote and relay services only report failures as free text, so the
//! classifier matches known fragments case-insensitively. Unmatched failures
//! fall back to a per-source default. The pattern list is not exhaustive.

use crate::error::{ClaimError, ClaimErrorKind};

/// Which collaborator produced the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureSource {
    /// Bridge/swap quote service
    Quote,
    /// Same-chain or cross-chain relay service
    Relay,
    /// Wallet / signing environment
    Signer,
    /// Wallet chain switch
    NetworkSwitch,
    /// Alias (name) resolution
    NameResolution,
    Other,
}

impl FailureSource {
    fn fallback(&self) -> ClaimErrorKind {
        match self {
            FailureSource::Quote => ClaimErrorKind::RouteNotFound,
            FailureSource::Relay | FailureSource::Signer => ClaimErrorKind::TransactionFailure,
            FailureSource::NetworkSwitch => ClaimErrorKind::NetworkSwitch,
            FailureSource::NameResolution => ClaimErrorKind::InvalidRecipient,
            FailureSource::Other => ClaimErrorKind::Unknown,
        }
    }
}

// Fragments are matched against the lowercased upstream message, first hit wins.
// "addres" also covers the quote service's misspelt "is not a valid to addres".
const PATTERNS: &[(&str, ClaimErrorKind)] = &[
    ("is not a valid to addres", ClaimErrorKind::InvalidRecipient),
    ("invalid recipient", ClaimErrorKind::InvalidRecipient),
    ("please increase your input amount", ClaimErrorKind::InsufficientAmount),
    ("below the minimum", ClaimErrorKind::InsufficientAmount),
    ("unsupported chain", ClaimErrorKind::UnsupportedChain),
    ("chain not supported", ClaimErrorKind::UnsupportedChain),
    ("no route", ClaimErrorKind::RouteNotFound),
    ("route not found", ClaimErrorKind::RouteNotFound),
    ("user rejected", ClaimErrorKind::TransactionFailure),
    ("user denied", ClaimErrorKind::TransactionFailure),
    ("insufficient funds", ClaimErrorKind::TransactionFailure),
    ("execution reverted", ClaimErrorKind::TransactionFailure),
];

pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify a raw failure message.
    ///
    /// The resulting error carries the kind's default user-facing message;
    /// the raw text is left to the caller to log.
    pub fn classify(source: FailureSource, raw: &str) -> ClaimError {
        Self::kind_of(source, raw).into()
    }

    pub fn kind_of(source: FailureSource, raw: &str) -> ClaimErrorKind {
        let raw = raw.to_lowercase();

        // A failed wallet chain switch is always a switch error, whatever the wallet says
        if source == FailureSource::NetworkSwitch {
            return ClaimErrorKind::NetworkSwitch;
        }

        PATTERNS
            .iter()
            .find(|(fragment, _)| raw.contains(fragment))
            .map(|(_, kind)| *kind)
            .unwrap_or_else(|| source.fallback())
    }
}
