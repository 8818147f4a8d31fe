//! Recipient parsing for claims to a connected wallet or a typed-in address.

use std::str::FromStr;

use alloy_primitives::Address;

use crate::error::ClaimError;

/// Suffixes that mark an input as a name to resolve rather than an address.
pub const ALIAS_SUFFIXES: &[&str] = &[".eth"];

/// Where the claim recipient comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSource {
    /// The address of the wallet connected to the signing environment
    ConnectedSigner(Address),
    /// Free text typed by the claimer: an address or an alias
    Manual(String),
}

impl RecipientSource {
    pub fn is_manual(&self) -> bool {
        matches!(self, RecipientSource::Manual(_))
    }
}

/// A syntactically valid recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientInput {
    Address(Address),
    /// Lowercased alias, still to be resolved
    Alias(String),
}

impl RecipientInput {
    /// Parse typed-in recipient text.
    ///
    /// Mixed-case addresses must carry a valid checksum.
    pub fn parse(raw: &str) -> Result<Self, ClaimError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ClaimError::invalid_recipient("Please enter a valid address"));
        }

        let lowered = raw.to_lowercase();
        if ALIAS_SUFFIXES.iter().any(|suffix| lowered.ends_with(suffix)) {
            return Ok(RecipientInput::Alias(lowered));
        }

        let hex = raw.strip_prefix("0x").unwrap_or(raw);
        let mixed_case = hex.chars().any(|c| c.is_ascii_uppercase())
            && hex.chars().any(|c| c.is_ascii_lowercase());

        let parsed = if mixed_case {
            Address::parse_checksummed(raw, None).ok()
        } else {
            Address::from_str(raw).ok()
        };

        parsed
            .map(RecipientInput::Address)
            .ok_or_else(|| ClaimError::invalid_recipient("Please enter a valid address"))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, RecipientInput::Alias(_))
    }
}
