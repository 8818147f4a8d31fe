//! Settlement strategy selection and per-chain claim policy.

use std::collections::BTreeSet;

#[cfg(feature = "serialize_serde")]
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{error::ClaimError, types::ChainId};

/// Ethereum mainnet.
pub const ETHEREUM_MAINNET: ChainId = 1;

/// How a claim reaches the chain.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SettlementStrategy {
    /// The claimer signs and pays for the claim transaction
    #[strum(serialize = "direct")]
    Direct,
    /// A relay submits the claim on the origin chain, no gas needed
    #[strum(serialize = "relayed-same-chain")]
    RelayedSameChain,
    /// A relay claims and bridges the funds to the destination chain and token
    #[strum(serialize = "relayed-cross-chain")]
    RelayedCrossChain,
}

impl SettlementStrategy {
    /// Pure decision function for the settlement path.
    pub fn select(has_destination_token: bool, origin_requires_direct: bool) -> Self {
        match (has_destination_token, origin_requires_direct) {
            (true, _) => SettlementStrategy::RelayedCrossChain,
            (false, true) => SettlementStrategy::Direct,
            (false, false) => SettlementStrategy::RelayedSameChain,
        }
    }

    pub fn is_relayed(&self) -> bool {
        !matches!(self, SettlementStrategy::Direct)
    }
}

/// Which chains need special handling.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize_serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPolicy {
    /// Chains without relay support, where the claimer must sign the claim
    pub direct_settlement_chains: BTreeSet<ChainId>,
    /// Chains where claiming to a typed-in address or cross-chain is refused
    pub manual_disabled_chains: BTreeSet<ChainId>,
}

impl Default for ChainPolicy {
    fn default() -> Self {
        Self {
            direct_settlement_chains: BTreeSet::from([ETHEREUM_MAINNET]),
            manual_disabled_chains: BTreeSet::from([ETHEREUM_MAINNET]),
        }
    }
}

impl ChainPolicy {
    pub fn requires_direct(&self, chain_id: ChainId) -> bool {
        self.direct_settlement_chains.contains(&chain_id)
    }

    pub fn is_manual_disabled(&self, chain_id: ChainId) -> bool {
        self.manual_disabled_chains.contains(&chain_id)
    }

    /// Reject claim kinds the origin chain forbids, before any service call.
    pub fn check_claim(
        &self,
        origin: ChainId,
        manual_recipient: bool,
        cross_chain: bool,
    ) -> Result<(), ClaimError> {
        if !self.is_manual_disabled(origin) {
            return Ok(());
        }
        if manual_recipient {
            return Err(ClaimError::unsupported_chain(
                "Mainnet not supported for manual claiming",
            ));
        }
        if cross_chain {
            return Err(ClaimError::unsupported_chain(
                "Mainnet not supported for cross-chain claiming",
            ));
        }
        Ok(())
    }
}
