//! Stages of an in-flight claim and the legal moves between them.

#[cfg(feature = "serialize_serde")]
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::strategy::SettlementStrategy;

/// Current stage of a claim, as surfaced to the user.
///
/// `Display` yields the label shown while the stage is active.
#[cfg_attr(feature = "serialize_serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum ClaimProgress {
    #[default]
    #[strum(serialize = "idle")]
    Idle,
    #[strum(serialize = "fetching route")]
    FetchingRoute,
    #[strum(serialize = "allow network switch")]
    AwaitingNetworkSwitchApproval,
    #[strum(serialize = "switching network")]
    SwitchingNetwork,
    #[strum(serialize = "preparing transaction")]
    PreparingTransaction,
    #[strum(serialize = "sign in wallet")]
    AwaitingSignature,
    #[strum(serialize = "executing transaction")]
    SubmittingTransaction,
    #[strum(serialize = "done")]
    Done,
    #[strum(serialize = "failed")]
    Failed,
}

impl ClaimProgress {
    pub fn is_idle(&self) -> bool {
        matches!(self, ClaimProgress::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimProgress::Done | ClaimProgress::Failed)
    }

    /// Whether moving from `self` to `next` follows the claim state machine.
    ///
    /// Network switch stages may drop straight back to idle when the wallet
    /// refuses the switch.
    pub fn can_transition_to(&self, next: ClaimProgress) -> bool {
        use ClaimProgress::*;

        match (*self, next) {
            (Idle, FetchingRoute | AwaitingNetworkSwitchApproval | PreparingTransaction) => true,
            (FetchingRoute, PreparingTransaction) => true,
            (AwaitingNetworkSwitchApproval, SwitchingNetwork) => true,
            (SwitchingNetwork, PreparingTransaction) => true,
            (PreparingTransaction, AwaitingSignature | SubmittingTransaction) => true,
            (AwaitingSignature, SubmittingTransaction) => true,
            (SubmittingTransaction, Done) => true,
            (AwaitingNetworkSwitchApproval | SwitchingNetwork, Idle) => true,
            (Done | Failed, Idle) => true,
            (from, Failed) => !from.is_idle() && !from.is_terminal(),
            _ => false,
        }
    }

    /// Labels rotated through while a relay call is pending.
    ///
    /// Relay completion is not observable, so these advance on a timer.
    /// Empty for the direct path, which reports real stages.
    pub fn relay_sequence(strategy: SettlementStrategy) -> &'static [ClaimProgress] {
        match strategy {
            SettlementStrategy::Direct => &[],
            SettlementStrategy::RelayedSameChain => &[
                ClaimProgress::PreparingTransaction,
                ClaimProgress::SubmittingTransaction,
            ],
            SettlementStrategy::RelayedCrossChain => &[
                ClaimProgress::FetchingRoute,
                ClaimProgress::PreparingTransaction,
                ClaimProgress::SubmittingTransaction,
            ],
        }
    }
}
