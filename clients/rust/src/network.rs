//! Getting the wallet onto the chain a direct claim needs.

use std::{sync::Arc, time::Duration};

use link_claim_core::{ChainId, ClaimError, ClaimProgress, FailureSource};

use crate::{api::SigningEnvironment, errors::classify, progress::ProgressStateMachine};

pub struct NetworkAligner {
    signer: Arc<dyn SigningEnvironment>,
    progress: ProgressStateMachine,
    settle_delay: Duration,
}

impl NetworkAligner {
    pub fn new(
        signer: Arc<dyn SigningEnvironment>,
        progress: ProgressStateMachine,
        settle_delay: Duration,
    ) -> Self {
        Self {
            signer,
            progress,
            settle_delay,
        }
    }

    /// Make sure the wallet is on `chain_id`, asking it to switch if not.
    ///
    /// A refused or failed switch leaves progress idle and yields a
    /// network switch error.
    pub async fn ensure_on_chain(&self, chain_id: ChainId) -> Result<(), ClaimError> {
        let active = self
            .signer
            .active_chain()
            .await
            .map_err(|e| classify(FailureSource::NetworkSwitch, &e))?;
        if active == chain_id {
            return Ok(());
        }

        tracing::info!(from = active, to = chain_id, "Requesting network switch");
        self.progress.advance(ClaimProgress::AwaitingNetworkSwitchApproval);

        if let Err(e) = self.signer.switch_active_chain(chain_id).await {
            self.progress.reset();
            return Err(classify(FailureSource::NetworkSwitch, &e));
        }

        self.progress.advance(ClaimProgress::SwitchingNetwork);
        // Wallet state lags behind the switch confirmation
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }
}

impl std::fmt::Debug for NetworkAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkAligner")
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}
