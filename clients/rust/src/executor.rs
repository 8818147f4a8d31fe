//! Claim execution over the three settlement paths.

use std::{
    collections::HashMap,
    future::Future,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use alloy_primitives::{Address, B256};
use link_claim_core::{
    ChainId, ClaimError, ClaimProgress, ClaimResult, FailureSource, LinkClaimDetails, Route,
    Selection, SettledDestination, SettlementStrategy,
};

use crate::{
    api::{
        ClaimServices, CrossChainClaimRequest, FeeParams, RelayReceipt, SameChainClaimRequest,
        TransactionRequest,
    },
    cache::RouteQuoteCache,
    config::ClaimClientConfig,
    errors::{classify, ServiceError, ServiceResult},
    network::NetworkAligner,
    progress::ProgressStateMachine,
};

/// What a claim attempt came to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed(ClaimResult),
    Failed(ClaimError),
    /// Another claim was already running; nothing was done
    Busy,
}

impl ClaimOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed(_))
    }

    pub fn result(&self) -> Option<&ClaimResult> {
        match self {
            ClaimOutcome::Claimed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClaimError> {
        match self {
            ClaimOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Resolved settlement path for one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementPlan {
    Direct,
    SameChain,
    CrossChain(Route),
}

impl SettlementPlan {
    pub fn strategy(&self) -> SettlementStrategy {
        match self {
            SettlementPlan::Direct => SettlementStrategy::Direct,
            SettlementPlan::SameChain => SettlementStrategy::RelayedSameChain,
            SettlementPlan::CrossChain(_) => SettlementStrategy::RelayedCrossChain,
        }
    }
}

// Clears the active flag and returns progress to idle however the claim ends.
// `Done`/`Failed` stay readable through `ProgressStateMachine::last_finished`.
struct ActiveGuard<'a> {
    active: &'a AtomicBool,
    progress: &'a ProgressStateMachine,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.progress.reset();
        self.active.store(false, Ordering::Release);
    }
}

/// Runs claims for one link, one at a time.
pub struct ClaimExecutor {
    link: Arc<LinkClaimDetails>,
    services: ClaimServices,
    cache: RouteQuoteCache,
    config: Arc<ClaimClientConfig>,
    progress: ProgressStateMachine,
    aligner: NetworkAligner,
    chain_names: HashMap<ChainId, String>,
    active: AtomicBool,
}

impl ClaimExecutor {
    pub fn new(
        link: Arc<LinkClaimDetails>,
        services: ClaimServices,
        cache: RouteQuoteCache,
        config: Arc<ClaimClientConfig>,
        progress: ProgressStateMachine,
    ) -> Self {
        let aligner = NetworkAligner::new(
            Arc::clone(&services.signer),
            progress.clone(),
            config.timing.network_settle_delay,
        );

        Self {
            link,
            services,
            cache,
            config,
            progress,
            aligner,
            chain_names: HashMap::new(),
            active: AtomicBool::new(false),
        }
    }

    /// Display names for destination chains, overriding the registry.
    pub fn with_chain_names(mut self, names: impl IntoIterator<Item = (ChainId, String)>) -> Self {
        self.chain_names.extend(names);
        self
    }

    pub fn progress(&self) -> &ProgressStateMachine {
        &self.progress
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Claim the link to `recipient`, settling as `selection` asks.
    ///
    /// Never returns with progress anywhere but idle.
    pub async fn claim(&self, recipient: Address, selection: &Selection) -> ClaimOutcome {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Claim already in progress");
            return ClaimOutcome::Busy;
        }
        let _guard = ActiveGuard {
            active: &self.active,
            progress: &self.progress,
        };

        match self.run(recipient, selection).await {
            Ok(result) => {
                tracing::info!(
                    strategy = %result.strategy,
                    recipient = %result.recipient,
                    tx_hashes = ?result.tx_hashes,
                    "Claim complete"
                );
                ClaimOutcome::Claimed(result)
            }
            Err(error) => {
                tracing::warn!(kind = %error.kind(), error = %error, "Claim failed");
                if self.progress.current().can_transition_to(ClaimProgress::Failed) {
                    self.progress.advance(ClaimProgress::Failed);
                }
                ClaimOutcome::Failed(error)
            }
        }
    }

    /// Pick the settlement path. A token selection needs its cached route.
    pub async fn plan(&self, selection: &Selection) -> Result<SettlementPlan, ClaimError> {
        let strategy = SettlementStrategy::select(
            selection.destination_token.is_some(),
            self.config.chain_policy.requires_direct(self.link.chain_id),
        );

        match (strategy, selection.route_key()) {
            (SettlementStrategy::RelayedCrossChain, Some(key)) => self
                .cache
                .get(key)
                .await
                .map(SettlementPlan::CrossChain)
                .ok_or_else(ClaimError::route_not_found),
            (SettlementStrategy::RelayedCrossChain, None) => Err(ClaimError::route_not_found()),
            (SettlementStrategy::Direct, _) => Ok(SettlementPlan::Direct),
            (SettlementStrategy::RelayedSameChain, _) => Ok(SettlementPlan::SameChain),
        }
    }

    async fn run(&self, recipient: Address, selection: &Selection) -> Result<ClaimResult, ClaimError> {
        let plan = self.plan(selection).await?;
        tracing::info!(strategy = %plan.strategy(), %recipient, "Claiming link");

        match plan {
            SettlementPlan::Direct => self.claim_direct(recipient).await,
            SettlementPlan::SameChain => self.claim_same_chain(recipient).await,
            SettlementPlan::CrossChain(route) => self.claim_cross_chain(recipient, route).await,
        }
    }

    async fn claim_direct(&self, recipient: Address) -> Result<ClaimResult, ClaimError> {
        let chain_id = self.link.chain_id;
        let signer = &self.services.signer;
        let signer_error = |e: ServiceError| classify(FailureSource::Signer, &e);

        self.aligner.ensure_on_chain(chain_id).await?;
        self.progress.advance(ClaimProgress::PreparingTransaction);

        let unsigned = signer
            .prepare_transaction(&self.link, recipient)
            .await
            .map_err(signer_error)?;

        self.progress.advance(ClaimProgress::AwaitingSignature);

        let fees = match signer.estimate_fees(chain_id).await {
            Ok(fees) => fees,
            Err(e) => {
                tracing::warn!(chain_id, error = %e, "Fee estimation failed, using wallet defaults");
                FeeParams::default()
            }
        };

        let hash = signer
            .send_transaction(TransactionRequest::new(chain_id, unsigned, fees))
            .await
            .map_err(signer_error)?;

        self.progress.advance(ClaimProgress::SubmittingTransaction);
        signer
            .wait_for_receipt(hash, chain_id)
            .await
            .map_err(signer_error)?;

        self.progress.advance(ClaimProgress::Done);
        Ok(ClaimResult {
            tx_hashes: vec![hash],
            recipient,
            strategy: SettlementStrategy::Direct,
            settled: None,
        })
    }

    async fn claim_same_chain(&self, recipient: Address) -> Result<ClaimResult, ClaimError> {
        let endpoints = &self.config.endpoints;
        let request = SameChainClaimRequest {
            link: self.link.link.clone(),
            recipient_address: recipient,
            base_url: endpoints.same_chain_claim_url(),
            api_key: endpoints.api_key.clone(),
        };

        let receipt = self
            .relay_with_progress(
                SettlementStrategy::RelayedSameChain,
                self.services.relay.claim_gasless(&request),
            )
            .await?;

        Ok(ClaimResult {
            tx_hashes: vec![parse_tx_hash(&receipt)?],
            recipient,
            strategy: SettlementStrategy::RelayedSameChain,
            settled: None,
        })
    }

    async fn claim_cross_chain(&self, recipient: Address, route: Route) -> Result<ClaimResult, ClaimError> {
        let endpoints = &self.config.endpoints;
        let request = CrossChainClaimRequest {
            link: self.link.link.clone(),
            recipient_address: recipient,
            destination_chain_id: route.to_chain,
            destination_token: route.to_token,
            is_mainnet: self.config.chain_registry.is_mainnet(self.link.chain_id),
            squid_router_url: endpoints.relay_route_url(),
            base_url: endpoints.cross_chain_claim_url(),
            api_key: endpoints.api_key.clone(),
        };

        let receipt = self
            .relay_with_progress(
                SettlementStrategy::RelayedCrossChain,
                self.services.relay.claim_cross_chain_gasless(&request),
            )
            .await?;

        Ok(ClaimResult {
            tx_hashes: vec![parse_tx_hash(&receipt)?],
            recipient,
            strategy: SettlementStrategy::RelayedCrossChain,
            settled: Some(SettledDestination::from_route(
                &route,
                self.chain_name(route.to_chain),
            )),
        })
    }

    /// Await a relay call while rotating through the strategy's progress labels.
    ///
    /// Labels advance on a timer and stop at the last one. Once the relay
    /// answers successfully the rest are walked, then progress is done.
    async fn relay_with_progress<F>(
        &self,
        strategy: SettlementStrategy,
        call: F,
    ) -> Result<RelayReceipt, ClaimError>
    where
        F: Future<Output = ServiceResult<RelayReceipt>>,
    {
        let stages = ClaimProgress::relay_sequence(strategy);
        let interval = self.config.timing.progress_rotation_interval;

        let mut shown = 0;
        if let Some(first) = stages.first() {
            self.progress.advance(*first);
            shown = 1;
        }

        tokio::pin!(call);
        let result = loop {
            tokio::select! {
                result = &mut call => break result,
                _ = tokio::time::sleep(interval), if shown < stages.len() => {
                    self.progress.advance(stages[shown]);
                    shown += 1;
                }
            }
        };
        let receipt = result.map_err(|e| classify(FailureSource::Relay, &e))?;

        for stage in &stages[shown..] {
            self.progress.advance(*stage);
        }
        self.progress.advance(ClaimProgress::Done);
        Ok(receipt)
    }

    fn chain_name(&self, chain_id: ChainId) -> String {
        self.chain_names
            .get(&chain_id)
            .cloned()
            .or_else(|| self.config.chain_registry.name(chain_id).map(str::to_string))
            .unwrap_or_else(|| format!("Chain {}", chain_id))
    }
}

impl std::fmt::Debug for ClaimExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimExecutor")
            .field("chain_id", &self.link.chain_id)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

fn parse_tx_hash(receipt: &RelayReceipt) -> Result<B256, ClaimError> {
    B256::from_str(receipt.tx_hash.trim()).map_err(|e| {
        classify(
            FailureSource::Relay,
            &ServiceError::invalid_response(format!(
                "relay returned malformed tx hash {:?}: {}",
                receipt.tx_hash, e
            )),
        )
    })
}
