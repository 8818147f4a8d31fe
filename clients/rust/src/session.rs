//! One claim screen: destination selection, route quotes and the claim itself.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use alloy_primitives::Address;
use link_claim_core::{
    ChainId, ChainTokenCatalog, ClaimError, ClaimProgress, DestinationChain, FailureSource,
    LinkClaimDetails, RecipientInput, RecipientSource, Route, Selection, SessionEvent,
    SessionState,
};
use tokio::sync::{watch, Mutex};

use crate::{
    api::ClaimServices,
    cache::{QuoteContext, RouteQuoteCache},
    config::ClaimClientConfig,
    errors::classify,
    executor::{ClaimExecutor, ClaimOutcome},
    progress::ProgressStateMachine,
};

/// Result of asking for a route for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRefresh {
    /// The selection claims the escrowed asset as-is
    NotNeeded,
    Ready(Route),
    Failed(ClaimError),
    /// The selection changed before the quote arrived
    Stale,
}

/// Claim session for a single link.
///
/// All methods take `&self`; selection changes may run while a route
/// refresh or a claim is pending.
pub struct ClaimSession {
    link: Arc<LinkClaimDetails>,
    services: ClaimServices,
    config: Arc<ClaimClientConfig>,
    cache: RouteQuoteCache,
    executor: ClaimExecutor,
    state: Mutex<SessionState>,
    // Bumped on every selection change
    generation: watch::Sender<u64>,
    // Held from the first recipient check until the claim outcome is returned
    claiming: AtomicBool,
}

struct ClaimingGuard<'a>(&'a AtomicBool);

impl Drop for ClaimingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ClaimSession {
    /// Start a session with a fresh route cache.
    pub fn open(
        link: LinkClaimDetails,
        destinations: impl IntoIterator<Item = DestinationChain>,
        services: ClaimServices,
        config: Arc<ClaimClientConfig>,
    ) -> Self {
        let link = Arc::new(link);
        let catalog = ChainTokenCatalog::new(link.chain_id, &config.chain_registry, destinations);
        let cache = RouteQuoteCache::new(Arc::clone(&services.quotes));
        let chain_names: Vec<_> = catalog
            .chains()
            .iter()
            .map(|c| (c.chain_id, c.name.clone()))
            .collect();

        let executor = ClaimExecutor::new(
            Arc::clone(&link),
            services.clone(),
            cache.clone(),
            Arc::clone(&config),
            ProgressStateMachine::new(),
        )
        .with_chain_names(chain_names);

        tracing::debug!(
            chain_id = link.chain_id,
            destinations = catalog.chains().len(),
            "Opened claim session"
        );

        Self {
            link,
            services,
            config,
            cache,
            executor,
            state: Mutex::new(SessionState::new(catalog)),
            generation: watch::Sender::new(0),
            claiming: AtomicBool::new(false),
        }
    }

    pub fn link(&self) -> &LinkClaimDetails {
        &self.link
    }

    pub fn cache(&self) -> &RouteQuoteCache {
        &self.cache
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection()
    }

    pub fn progress(&self) -> watch::Receiver<ClaimProgress> {
        self.executor.progress().subscribe()
    }

    pub fn current_progress(&self) -> ClaimProgress {
        self.executor.progress().current()
    }

    /// Whether a claim is running, including its recipient checks.
    pub fn is_claiming(&self) -> bool {
        self.claiming.load(Ordering::Acquire)
    }

    /// How the most recent claim that got past its checks ended.
    pub fn last_finished(&self) -> Option<ClaimProgress> {
        self.executor.progress().last_finished()
    }

    pub async fn select_chain(&self, chain_id: ChainId) -> Selection {
        let mut state = self.state.lock().await;
        state.apply(SessionEvent::ChainSelected(chain_id));
        self.bump_generation();
        state.selection()
    }

    pub async fn select_token(&self, token: Address) -> Selection {
        let mut state = self.state.lock().await;
        if state.apply(SessionEvent::TokenSelected(token)) {
            self.bump_generation();
        }
        state.selection()
    }

    /// Go back to a native claim on the origin chain.
    ///
    /// Refused while a claim is running. Any quote still pending for the
    /// previous selection is abandoned.
    pub async fn reset_to_origin(&self) -> Option<Selection> {
        // A claim sets its flag before reading the selection under this lock
        let mut state = self.state.lock().await;
        if self.is_claiming() || !self.current_progress().is_idle() {
            tracing::debug!(progress = %self.current_progress(), "Not resetting during a claim");
            return None;
        }

        if let Some(key) = state.selection().route_key() {
            self.cache.abandon(key).await;
        }
        state.apply(SessionEvent::ResetToOrigin);
        self.bump_generation();
        Some(state.selection())
    }

    pub async fn set_manual_entry(&self, enabled: bool) -> Selection {
        let mut state = self.state.lock().await;
        state.apply(SessionEvent::ManualEntryToggled(enabled));
        state.selection()
    }

    /// Typed-in recipient text. Cached routes stay valid.
    pub async fn set_manual_address(&self, address: impl Into<String>) -> Selection {
        let mut state = self.state.lock().await;
        state.apply(SessionEvent::ManualAddressChanged(address.into()));
        state.selection()
    }

    pub async fn dismiss_error(&self) {
        self.state.lock().await.apply(SessionEvent::ErrorDismissed);
    }

    /// Make sure a route exists for the current selection.
    pub async fn refresh_route(&self) -> RouteRefresh {
        let (key, generation, manual_address) = {
            let mut state = self.state.lock().await;
            let Some(key) = state.selection().route_key() else {
                return RouteRefresh::NotNeeded;
            };
            state.apply(SessionEvent::RouteRequested(key));
            let manual_address = state.manual_entry.then(|| state.manual_address.clone());
            (key, *self.generation.borrow(), manual_address)
        };

        let to_address = match manual_address {
            Some(address) => address,
            None => self.connected_account().await.map(|a| a.to_string()).unwrap_or_default(),
        };
        let context = QuoteContext::for_link(&self.link, to_address, self.config.slippage_percent);

        let mut changes = self.generation.subscribe();
        let result = tokio::select! {
            result = self.cache.get_or_fetch_route(key, &context) => Some(result),
            _ = changes.wait_for(|g| *g != generation) => None,
        };

        let mut state = self.state.lock().await;
        let Some(result) = result.filter(|_| *self.generation.borrow() == generation) else {
            tracing::debug!(%key, "Selection changed while quoting");
            return RouteRefresh::Stale;
        };

        match result {
            Ok(route) => {
                state.apply(SessionEvent::RouteResolved(key));
                RouteRefresh::Ready(route)
            }
            Err(error) => {
                state.apply(SessionEvent::RouteFailed(key, error.clone()));
                RouteRefresh::Failed(error)
            }
        }
    }

    /// Claim the link for the current selection.
    ///
    /// Failures are recorded in the session state and returned; nothing is
    /// sent anywhere before the recipient and chain checks pass.
    pub async fn claim(&self, source: RecipientSource) -> ClaimOutcome {
        if self
            .claiming
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Claim already in progress");
            return ClaimOutcome::Busy;
        }
        let _claiming = ClaimingGuard(&self.claiming);

        let selection = self.selection().await;
        let outcome = match self.check_claim(&source, &selection).await {
            Ok(recipient) => self.executor.claim(recipient, &selection).await,
            Err(error) => ClaimOutcome::Failed(error),
        };

        if let ClaimOutcome::Failed(error) = &outcome {
            self.state
                .lock()
                .await
                .apply(SessionEvent::ClaimFailed(error.clone()));
        }
        outcome
    }

    async fn check_claim(&self, source: &RecipientSource, selection: &Selection) -> Result<Address, ClaimError> {
        self.config.chain_policy.check_claim(
            self.link.chain_id,
            source.is_manual(),
            selection.destination_token.is_some(),
        )?;
        self.resolve_recipient(source).await
    }

    /// Turn a recipient source into an address, resolving aliases.
    pub async fn resolve_recipient(&self, source: &RecipientSource) -> Result<Address, ClaimError> {
        let raw = match source {
            RecipientSource::ConnectedSigner(address) => return Ok(*address),
            RecipientSource::Manual(raw) => raw,
        };

        match RecipientInput::parse(raw)? {
            RecipientInput::Address(address) => Ok(address),
            RecipientInput::Alias(name) => match self.services.names.resolve(&name).await {
                Ok(Some(address)) => {
                    tracing::debug!(%name, %address, "Resolved recipient alias");
                    Ok(address)
                }
                Ok(None) => Err(ClaimError::invalid_recipient("Unknown ens name")),
                Err(e) => Err(classify(FailureSource::NameResolution, &e)),
            },
        }
    }

    async fn connected_account(&self) -> Option<Address> {
        match self.services.signer.account().await {
            Ok(account) => account,
            Err(e) => {
                tracing::debug!(error = %e, "No connected account for quote");
                None
            }
        }
    }

    fn bump_generation(&self) {
        self.generation.send_modify(|g| *g += 1);
    }
}

impl std::fmt::Debug for ClaimSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimSession")
            .field("link", &self.link.link)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}
