//! Route quotes keyed by destination, fetched at most once per key.
//!
//! Concurrent callers asking for the same key share one in-flight fetch.
//! The fetch runs as its own task, so it completes and fills the cache even
//! when every caller stops waiting for it.

use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{Address, U256};
use futures::future::{BoxFuture, FutureExt, Shared};
use link_claim_core::{ChainId, ClaimError, FailureSource, LinkClaimDetails, Route, RouteKey};
use tokio::{sync::Mutex, task::AbortHandle};

use crate::{api::QuoteApi, api::RouteRequest, errors::classify};

type SharedFetch = Shared<BoxFuture<'static, Result<Route, ClaimError>>>;

/// Everything a quote needs besides the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteContext {
    pub from_chain: ChainId,
    pub from_token: Address,
    pub from_amount: U256,
    /// Link sender
    pub from_address: Address,
    /// Recipient as currently known; may be empty
    pub to_address: String,
    pub slippage_percent: u32,
}

impl QuoteContext {
    pub fn for_link(link: &LinkClaimDetails, to_address: impl Into<String>, slippage_percent: u32) -> Self {
        Self {
            from_chain: link.chain_id,
            from_token: link.token_address,
            from_amount: link.amount,
            from_address: link.sender_address,
            to_address: to_address.into(),
            slippage_percent,
        }
    }

    pub fn request(&self, key: RouteKey) -> RouteRequest {
        RouteRequest {
            from_chain: self.from_chain.to_string(),
            from_token: self.from_token,
            from_amount: self.from_amount.to_string(),
            to_chain: key.chain_id.to_string(),
            to_token: key.token,
            slippage: self.slippage_percent,
            from_address: self.from_address,
            to_address: self.to_address.clone(),
        }
    }
}

struct InFlight {
    id: u64,
    fetch: SharedFetch,
    task: AbortHandle,
}

#[derive(Default)]
struct CacheState {
    routes: HashMap<RouteKey, Route>,
    in_flight: HashMap<RouteKey, InFlight>,
    next_id: u64,
}

/// Per-session route cache with single-flight fetching.
#[derive(Clone)]
pub struct RouteQuoteCache {
    quotes: Arc<dyn QuoteApi>,
    state: Arc<Mutex<CacheState>>,
}

impl RouteQuoteCache {
    pub fn new(quotes: Arc<dyn QuoteApi>) -> Self {
        Self {
            quotes,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Cached route for `key`, fetching it if needed.
    ///
    /// Failures are classified and not cached; the next call fetches again.
    pub async fn get_or_fetch_route(
        &self,
        key: RouteKey,
        context: &QuoteContext,
    ) -> Result<Route, ClaimError> {
        let fetch = {
            let mut state = self.state.lock().await;
            if let Some(route) = state.routes.get(&key) {
                return Ok(route.clone());
            }
            match state.in_flight.get(&key) {
                Some(in_flight) => {
                    tracing::debug!(%key, "Joining in-flight route fetch");
                    in_flight.fetch.clone()
                }
                None => self.start_fetch(&mut state, key, context.request(key)),
            }
        };

        fetch.await
    }

    fn start_fetch(&self, state: &mut CacheState, key: RouteKey, request: RouteRequest) -> SharedFetch {
        let id = state.next_id;
        state.next_id += 1;

        let quotes = Arc::clone(&self.quotes);
        let cache = Arc::clone(&self.state);

        let fetch = async move {
            tracing::debug!(%key, "Fetching route");
            let result = match quotes.fetch_route(&request).await {
                Ok(route) if route.key() == key => Ok(route),
                Ok(route) => {
                    tracing::warn!(%key, got = %route.key(), "Quote does not match the requested destination");
                    Err(ClaimError::route_not_found())
                }
                Err(e) => Err(classify(FailureSource::Quote, &e)),
            };

            let mut state = cache.lock().await;
            if state.in_flight.get(&key).is_some_and(|f| f.id == id) {
                state.in_flight.remove(&key);
            }
            if let Ok(route) = &result {
                state.routes.entry(key).or_insert_with(|| route.clone());
            }
            result
        }
        .boxed()
        .shared();

        let task = tokio::spawn(fetch.clone()).abort_handle();
        state.in_flight.insert(
            key,
            InFlight {
                id,
                fetch: fetch.clone(),
                task,
            },
        );
        fetch
    }

    /// Cached route for `key`, without fetching.
    pub async fn get(&self, key: RouteKey) -> Option<Route> {
        self.state.lock().await.routes.get(&key).cloned()
    }

    /// Stop driving an outstanding fetch for `key`.
    ///
    /// Callers already waiting on it still get its result.
    pub async fn abandon(&self, key: RouteKey) -> bool {
        let removed = self.state.lock().await.in_flight.remove(&key);
        match removed {
            Some(in_flight) => {
                tracing::debug!(%key, "Abandoning route fetch");
                in_flight.task.abort();
                true
            }
            None => false,
        }
    }

    pub async fn is_fetching(&self, key: RouteKey) -> bool {
        self.state.lock().await.in_flight.contains_key(&key)
    }

    /// Drop every cached route and outstanding fetch.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.routes.clear();
        for (_, in_flight) in state.in_flight.drain() {
            in_flight.task.abort();
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.routes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl std::fmt::Debug for RouteQuoteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteQuoteCache").finish_non_exhaustive()
    }
}
