//! Main ClaimClient implementation.
//!
//! Owns the HTTP-backed quote and relay clients and opens claim sessions
//! against a caller-supplied wallet and name resolver.

use std::sync::Arc;

use link_claim_core::{
    ClaimError, DestinationChain, LinkClaimDetails, Route, RouteKey,
};

use crate::{
    api::{ClaimServices, HttpRelayClient, NameResolver, SigningEnvironment, SquidQuoteClient},
    cache::{QuoteContext, RouteQuoteCache},
    config::{ClaimClientConfig, ClaimClientConfigBuilder, ConfigError},
    session::ClaimSession,
};

/// Entry point for claiming links.
///
/// # Example
///
/// ```ignore
/// use link_claim_client::{ClaimClient, RecipientSource};
///
/// let client = ClaimClient::new("https://claims.example.com/api/proxy")?;
/// let session = client.open_session(details, destinations, wallet, names);
///
/// session.select_chain(137).await;
/// session.refresh_route().await;
/// let outcome = session.claim(RecipientSource::Manual("alice.eth".into())).await;
/// ```
#[derive(Debug, Clone)]
pub struct ClaimClient {
    config: Arc<ClaimClientConfig>,
    quotes: Arc<SquidQuoteClient>,
    relay: Arc<HttpRelayClient>,
}

impl ClaimClient {
    /// Create a client with default endpoints behind the given proxy.
    pub fn new(proxy_base_url: &str) -> Result<Self, ConfigError> {
        let config = ClaimClientConfigBuilder::new()
            .proxy_base_url(proxy_base_url)
            .build()?;
        Ok(Self::with_config(config))
    }

    /// Create a client with full configuration.
    pub fn with_config(config: ClaimClientConfig) -> Self {
        let http = reqwest::Client::new();
        let quotes = Arc::new(SquidQuoteClient::new(
            http.clone(),
            config.endpoints.quote_url.clone(),
            config.endpoints.integrator_id.clone(),
        ));
        let relay = Arc::new(HttpRelayClient::new(http));

        Self {
            config: Arc::new(config),
            quotes,
            relay,
        }
    }

    pub fn config(&self) -> &ClaimClientConfig {
        &self.config
    }

    /// HTTP services plus the caller's wallet and resolver.
    pub fn services(
        &self,
        signer: Arc<dyn SigningEnvironment>,
        names: Arc<dyn NameResolver>,
    ) -> ClaimServices {
        ClaimServices::new(self.quotes.clone(), self.relay.clone(), signer, names)
    }

    /// Open a claim session for one link.
    pub fn open_session(
        &self,
        link: LinkClaimDetails,
        destinations: Vec<DestinationChain>,
        signer: Arc<dyn SigningEnvironment>,
        names: Arc<dyn NameResolver>,
    ) -> ClaimSession {
        ClaimSession::open(
            link,
            destinations,
            self.services(signer, names),
            Arc::clone(&self.config),
        )
    }

    /// One-off quote outside a session.
    pub async fn quote(
        &self,
        link: &LinkClaimDetails,
        key: RouteKey,
        to_address: &str,
    ) -> Result<Route, ClaimError> {
        let cache = RouteQuoteCache::new(self.quotes.clone());
        let context = QuoteContext::for_link(link, to_address, self.config.slippage_percent);
        cache.get_or_fetch_route(key, &context).await
    }
}
