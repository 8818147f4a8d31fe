//! Configuration types for the ClaimClient.
//!
//! This module provides configuration structs for service endpoints,
//! timing, chain policy, and the main client configuration.

use std::time::Duration;

use link_claim_core::{ChainPolicy, ChainRegistry};

use crate::constants::{
    CROSS_CHAIN_CLAIM_PATH, DEFAULT_INTEGRATOR_ID, DEFAULT_QUOTE_URL, DEFAULT_SLIPPAGE_PERCENT,
    NETWORK_SETTLE_DELAY, PLACEHOLDER_API_KEY, PROGRESS_ROTATION_INTERVAL, RELAY_ROUTE_PATH,
    SAME_CHAIN_CLAIM_PATH,
};

/// Where the quote service and relays live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Quote (route) service URL
    pub quote_url: String,
    /// Integrator id sent to the quote service
    pub integrator_id: String,
    /// Base URL of the backend proxy hosting the relay routes
    pub proxy_base_url: String,
    /// Relay API key (a placeholder; not a secret)
    pub api_key: String,
}

impl ServiceEndpoints {
    pub fn new(proxy_base_url: impl Into<String>) -> Self {
        Self {
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            integrator_id: DEFAULT_INTEGRATOR_ID.to_string(),
            proxy_base_url: proxy_base_url.into().trim_end_matches('/').to_string(),
            api_key: PLACEHOLDER_API_KEY.to_string(),
        }
    }

    /// Routing target for same-chain gasless claims.
    pub fn same_chain_claim_url(&self) -> String {
        format!("{}{}", self.proxy_base_url, SAME_CHAIN_CLAIM_PATH)
    }

    /// Routing target for cross-chain gasless claims.
    pub fn cross_chain_claim_url(&self) -> String {
        format!("{}{}", self.proxy_base_url, CROSS_CHAIN_CLAIM_PATH)
    }

    /// Route service target handed to the cross-chain relay.
    pub fn relay_route_url(&self) -> String {
        format!("{}{}", self.proxy_base_url, RELAY_ROUTE_PATH)
    }
}

/// Delays used while driving a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    /// Wait after a wallet chain switch before continuing
    pub network_settle_delay: Duration,
    /// Interval between rotating progress labels during relay calls
    pub progress_rotation_interval: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            network_settle_delay: NETWORK_SETTLE_DELAY,
            progress_rotation_interval: PROGRESS_ROTATION_INTERVAL,
        }
    }
}

/// Main configuration for the ClaimClient.
#[derive(Debug, Clone)]
pub struct ClaimClientConfig {
    /// Service endpoints
    pub endpoints: ServiceEndpoints,
    /// Chains needing direct settlement or refusing manual claims
    pub chain_policy: ChainPolicy,
    /// Known chains (names, mainnet classification)
    pub chain_registry: ChainRegistry,
    /// Timing configuration
    pub timing: TimingConfig,
    /// Quote slippage tolerance, in percent
    pub slippage_percent: u32,
}

/// Builder for ClaimClientConfig.
#[derive(Default)]
pub struct ClaimClientConfigBuilder {
    proxy_base_url: Option<String>,
    quote_url: Option<String>,
    integrator_id: Option<String>,
    api_key: Option<String>,
    chain_policy: Option<ChainPolicy>,
    chain_registry: Option<ChainRegistry>,
    timing: Option<TimingConfig>,
    slippage_percent: Option<u32>,
}

impl ClaimClientConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend proxy base URL.
    pub fn proxy_base_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_base_url = Some(url.into());
        self
    }

    /// Set the quote service URL.
    pub fn quote_url(mut self, url: impl Into<String>) -> Self {
        self.quote_url = Some(url.into());
        self
    }

    /// Set the integrator id sent to the quote service.
    pub fn integrator_id(mut self, id: impl Into<String>) -> Self {
        self.integrator_id = Some(id.into());
        self
    }

    /// Set the relay API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the chain policy.
    pub fn chain_policy(mut self, policy: ChainPolicy) -> Self {
        self.chain_policy = Some(policy);
        self
    }

    /// Set the chain registry.
    pub fn chain_registry(mut self, registry: ChainRegistry) -> Self {
        self.chain_registry = Some(registry);
        self
    }

    /// Set the timing configuration.
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Set the quote slippage tolerance in percent.
    pub fn slippage_percent(mut self, slippage: u32) -> Self {
        self.slippage_percent = Some(slippage);
        self
    }

    /// Build the configuration.
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<ClaimClientConfig, ConfigError> {
        let proxy_base_url = self
            .proxy_base_url
            .ok_or(ConfigError::MissingField("proxy_base_url"))?;
        if proxy_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("proxy_base_url is empty".to_string()));
        }

        let slippage_percent = self.slippage_percent.unwrap_or(DEFAULT_SLIPPAGE_PERCENT);
        if slippage_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "slippage of {}% is above 100%",
                slippage_percent
            )));
        }

        let mut endpoints = ServiceEndpoints::new(proxy_base_url);
        if let Some(url) = self.quote_url {
            endpoints.quote_url = url;
        }
        if let Some(id) = self.integrator_id {
            endpoints.integrator_id = id;
        }
        if let Some(key) = self.api_key {
            endpoints.api_key = key;
        }

        Ok(ClaimClientConfig {
            endpoints,
            chain_policy: self.chain_policy.unwrap_or_default(),
            chain_registry: self
                .chain_registry
                .unwrap_or_else(ChainRegistry::well_known),
            timing: self.timing.unwrap_or_default(),
            slippage_percent,
        })
    }
}

/// Error type for configuration issues.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
