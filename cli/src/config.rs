//! YAML config for the CLI, with `.env` / environment overrides.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use anyhow::{Context, Result};
use link_claim_client::{
    ChainPolicy, ChainRegistry, ClaimClientConfig, ClaimClientConfigBuilder, DestinationChain,
    StaticNameResolver,
};
use link_claim_core::ChainDetails;
use serde::Deserialize;

const PROXY_URL_ENV: &str = "LINK_CLAIM_PROXY_URL";
const QUOTE_URL_ENV: &str = "LINK_CLAIM_QUOTE_URL";

/// On-disk config. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    pub proxy_base_url: Option<String>,
    pub quote_url: Option<String>,
    pub slippage_percent: Option<u32>,
    pub chain_policy: Option<ChainPolicy>,
    /// Extra or overriding chain metadata
    #[serde(default)]
    pub chains: Vec<ChainDetails>,
    /// Cross-chain destination catalog
    #[serde(default)]
    pub destinations: Vec<DestinationChain>,
    /// Name to address table used to resolve `.eth` recipients
    #[serde(default)]
    pub names: BTreeMap<String, Address>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("link-claim").join("config.yaml"))
}

impl CliConfig {
    /// Load the config file, if there is one, then apply overrides.
    ///
    /// An explicitly named file must exist; the default one may be missing.
    pub fn load(path: Option<&Path>, proxy_url: Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(url) = std::env::var(PROXY_URL_ENV) {
            config.proxy_base_url = Some(url);
        }
        if let Ok(url) = std::env::var(QUOTE_URL_ENV) {
            config.quote_url = Some(url);
        }
        if proxy_url.is_some() {
            config.proxy_base_url = proxy_url;
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
        let contents = fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config file {}", expanded))?;
        let config: Self = serde_yaml::from_str(&contents).context("Failed to parse YAML config")?;
        tracing::debug!(path = %expanded, destinations = config.destinations.len(), "Loaded config");
        Ok(config)
    }

    pub fn chain_registry(&self) -> ChainRegistry {
        let mut registry = ChainRegistry::well_known();
        for chain in &self.chains {
            registry.insert(chain.clone());
        }
        registry
    }

    pub fn name_resolver(&self) -> StaticNameResolver {
        StaticNameResolver::new(self.names.iter().map(|(name, address)| (name.clone(), *address)))
    }

    pub fn client_config(&self) -> Result<ClaimClientConfig> {
        let proxy = self.proxy_base_url.clone().with_context(|| {
            format!("No proxy URL configured; pass --proxy-url or set {}", PROXY_URL_ENV)
        })?;

        let mut builder = ClaimClientConfigBuilder::new()
            .proxy_base_url(proxy)
            .chain_registry(self.chain_registry());
        if let Some(url) = &self.quote_url {
            builder = builder.quote_url(url.clone());
        }
        if let Some(slippage) = self.slippage_percent {
            builder = builder.slippage_percent(slippage);
        }
        if let Some(policy) = &self.chain_policy {
            builder = builder.chain_policy(policy.clone());
        }

        builder.build().context("Invalid client configuration")
    }
}
