//! Destination chain and token catalog for a claim.

use std::collections::BTreeMap;

use alloy_primitives::Address;

use crate::types::{ChainDetails, ChainId, ChainOption, DestinationChain, Selection, TokenOption};

/// Known chains, used for display names and mainnet classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: BTreeMap<ChainId, ChainDetails>,
}

impl ChainRegistry {
    pub fn new(chains: impl IntoIterator<Item = ChainDetails>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.chain_id, c)).collect(),
        }
    }

    /// Registry with the networks claims are most commonly made on.
    pub fn well_known() -> Self {
        let entry = |chain_id, name: &str, mainnet| ChainDetails {
            chain_id,
            name: name.to_string(),
            icon_uri: String::new(),
            mainnet,
        };

        Self::new([
            entry(1, "Ethereum", true),
            entry(10, "Optimism", true),
            entry(56, "BNB Chain", true),
            entry(100, "Gnosis", true),
            entry(137, "Polygon", true),
            entry(8453, "Base", true),
            entry(42161, "Arbitrum One", true),
            entry(11155111, "Sepolia", false),
            entry(84532, "Base Sepolia", false),
        ])
    }

    pub fn get(&self, chain_id: ChainId) -> Option<&ChainDetails> {
        self.chains.get(&chain_id)
    }

    /// Unknown chains are treated as testnets.
    pub fn is_mainnet(&self, chain_id: ChainId) -> bool {
        self.get(chain_id).map(|c| c.mainnet).unwrap_or(false)
    }

    pub fn name(&self, chain_id: ChainId) -> Option<&str> {
        self.get(chain_id).map(|c| c.name.as_str())
    }

    pub fn insert(&mut self, details: ChainDetails) {
        self.chains.insert(details.chain_id, details);
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Selectable destinations for one claim, plus the current selection.
///
/// The origin chain is always listed first. Selecting it means a native
/// claim: no token list is offered and no route is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTokenCatalog {
    origin: ChainId,
    chains: Vec<ChainOption>,
    tokens: BTreeMap<ChainId, Vec<TokenOption>>,
    selected_chain: ChainId,
    selected_token: Option<TokenOption>,
}

impl ChainTokenCatalog {
    pub fn new(
        origin: ChainId,
        registry: &ChainRegistry,
        destinations: impl IntoIterator<Item = DestinationChain>,
    ) -> Self {
        let origin_option = ChainOption {
            chain_id: origin,
            name: registry
                .name(origin)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Chain {}", origin)),
            icon_uri: registry
                .get(origin)
                .map(|c| c.icon_uri.clone())
                .unwrap_or_default(),
        };

        let mut chains = vec![origin_option];
        let mut tokens = BTreeMap::new();

        for destination in destinations {
            if destination.chain_id != origin
                && !chains.iter().any(|c| c.chain_id == destination.chain_id)
            {
                chains.push(ChainOption {
                    chain_id: destination.chain_id,
                    name: destination.name,
                    icon_uri: destination.icon_uri,
                });
            }
            if !destination.tokens.is_empty() {
                tokens.insert(destination.chain_id, destination.tokens);
            }
        }

        Self {
            origin,
            chains,
            tokens,
            selected_chain: origin,
            selected_token: None,
        }
    }

    pub fn origin(&self) -> ChainId {
        self.origin
    }

    pub fn chains(&self) -> &[ChainOption] {
        &self.chains
    }

    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainOption> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Tokens offered for the selected chain; `None` on the origin chain.
    pub fn tokens(&self) -> Option<&[TokenOption]> {
        if self.selected_chain == self.origin {
            return None;
        }
        self.tokens.get(&self.selected_chain).map(Vec::as_slice)
    }

    pub fn token_selection_enabled(&self) -> bool {
        self.tokens().is_some()
    }

    pub fn selected_chain(&self) -> ChainId {
        self.selected_chain
    }

    pub fn selected_token(&self) -> Option<&TokenOption> {
        self.selected_token.as_ref()
    }

    pub fn selection(&self) -> Selection {
        Selection {
            destination_chain: self.selected_chain,
            destination_token: self.selected_token.clone(),
        }
    }

    /// Select a destination chain.
    ///
    /// The token resets to the chain's first token, or to none on the origin
    /// chain and on chains without catalog tokens.
    pub fn select_chain(&mut self, chain_id: ChainId) -> Option<&TokenOption> {
        self.selected_chain = chain_id;
        self.selected_token = self.tokens().and_then(|tokens| tokens.first()).cloned();
        self.selected_token.as_ref()
    }

    /// Select a destination token on the selected chain.
    ///
    /// No-op on the origin chain or for tokens the chain does not offer.
    /// Returns whether the selection changed.
    pub fn select_token(&mut self, address: Address) -> bool {
        let Some(token) = self
            .tokens()
            .and_then(|tokens| tokens.iter().find(|t| t.address == address))
            .cloned()
        else {
            return false;
        };

        if self.selected_token.as_ref() == Some(&token) {
            return false;
        }
        self.selected_token = Some(token);
        true
    }

    /// Back to a native claim on the origin chain.
    pub fn reset_to_origin(&mut self) {
        self.selected_chain = self.origin;
        self.selected_token = None;
    }
}
