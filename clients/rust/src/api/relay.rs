//! Gasless claim relays behind the backend proxy.

use alloy_primitives::Address;
use async_trait::async_trait;
use link_claim_core::ChainId;
use serde::{Deserialize, Serialize};

use super::RelayApi;
use crate::errors::{ServiceError, ServiceResult};

/// Same-chain gasless claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SameChainClaimRequest {
    pub link: String,
    pub recipient_address: Address,
    /// Relay routing target
    pub base_url: String,
    #[serde(rename = "APIKey")]
    pub api_key: String,
}

/// Cross-chain gasless claim. The relay re-derives the route itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainClaimRequest {
    pub link: String,
    pub recipient_address: Address,
    pub destination_chain_id: ChainId,
    pub destination_token: Address,
    pub is_mainnet: bool,
    /// Route service target the relay quotes against
    pub squid_router_url: String,
    /// Relay routing target
    pub base_url: String,
    #[serde(rename = "APIKey")]
    pub api_key: String,
}

/// What a relay reports back. The hash is kept as the relay sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayReceipt {
    pub tx_hash: String,
}

/// Relay client posting JSON to the routing target named in each request.
#[derive(Debug, Clone, Default)]
pub struct HttpRelayClient {
    http: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn post<T: Serialize + Sync>(&self, url: &str, body: &T) -> ServiceResult<RelayReceipt> {
        let response = self.http.post(url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let receipt: RelayReceipt = serde_json::from_str(&text)?;
        if receipt.tx_hash.is_empty() {
            return Err(ServiceError::invalid_response("relay returned no txHash"));
        }
        Ok(receipt)
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn claim_gasless(&self, request: &SameChainClaimRequest) -> ServiceResult<RelayReceipt> {
        tracing::debug!(recipient = %request.recipient_address, "Submitting gasless claim");
        self.post(&request.base_url, request).await
    }

    async fn claim_cross_chain_gasless(
        &self,
        request: &CrossChainClaimRequest,
    ) -> ServiceResult<RelayReceipt> {
        tracing::debug!(
            recipient = %request.recipient_address,
            destination_chain = request.destination_chain_id,
            destination_token = %request.destination_token,
            "Submitting cross-chain gasless claim"
        );
        self.post(&request.base_url, request).await
    }
}
