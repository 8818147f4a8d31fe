//! Squid v2 route quotes over HTTP.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use link_claim_core::{ChainId, Route};
use serde::{Deserialize, Serialize};

use super::QuoteApi;
use crate::errors::{ServiceError, ServiceResult};

/// Body of a route request. Chain ids and amounts travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub from_chain: String,
    pub from_token: Address,
    pub from_amount: String,
    pub to_chain: String,
    pub to_token: Address,
    /// Percent
    pub slippage: u32,
    /// The link sender, who escrowed the funds
    pub from_address: Address,
    /// Recipient on the destination chain; empty when not yet known
    pub to_address: String,
}

impl RouteRequest {
    pub fn from_amount(&self) -> ServiceResult<U256> {
        parse_decimal("fromAmount", &self.from_amount)
    }

    pub fn from_chain_id(&self) -> ServiceResult<ChainId> {
        parse_chain_id(&self.from_chain)
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    route: WireRoute,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    params: WireRouteParams,
    estimate: WireEstimate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRouteParams {
    to_chain: serde_json::Value,
    to_token: Address,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEstimate {
    to_amount_min: String,
    to_token: WireToken,
}

#[derive(Debug, Deserialize)]
struct WireToken {
    decimals: u8,
    name: String,
    symbol: String,
}

fn parse_chain_id(raw: &str) -> ServiceResult<ChainId> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::invalid_response(format!("bad chain id {:?}", raw)))
}

fn parse_decimal(field: &str, raw: &str) -> ServiceResult<U256> {
    U256::from_str_radix(raw.trim(), 10)
        .map_err(|e| ServiceError::invalid_response(format!("bad {}: {}", field, e)))
}

/// Turn a quote response body into a [`Route`].
pub fn parse_route_response(request: &RouteRequest, body: &str) -> ServiceResult<Route> {
    let response: RouteResponse = serde_json::from_str(body)?;
    let WireRoute { params, estimate } = response.route;

    // The service reports chain ids as strings, older deployments as numbers
    let to_chain = match &params.to_chain {
        serde_json::Value::String(s) => parse_chain_id(s)?,
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ServiceError::invalid_response("bad toChain"))?,
        other => {
            return Err(ServiceError::invalid_response(format!(
                "bad toChain: {}",
                other
            )))
        }
    };

    Ok(Route {
        from_chain: request.from_chain_id()?,
        from_token: request.from_token,
        from_amount: request.from_amount()?,
        to_chain,
        to_token: params.to_token,
        to_amount_min: parse_decimal("toAmountMin", &estimate.to_amount_min)?,
        to_token_decimals: estimate.to_token.decimals,
        to_token_name: estimate.to_token.name,
        to_token_symbol: estimate.to_token.symbol,
    })
}

/// Quote client for the Squid v2 route endpoint.
#[derive(Debug, Clone)]
pub struct SquidQuoteClient {
    http: reqwest::Client,
    url: String,
    integrator_id: String,
}

impl SquidQuoteClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, integrator_id: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            integrator_id: integrator_id.into(),
        }
    }
}

#[async_trait]
impl QuoteApi for SquidQuoteClient {
    async fn fetch_route(&self, request: &RouteRequest) -> ServiceResult<Route> {
        tracing::debug!(
            to_chain = %request.to_chain,
            to_token = %request.to_token,
            "Requesting route quote"
        );

        let response = self
            .http
            .post(&self.url)
            .header("x-integrator-id", &self.integrator_id)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_route_response(request, &body)
    }
}
