//! Stand-in wallet for claims made from the command line.
//!
//! The CLI holds no keys, so only the relayed paths can complete. Anything
//! that needs a signature fails with a wallet error.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use link_claim_client::{
    FeeParams, LinkClaimDetails, ServiceError, ServiceResult, SigningEnvironment,
    TransactionRequest, UnsignedClaimTx,
};
use link_claim_core::ChainId;

const NO_WALLET: &str = "no wallet attached; only relayed claims are available";

#[derive(Debug, Clone)]
pub struct DetachedSigner {
    account: Option<Address>,
    chain_id: ChainId,
}

impl DetachedSigner {
    pub fn new(account: Option<Address>, chain_id: ChainId) -> Self {
        Self { account, chain_id }
    }
}

#[async_trait]
impl SigningEnvironment for DetachedSigner {
    async fn account(&self) -> ServiceResult<Option<Address>> {
        Ok(self.account)
    }

    async fn active_chain(&self) -> ServiceResult<ChainId> {
        Ok(self.chain_id)
    }

    async fn switch_active_chain(&self, _chain_id: ChainId) -> ServiceResult<()> {
        Err(ServiceError::wallet(NO_WALLET))
    }

    async fn prepare_transaction(
        &self,
        _link: &LinkClaimDetails,
        _recipient: Address,
    ) -> ServiceResult<UnsignedClaimTx> {
        Err(ServiceError::wallet(NO_WALLET))
    }

    async fn estimate_fees(&self, _chain_id: ChainId) -> ServiceResult<FeeParams> {
        Ok(FeeParams::default())
    }

    async fn send_transaction(&self, _tx: TransactionRequest) -> ServiceResult<B256> {
        Err(ServiceError::wallet(NO_WALLET))
    }

    async fn wait_for_receipt(&self, _hash: B256, _chain_id: ChainId) -> ServiceResult<()> {
        Err(ServiceError::wallet(NO_WALLET))
    }
}
