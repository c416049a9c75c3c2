//! Ethers-backed sender lookup and direct exchange submission

use super::{ExchangeClient, SenderSource, TxParams};
use crate::abi::FillCall;
use crate::error::{SubmissionError, SwapError, SwapResult};

use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::{Address, TransactionRequest, H256};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Exchange client over any ethers middleware stack
pub struct EthersChain<M> {
    /// Middleware used for account lookup and broadcasting
    client: Arc<M>,
    /// Chain the transactions are signed for
    chain_id: u64,
    /// Exchange contract fills are sent to
    exchange: Address,
}

impl<M: Middleware + 'static> EthersChain<M> {
    /// Create a new chain client
    pub fn new(client: Arc<M>, chain_id: u64, exchange: Address) -> Self {
        Self {
            client,
            chain_id,
            exchange,
        }
    }

    /// Get chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get exchange address
    pub fn exchange(&self) -> Address {
        self.exchange
    }

    /// Build the legacy transaction carrying a fill
    pub fn build_request(&self, call: &FillCall, tx: &TxParams) -> TransactionRequest {
        let mut request = TransactionRequest::new()
            .to(self.exchange)
            .from(tx.from)
            .data(call.encode())
            .value(tx.value)
            .gas_price(tx.gas_price)
            .chain_id(self.chain_id);

        if let Some(gas) = tx.gas {
            request = request.gas(gas);
        }

        request
    }
}

#[async_trait]
impl<M: Middleware + 'static> SenderSource for EthersChain<M> {
    async fn default_sender(&self) -> SwapResult<Option<Address>> {
        if let Some(address) = self.client.default_sender() {
            return Ok(Some(address));
        }

        let accounts = self
            .client
            .get_accounts()
            .await
            .map_err(|e| SwapError::Provider(e.to_string()))?;

        debug!("Provider on chain {} exposes {} accounts", self.chain_id, accounts.len());
        Ok(accounts.into_iter().next())
    }
}

#[async_trait]
impl<M: Middleware + 'static> ExchangeClient for EthersChain<M> {
    async fn send_fill(&self, call: &FillCall, tx: &TxParams) -> Result<H256, SubmissionError> {
        let request = self.build_request(call, tx);

        let pending = self
            .client
            .send_transaction(request, None)
            .await
            .map_err(|e| {
                let err = SubmissionError::classify(&e.to_string());
                warn!("{} on chain {} failed: {}", call.function, self.chain_id, err);
                err
            })?;

        let tx_hash = pending.tx_hash();
        info!("{} sent on chain {}: {:?}", call.function, self.chain_id, tx_hash);
        Ok(tx_hash)
    }
}
