//! Swap quote consumer: calldata building and transaction execution
//!
//! Both outputs share one decision path. The quote's direction picks the
//! exchange entry point, and the settlement route (direct exchange or
//! coordinator relay) is fixed when the consumer is built. A consumer holds
//! no mutable state, so one instance can serve concurrent executions.

use crate::abi::FillCall;
use crate::chain::{Route, SenderSource, Settlement, TxParams};
use crate::error::{SwapError, SwapResult};
use crate::metrics;
use crate::quote::assemble_fill_call;
use crate::tx::{resolve_sender, resolve_value, validate_execution_options};
use crate::types::{CalldataInfo, CalldataOptions, ContractAddresses, ExecutionOptions, SwapQuote};

use ethers::types::{Address, H256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Turns swap quotes into calldata or submitted transactions
pub struct SwapQuoteConsumer {
    /// Chain the quotes settle on
    chain_id: u64,
    /// Exchange, coordinator and proxy contracts
    contract_addresses: ContractAddresses,
    /// Fallback for the taker address
    sender_source: Arc<dyn SenderSource>,
    /// Route fills take to the chain
    settlement: Settlement,
}

impl SwapQuoteConsumer {
    /// Create a new consumer
    pub fn new(
        chain_id: u64,
        contract_addresses: ContractAddresses,
        sender_source: Arc<dyn SenderSource>,
        settlement: Settlement,
    ) -> Self {
        info!(
            "Swap quote consumer for chain {} using {} settlement",
            chain_id,
            settlement.route()
        );
        Self {
            chain_id,
            contract_addresses,
            sender_source,
            settlement,
        }
    }

    /// Get chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contract_addresses(&self) -> &ContractAddresses {
        &self.contract_addresses
    }

    pub fn route(&self) -> Route {
        self.settlement.route()
    }

    /// Contract the settlement call is addressed to
    pub fn settlement_address(&self) -> Address {
        settlement_address(&self.contract_addresses, self.route())
    }

    /// Encode a quote without sending anything
    ///
    /// The attached value is always the quote's worst-case protocol fee.
    pub fn get_calldata(
        &self,
        quote: &SwapQuote,
        _opts: &CalldataOptions,
    ) -> SwapResult<CalldataInfo> {
        build_calldata(&self.contract_addresses, self.route(), quote)
    }

    /// Validate, resolve sender and value, and submit a quote
    ///
    /// Returns the transaction hash reported by the settlement path. No
    /// retries are attempted and a failing route never falls back to the other.
    pub async fn execute(&self, quote: &SwapQuote, opts: &ExecutionOptions) -> SwapResult<H256> {
        let execution_id = Uuid::new_v4();
        let span = info_span!(
            "execute_swap",
            %execution_id,
            chain_id = self.chain_id,
            operation = %quote.kind,
            route = %self.settlement.route()
        );

        let result = self.execute_inner(quote, opts).instrument(span).await;
        if let Err(ref e) = result {
            warn!("Swap execution {} failed: {}", execution_id, e);
            metrics::record_swap_failed(e.reason());
        }
        result
    }

    async fn execute_inner(&self, quote: &SwapQuote, opts: &ExecutionOptions) -> SwapResult<H256> {
        let call = assemble_fill_call(quote)?;
        let opts = validate_execution_options(opts)?;

        let from = resolve_sender(self.sender_source.as_ref(), &opts).await?;
        let tx = TxParams {
            from,
            gas: opts.gas_limit,
            gas_price: quote.gas_price,
            value: resolve_value(quote, &opts),
        };

        self.submit(&call, &tx).await
    }

    async fn submit(&self, call: &FillCall, tx: &TxParams) -> SwapResult<H256> {
        let route = self.settlement.route();
        debug!(
            "Submitting {} from {:?} with value {} via {}",
            call.function, tx.from, tx.value, route
        );

        let started = Instant::now();
        let outcome = self.settlement.submit(call, tx).await;
        metrics::record_submission_latency(route.as_str(), started.elapsed().as_secs_f64());

        let tx_hash = outcome.map_err(SwapError::SubmissionFailed)?;

        info!("Swap submitted via {}: {:?}", route, tx_hash);
        metrics::record_swap_submitted(route.as_str(), call.function.operation().as_str());
        Ok(tx_hash)
    }
}

fn settlement_address(addresses: &ContractAddresses, route: Route) -> Address {
    match route {
        Route::Direct => addresses.exchange,
        Route::Coordinator => addresses.coordinator,
    }
}

/// Calldata record for a quote settled along `route`
///
/// Needs only the contract addresses, so it works without a provider or signer.
pub fn build_calldata(
    addresses: &ContractAddresses,
    route: Route,
    quote: &SwapQuote,
) -> SwapResult<CalldataInfo> {
    let call = assemble_fill_call(quote)?;
    let calldata = call.encode();

    debug!(
        "Built {} calldata: {} orders, {} bytes",
        call.function,
        call.args.orders.len(),
        calldata.len()
    );
    metrics::record_calldata_built(quote.kind.as_str());

    Ok(CalldataInfo {
        calldata,
        eth_amount: quote.protocol_fee(),
        to_address: settlement_address(addresses, route),
        allowance_target: addresses.erc20_proxy,
    })
}
