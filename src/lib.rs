//! Swap quote executor - turns 0x swap quotes into calldata or transactions
//!
//! A quote's direction picks the fill-or-kill exchange entry point; the
//! consumer then either encodes the call for the caller to submit, or resolves
//! sender and value and submits it directly or through a coordinator relay.

pub mod abi;
pub mod chain;
pub mod config;
pub mod consumer;
pub mod error;
pub mod metrics;
pub mod quote;
pub mod tx;
pub mod types;

#[cfg(test)]
mod testing;

pub use chain::{
    CoordinatorClient, EthersChain, ExchangeClient, ProgressCallback, RelayProgress, Route,
    SenderSource, Settlement, TxParams,
};
pub use consumer::{build_calldata, SwapQuoteConsumer};
pub use error::{SubmissionError, SwapError, SwapResult};
pub use types::{
    CalldataInfo, CalldataOptions, ContractAddresses, ExecutionOptions, MarketOperation, Order,
    SignedOrder, SwapQuote, SwapQuoteInfo,
};
