//! Chain module - the collaborators a consumer needs to reach the chain
//!
//! This module provides:
//! - `SenderSource`: resolves a default signing address
//! - `ExchangeClient`: submits fills straight to the exchange contract
//! - `CoordinatorClient`: submits fills through a coordinator relay
//! - `Settlement`: the route chosen at construction time

pub mod provider;

pub use provider::EthersChain;

use crate::abi::FillCall;
use crate::error::{SubmissionError, SwapResult};

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Transaction parameters attached to a settlement call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxParams {
    pub from: Address,
    pub gas: Option<u64>,
    pub gas_price: U256,
    pub value: U256,
}

/// Progress notifications a coordinator relay may emit while approving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayProgress {
    ApprovalRequested { endpoint: String },
    ApprovalReceived { endpoint: String },
    Broadcasting,
}

pub type ProgressCallback = dyn Fn(RelayProgress) + Send + Sync;

/// Source of a default sender when the caller supplies none
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SenderSource: Send + Sync {
    async fn default_sender(&self) -> SwapResult<Option<Address>>;
}

/// Direct settlement through the exchange contract
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn send_fill(&self, call: &FillCall, tx: &TxParams) -> Result<H256, SubmissionError>;
}

/// Settlement through a coordinator relay
///
/// `timestamp_secs` is the caller's clock at submission; the relay uses it
/// as a staleness bound when requesting approvals.
#[async_trait]
pub trait CoordinatorClient: Send + Sync {
    async fn send_fill(
        &self,
        call: &FillCall,
        on_progress: &ProgressCallback,
        timestamp_secs: u64,
        tx: &TxParams,
    ) -> Result<H256, SubmissionError>;
}

/// Route label for logs and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Direct,
    Coordinator,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Direct => "direct",
            Route::Coordinator => "coordinator",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement path configured for a consumer
#[derive(Clone)]
pub enum Settlement {
    Direct(Arc<dyn ExchangeClient>),
    Coordinator(Arc<dyn CoordinatorClient>),
}

impl Settlement {
    pub fn route(&self) -> Route {
        match self {
            Settlement::Direct(_) => Route::Direct,
            Settlement::Coordinator(_) => Route::Coordinator,
        }
    }

    /// Forward a fill to the configured path
    pub async fn submit(&self, call: &FillCall, tx: &TxParams) -> Result<H256, SubmissionError> {
        match self {
            Settlement::Direct(client) => client.send_fill(call, tx).await,
            Settlement::Coordinator(client) => {
                let timestamp_secs = unix_now_secs();
                debug!("Submitting {} via coordinator at {}", call.function, timestamp_secs);
                let on_progress: &ProgressCallback = &|_: RelayProgress| {};
                client.send_fill(call, on_progress, timestamp_secs, tx).await
            }
        }
    }
}

impl fmt::Debug for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Settlement").field(&self.route()).finish()
    }
}

/// Current unix time, second resolution
pub fn unix_now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
