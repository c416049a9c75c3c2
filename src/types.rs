//! Swap quote, order and output record types
//!
//! Field layout follows the 0x v3 order schema so quotes produced by an
//! upstream quoter deserialize directly.

use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 0x v3 order terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub maker_address: Address,
    pub taker_address: Address,
    pub fee_recipient_address: Address,
    pub sender_address: Address,
    pub maker_asset_amount: U256,
    pub taker_asset_amount: U256,
    pub maker_fee: U256,
    pub taker_fee: U256,
    pub expiration_time_seconds: U256,
    pub salt: U256,
    pub maker_asset_data: Bytes,
    pub taker_asset_data: Bytes,
    pub maker_fee_asset_data: Bytes,
    pub taker_fee_asset_data: Bytes,
}

/// Order plus the maker's signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub signature: Bytes,
}

/// Trade direction of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketOperation {
    Buy,
    Sell,
}

impl MarketOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOperation::Buy => "buy",
            MarketOperation::Sell => "sell",
        }
    }
}

impl fmt::Display for MarketOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost breakdown of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteInfo {
    pub fee_taker_asset_amount: U256,
    pub taker_asset_amount: U256,
    pub total_taker_asset_amount: U256,
    pub maker_asset_amount: U256,
    pub protocol_fee_in_wei_amount: U256,
}

/// An already-computed swap quote
///
/// `maker_asset_fill_amount` is set for buys (amount of maker asset to
/// acquire), `taker_asset_fill_amount` for sells (amount of taker asset to
/// dispose of). Exactly one of them is present on a valid quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    #[serde(rename = "type")]
    pub kind: MarketOperation,
    pub orders: Vec<SignedOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker_asset_fill_amount: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker_asset_fill_amount: Option<U256>,
    pub gas_price: U256,
    pub best_case_quote_info: SwapQuoteInfo,
    pub worst_case_quote_info: SwapQuoteInfo,
}

impl SwapQuote {
    /// Protocol fee the taker must attach, taken from the worst case
    pub fn protocol_fee(&self) -> U256 {
        self.worst_case_quote_info.protocol_fee_in_wei_amount
    }
}

/// Caller overrides for `execute`, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    pub taker_address: Option<String>,
    pub gas_limit: Option<String>,
    pub eth_amount: Option<String>,
}

impl ExecutionOptions {
    pub fn with_taker_address(mut self, address: impl Into<String>) -> Self {
        self.taker_address = Some(address.into());
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: impl Into<String>) -> Self {
        self.gas_limit = Some(gas_limit.into());
        self
    }

    pub fn with_eth_amount(mut self, eth_amount: impl Into<String>) -> Self {
        self.eth_amount = Some(eth_amount.into());
        self
    }
}

/// Output flags for `get_calldata`. Nothing is read from it yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalldataOptions {}

/// Everything a caller needs to submit a swap through its own channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalldataInfo {
    #[serde(rename = "calldataHexString")]
    pub calldata: Bytes,
    pub eth_amount: U256,
    pub to_address: Address,
    pub allowance_target: Address,
}

/// Deployed contracts the consumer talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    pub exchange: Address,
    pub coordinator: Address,
    pub erc20_proxy: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_fee_reads_worst_case() {
        let mut quote = crate::testing::sell_quote(vec![crate::testing::signed_order(1, &[0xaa])], 100, 5);
        quote.best_case_quote_info.protocol_fee_in_wei_amount = U256::from(1);
        assert_eq!(quote.protocol_fee(), U256::from(5));
    }

    #[test]
    fn quote_type_tag_deserializes() {
        let quote = crate::testing::sell_quote(vec![crate::testing::signed_order(1, &[0xaa])], 100, 5);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["type"], "Sell");
        assert!(json.get("makerAssetFillAmount").is_none());

        let back: SwapQuote = serde_json::from_value(json).unwrap();
        assert_eq!(back, quote);
    }

    #[test]
    fn unknown_direction_is_rejected_at_parse_time() {
        let quote = crate::testing::sell_quote(vec![crate::testing::signed_order(1, &[0xaa])], 100, 5);
        let mut json = serde_json::to_value(&quote).unwrap();
        json["type"] = serde_json::Value::String("Swap".into());
        assert!(serde_json::from_value::<SwapQuote>(json).is_err());
    }

    #[test]
    fn execution_options_builder() {
        let opts = ExecutionOptions::default()
            .with_taker_address("0x0000000000000000000000000000000000000001")
            .with_eth_amount("7");
        assert!(opts.gas_limit.is_none());
        assert_eq!(opts.eth_amount.as_deref(), Some("7"));
    }
}
