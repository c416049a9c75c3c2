//! Execution option validation and sender/value resolution

use crate::chain::SenderSource;
use crate::error::{SwapError, SwapResult};
use crate::types::{ExecutionOptions, SwapQuote};

use ethers::types::{Address, U256};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use tracing::debug;

lazy_static! {
    static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

/// Execution options after parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub taker_address: Option<Address>,
    pub gas_limit: Option<u64>,
    pub eth_amount: Option<U256>,
}

/// Parse every supplied option, failing on the first malformed one
pub fn validate_execution_options(opts: &ExecutionOptions) -> SwapResult<ValidatedOptions> {
    Ok(ValidatedOptions {
        taker_address: opts.taker_address.as_deref().map(parse_address).transpose()?,
        gas_limit: opts.gas_limit.as_deref().map(parse_gas_limit).transpose()?,
        eth_amount: opts.eth_amount.as_deref().map(parse_amount).transpose()?,
    })
}

/// Parse a `0x`-prefixed 20-byte hex address
pub fn parse_address(input: &str) -> SwapResult<Address> {
    if !ADDRESS_RE.is_match(input) {
        return Err(SwapError::InvalidAddress(input.to_string()));
    }
    Address::from_str(input).map_err(|_| SwapError::InvalidAddress(input.to_string()))
}

/// Parse a gas limit written in decimal or `0x` hex
pub fn parse_gas_limit(input: &str) -> SwapResult<u64> {
    let parsed = match strip_hex_prefix(input) {
        Some(digits) if !digits.is_empty() => u64::from_str_radix(digits, 16).ok(),
        Some(_) => None,
        None if is_decimal(input) => input.parse::<u64>().ok(),
        None => None,
    };
    parsed.ok_or_else(|| SwapError::InvalidGasLimit(input.to_string()))
}

/// Parse a non-negative 256-bit amount written in decimal or `0x` hex
pub fn parse_amount(input: &str) -> SwapResult<U256> {
    let parsed = match strip_hex_prefix(input) {
        Some(digits) if !digits.is_empty() => U256::from_str_radix(digits, 16).ok(),
        Some(_) => None,
        None if is_decimal(input) => U256::from_dec_str(input).ok(),
        None => None,
    };
    parsed.ok_or_else(|| SwapError::InvalidValue(input.to_string()))
}

fn strip_hex_prefix(input: &str) -> Option<&str> {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
}

fn is_decimal(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Taker address from the options, else the provider's default sender
pub async fn resolve_sender(
    source: &dyn SenderSource,
    opts: &ValidatedOptions,
) -> SwapResult<Address> {
    if let Some(address) = opts.taker_address {
        return Ok(address);
    }

    let address = source.default_sender().await?.ok_or(SwapError::NoSenderAvailable)?;
    debug!("Resolved default sender {:?}", address);
    Ok(address)
}

/// Value to attach: the override when present, else the worst-case protocol fee
pub fn resolve_value(quote: &SwapQuote, opts: &ValidatedOptions) -> U256 {
    opts.eth_amount.unwrap_or_else(|| quote.protocol_fee())
}
