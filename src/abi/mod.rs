//! Exchange ABI: fill-or-kill entry points, selectors and argument encoding
//!
//! Calls are encoded as the 4-byte selector followed by the standard ABI
//! encoding of `(Order[] orders, uint256 fillAmount, bytes[] signatures)`.

use crate::types::{MarketOperation, Order};

use ethers::abi::{ParamType, Token};
use ethers::types::{Bytes, U256};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Canonical ABI type of a v3 order
pub const ORDER_TUPLE: &str = "(address,address,address,address,uint256,uint256,uint256,uint256,uint256,uint256,bytes,bytes,bytes,bytes)";

/// Function selectors (first four bytes of keccak256 of the signature)
pub mod selectors {
    use lazy_static::lazy_static;

    lazy_static! {
        pub static ref MARKET_BUY_ORDERS_FILL_OR_KILL: [u8; 4] = super::selector_of(&format!(
            "marketBuyOrdersFillOrKill({}[],uint256,bytes[])",
            super::ORDER_TUPLE
        ));
        pub static ref MARKET_SELL_ORDERS_FILL_OR_KILL: [u8; 4] = super::selector_of(&format!(
            "marketSellOrdersFillOrKill({}[],uint256,bytes[])",
            super::ORDER_TUPLE
        ));
    }
}

/// Compute the selector for a canonical function signature
pub fn selector_of(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

/// Settlement entry points used for market fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeFunction {
    MarketBuyOrdersFillOrKill,
    MarketSellOrdersFillOrKill,
}

impl ExchangeFunction {
    /// The entry point that settles a quote of the given direction
    pub fn for_operation(operation: MarketOperation) -> Self {
        match operation {
            MarketOperation::Buy => ExchangeFunction::MarketBuyOrdersFillOrKill,
            MarketOperation::Sell => ExchangeFunction::MarketSellOrdersFillOrKill,
        }
    }

    pub fn operation(&self) -> MarketOperation {
        match self {
            ExchangeFunction::MarketBuyOrdersFillOrKill => MarketOperation::Buy,
            ExchangeFunction::MarketSellOrdersFillOrKill => MarketOperation::Sell,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExchangeFunction::MarketBuyOrdersFillOrKill => "marketBuyOrdersFillOrKill",
            ExchangeFunction::MarketSellOrdersFillOrKill => "marketSellOrdersFillOrKill",
        }
    }

    pub fn signature(&self) -> String {
        format!("{}({}[],uint256,bytes[])", self.name(), ORDER_TUPLE)
    }

    pub fn selector(&self) -> [u8; 4] {
        match self {
            ExchangeFunction::MarketBuyOrdersFillOrKill => *selectors::MARKET_BUY_ORDERS_FILL_OR_KILL,
            ExchangeFunction::MarketSellOrdersFillOrKill => *selectors::MARKET_SELL_ORDERS_FILL_OR_KILL,
        }
    }
}

impl fmt::Display for ExchangeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Positional arguments shared by both fill-or-kill entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillArgs {
    pub orders: Vec<Order>,
    pub fill_amount: U256,
    pub signatures: Vec<Bytes>,
}

/// A fully assembled settlement call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillCall {
    pub function: ExchangeFunction,
    pub args: FillArgs,
}

impl FillCall {
    /// Selector followed by the ABI-encoded arguments
    pub fn encode(&self) -> Bytes {
        let encoded = ethers::abi::encode(&fill_tokens(&self.args));
        let mut data = Vec::with_capacity(4 + encoded.len());
        data.extend_from_slice(&self.function.selector());
        data.extend_from_slice(&encoded);
        Bytes::from(data)
    }
}

/// ABI type of a single order tuple
pub fn order_param_type() -> ParamType {
    let mut fields = vec![ParamType::Address; 4];
    fields.extend(std::iter::repeat(ParamType::Uint(256)).take(6));
    fields.extend(std::iter::repeat(ParamType::Bytes).take(4));
    ParamType::Tuple(fields)
}

/// ABI types of the fill-or-kill argument list, for decoding
pub fn fill_param_types() -> Vec<ParamType> {
    vec![
        ParamType::Array(Box::new(order_param_type())),
        ParamType::Uint(256),
        ParamType::Array(Box::new(ParamType::Bytes)),
    ]
}

fn order_token(order: &Order) -> Token {
    Token::Tuple(vec![
        Token::Address(order.maker_address),
        Token::Address(order.taker_address),
        Token::Address(order.fee_recipient_address),
        Token::Address(order.sender_address),
        Token::Uint(order.maker_asset_amount),
        Token::Uint(order.taker_asset_amount),
        Token::Uint(order.maker_fee),
        Token::Uint(order.taker_fee),
        Token::Uint(order.expiration_time_seconds),
        Token::Uint(order.salt),
        Token::Bytes(order.maker_asset_data.to_vec()),
        Token::Bytes(order.taker_asset_data.to_vec()),
        Token::Bytes(order.maker_fee_asset_data.to_vec()),
        Token::Bytes(order.taker_fee_asset_data.to_vec()),
    ])
}

fn fill_tokens(args: &FillArgs) -> Vec<Token> {
    vec![
        Token::Array(args.orders.iter().map(order_token).collect()),
        Token::Uint(args.fill_amount),
        Token::Array(
            args.signatures
                .iter()
                .map(|s| Token::Bytes(s.to_vec()))
                .collect(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signed_order;

    #[test]
    fn selectors_differ_per_direction() {
        let buy = ExchangeFunction::for_operation(MarketOperation::Buy);
        let sell = ExchangeFunction::for_operation(MarketOperation::Sell);
        assert_eq!(buy, ExchangeFunction::MarketBuyOrdersFillOrKill);
        assert_eq!(sell, ExchangeFunction::MarketSellOrdersFillOrKill);
        assert_ne!(buy.selector(), sell.selector());
        assert_eq!(buy.selector(), selector_of(&buy.signature()));
    }

    #[test]
    fn selector_matches_known_erc20_transfer() {
        assert_eq!(selector_of("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn encoded_call_decodes_back_to_arguments() {
        let first = signed_order(1, &[0xaa]);
        let second = signed_order(2, &[0xbb, 0xcc]);
        let call = FillCall {
            function: ExchangeFunction::MarketSellOrdersFillOrKill,
            args: FillArgs {
                orders: vec![first.order.clone(), second.order.clone()],
                fill_amount: U256::from(100u64),
                signatures: vec![first.signature.clone(), second.signature.clone()],
            },
        };

        let data = call.encode();
        assert_eq!(&data[..4], &ExchangeFunction::MarketSellOrdersFillOrKill.selector());

        let tokens = ethers::abi::decode(&fill_param_types(), &data[4..]).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::Uint(U256::from(100u64)));
        assert_eq!(
            tokens[2],
            Token::Array(vec![Token::Bytes(vec![0xaa]), Token::Bytes(vec![0xbb, 0xcc])])
        );
        match &tokens[0] {
            Token::Array(orders) => {
                assert_eq!(orders.len(), 2);
                assert_eq!(orders[0], order_token(&first.order));
                assert_eq!(orders[1], order_token(&second.order));
            }
            other => panic!("expected order array, got {:?}", other),
        }
    }
}
