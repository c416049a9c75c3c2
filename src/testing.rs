//! Quote and order builders shared by unit tests

use crate::types::{MarketOperation, Order, SignedOrder, SwapQuote, SwapQuoteInfo};
use ethers::types::{Address, Bytes, U256};

pub fn signed_order(salt: u64, signature: &[u8]) -> SignedOrder {
    SignedOrder {
        order: Order {
            maker_address: Address::from_low_u64_be(0x1000 + salt),
            taker_address: Address::zero(),
            fee_recipient_address: Address::from_low_u64_be(0xfee),
            sender_address: Address::zero(),
            maker_asset_amount: U256::from(1_000u64),
            taker_asset_amount: U256::from(500u64),
            maker_fee: U256::zero(),
            taker_fee: U256::zero(),
            expiration_time_seconds: U256::from(1_900_000_000u64),
            salt: U256::from(salt),
            maker_asset_data: Bytes::from(vec![0xf4, 0x72, 0x61, 0xb0, 0x01]),
            taker_asset_data: Bytes::from(vec![0xf4, 0x72, 0x61, 0xb0, 0x02]),
            maker_fee_asset_data: Bytes::default(),
            taker_fee_asset_data: Bytes::default(),
        },
        signature: Bytes::from(signature.to_vec()),
    }
}

pub fn quote_info(protocol_fee: u64) -> SwapQuoteInfo {
    SwapQuoteInfo {
        fee_taker_asset_amount: U256::from(1u64),
        taker_asset_amount: U256::from(100u64),
        total_taker_asset_amount: U256::from(101u64),
        maker_asset_amount: U256::from(200u64),
        protocol_fee_in_wei_amount: U256::from(protocol_fee),
    }
}

pub fn sell_quote(orders: Vec<SignedOrder>, taker_fill: u64, protocol_fee: u64) -> SwapQuote {
    SwapQuote {
        kind: MarketOperation::Sell,
        orders,
        maker_asset_fill_amount: None,
        taker_asset_fill_amount: Some(U256::from(taker_fill)),
        gas_price: U256::from(20_000_000_000u64),
        best_case_quote_info: quote_info(protocol_fee),
        worst_case_quote_info: quote_info(protocol_fee),
    }
}

pub fn buy_quote(orders: Vec<SignedOrder>, maker_fill: u64, protocol_fee: u64) -> SwapQuote {
    SwapQuote {
        kind: MarketOperation::Buy,
        orders,
        maker_asset_fill_amount: Some(U256::from(maker_fill)),
        taker_asset_fill_amount: None,
        gas_price: U256::from(20_000_000_000u64),
        best_case_quote_info: quote_info(protocol_fee),
        worst_case_quote_info: quote_info(protocol_fee),
    }
}
