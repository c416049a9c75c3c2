//! Quote validation and settlement argument assembly

use crate::abi::{ExchangeFunction, FillArgs, FillCall};
use crate::error::{SwapError, SwapResult};
use crate::types::{MarketOperation, SwapQuote, SwapQuoteInfo};

use ethers::types::U256;

/// Check a quote is consumable: orders present and signed, the fill amount
/// matches the direction, and both cost breakdowns add up.
pub fn validate_swap_quote(quote: &SwapQuote) -> SwapResult<()> {
    if quote.orders.is_empty() {
        return Err(SwapError::InvalidQuote("quote contains no orders".to_string()));
    }

    if let Some(idx) = quote.orders.iter().position(|o| o.signature.is_empty()) {
        return Err(SwapError::InvalidQuote(format!("order {} has an empty signature", idx)));
    }

    match quote.kind {
        MarketOperation::Buy => {
            if quote.maker_asset_fill_amount.is_none() {
                return Err(SwapError::InvalidQuote(
                    "buy quote is missing makerAssetFillAmount".to_string(),
                ));
            }
            if quote.taker_asset_fill_amount.is_some() {
                return Err(SwapError::InvalidQuote(
                    "buy quote must not carry takerAssetFillAmount".to_string(),
                ));
            }
        }
        MarketOperation::Sell => {
            if quote.taker_asset_fill_amount.is_none() {
                return Err(SwapError::InvalidQuote(
                    "sell quote is missing takerAssetFillAmount".to_string(),
                ));
            }
            if quote.maker_asset_fill_amount.is_some() {
                return Err(SwapError::InvalidQuote(
                    "sell quote must not carry makerAssetFillAmount".to_string(),
                ));
            }
        }
    }

    validate_quote_info("bestCaseQuoteInfo", &quote.best_case_quote_info)?;
    validate_quote_info("worstCaseQuoteInfo", &quote.worst_case_quote_info)?;

    Ok(())
}

fn validate_quote_info(name: &str, info: &SwapQuoteInfo) -> SwapResult<()> {
    let expected = info
        .taker_asset_amount
        .checked_add(info.fee_taker_asset_amount)
        .ok_or_else(|| SwapError::InvalidQuote(format!("{} taker amount overflows", name)))?;

    if expected != info.total_taker_asset_amount {
        return Err(SwapError::InvalidQuote(format!(
            "{} total taker amount {} != taker amount {} + fee {}",
            name, info.total_taker_asset_amount, info.taker_asset_amount, info.fee_taker_asset_amount
        )));
    }

    Ok(())
}

/// The fill amount a quote asks for in its own direction
pub fn fill_amount(quote: &SwapQuote) -> SwapResult<U256> {
    let amount = match quote.kind {
        MarketOperation::Buy => quote.maker_asset_fill_amount,
        MarketOperation::Sell => quote.taker_asset_fill_amount,
    };
    amount.ok_or_else(|| SwapError::InvalidQuote(format!("{} quote has no fill amount", quote.kind)))
}

/// Validate a quote and build the settlement call for its direction
pub fn assemble_fill_call(quote: &SwapQuote) -> SwapResult<FillCall> {
    validate_swap_quote(quote)?;

    let (orders, signatures): (Vec<_>, Vec<_>) = quote
        .orders
        .iter()
        .map(|o| (o.order.clone(), o.signature.clone()))
        .unzip();

    Ok(FillCall {
        function: ExchangeFunction::for_operation(quote.kind),
        args: FillArgs {
            orders,
            fill_amount: fill_amount(quote)?,
            signatures,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{buy_quote, sell_quote, signed_order};
    use ethers::types::Bytes;

    #[test]
    fn buy_quote_uses_maker_fill_amount() {
        let quote = buy_quote(vec![signed_order(1, &[0x01])], 250, 5);
        let call = assemble_fill_call(&quote).unwrap();
        assert_eq!(call.function, ExchangeFunction::MarketBuyOrdersFillOrKill);
        assert_eq!(call.args.fill_amount, U256::from(250u64));
    }

    #[test]
    fn sell_quote_uses_taker_fill_amount() {
        let quote = sell_quote(vec![signed_order(1, &[0x01])], 100, 5);
        let call = assemble_fill_call(&quote).unwrap();
        assert_eq!(call.function, ExchangeFunction::MarketSellOrdersFillOrKill);
        assert_eq!(call.args.fill_amount, U256::from(100u64));
    }

    #[test]
    fn signatures_follow_order_sequence() {
        let orders: Vec<_> = (1..=5u8).map(|i| signed_order(i as u64, &[i, i])).collect();
        let quote = sell_quote(orders.clone(), 100, 5);
        let call = assemble_fill_call(&quote).unwrap();

        assert_eq!(call.args.orders.len(), orders.len());
        for (i, order) in orders.iter().enumerate() {
            assert_eq!(call.args.orders[i], order.order);
            assert_eq!(call.args.signatures[i], order.signature);
        }
    }

    #[test]
    fn rejects_empty_orders() {
        let quote = sell_quote(vec![], 100, 5);
        assert!(matches!(assemble_fill_call(&quote), Err(SwapError::InvalidQuote(_))));
    }

    #[test]
    fn rejects_unsigned_order() {
        let mut order = signed_order(1, &[0x01]);
        order.signature = Bytes::default();
        let quote = sell_quote(vec![signed_order(2, &[0x02]), order], 100, 5);
        match validate_swap_quote(&quote) {
            Err(SwapError::InvalidQuote(msg)) => assert!(msg.contains("order 1")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_mismatched_direction_amounts() {
        let mut quote = buy_quote(vec![signed_order(1, &[0x01])], 250, 5);
        quote.maker_asset_fill_amount = None;
        quote.taker_asset_fill_amount = Some(U256::from(10u64));
        assert!(matches!(validate_swap_quote(&quote), Err(SwapError::InvalidQuote(_))));

        let mut quote = sell_quote(vec![signed_order(1, &[0x01])], 100, 5);
        quote.maker_asset_fill_amount = Some(U256::from(10u64));
        assert!(matches!(validate_swap_quote(&quote), Err(SwapError::InvalidQuote(_))));
    }

    #[test]
    fn rejects_inconsistent_cost_breakdown() {
        let mut quote = sell_quote(vec![signed_order(1, &[0x01])], 100, 5);
        quote.worst_case_quote_info.total_taker_asset_amount = U256::from(1u64);
        assert!(matches!(validate_swap_quote(&quote), Err(SwapError::InvalidQuote(_))));

        let mut quote = sell_quote(vec![signed_order(1, &[0x01])], 100, 5);
        quote.best_case_quote_info.taker_asset_amount = U256::MAX;
        assert!(matches!(validate_swap_quote(&quote), Err(SwapError::InvalidQuote(_))));
    }
}
