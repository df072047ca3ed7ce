use super::quote::{JobId, Quote};
use crate::error::FlowError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

/// Base units per whole token (e8s).
pub const E8S_PER_TOKEN: u64 = 100_000_000;

/// Symbol used to settle USD-denominated quotes.
pub const USD_SETTLEMENT_SYMBOL: &str = "ICP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentResult {
    pub transaction_id: TransactionId,
    pub success: bool,
}

/// How much a wallet payment moves and in which denomination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PaymentAmount {
    Usd { usd_amount: Decimal, symbol: String },
    Token { amount: u64, symbol: String },
}

/// Instruction handed to a wallet payment gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    #[serde(flatten)]
    pub amount: PaymentAmount,
    pub job_id: JobId,
    pub owner: String,
    pub requires_signing: bool,
}

impl PaymentRequest {
    /// Builds the wallet instruction for `quote`, paid by `owner`.
    ///
    /// USD quotes are paid in USD value settled as ICP. Any other currency is
    /// paid in its own base units, rounding halves away from zero.
    pub fn for_quote(quote: &Quote, owner: &str) -> Result<Self, FlowError> {
        let amount = if quote.currency.is_usd() {
            PaymentAmount::Usd {
                usd_amount: quote.price.value(),
                symbol: USD_SETTLEMENT_SYMBOL.to_string(),
            }
        } else {
            let unrepresentable = || {
                FlowError::Payment(format!(
                    "Price {} {} cannot be expressed in base units",
                    quote.price, quote.currency
                ))
            };
            let e8s = quote
                .price
                .value()
                .checked_mul(Decimal::from(E8S_PER_TOKEN))
                .ok_or_else(unrepresentable)?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u64()
                .ok_or_else(unrepresentable)?;
            PaymentAmount::Token {
                amount: e8s,
                symbol: quote.currency.as_str().to_string(),
            }
        };

        Ok(Self {
            amount,
            job_id: quote.job_id.clone(),
            owner: owner.to_string(),
            requires_signing: true,
        })
    }
}
