use crate::domain::quote::{Currency, Price};
use rust_decimal_macros::dec;
use std::time::Duration;

const DEFAULT_QUOTE_PRICE: Price = Price::from_literal(dec!(0.5));

/// Wallet settings. Both values must be set for a wallet-backed payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentConfig {
    pub publishable_key: Option<String>,
    pub wallet_principal: Option<String>,
}

impl PaymentConfig {
    pub fn wallet_ready(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.publishable_key) && present(&self.wallet_principal)
    }
}

/// Artificial latency of the mock collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTimings {
    pub quote: Duration,
    pub payment: Duration,
    pub execution: Duration,
}

impl Default for MockTimings {
    fn default() -> Self {
        Self {
            quote: Duration::from_millis(1000),
            payment: Duration::from_millis(2000),
            execution: Duration::from_millis(1500),
        }
    }
}

impl MockTimings {
    pub fn instant() -> Self {
        Self {
            quote: Duration::ZERO,
            payment: Duration::ZERO,
            execution: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    pub payment: PaymentConfig,
    pub timings: MockTimings,
    pub quote_price: Price,
    pub quote_currency: Currency,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            payment: PaymentConfig::default(),
            timings: MockTimings::default(),
            quote_price: DEFAULT_QUOTE_PRICE,
            quote_currency: Currency::icp(),
        }
    }
}
