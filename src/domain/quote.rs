use crate::error::FlowError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A non-negative quoted price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// For literals known to be non-negative.
    pub(crate) const fn from_literal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn new(value: Decimal) -> Result<Self, FlowError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(FlowError::Validation(
                "Price must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = FlowError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Currency token such as `ICP` or `USD`, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency(String);

impl Currency {
    pub fn new(token: &str) -> Result<Self, FlowError> {
        let token = token.trim();
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(FlowError::Validation(
                "Currency must be a single non-empty token".to_string(),
            ));
        }
        Ok(Self(token.to_uppercase()))
    }

    pub fn icp() -> Self {
        Self("ICP".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_usd(&self) -> bool {
        self.0 == "USD"
    }
}

impl std::str::FromStr for Currency {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque job identifier issued with a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub price: Price,
    pub currency: Currency,
    pub job_id: JobId,
}
