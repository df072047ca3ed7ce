use super::job::JobResult;
use super::payment::{PaymentRequest, PaymentResult, TransactionId};
use super::quote::Quote;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait QuotingService: Send + Sync {
    async fn get_quote(&self, request: &str) -> Result<Quote>;
}

/// Settles a quote. Implemented by both the wallet-backed and mock backends.
#[async_trait]
pub trait PaymentBackend: Send + Sync {
    async fn pay(&self, quote: &Quote) -> Result<PaymentResult>;
}

#[async_trait]
pub trait JobExecutor: Send + Sync {
    async fn execute(&self, request: &str) -> Result<JobResult>;
}

/// Submits a signed payment instruction on behalf of a connected wallet.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<TransactionId>;
}

pub type QuotingServiceBox = Box<dyn QuotingService>;
pub type PaymentBackendBox = Box<dyn PaymentBackend>;
pub type JobExecutorBox = Box<dyn JobExecutor>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
