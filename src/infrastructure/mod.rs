//! Collaborator implementations: timer-driven mocks and the wallet backend.

pub mod mock;
pub mod wallet;

use crate::config::{FlowConfig, PaymentConfig};
use crate::domain::ports::{JobExecutorBox, PaymentBackendBox, QuotingServiceBox};
use mock::{MockJobExecutor, MockPaymentBackend, MockQuotingService};
use std::time::Duration;
use tracing::{info, warn};
use wallet::{StubGateway, WalletPaymentBackend};

/// Picks the payment backend for `config`.
///
/// Uses the wallet when both a publishable key and a wallet principal are
/// configured, otherwise falls back to the mock backend.
pub fn select_payment_backend(config: &PaymentConfig, mock_delay: Duration) -> PaymentBackendBox {
    match (&config.wallet_principal, config.wallet_ready()) {
        (Some(principal), true) => {
            info!(%principal, "using wallet payment");
            Box::new(WalletPaymentBackend::new(
                Box::new(StubGateway::new()),
                principal.trim(),
            ))
        }
        _ => {
            warn!("using mock payment (no wallet setup detected)");
            Box::new(MockPaymentBackend::new(mock_delay))
        }
    }
}

/// The full collaborator set for a controller built from `config`.
pub fn collaborators(config: &FlowConfig) -> (QuotingServiceBox, PaymentBackendBox, JobExecutorBox) {
    let quoting: QuotingServiceBox = Box::new(MockQuotingService::new(
        config.quote_price,
        config.quote_currency.clone(),
        config.timings.quote,
    ));
    let payments = select_payment_backend(&config.payment, config.timings.payment);
    let executor: JobExecutorBox = Box::new(MockJobExecutor::new(config.timings.execution));
    (quoting, payments, executor)
}
