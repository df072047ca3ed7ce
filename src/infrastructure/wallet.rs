use crate::domain::payment::{PaymentRequest, PaymentResult, TransactionId};
use crate::domain::ports::{PaymentBackend, PaymentGateway, PaymentGatewayBox};
use crate::domain::quote::Quote;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Pays quotes through a connected wallet.
///
/// Shapes each quote into a [`PaymentRequest`] owned by the wallet principal and
/// hands it to the configured [`PaymentGateway`]. Gateway failures propagate
/// unchanged so their message reaches the user.
pub struct WalletPaymentBackend {
    gateway: PaymentGatewayBox,
    owner: String,
}

impl WalletPaymentBackend {
    pub fn new(gateway: PaymentGatewayBox, owner: impl Into<String>) -> Self {
        Self {
            gateway,
            owner: owner.into(),
        }
    }
}

#[async_trait]
impl PaymentBackend for WalletPaymentBackend {
    async fn pay(&self, quote: &Quote) -> Result<PaymentResult> {
        let request = PaymentRequest::for_quote(quote, &self.owner)?;
        debug!(?request, "initiating wallet payment");

        let transaction_id = self.gateway.create_payment(&request).await?;
        info!(%transaction_id, job_id = %quote.job_id, "wallet payment completed");

        Ok(PaymentResult {
            transaction_id,
            success: true,
        })
    }
}

/// Gateway that accepts every instruction and echoes a fixed transaction id.
///
/// Stands in for a real wallet SDK, which this crate does not ship.
#[derive(Debug, Clone)]
pub struct StubGateway {
    transaction_id: String,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            transaction_id: "tx_mock_123".to_string(),
        }
    }
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_payment(&self, request: &PaymentRequest) -> Result<TransactionId> {
        debug!(?request, "stub gateway accepted payment");
        Ok(TransactionId(self.transaction_id.clone()))
    }
}
