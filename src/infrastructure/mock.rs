use crate::domain::job::JobResult;
use crate::domain::payment::{PaymentResult, TransactionId};
use crate::domain::ports::{JobExecutor, PaymentBackend, QuotingService};
use crate::domain::quote::{Currency, JobId, Price, Quote};
use crate::error::Result;
use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::time::Duration;
use tracing::debug;

/// A quoting service that prices every request identically.
///
/// Waits `delay` before answering to mimic a remote pricing call.
#[derive(Debug, Clone)]
pub struct MockQuotingService {
    price: Price,
    currency: Currency,
    delay: Duration,
}

impl MockQuotingService {
    pub fn new(price: Price, currency: Currency, delay: Duration) -> Self {
        Self {
            price,
            currency,
            delay,
        }
    }
}

#[async_trait]
impl QuotingService for MockQuotingService {
    async fn get_quote(&self, request: &str) -> Result<Quote> {
        debug!(request, "pricing request");
        tokio::time::sleep(self.delay).await;

        let job_number: u64 = rand::thread_rng().gen_range(1_000_000_000..10_000_000_000);
        Ok(Quote {
            price: self.price,
            currency: self.currency.clone(),
            job_id: JobId(format!("job_{}", job_number)),
        })
    }
}

/// A payment backend that always succeeds with a random transaction id.
#[derive(Debug, Clone)]
pub struct MockPaymentBackend {
    delay: Duration,
}

impl MockPaymentBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentBackend for MockPaymentBackend {
    async fn pay(&self, quote: &Quote) -> Result<PaymentResult> {
        debug!(job_id = %quote.job_id, "settling mock payment");
        tokio::time::sleep(self.delay).await;

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(13)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Ok(PaymentResult {
            transaction_id: TransactionId(format!("tx_mock_{}", suffix)),
            success: true,
        })
    }
}

/// Produces canned output keyed on words found in the request.
#[derive(Debug, Clone)]
pub struct MockJobExecutor {
    delay: Duration,
}

impl MockJobExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

/// Canned output for `request`. Never empty.
pub fn mock_output(request: &str) -> String {
    let lowered = request.to_lowercase();
    if lowered.contains("math") || lowered.contains("solve") {
        "The answer is 42. (Note: This is a mock response. A real executor would solve the problem.)"
            .to_string()
    } else if lowered.contains("poem") || lowered.contains("write") {
        "In the realm of code and light,\n\
         Where automation takes its flight,\n\
         A quote, a payment, and a job,\n\
         Flow along without a throb.\n\n\
         (This is a mock poem. A real executor would write original content.)"
            .to_string()
    } else {
        format!(
            "Processing: \"{}\"\n\nThis is a mock response. A real executor would process \
             your request and generate an appropriate output.",
            request
        )
    }
}

#[async_trait]
impl JobExecutor for MockJobExecutor {
    async fn execute(&self, request: &str) -> Result<JobResult> {
        debug!(request, "executing mock job");
        tokio::time::sleep(self.delay).await;
        Ok(JobResult {
            output: mock_output(request),
        })
    }
}
