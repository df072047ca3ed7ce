#![allow(dead_code)]

use async_trait::async_trait;
use payagent::domain::job::JobResult;
use payagent::domain::payment::{PaymentResult, TransactionId};
use payagent::domain::ports::{JobExecutor, PaymentBackend, QuotingService};
use payagent::domain::quote::{Currency, JobId, Price, Quote};
use payagent::error::{FlowError, Result};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

/// Blocks a collaborator until the test releases it.
#[derive(Clone, Default)]
pub struct Gate(Option<Arc<Semaphore>>);

impl Gate {
    pub fn closed() -> Self {
        Self(Some(Arc::new(Semaphore::new(0))))
    }

    pub fn open(&self) {
        if let Some(semaphore) = &self.0 {
            semaphore.add_permits(1);
        }
    }

    async fn pass(&self) {
        if let Some(semaphore) = &self.0 {
            semaphore
                .acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }
    }
}

pub fn quote(job: &str) -> Quote {
    Quote {
        price: Price::new(dec!(0.5)).unwrap(),
        currency: Currency::icp(),
        job_id: JobId(job.to_string()),
    }
}

/// Hands out `job_1`, `job_2`, ... or fails with the configured message.
#[derive(Clone, Default)]
pub struct ScriptedQuoting {
    pub failure: Option<String>,
    pub gate: Gate,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl QuotingService for ScriptedQuoting {
    async fn get_quote(&self, _request: &str) -> Result<Quote> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.gate.pass().await;
        match &self.failure {
            Some(message) => Err(FlowError::Quote(message.clone())),
            None => Ok(quote(&format!("job_{}", n))),
        }
    }
}

#[derive(Clone, Default)]
pub struct ScriptedPayment {
    pub failure: Option<String>,
    pub declined: bool,
    pub gate: Gate,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PaymentBackend for ScriptedPayment {
    async fn pay(&self, _quote: &Quote) -> Result<PaymentResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        match &self.failure {
            Some(message) => Err(FlowError::Payment(message.clone())),
            None => Ok(PaymentResult {
                transaction_id: TransactionId("tx_test".to_string()),
                success: !self.declined,
            }),
        }
    }
}

#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    pub failure: Option<String>,
    pub gate: Gate,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl JobExecutor for ScriptedExecutor {
    async fn execute(&self, request: &str) -> Result<JobResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        match &self.failure {
            Some(message) => Err(FlowError::Execution(message.clone())),
            None => Ok(JobResult {
                output: format!("done: {}", request),
            }),
        }
    }
}
