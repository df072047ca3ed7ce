use crate::config::FlowConfig;
use crate::domain::flow::{self, FlowState, Step, StepStatus};
use crate::domain::job::JobResult;
use crate::domain::payment::PaymentResult;
use crate::domain::ports::{JobExecutorBox, PaymentBackendBox, QuotingServiceBox};
use crate::domain::quote::Quote;
use crate::error::{FlowError, Result};
use crate::infrastructure;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

pub const EMPTY_REQUEST_MESSAGE: &str = "Please enter a request";

/// Mutable state of one flow session. Only the controller touches it.
#[derive(Debug, Default)]
struct FlowSession {
    state: FlowState,
    quote: Option<Quote>,
    payment_result: Option<PaymentResult>,
    job_result: Option<JobResult>,
    error: Option<String>,
    user_request: String,
    /// Bumped by every reset so late collaborator results can be recognised.
    generation: u64,
}

impl FlowSession {
    fn transition(&mut self, to: FlowState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(FlowError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        info!(from = ?self.state, to = ?to, "flow transition");
        self.state = to;
        debug_assert_eq!(self.quote.is_some(), self.state.holds_quote());
        Ok(())
    }

    fn clear_results(&mut self) {
        self.quote = None;
        self.payment_result = None;
        self.job_result = None;
        self.error = None;
    }

    fn fail(&mut self, err: &FlowError) {
        let message = err.user_message();
        error!(from = ?self.state, %message, "flow failed");
        self.error = Some(message);
        self.quote = None;
        self.job_result = None;
        self.state = FlowState::Error;
        debug_assert_eq!(self.quote.is_some(), self.state.holds_quote());
    }

    fn snapshot(&self, busy: bool) -> FlowSnapshot {
        FlowSnapshot {
            state: self.state,
            user_request: self.user_request.clone(),
            quote: self.quote.clone(),
            payment_result: self.payment_result.clone(),
            job_result: self.job_result.clone(),
            error: self.error.clone(),
            steps: flow::step_statuses(self.state),
            busy,
        }
    }
}

/// Point-in-time copy of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSnapshot {
    pub state: FlowState,
    pub user_request: String,
    pub quote: Option<Quote>,
    pub payment_result: Option<PaymentResult>,
    pub job_result: Option<JobResult>,
    pub error: Option<String>,
    pub steps: [StepStatus; 5],
    pub busy: bool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives one pay-to-run-a-job session: quote, pay, execute.
///
/// Operations take `&self` so a caller can observe [`is_busy`](Self::is_busy)
/// and snapshots while an operation is awaiting a collaborator. Only one of
/// `request_quote`/`pay_now` may be in flight at a time; a second call is
/// rejected with [`FlowError::Busy`]. Collaborator failures never escape: they
/// move the session to [`FlowState::Error`] with a readable message.
pub struct PaymentFlowController {
    quoting: QuotingServiceBox,
    payments: PaymentBackendBox,
    executor: JobExecutorBox,
    session: RwLock<FlowSession>,
    busy: AtomicBool,
}

impl PaymentFlowController {
    /// Creates a controller over the given collaborators, starting `Idle`.
    ///
    /// # Arguments
    ///
    /// * `quoting` - Prices user requests.
    /// * `payments` - Settles quotes (wallet-backed or mock).
    /// * `executor` - Produces the job output once paid.
    pub fn new(
        quoting: QuotingServiceBox,
        payments: PaymentBackendBox,
        executor: JobExecutorBox,
    ) -> Self {
        Self {
            quoting,
            payments,
            executor,
            session: RwLock::new(FlowSession::default()),
            busy: AtomicBool::new(false),
        }
    }

    /// Creates a controller wired to the mock collaborators described by `config`.
    pub fn from_config(config: &FlowConfig) -> Self {
        let (quoting, payments, executor) = infrastructure::collaborators(config);
        Self::new(quoting, payments, executor)
    }

    fn begin(&self) -> Result<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                warn!("rejecting operation while another is in flight");
                FlowError::Busy
            })?;
        Ok(BusyGuard(&self.busy))
    }

    /// Applies a collaborator outcome to the session it was started for.
    ///
    /// Returns `true` when the flow should continue.
    async fn commit<T>(
        &self,
        generation: u64,
        outcome: Result<T>,
        apply: impl FnOnce(&mut FlowSession, T) -> Result<()>,
    ) -> bool {
        let mut session = self.session.write().await;
        if session.generation != generation {
            debug!("discarding result for a session that was reset");
            return false;
        }
        match outcome.and_then(|value| apply(&mut *session, value)) {
            Ok(()) => true,
            Err(err) => {
                session.fail(&err);
                false
            }
        }
    }

    /// Asks for a price quote for `request`.
    ///
    /// A blank request only sets the error slot. Otherwise all previous results
    /// are cleared, the flow returns to `Idle`, and on success moves to `Quoted`.
    pub async fn request_quote(&self, request: &str) -> Result<()> {
        let _busy = self.begin()?;

        let generation = {
            let mut session = self.session.write().await;
            if request.trim().is_empty() {
                warn!("quote requested for an empty request");
                session.error = Some(EMPTY_REQUEST_MESSAGE.to_string());
                return Ok(());
            }
            session.user_request = request.to_string();
            session.clear_results();
            session.transition(FlowState::Idle)?;
            session.generation
        };

        debug!(request, "requesting quote");
        let outcome = self.quoting.get_quote(request).await;
        self.commit(generation, outcome, |session, quote| {
            session.quote = Some(quote);
            session.transition(FlowState::Quoted)
        })
        .await;
        Ok(())
    }

    /// Pays the current quote, then runs the job.
    ///
    /// Does nothing unless the flow is `Quoted`. Runs to completion or to `Error`;
    /// there is no retry and no rollback of a payment whose job then fails.
    pub async fn pay_now(&self) -> Result<()> {
        let _busy = self.begin()?;

        let (generation, quote, request) = {
            let mut session = self.session.write().await;
            let quote = match (&session.quote, session.state) {
                (Some(quote), FlowState::Quoted) => quote.clone(),
                (_, state) => {
                    debug!(?state, "pay requested without an unpaid quote");
                    return Ok(());
                }
            };
            session.error = None;
            session.transition(FlowState::WaitingForPayment)?;
            (session.generation, quote, session.user_request.clone())
        };

        debug!(job_id = %quote.job_id, "paying quote");
        let outcome = self.payments.pay(&quote).await;
        let paid = self
            .commit(generation, outcome, |session, payment| {
                let success = payment.success;
                session.payment_result = Some(payment);
                if !success {
                    return Err(FlowError::Payment(String::new()));
                }
                session.transition(FlowState::Executing)
            })
            .await;
        if !paid {
            return Ok(());
        }

        debug!("executing job");
        let outcome = self.executor.execute(&request).await;
        self.commit(generation, outcome, |session, job| {
            session.job_result = Some(job);
            session.transition(FlowState::Completed)
        })
        .await;
        Ok(())
    }

    /// Returns the session to a blank `Idle` state.
    ///
    /// Results of an operation still in flight are discarded when they arrive.
    pub async fn reset(&self) {
        let mut session = self.session.write().await;
        let generation = session.generation.wrapping_add(1);
        if session.state != FlowState::Idle {
            info!(from = ?session.state, to = ?FlowState::Idle, "flow reset");
        }
        *session = FlowSession {
            generation,
            ..FlowSession::default()
        };
    }

    /// True while `request_quote` or `pay_now` has not resolved.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn current_state(&self) -> FlowState {
        self.session.read().await.state
    }

    pub async fn step_status(&self, step: Step) -> StepStatus {
        flow::step_status(self.current_state().await, step)
    }

    pub async fn step_statuses(&self) -> [StepStatus; 5] {
        flow::step_statuses(self.current_state().await)
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.session.read().await.snapshot(self.is_busy())
    }
}
