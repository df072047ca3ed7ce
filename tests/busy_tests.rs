mod common;

use common::{Gate, ScriptedExecutor, ScriptedPayment, ScriptedQuoting};
use payagent::application::controller::PaymentFlowController;
use payagent::domain::flow::{FlowState, StepStatus};
use payagent::error::FlowError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

async fn wait_for_call(calls: &AtomicUsize, n: usize) {
    while calls.load(Ordering::SeqCst) < n {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_busy_while_paying_and_executing() {
    let payment = ScriptedPayment {
        gate: Gate::closed(),
        ..Default::default()
    };
    let executor = ScriptedExecutor {
        gate: Gate::closed(),
        ..Default::default()
    };
    let controller = Arc::new(PaymentFlowController::new(
        Box::new(ScriptedQuoting::default()),
        Box::new(payment.clone()),
        Box::new(executor.clone()),
    ));

    controller.request_quote("Solve 2+2").await.unwrap();
    assert!(!controller.is_busy());

    let handle = tokio::spawn({
        let controller = controller.clone();
        async move { controller.pay_now().await }
    });

    wait_for_call(&payment.calls, 1).await;
    let snapshot = controller.snapshot().await;
    assert!(snapshot.busy);
    assert_eq!(snapshot.state, FlowState::WaitingForPayment);
    assert_eq!(snapshot.steps[2], StepStatus::Active);
    assert!(snapshot.quote.is_some());

    payment.gate.open();
    wait_for_call(&executor.calls, 1).await;
    let snapshot = controller.snapshot().await;
    assert!(snapshot.busy);
    assert_eq!(snapshot.state, FlowState::Executing);
    assert_eq!(snapshot.steps[3], StepStatus::Active);
    assert!(snapshot.quote.is_some());
    assert!(snapshot.payment_result.is_some());
    assert!(snapshot.job_result.is_none());

    executor.gate.open();
    handle.await.unwrap().unwrap();

    assert!(!controller.is_busy());
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state, FlowState::Completed);
    assert!(snapshot.quote.is_some());
    assert!(snapshot.job_result.is_some());
}

#[tokio::test]
async fn test_second_call_is_rejected_while_busy() {
    let quoting = ScriptedQuoting {
        gate: Gate::closed(),
        ..Default::default()
    };
    let controller = Arc::new(PaymentFlowController::new(
        Box::new(quoting.clone()),
        Box::new(ScriptedPayment::default()),
        Box::new(ScriptedExecutor::default()),
    ));

    let handle = tokio::spawn({
        let controller = controller.clone();
        async move { controller.request_quote("first").await }
    });
    wait_for_call(&quoting.calls, 1).await;

    assert!(matches!(
        controller.request_quote("second").await,
        Err(FlowError::Busy)
    ));
    assert!(matches!(controller.pay_now().await, Err(FlowError::Busy)));
    assert_eq!(quoting.calls.load(Ordering::SeqCst), 1);
    assert!(controller.is_busy());

    quoting.gate.open();
    handle.await.unwrap().unwrap();

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state, FlowState::Quoted);
    assert_eq!(snapshot.user_request, "first");
    assert!(!snapshot.busy);
}

#[tokio::test]
async fn test_new_quote_clears_previous_results_before_arrival() {
    let quoting = ScriptedQuoting {
        gate: Gate::closed(),
        ..Default::default()
    };
    let controller = Arc::new(PaymentFlowController::new(
        Box::new(quoting.clone()),
        Box::new(ScriptedPayment::default()),
        Box::new(ScriptedExecutor::default()),
    ));

    quoting.gate.open();
    controller.request_quote("Solve 2+2").await.unwrap();
    controller.pay_now().await.unwrap();
    assert_eq!(controller.current_state().await, FlowState::Completed);

    let handle = tokio::spawn({
        let controller = controller.clone();
        async move { controller.request_quote("write a poem").await }
    });
    wait_for_call(&quoting.calls, 2).await;

    let pending = controller.snapshot().await;
    assert_eq!(pending.state, FlowState::Idle);
    assert!(pending.quote.is_none());
    assert!(pending.payment_result.is_none());
    assert!(pending.job_result.is_none());

    quoting.gate.open();
    handle.await.unwrap().unwrap();
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state, FlowState::Quoted);
    assert_eq!(snapshot.quote.unwrap().job_id.0, "job_2");
}

#[tokio::test]
async fn test_requote_from_quoted_clears_prior_quote() {
    let quoting = ScriptedQuoting {
        gate: Gate::closed(),
        ..Default::default()
    };
    let payment = ScriptedPayment::default();
    let controller = Arc::new(PaymentFlowController::new(
        Box::new(quoting.clone()),
        Box::new(payment.clone()),
        Box::new(ScriptedExecutor::default()),
    ));

    quoting.gate.open();
    controller.request_quote("Solve 2+2").await.unwrap();
    let quoted = controller.snapshot().await;
    assert_eq!(quoted.state, FlowState::Quoted);
    assert_eq!(quoted.quote.unwrap().job_id.0, "job_1");

    let handle = tokio::spawn({
        let controller = controller.clone();
        async move { controller.request_quote("write a poem").await }
    });
    wait_for_call(&quoting.calls, 2).await;

    let pending = controller.snapshot().await;
    assert!(pending.busy);
    assert_eq!(pending.state, FlowState::Idle);
    assert!(pending.quote.is_none());
    assert!(pending.payment_result.is_none());
    assert!(pending.job_result.is_none());
    assert!(pending.error.is_none());
    assert_eq!(pending.user_request, "write a poem");

    quoting.gate.open();
    handle.await.unwrap().unwrap();

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state, FlowState::Quoted);
    assert_eq!(snapshot.quote.unwrap().job_id.0, "job_2");
    assert_eq!(payment.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reset_discards_in_flight_payment() {
    let payment = ScriptedPayment {
        gate: Gate::closed(),
        ..Default::default()
    };
    let executor = ScriptedExecutor::default();
    let controller = Arc::new(PaymentFlowController::new(
        Box::new(ScriptedQuoting::default()),
        Box::new(payment.clone()),
        Box::new(executor.clone()),
    ));

    controller.request_quote("Solve 2+2").await.unwrap();
    let handle = tokio::spawn({
        let controller = controller.clone();
        async move { controller.pay_now().await }
    });
    wait_for_call(&payment.calls, 1).await;

    controller.reset().await;
    payment.gate.open();
    handle.await.unwrap().unwrap();

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.state, FlowState::Idle);
    assert!(snapshot.payment_result.is_none());
    assert!(snapshot.error.is_none());
    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
}
