//! Application layer containing the payment flow orchestration.
//!
//! This module defines the `PaymentFlowController`, which owns a single flow
//! session and moves it through quote, payment and job execution by calling
//! the domain ports.

pub mod controller;
