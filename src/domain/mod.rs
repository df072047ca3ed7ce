//! Domain types for a pay-to-run-a-job flow.
//!
//! Holds the flow state machine, the quote/payment/job data model and the
//! ports through which the application reaches its collaborators.

pub mod flow;
pub mod job;
pub mod payment;
pub mod ports;
pub mod quote;
