use crate::domain::flow::FlowState;
use thiserror::Error;

/// Message shown when a failure carries no text of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Payment failed. Please try again.";

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Quote(String),
    #[error("{0}")]
    Payment(String),
    #[error("{0}")]
    Execution(String),
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: FlowState, to: FlowState },
    #[error("Another operation is still in flight")]
    Busy,
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlowError {
    /// Human-readable text for the session's error slot.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
