//! Error types for the helpdesk dialog domain

use thiserror::Error;

/// Errors produced by the dialog domain
#[derive(Debug, Error)]
pub enum DialogError {
    /// A stage transition outside the defined graph was attempted
    #[error("invalid stage transition from {from} to {to}")]
    InvalidStageTransition { from: String, to: String },

    /// Input failed a domain validation rule
    #[error("validation error: {0}")]
    Validation(String),

    /// No session exists for the given user identifier
    #[error("no session for user {0}")]
    SessionNotFound(String),

    /// Outbound delivery through the messaging gateway failed
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Result alias used throughout the domain
pub type DialogResult<T> = Result<T, DialogError>;
