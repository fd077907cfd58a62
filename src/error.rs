use thiserror::Error;

use crate::domain::validation::FieldError;

pub type Result<T, E = CheckoutError> = std::result::Result<T, E>;

/// Transport-level failure raised by a collaborator port.
///
/// Ports never speak checkout semantics; the orchestrator maps these into
/// `CheckoutError` variants depending on which step was in progress.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// What the user may safely do after a checkout failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAdvice {
    /// Field-level problem; fix the input and resubmit.
    FixInput,
    /// No payment step was reached; resubmitting cannot double-charge.
    SafeToRetry,
    /// Money may have moved without a report; a human support path is required.
    ContactSupport,
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("form validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),
    #[error("a submission is already in flight")]
    AlreadyInFlight,
    #[error("order creation failed: {0}")]
    GatewayOrder(String),
    #[error("payment verification failed: {0}")]
    Verification(String),
    #[error("report generation failed: {0}")]
    ReportGeneration(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("illegal checkout transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckoutError {
    pub fn advice(&self) -> RecoveryAdvice {
        match self {
            CheckoutError::Validation(_) => RecoveryAdvice::FixInput,
            CheckoutError::AlreadyInFlight
            | CheckoutError::GatewayOrder(_)
            | CheckoutError::Network(_)
            | CheckoutError::InvalidTransition { .. }
            | CheckoutError::Csv(_)
            | CheckoutError::Io(_) => RecoveryAdvice::SafeToRetry,
            CheckoutError::Verification(_) | CheckoutError::ReportGeneration(_) => {
                RecoveryAdvice::ContactSupport
            }
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
