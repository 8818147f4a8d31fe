//! Error types for the claim client.
//!
//! [`ServiceError`] describes raw failures of the external collaborators
//! (quote service, relays, wallet, name resolution). They never leave the
//! claim path as-is: [`classify`] folds them into the closed
//! [`ClaimError`] taxonomy.

use link_claim_core::{ClaimError, ErrorClassifier, FailureSource};
use thiserror::Error;

/// Failure reported by an external service or the signing environment.
#[derive(Error, Debug)]
pub enum ServiceError {
    // Network Errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    // Response Errors
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Wallet Errors
    #[error("User rejected the request: {0}")]
    UserRejected(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    // Internal Errors
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Categorize the error for logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::Http(_) | ServiceError::Status { .. } => ErrorCategory::Network,
            ServiceError::InvalidResponse(_) | ServiceError::Serialization(_) => {
                ErrorCategory::Decode
            }
            ServiceError::UserRejected(_)
            | ServiceError::Wallet(_)
            | ServiceError::Reverted(_) => ErrorCategory::Wallet,
            ServiceError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ServiceError::InvalidResponse(message.into())
    }

    /// Create a wallet error.
    pub fn wallet(message: impl Into<String>) -> Self {
        ServiceError::Wallet(message.into())
    }
}

/// Error category for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures and non-success HTTP statuses
    Network,
    /// Responses that could not be understood
    Decode,
    /// Wallet rejections and on-chain failures
    Wallet,
    /// Anything else
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Decode => write!(f, "decode"),
            ErrorCategory::Wallet => write!(f, "wallet"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Result type alias for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Fold a raw service failure into the claim error taxonomy.
pub fn classify(source: FailureSource, error: &ServiceError) -> ClaimError {
    let classified = ErrorClassifier::classify(source, &error.to_string());
    tracing::warn!(
        ?source,
        category = %error.category(),
        kind = %classified.kind(),
        error = %error,
        "Service call failed"
    );
    classified
}
