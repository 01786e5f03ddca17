//! Transfer Error Types

use thiserror::Error;

/// Failures of a request to the remote API, or of the request's own
/// validation before it is sent.
#[derive(Error, Debug, Clone)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    // === Signing Errors ===
    #[error("Failed to sign request: {0}")]
    Signing(String),

    // === Remote Errors ===
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    MalformedResponse(String),
}

impl TransferError {
    /// Get the error code for structured logs
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::InvalidField { .. } => "INVALID_FIELD",
            TransferError::Signing(_) => "SIGNING_FAILED",
            TransferError::Network(_) => "NETWORK_ERROR",
            TransferError::Api { .. } => "API_ERROR",
            TransferError::MalformedResponse(_) => "MALFORMED_RESPONSE",
        }
    }

    /// Whether the request may have reached the remote side. When true, funds
    /// may have moved even though the call failed.
    pub fn may_have_reached_remote(&self) -> bool {
        matches!(
            self,
            TransferError::Network(_)
                | TransferError::Api { .. }
                | TransferError::MalformedResponse(_)
        )
    }
}

impl From<jsonwebtoken::errors::Error> for TransferError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        TransferError::Signing(e.to_string())
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(e: reqwest::Error) -> Self {
        TransferError::Network(e.to_string())
    }
}
