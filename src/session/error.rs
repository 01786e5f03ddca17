use thiserror::Error;

/// Failures while turning credentials into a signing session. All are terminal.
#[derive(Debug, Error, Clone)]
pub enum SessionInitError {
    #[error("Malformed key material: {0}")]
    MalformedPem(String),

    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Signing key rejected: {0}")]
    KeyRejected(String),

    #[error("Invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Token lifetime must be positive, got {0}s")]
    InvalidTokenLifetime(i64),

    #[error("Failed to create HTTP client: {0}")]
    Transport(String),
}

impl SessionInitError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionInitError::MalformedPem(_) => "MALFORMED_PEM",
            SessionInitError::UnsupportedAlgorithm(_) => "UNSUPPORTED_ALGORITHM",
            SessionInitError::KeyRejected(_) => "KEY_REJECTED",
            SessionInitError::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            SessionInitError::InvalidTokenLifetime(_) => "INVALID_TOKEN_LIFETIME",
            SessionInitError::Transport(_) => "TRANSPORT_INIT",
        }
    }
}
