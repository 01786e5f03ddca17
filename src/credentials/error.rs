use thiserror::Error;

/// Failures while reading the local credential file. All are terminal.
#[derive(Debug, Error)]
pub enum CredentialLoadError {
    #[error("Credential file not found: {path}")]
    NotFound { path: String },

    #[error("Credential file {path} could not be read: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file {path} is not a valid credential document: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Credential file is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Credential field `{0}` is empty")]
    EmptyField(&'static str),
}

impl CredentialLoadError {
    pub fn code(&self) -> &'static str {
        match self {
            CredentialLoadError::NotFound { .. } => "CREDENTIALS_NOT_FOUND",
            CredentialLoadError::Unreadable { .. } => "CREDENTIALS_UNREADABLE",
            CredentialLoadError::Malformed { .. } => "CREDENTIALS_MALFORMED",
            CredentialLoadError::MissingField(_) => "CREDENTIALS_MISSING_FIELD",
            CredentialLoadError::EmptyField(_) => "CREDENTIALS_EMPTY_FIELD",
        }
    }
}
