//! Credential-to-signed-request pipeline
//!
//! ```text
//! Idle ─▶ Loading ─▶ SessionBuilding ─▶ Transferring ─▶ Succeeded ─┐
//!            │              │                 │                     ├─▶ Terminated
//!            └──────────────┴─────────────────┴───────▶ Failed ─────┘
//! ```
//!
//! Each stage runs to completion before the next. The first failure skips
//! the remaining stages, so a credential or key problem never reaches the
//! network.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::credentials::{CredentialLoadError, load_credentials};
use crate::outcome::TransferOutcome;
use crate::session::{SessionInitError, SigningSession, Transport};
use crate::transfer::{TransferCommand, TransferError, TransferInvoker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Loading,
    SessionBuilding,
    Transferring,
    Succeeded,
    Failed,
    Terminated,
}

impl PipelineState {
    /// Transitions only move forward; any working stage may drop to `Failed`.
    pub fn can_advance_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Loading)
                | (Idle, Terminated)
                | (Loading, SessionBuilding)
                | (SessionBuilding, Transferring)
                | (Transferring, Succeeded)
                | (Loading | SessionBuilding | Transferring, Failed)
                | (Succeeded | Failed, Terminated)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Terminated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "IDLE",
            PipelineState::Loading => "LOADING",
            PipelineState::SessionBuilding => "SESSION_BUILDING",
            PipelineState::Transferring => "TRANSFERRING",
            PipelineState::Succeeded => "SUCCEEDED",
            PipelineState::Failed => "FAILED",
            PipelineState::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any stage failure. Display is the stage's own diagnostic, unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Credentials(#[from] CredentialLoadError),

    #[error(transparent)]
    Session(#[from] SessionInitError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Pipeline already ran (state {0})")]
    AlreadyRan(PipelineState),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Credentials(e) => e.code(),
            PipelineError::Session(e) => e.code(),
            PipelineError::Transfer(e) => e.code(),
            PipelineError::AlreadyRan(_) => "ALREADY_RAN",
        }
    }
}

/// Load credentials and build a session in one step. Shared by the transfer
/// pipeline and the read-only listing commands.
pub fn open_session(
    credentials_path: &Path,
    api: &ApiConfig,
    transport: Arc<dyn Transport>,
) -> Result<SigningSession, PipelineError> {
    let record = load_credentials(credentials_path)?;
    Ok(SigningSession::new(&record, api, transport)?)
}

/// Runs one transfer from credential file to outcome
pub struct TransferPipeline {
    api: ApiConfig,
    transport: Arc<dyn Transport>,
    state: PipelineState,
}

impl TransferPipeline {
    pub fn new(api: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            api,
            transport,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Execute every stage once. Never panics; every error becomes a
    /// `Failure` carrying its diagnostic.
    pub async fn run(&mut self, credentials_path: &Path, command: &TransferCommand) -> TransferOutcome {
        match self.run_stages(credentials_path, command).await {
            Ok(body) => {
                self.advance(PipelineState::Succeeded);
                TransferOutcome::Success(body)
            }
            Err(e) => {
                warn!(code = e.code(), state = %self.state, error = %e, "Pipeline failed");
                if !matches!(e, PipelineError::AlreadyRan(_)) {
                    self.advance(PipelineState::Failed);
                }
                TransferOutcome::Failure(e.to_string())
            }
        }
    }

    /// Close the pipeline after the outcome has been reported
    pub fn finish(&mut self) {
        self.advance(PipelineState::Terminated);
    }

    async fn run_stages(
        &mut self,
        credentials_path: &Path,
        command: &TransferCommand,
    ) -> Result<serde_json::Value, PipelineError> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::AlreadyRan(self.state));
        }

        self.advance(PipelineState::Loading);
        let record = load_credentials(credentials_path)?;

        self.advance(PipelineState::SessionBuilding);
        let session = SigningSession::new(&record, &self.api, self.transport.clone())?;

        self.advance(PipelineState::Transferring);
        Ok(TransferInvoker::execute(&session, command).await?)
    }

    fn advance(&mut self, next: PipelineState) {
        if self.state.can_advance_to(next) {
            info!(from = %self.state, to = %next, "Pipeline state change");
            self.state = next;
        } else {
            warn!(from = %self.state, to = %next, "Ignoring illegal pipeline transition");
        }
    }
}
