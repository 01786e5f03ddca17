//! vault_offload - signed single-transfer client for the Coinbase API
//!
//! Loads a locally stored API key, derives a signing key from it, and sends
//! exactly one transfer request authenticated with a short-lived JWT.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration per environment
//! - [`logging`] - tracing subscriber setup (console + rolling file)
//! - [`credentials`] - Key Material Loader
//! - [`session`] - Signing Session Factory (key derivation, JWT, transport)
//! - [`transfer`] - Transfer Invoker
//! - [`outcome`] - Outcome Reporter
//! - [`pipeline`] - Credential-to-signed-request pipeline and its state machine
//! - [`accounts`] - Read-only account and payment-method discovery

pub mod config;
pub mod logging;

// Pipeline stages, leaf first
pub mod credentials;
pub mod session;
pub mod transfer;
pub mod outcome;
pub mod pipeline;

pub mod accounts;

// Convenient re-exports at crate root
pub use config::{AppConfig, ConfigError};
pub use credentials::{CredentialLoadError, CredentialRecord, load_credentials, normalize_key_material};
pub use outcome::TransferOutcome;
pub use pipeline::{PipelineError, PipelineState, TransferPipeline};
pub use session::{SessionInitError, SigningSession};
pub use transfer::{IdempotencyKey, TransferCommand, TransferError, TransferInvoker, TransferRequest};
