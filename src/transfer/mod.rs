//! Transfer Invoker
//!
//! Sends funds out of one account to a named recipient through a
//! [`SigningSession`](crate::session::SigningSession).
//!
//! # Safety Invariants
//!
//! 1. **One exchange**: [`TransferInvoker::execute`] performs exactly one
//!    network call and never retries.
//! 2. **Idempotency**: every [`TransferCommand`] carries an
//!    [`IdempotencyKey`] sent as `idem`; re-running with the same key cannot
//!    double-spend.
//! 3. **Validate before signing**: amount, currency, recipient and account id
//!    are checked when the command is built, before any token exists.

pub mod error;
pub mod invoker;
pub mod types;

pub use error::TransferError;
pub use invoker::TransferInvoker;
pub use types::{IdempotencyKey, TransferCommand, TransferRequest};
