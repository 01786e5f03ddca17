use serde_json::Value;
use tracing::{info, warn};

use super::error::TransferError;
use super::types::TransferCommand;
use crate::session::SigningSession;

/// Issues the transfer. Exactly one network exchange per call, no retries.
pub struct TransferInvoker;

impl TransferInvoker {
    pub async fn execute(
        session: &SigningSession,
        command: &TransferCommand,
    ) -> Result<Value, TransferError> {
        let request = command.request();
        info!(
            account_id = %command.account_id(),
            recipient = %request.recipient(),
            amount = %request.amount(),
            currency = %request.currency(),
            idempotency_key = %request.idempotency_key(),
            "Submitting transfer"
        );

        let result = session
            .send(command.method(), &command.path(), Some(command.body()))
            .await;

        match &result {
            Ok(body) => {
                let transfer_id = body.pointer("/data/id").and_then(Value::as_str).unwrap_or("-");
                let status = body.pointer("/data/status").and_then(Value::as_str).unwrap_or("-");
                info!(transfer_id, status, "Transfer accepted");
            }
            Err(e) if e.may_have_reached_remote() => warn!(
                code = e.code(),
                error = %e,
                idempotency_key = %request.idempotency_key(),
                "Transfer failed after reaching the network; retry only with the same idempotency key"
            ),
            Err(e) => warn!(code = e.code(), error = %e, "Transfer not sent"),
        }

        result
    }
}
