//! Transfer command types

use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::fmt;
use uuid::Uuid;

use super::error::TransferError;

/// Longest `idem` value the remote API accepts
const MAX_IDEMPOTENCY_KEY_LEN: usize = 100;
const MAX_CURRENCY_LEN: usize = 10;

/// Token the remote API deduplicates on. Repeating a command with the same
/// key cannot move funds twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Fresh random key (UUIDv4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Caller-supplied key: 1..=100 printable ASCII characters, no spaces
    pub fn parse(raw: &str) -> Result<Self, TransferError> {
        let key = raw.trim();
        if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(TransferError::InvalidField {
                field: "idempotency key",
                reason: format!("length must be 1..={}", MAX_IDEMPOTENCY_KEY_LEN),
            });
        }
        if !key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(TransferError::InvalidField {
                field: "idempotency key",
                reason: "only printable ASCII without spaces".to_string(),
            });
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One send of funds to a named recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    recipient: String,
    amount: Decimal,
    currency: String,
    description: String,
    idempotency_key: IdempotencyKey,
}

impl TransferRequest {
    pub fn new(
        recipient: impl Into<String>,
        amount: Decimal,
        currency: &str,
        description: impl Into<String>,
        idempotency_key: IdempotencyKey,
    ) -> Result<Self, TransferError> {
        let recipient = recipient.into().trim().to_string();
        if recipient.is_empty() {
            return Err(TransferError::InvalidField {
                field: "recipient",
                reason: "must not be empty".to_string(),
            });
        }

        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }

        let currency = currency.trim().to_ascii_uppercase();
        if currency.len() < 2
            || currency.len() > MAX_CURRENCY_LEN
            || !currency.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(TransferError::InvalidField {
                field: "currency",
                reason: format!("`{}` is not a currency code", currency),
            });
        }

        Ok(Self {
            recipient,
            amount,
            currency,
            description: description.into(),
            idempotency_key,
        })
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn idempotency_key(&self) -> &IdempotencyKey {
        &self.idempotency_key
    }
}

/// The single money-moving command of an invocation: send `request` out of
/// `account_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    account_id: String,
    request: TransferRequest,
}

impl TransferCommand {
    pub fn new(account_id: impl Into<String>, request: TransferRequest) -> Result<Self, TransferError> {
        let account_id = account_id.into().trim().to_string();
        if account_id.is_empty()
            || !account_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TransferError::InvalidField {
                field: "account id",
                reason: format!("`{}` is not an account identifier", account_id),
            });
        }
        Ok(Self {
            account_id,
            request,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn method(&self) -> Method {
        Method::POST
    }

    pub fn path(&self) -> String {
        format!("/v2/accounts/{}/transactions", self.account_id)
    }

    /// Wire body of `POST /v2/accounts/{id}/transactions`
    pub fn body(&self) -> Value {
        let request = &self.request;
        json!({
            "type": "send",
            "to": request.recipient,
            "amount": request.amount.to_string(),
            "currency": request.currency,
            "description": request.description,
            "idem": request.idempotency_key.as_str(),
        })
    }
}
