//! Read-only account and payment-method discovery.
//!
//! Used to find the account identifier a transfer draws from. Nothing here
//! moves funds.

use reqwest::Method;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

use crate::session::SigningSession;
use crate::transfer::TransferError;

pub const ACCOUNTS_PATH: &str = "/api/v3/brokerage/accounts";
pub const PAYMENT_METHODS_PATH: &str = "/api/v3/brokerage/payment_methods";

/// Largest page the accounts endpoint serves
const ACCOUNTS_PAGE_LIMIT: &str = "250";
/// Upper bound on pages followed before giving up on a looping cursor
const MAX_PAGES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Balance {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    pub currency: String,
    pub available_balance: Balance,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | ID: {} | Balance: {}",
            self.currency, self.uuid, self.available_balance.value
        )
    }
}

#[derive(Debug, Deserialize)]
struct AccountsPage {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    has_next: bool,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub currency: Option<String>,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | ID: {} | {}", self.kind, self.id, self.name)?;
        if let Some(currency) = &self.currency {
            write!(f, " ({})", currency)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PaymentMethodsPage {
    #[serde(default)]
    payment_methods: Vec<PaymentMethod>,
}

fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, TransferError> {
    serde_json::from_value(body).map_err(|e| TransferError::MalformedResponse(e.to_string()))
}

/// All brokerage accounts, following the pagination cursor.
pub async fn list_accounts(session: &SigningSession) -> Result<Vec<Account>, TransferError> {
    let mut accounts = Vec::new();
    let mut cursor: Option<String> = None;

    for page_no in 0..MAX_PAGES {
        let body = {
            let mut query = vec![("limit", ACCOUNTS_PAGE_LIMIT)];
            if let Some(cursor) = cursor.as_deref() {
                query.push(("cursor", cursor));
            }
            session
                .send_with_query(Method::GET, ACCOUNTS_PATH, &query, None)
                .await?
        };
        let page: AccountsPage = decode(body)?;
        debug!(page = page_no, count = page.accounts.len(), has_next = page.has_next, "Accounts page");
        accounts.extend(page.accounts);

        match page.cursor.filter(|c| page.has_next && !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => {
                info!(count = accounts.len(), "Accounts listed");
                return Ok(accounts);
            }
        }
    }

    Err(TransferError::MalformedResponse(format!(
        "accounts pagination did not end after {} pages",
        MAX_PAGES
    )))
}

pub async fn list_payment_methods(
    session: &SigningSession,
) -> Result<Vec<PaymentMethod>, TransferError> {
    let body = session.send(Method::GET, PAYMENT_METHODS_PATH, None).await?;
    let page: PaymentMethodsPage = decode(body)?;
    info!(count = page.payment_methods.len(), "Payment methods listed");
    Ok(page.payment_methods)
}
