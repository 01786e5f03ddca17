use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::error::SessionInitError;
use crate::logging::WIRE_TARGET;
use crate::transfer::TransferError;

/// A request with its bearer token already attached
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub authorization: String,
    pub body: Option<Value>,
}

/// Status and raw body text as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a signed request to the remote API and back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging
    fn name(&self) -> &'static str;

    /// Perform exactly one exchange. Never retries.
    async fn execute(&self, request: SignedRequest) -> Result<RawResponse, TransferError>;
}

/// HTTPS transport backed by `reqwest`
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// `timeout: None` keeps the client's default.
    pub fn new(timeout: Option<Duration>) -> Result<Self, SessionInitError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("vault_offload/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SessionInitError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "https"
    }

    async fn execute(&self, request: SignedRequest) -> Result<RawResponse, TransferError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(AUTHORIZATION, request.authorization)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransferError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            TransferError::Network(format!("Failed to read response body: {}", e))
        })?;

        debug!(target: WIRE_TARGET, status, body = %body, "Response received");
        Ok(RawResponse { status, body })
    }
}

/// Signs like the real thing but never touches the network. The response
/// echoes what would have been sent.
pub struct DryRunTransport;

#[async_trait]
impl Transport for DryRunTransport {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn execute(&self, request: SignedRequest) -> Result<RawResponse, TransferError> {
        let echo = json!({
            "dry_run": true,
            "method": request.method.as_str(),
            "url": request.url.as_str(),
            "body": request.body,
        });
        Ok(RawResponse {
            status: 200,
            body: echo.to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Option<Value>) -> SignedRequest {
        SignedRequest {
            method: Method::POST,
            url: Url::parse("https://api.coinbase.com/v2/accounts/primary/transactions").unwrap(),
            authorization: "Bearer token".to_string(),
            body,
        }
    }

    #[test]
    fn test_success_range() {
        let ok = |status| RawResponse {
            status,
            body: String::new(),
        };
        assert!(ok(200).is_success());
        assert!(ok(201).is_success());
        assert!(ok(299).is_success());
        assert!(!ok(199).is_success());
        assert!(!ok(302).is_success());
        assert!(!ok(400).is_success());
        assert!(!ok(500).is_success());
    }

    #[tokio::test]
    async fn test_dry_run_echoes_request() {
        let response = DryRunTransport
            .execute(request(Some(json!({"amount": "1.00"}))))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let echo: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(echo["dry_run"], true);
        assert_eq!(echo["method"], "POST");
        assert_eq!(echo["body"]["amount"], "1.00");
        assert!(!response.body.contains("Bearer"));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(None).is_ok());
        assert!(HttpTransport::new(Some(Duration::from_secs(5))).is_ok());
    }
}
