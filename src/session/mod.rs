//! Signing Session Factory
//!
//! Binds an API key identifier and its private key to a [`Transport`]. The
//! private key never leaves the process: each request carries a fresh,
//! short-lived JWT signed with it (see [`token`]).
//!
//! ```text
//! CredentialRecord ──▶ RequestSigner (ES256 | EdDSA) ──┐
//! ApiConfig ─────────▶ base URL + host ────────────────┼──▶ SigningSession
//! Transport (https | dry-run) ─────────────────────────┘
//! ```

pub mod error;
pub mod key;
pub mod token;
pub mod transport;

pub use error::SessionInitError;
pub use key::RequestSigner;
pub use token::{RequestClaims, TOKEN_ISSUER};
pub use transport::{DryRunTransport, HttpTransport, RawResponse, SignedRequest, Transport};

use chrono::Utc;
use jsonwebtoken::Algorithm;
use reqwest::{Method, Url};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::credentials::CredentialRecord;
use crate::logging::WIRE_TARGET;
use crate::transfer::TransferError;

/// Longest response excerpt quoted in a malformed-body error
const BODY_EXCERPT_LEN: usize = 256;

/// Authenticated client for one invocation
pub struct SigningSession {
    api_key_id: String,
    signer: RequestSigner,
    base_url: Url,
    host: String,
    token_ttl_secs: i64,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for SigningSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSession")
            .field("api_key_id", &self.api_key_id)
            .field("algorithm", &self.signer.algorithm())
            .field("host", &self.host)
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

impl SigningSession {
    pub fn new(
        record: &CredentialRecord,
        api: &ApiConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SessionInitError> {
        let signer = RequestSigner::from_key_material(record.private_key_material())?;

        let base_url = Url::parse(&api.base_url)
            .map_err(|e| SessionInitError::InvalidEndpoint(format!("{}: {}", api.base_url, e)))?;
        if !matches!(base_url.scheme(), "https" | "http") {
            return Err(SessionInitError::InvalidEndpoint(format!(
                "{}: scheme must be http or https",
                api.base_url
            )));
        }
        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SessionInitError::InvalidEndpoint(format!(
                    "{}: missing host",
                    api.base_url
                )));
            }
        };

        if api.token_ttl_secs <= 0 {
            return Err(SessionInitError::InvalidTokenLifetime(api.token_ttl_secs));
        }

        info!(
            api_key_id = %record.api_key_id(),
            algorithm = ?signer.algorithm(),
            host = %host,
            transport = transport.name(),
            "Signing session established"
        );

        Ok(Self {
            api_key_id: record.api_key_id().to_string(),
            signer,
            base_url,
            host,
            token_ttl_secs: api.token_ttl_secs,
            transport,
        })
    }

    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    pub fn algorithm(&self) -> Algorithm {
        self.signer.algorithm()
    }

    /// Host (and non-default port) as it appears in the token `uri` claim
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `Authorization` header value for one request
    pub fn authorize(&self, method: &Method, path: &str) -> Result<String, TransferError> {
        let uri = token::request_uri(method, &self.host, path);
        let token = token::build_token(
            &self.signer,
            &self.api_key_id,
            uri,
            Utc::now().timestamp(),
            self.token_ttl_secs,
            &token::new_nonce(),
        )?;
        Ok(format!("Bearer {}", token))
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, TransferError> {
        self.base_url
            .join(path)
            .map_err(|e| TransferError::InvalidField {
                field: "path",
                reason: format!("{}: {}", path, e),
            })
    }

    /// Sign, send and parse one request. Non-2xx and unparsable bodies are errors.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransferError> {
        self.send_with_query(method, path, &[], body).await
    }

    /// Like [`send`](Self::send) with query parameters. The token covers the
    /// path only.
    pub async fn send_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value, TransferError> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let request = SignedRequest {
            authorization: self.authorize(&method, path)?,
            method,
            url,
            body,
        };
        debug!(
            target: WIRE_TARGET,
            method = %request.method,
            url = %request.url,
            body = ?request.body,
            "Sending request"
        );

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(TransferError::Api {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            TransferError::MalformedResponse(format!(
                "{} (body: {})",
                e,
                excerpt(&response.body)
            ))
        })
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
