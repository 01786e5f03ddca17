//! Per-request bearer tokens.
//!
//! Every call gets a fresh JWT bound to one `METHOD host/path` and valid for
//! a couple of minutes, so a leaked token cannot be replayed elsewhere.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::Algorithm;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::key::RequestSigner;

pub const TOKEN_ISSUER: &str = "cdp";

/// JWT claims expected by the remote API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RequestClaims {
    pub sub: String,
    pub iss: String,
    pub nbf: i64,
    pub exp: i64,
    pub uri: String,
}

#[derive(Debug, Serialize)]
struct TokenHeader<'a> {
    alg: Algorithm,
    typ: &'static str,
    kid: &'a str,
    nonce: &'a str,
}

/// `"POST api.coinbase.com/v2/accounts/primary/transactions"`
pub fn request_uri(method: &Method, host: &str, path: &str) -> String {
    format!("{} {}{}", method.as_str(), host, path)
}

/// 16 random bytes, hex encoded
pub fn new_nonce() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// Build and sign a token for one request.
pub fn build_token(
    signer: &RequestSigner,
    key_id: &str,
    uri: String,
    issued_at: i64,
    ttl_secs: i64,
    nonce: &str,
) -> jsonwebtoken::errors::Result<String> {
    let header = TokenHeader {
        alg: signer.algorithm(),
        typ: "JWT",
        kid: key_id,
        nonce,
    };
    let claims = RequestClaims {
        sub: key_id.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        nbf: issued_at,
        exp: issued_at + ttl_secs,
        uri,
    };

    let message = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
    );
    let signature = signer.sign(message.as_bytes())?;
    Ok(format!("{}.{}", message, signature))
}
