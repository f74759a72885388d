#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `restgate-http`: HTTP Transport Backend
//!
//! This crate provides a concrete HTTP implementation of the
//! [`runtime::ApiTransport`] trait, so generated client bindings and permission
//! tests can talk to a live gateway.
//!
//! ## Overview
//!
//! - Implements [`HttpTransport`], a thin wrapper over [`reqwest::Client`]
//! - Sends the caller's token as a bearer credential
//! - Leaves status interpretation to the runtime decoders
//!
//! ## Example
//! ```no_run
//! use restgate_http::HttpTransport;
//! use runtime::{call_unary, ClientError};
//! use serde_json::{json, Value};
//!
//! # async fn demo() -> Result<(), ClientError> {
//! let transport = HttpTransport::new();
//! let input = json!({"Region": "local", "Flavor": {"key": {"name": "x1"}}});
//! let reply: Value =
//!     call_unary(&transport, "http://127.0.0.1:9900/api/v1", "token", "CreateFlavor", &input)
//!         .await?;
//! println!("{:#?}", reply);
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use async_trait::async_trait;
use runtime::{ApiResponse, ApiTransport, ClientError};

/// [`ApiTransport`] over HTTP.
///
/// Each call is a single POST with a JSON body; the reply body is returned
/// as raw bytes together with its status.
#[derive(Clone, Default)]
pub struct HttpTransport {
    /// The underlying HTTP client used to perform requests.
    client: reqwest::Client,
}

impl HttpTransport {
    /// Constructs a transport with a default client.
    pub fn new() -> Self {
        logging::trace("HTTP", "→ initializing HTTP transport");
        Self { client: reqwest::Client::new() }
    }

    /// Constructs a transport around a preconfigured client (TLS roots, timeouts, proxies).
    pub fn with_client(client: reqwest::Client) -> Self { Self { client } }
}

/// Reads a bearer token from the first line of a token file.
///
/// # Errors
/// Returns `ClientError::Transport` if the file cannot be read or its first
/// line is empty.
pub fn token_from_file(path: impl AsRef<Path>) -> Result<String, ClientError> {
    let file = File::open(path.as_ref())
        .map_err(|e| ClientError::Transport(format!("Failed to read token file: {}", e)))?;

    let line = BufReader::new(file)
        .lines()
        .next()
        .ok_or_else(|| ClientError::Transport("Token file is empty".to_string()))?
        .map_err(|e| ClientError::Transport(format!("Failed to read token file: {}", e)))?;

    let token = line.trim();
    if token.is_empty() {
        return Err(ClientError::Transport("Token file is empty".to_string()));
    }
    Ok(token.to_string())
}

#[async_trait]
impl ApiTransport for HttpTransport {
    /// POSTs `body` as JSON and returns the status and body of the reply.
    ///
    /// # Errors
    /// - [`ClientError::Transport`] if the request fails or the body cannot be read
    async fn post(&self, url: &str, token: &str, body: Vec<u8>) -> Result<ApiResponse, ClientError> {
        logging::trace("HTTP", &format!("→ POST {}", url));

        let mut req = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if !token.is_empty() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(|e| {
            tracing::error!("HTTP Transport - Request failed: {}", e);
            ClientError::Transport(e.to_string())
        })?;

        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::error!("HTTP Transport - Failed to read body: {}", e);
            ClientError::Transport(e.to_string())
        })?;

        tracing::debug!("← {} {} ({} bytes)", status, url, bytes.len());
        Ok(ApiResponse { status, body: bytes.to_vec() })
    }
}
