//! Client side of the gateway contract.
//!
//! Generated client bindings are thin: they name the route and the types and
//! leave posting and decoding to [`call_unary`] and [`call_stream`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::{ErrorMessage, StreamPayload, ROUTE_PREFIX};
use crate::error::ClientError;

/// Raw reply of a gateway call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// Body bytes
    pub body: Vec<u8>,
}

/// Posts JSON bodies to gateway routes.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// POST `body` to `url` with `token` as bearer credential.
    ///
    /// Non-200 replies are not errors at this level; only failing to get a
    /// reply at all is.
    async fn post(&self, url: &str, token: &str, body: Vec<u8>) -> Result<ApiResponse, ClientError>;
}

/// Shared, dynamically dispatched transport.
pub type DynApiTransport = Arc<dyn ApiTransport>;

/// Modifier applied to a request object before it is sent.
pub type ModFn<'a, T> = &'a (dyn Fn(&mut T) + Send + Sync);

/// Full URL of a gateway method under `uri`
pub fn route_url(uri: &str, method: &str) -> String {
    format!("{}{}{}", uri.trim_end_matches('/'), ROUTE_PREFIX, method)
}

/// Call a unary method and decode its single JSON reply
pub async fn call_unary<I, O>(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    method: &str,
    input: &I,
) -> Result<O, ClientError>
where
    I: Serialize + Sync + ?Sized,
    O: DeserializeOwned,
{
    let body = serde_json::to_vec(input)?;
    let url = route_url(uri, method);
    tracing::debug!("POST {}", url);
    let resp = transport.post(&url, token, body).await?;
    decode_unary(&resp)
}

/// Call a streaming method and collect every data item it sends
pub async fn call_stream<I, O>(
    transport: &dyn ApiTransport,
    uri: &str,
    token: &str,
    method: &str,
    input: &I,
) -> Result<Vec<O>, ClientError>
where
    I: Serialize + Sync + ?Sized,
    O: DeserializeOwned,
{
    let body = serde_json::to_vec(input)?;
    let url = route_url(uri, method);
    tracing::debug!("POST {} (stream)", url);
    let resp = transport.post(&url, token, body).await?;
    decode_stream(&resp)
}

/// Decode a unary reply
pub fn decode_unary<O: DeserializeOwned>(resp: &ApiResponse) -> Result<O, ClientError> {
    if resp.status != 200 {
        return Err(status_error(resp));
    }
    Ok(serde_json::from_slice(&resp.body)?)
}

/// Decode a streamed reply into its data items, in order
///
/// A `result` envelope carrying a failure code turns the whole call into
/// [`ClientError::Stream`].
pub fn decode_stream<O: DeserializeOwned>(resp: &ApiResponse) -> Result<Vec<O>, ClientError> {
    if resp.status != 200 {
        return Err(status_error(resp));
    }

    let mut items = Vec::new();
    for payload in serde_json::Deserializer::from_slice(&resp.body).into_iter::<StreamPayload<O>>()
    {
        let payload = payload?;
        if let Some(result) = payload.result {
            if result.is_failure() {
                return Err(ClientError::Stream { code: result.code, message: result.message });
            }
        }
        if let Some(data) = payload.data {
            items.push(data);
        }
    }
    Ok(items)
}

fn status_error(resp: &ApiResponse) -> ClientError {
    let message = match serde_json::from_slice::<ErrorMessage>(&resp.body) {
        Ok(body) => body.message,
        Err(_) => String::from_utf8_lossy(&resp.body).into_owned(),
    };
    ClientError::Status { status: resp.status, message }
}
