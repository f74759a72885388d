#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `restgate-runtime`: Contract Between Generated Code and the World
//!
//! Every file restgate emits compiles against this crate. It fixes the wire
//! contract of the gateway and gives generated handlers, client bindings and
//! tests a small, stable vocabulary to speak it.
//!
//! ## Core Concepts
//!
//! ### Errors
//! [`GatewayError`] is what a handler fails with; each variant maps to an HTTP
//! status through [`GatewayError::status`]. [`ClientError`] is what a client
//! binding fails with, and carries the status a test can assert on.
//!
//! ### Envelopes
//! Requests travel as region wrappers (`{"Region": "...", "<Type>": {...}}`),
//! described by the [`RegionObj`] trait. Streaming replies are
//! newline-delimited [`StreamPayload`] envelopes. Update handlers fill the
//! object's field mask from the keys the caller sent with
//! [`set_region_obj_fields`].
//!
//! ### Enforcement
//! The authorization engine is out of scope; generated handlers only see it
//! through the [`Enforcer`] trait and the per-request [`RegionContext`].
//!
//! ### Streaming
//! [`serve_stream`] drives a backend stream into a [`ResponseSink`] following
//! the [`StreamState`] decision table: errors before the first byte become an
//! HTTP error, errors after it become an in-band result envelope.
//!
//! ### Client calls
//! [`ApiTransport`] posts a body to a gateway path; [`call_unary`] and
//! [`call_stream`] decode the reply according to the same contract.
//!
//! ## Example
//! ```no_run
//! use restgate_runtime::{call_stream, ApiTransport, ClientError};
//! use serde_json::{json, Value};
//!
//! async fn show(transport: &dyn ApiTransport) -> Result<Vec<Value>, ClientError> {
//!     let input = json!({"Region": "local", "Flavor": {}});
//!     call_stream(transport, "http://127.0.0.1:9900/api/v1", "token", "ShowFlavor", &input).await
//! }
//! ```

pub mod authz;
pub mod client;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod stream;

pub use async_trait::async_trait;
pub use authz::{AllowAll, Enforcer, RegionContext};
pub use client::{
    call_stream, call_unary, decode_stream, decode_unary, route_url, ApiResponse, ApiTransport,
    DynApiTransport, ModFn,
};
pub use envelope::{
    ControllerRoute, ErrorMessage, RegionObj, RegionObjFields, StreamPayload, StreamResult,
    ROUTE_PREFIX,
};
pub use error::{ClientError, GatewayError};
pub use fields::set_region_obj_fields;
pub use stream::{
    decode_request, reply_json, serve_stream, write_error, BackendStream, RecordedResponse,
    ResponseSink, StreamAction, StreamEvent, StreamState, StreamWriter, JSON_CONTENT_TYPE,
    NDJSON_CONTENT_TYPE,
};
