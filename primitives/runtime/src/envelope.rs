//! Wire shapes: region wrappers, streaming envelopes and route descriptors.

use serde::{Deserialize, Serialize};

/// Path prefix every gateway route lives under.
pub const ROUTE_PREFIX: &str = "/auth/ctrl/";

/// A request wrapper pairing a region with the object the call operates on.
///
/// Generated `Region<Type>` structs implement this so tests and handlers can
/// reach into any wrapper without knowing its concrete type.
pub trait RegionObj {
    /// The wrapped object type
    type Obj;

    /// Target region of the request
    fn region(&self) -> &str;

    /// Set the target region
    fn set_region(&mut self, region: &str);

    /// The wrapped object
    fn obj(&self) -> &Self::Obj;

    /// The wrapped object, mutably
    fn obj_mut(&mut self) -> &mut Self::Obj;

    /// JSON key the object travels under
    fn obj_name(&self) -> &'static str;
}

/// Wrappers whose object carries a list of field ids to update.
pub trait RegionObjFields: RegionObj {
    /// Field ids selected for update
    fn obj_fields(&self) -> &[String];

    /// Replace the field ids selected for update
    fn set_obj_fields(&mut self, fields: Vec<String>);
}

/// One line of a streamed reply.
///
/// Data lines carry `data`; the terminal line of a stream that failed after
/// its first byte carries `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamPayload<T> {
    /// A streamed item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// In-band failure report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<StreamResult>,
}

impl<T> StreamPayload<T> {
    /// A data line
    pub fn data(item: T) -> Self { StreamPayload { data: Some(item), result: None } }

    /// A result line
    pub fn result(message: impl Into<String>, code: u16) -> Self {
        StreamPayload { data: None, result: Some(StreamResult { message: message.into(), code }) }
    }
}

/// Body of a `result` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResult {
    /// Failure message
    #[serde(default)]
    pub message: String,
    /// Failure code; 0 and 200 mean success
    #[serde(default)]
    pub code: u16,
}

impl StreamResult {
    /// Whether the envelope reports a failure
    pub fn is_failure(&self) -> bool { self.code != 0 && self.code != 200 }
}

/// Error body written with a non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Human readable reason
    pub message: String,
}

/// A gateway route, as listed in the generated route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerRoute {
    /// Service the method belongs to
    pub service: &'static str,
    /// RPC method name
    pub method: &'static str,
    /// Full HTTP path
    pub path: &'static str,
    /// Input message type
    pub input: &'static str,
    /// Whether the reply is a stream of envelopes
    pub streaming: bool,
}
