//! Error types shared by generated gateways and clients.

use thiserror::Error;

/// Why a gateway handler refused or failed a request.
///
/// A handler that returns one of these has written nothing to its sink;
/// [`crate::write_error`] turns it into a status line and a `{"message": ...}` body.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The enforcer denied the request.
    #[error("Forbidden")]
    Forbidden,

    /// The request named a region the gateway does not know.
    #[error("Region \"{0}\" not found")]
    RegionNotFound(String),

    /// The request named an organization that does not exist.
    #[error("Organization \"{0}\" not found")]
    OrgNotFound(String),

    /// The request body could not be bound to the expected wrapper.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No handler is registered for the path.
    #[error("Path {0} not found")]
    NotFound(String),

    /// The backend rejected the call.
    #[error("{message}")]
    Backend {
        /// Message reported by the backend
        message: String,
        /// HTTP status the failure maps to
        code: u16,
    },

    /// Writing the response failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// HTTP status for this error
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Forbidden => 403,
            GatewayError::RegionNotFound(_)
            | GatewayError::OrgNotFound(_)
            | GatewayError::BadRequest(_) => 400,
            GatewayError::NotFound(_) => 404,
            GatewayError::Backend { code, .. } => *code,
            GatewayError::Io(_) => 500,
        }
    }

    /// A backend failure mapped to 400, the status backend errors surface as
    pub fn backend(message: impl Into<String>) -> Self {
        GatewayError::Backend { message: message.into(), code: 400 }
    }
}

/// Why a client binding call failed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway answered with a non-200 status.
    #[error("{message}")]
    Status {
        /// HTTP status of the reply
        status: u16,
        /// Message from the error body, or the raw body if it was not an error object
        message: String,
    },

    /// The request never produced a reply.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The reply body did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A streamed reply ended with a failure envelope.
    #[error("{message}")]
    Stream {
        /// Code carried by the result envelope
        code: u16,
        /// Message carried by the result envelope
        message: String,
    },
}

impl ClientError {
    /// HTTP status associated with the failure, 0 when the gateway was never reached
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Status { status, .. } => *status,
            ClientError::Stream { code, .. } => *code,
            ClientError::Transport(_) | ClientError::Decode(_) => 0,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self { ClientError::Decode(err.to_string()) }
}
