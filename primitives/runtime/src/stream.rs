//! Response writing for generated handlers.
//!
//! Unary replies go out in one piece through [`reply_json`]. Streaming replies
//! go through a [`StreamWriter`], whose behavior is the [`StreamState`]
//! decision table below. The important property is that an error is only ever
//! returned to the caller while nothing has been written; once the first byte
//! is out, errors are reported in-band as a `result` envelope.
//!
//! | state      | event    | action                         | next       |
//! |------------|----------|--------------------------------|------------|
//! | NotStarted | item     | write header, write data line  | Started    |
//! | NotStarted | filtered | nothing                        | NotStarted |
//! | NotStarted | error    | return the error               | NotStarted |
//! | NotStarted | end      | write header, empty body       | Started    |
//! | Started    | item     | write data line                | Started    |
//! | Started    | filtered | nothing                        | Started    |
//! | Started    | error    | write result line, return Ok   | Started    |
//! | Started    | end      | nothing                        | Started    |

use std::io;

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::{ErrorMessage, StreamPayload};
use crate::error::GatewayError;

/// Content type of streamed replies.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Content type of unary replies and error bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Items produced by a streaming backend call.
pub type BackendStream<T> = BoxStream<'static, Result<T, GatewayError>>;

/// Where a handler writes its HTTP response.
///
/// The header can be written once; body chunks follow it.
pub trait ResponseSink: Send {
    /// Write the status line and content type
    fn write_header(&mut self, status: u16, content_type: &str) -> io::Result<()>;

    /// Append a chunk to the body
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Push buffered bytes to the client
    fn flush(&mut self) -> io::Result<()>;

    /// Whether the header has gone out
    fn header_written(&self) -> bool;
}

/// A [`ResponseSink`] that keeps everything in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedResponse {
    /// Status, once written
    pub status: Option<u16>,
    /// Content type, once written
    pub content_type: Option<String>,
    /// Body bytes
    pub body: Vec<u8>,
    /// Number of flushes
    pub flushes: usize,
}

impl RecordedResponse {
    /// Empty response
    pub fn new() -> Self { Self::default() }

    /// Body as text
    pub fn body_str(&self) -> String { String::from_utf8_lossy(&self.body).into_owned() }

    /// Decode the body as a sequence of stream envelopes
    pub fn envelopes<T: DeserializeOwned>(&self) -> serde_json::Result<Vec<StreamPayload<T>>> {
        serde_json::Deserializer::from_slice(&self.body).into_iter().collect()
    }
}

impl ResponseSink for RecordedResponse {
    fn write_header(&mut self, status: u16, content_type: &str) -> io::Result<()> {
        if self.status.is_some() {
            return Err(io::Error::new(io::ErrorKind::Other, "header already written"));
        }
        self.status = Some(status);
        self.content_type = Some(content_type.to_string());
        Ok(())
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.status.is_none() {
            return Err(io::Error::new(io::ErrorKind::Other, "body written before header"));
        }
        self.body.extend_from_slice(chunk);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn header_written(&self) -> bool { self.status.is_some() }
}

/// Whether a streamed reply has written its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Nothing written yet
    #[default]
    NotStarted,
    /// Header written
    Started,
}

/// What happened on the backend stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// An item the caller may see
    Item,
    /// An item the per-item filter rejected
    Filtered,
    /// The stream failed
    Error,
    /// The stream ended
    End,
}

/// What the writer does in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamAction {
    /// Write the header, then the data line
    StartAndWrite,
    /// Write the data line
    Write,
    /// Drop the item
    Skip,
    /// Hand the error back to the caller
    ReturnError,
    /// Write the header with an empty body
    StartEmpty,
    /// Write a result envelope line
    WriteResult,
    /// Nothing left to do
    Done,
}

impl StreamState {
    /// The decision table
    pub fn on(self, event: StreamEvent) -> (StreamAction, StreamState) {
        use StreamAction::*;
        use StreamEvent::*;
        use StreamState::*;

        match (self, event) {
            (NotStarted, Item) => (StartAndWrite, Started),
            (NotStarted, Filtered) => (Skip, NotStarted),
            (NotStarted, Error) => (ReturnError, NotStarted),
            (NotStarted, End) => (StartEmpty, Started),
            (Started, Item) => (Write, Started),
            (Started, Filtered) => (Skip, Started),
            (Started, Error) => (WriteResult, Started),
            (Started, End) => (Done, Started),
        }
    }
}

/// Writes a streamed reply, one envelope per line.
pub struct StreamWriter<'a> {
    sink: &'a mut dyn ResponseSink,
    state: StreamState,
}

impl<'a> StreamWriter<'a> {
    /// Writer over a sink nothing has been written to
    pub fn new(sink: &'a mut dyn ResponseSink) -> Self {
        StreamWriter { sink, state: StreamState::NotStarted }
    }

    /// Current state
    pub fn state(&self) -> StreamState { self.state }

    /// Feed one backend item, `allowed` being the verdict of the per-item filter
    pub fn item<T: Serialize>(&mut self, item: &T, allowed: bool) -> Result<(), GatewayError> {
        let event = if allowed { StreamEvent::Item } else { StreamEvent::Filtered };
        match self.step(event) {
            StreamAction::StartAndWrite => {
                self.start()?;
                self.write_line(&StreamPayload::data(item))
            }
            StreamAction::Write => self.write_line(&StreamPayload::data(item)),
            _ => Ok(()),
        }
    }

    /// Feed a backend failure
    pub fn fail(&mut self, err: GatewayError) -> Result<(), GatewayError> {
        match self.step(StreamEvent::Error) {
            StreamAction::WriteResult => {
                tracing::debug!("stream failed after first byte: {}", err);
                self.write_line(&StreamPayload::<()>::result(err.to_string(), err.status()))
            }
            _ => Err(err),
        }
    }

    /// Feed the end of the stream
    pub fn finish(&mut self) -> Result<(), GatewayError> {
        match self.step(StreamEvent::End) {
            StreamAction::StartEmpty => {
                self.start()?;
                self.sink.flush()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn step(&mut self, event: StreamEvent) -> StreamAction {
        let (action, next) = self.state.on(event);
        self.state = next;
        action
    }

    fn start(&mut self) -> Result<(), GatewayError> {
        self.sink.write_header(200, NDJSON_CONTENT_TYPE)?;
        Ok(())
    }

    fn write_line<T: Serialize>(&mut self, payload: &StreamPayload<T>) -> Result<(), GatewayError> {
        let mut line = serde_json::to_vec(payload).map_err(io::Error::from)?;
        line.push(b'\n');
        self.sink.write_body(&line)?;
        self.sink.flush()?;
        Ok(())
    }
}

/// Drive a backend stream into `sink`.
///
/// `opened` is the result of starting the backend call; an error there is
/// returned untouched. Items rejected by `allow` are dropped silently.
pub async fn serve_stream<T, F>(
    sink: &mut dyn ResponseSink,
    opened: Result<BackendStream<T>, GatewayError>,
    mut allow: F,
) -> Result<(), GatewayError>
where
    T: Serialize,
    F: FnMut(&T) -> bool,
{
    let mut writer = StreamWriter::new(sink);
    let mut stream = match opened {
        Ok(stream) => stream,
        Err(err) => return writer.fail(err),
    };

    while let Some(next) = stream.next().await {
        match next {
            Ok(item) => {
                let allowed = allow(&item);
                writer.item(&item, allowed)?;
            }
            Err(err) => return writer.fail(err),
        }
    }
    writer.finish()
}

/// Write a unary JSON reply
pub fn reply_json<T: Serialize>(sink: &mut dyn ResponseSink, value: &T) -> Result<(), GatewayError> {
    let body = serde_json::to_vec(value).map_err(io::Error::from)?;
    sink.write_header(200, JSON_CONTENT_TYPE)?;
    sink.write_body(&body)?;
    sink.flush()?;
    Ok(())
}

/// Write the status and `{"message": ...}` body for a failed handler
///
/// Does nothing if the response has already started.
pub fn write_error(sink: &mut dyn ResponseSink, err: &GatewayError) -> io::Result<()> {
    if sink.header_written() {
        tracing::warn!("response already started, dropping error: {}", err);
        return Ok(());
    }
    let body = serde_json::to_vec(&ErrorMessage { message: err.to_string() })?;
    sink.write_header(err.status(), JSON_CONTENT_TYPE)?;
    sink.write_body(&body)?;
    sink.flush()
}

/// Bind a request body to its wrapper type
pub fn decode_request<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|e| GatewayError::BadRequest(e.to_string()))
}
