use std::sync::Mutex;

use async_trait::async_trait;
use restgate_runtime::{
    call_stream, call_unary, decode_stream, ApiResponse, ApiTransport, ClientError,
};
use serde_json::{json, Value};

/// Transport returning a canned reply and recording what it was sent
struct CannedTransport {
    reply: ApiResponse,
    sent: Mutex<Vec<(String, String, Value)>>,
}

impl CannedTransport {
    fn new(status: u16, body: &str) -> Self {
        CannedTransport {
            reply: ApiResponse { status, body: body.as_bytes().to_vec() },
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ApiTransport for CannedTransport {
    async fn post(&self, url: &str, token: &str, body: Vec<u8>) -> Result<ApiResponse, ClientError> {
        let value: Value = serde_json::from_slice(&body)?;
        self.sent.lock().expect("lock").push((url.to_string(), token.to_string(), value));
        Ok(self.reply.clone())
    }
}

struct Unreachable;

#[async_trait]
impl ApiTransport for Unreachable {
    async fn post(&self, _: &str, _: &str, _: Vec<u8>) -> Result<ApiResponse, ClientError> {
        Err(ClientError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_unary_call_posts_wrapper_to_route() {
    let transport = CannedTransport::new(200, r#"{"message":"ok"}"#);
    let input = json!({"Region": "local", "Flavor": {"key": {"name": "x1"}}});

    let out: Value = call_unary(&transport, "http://mc/api/v1", "tok", "CreateFlavor", &input)
        .await
        .expect("unary call");
    assert_eq!(out, json!({"message": "ok"}));

    let sent = transport.sent.lock().expect("lock");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "http://mc/api/v1/auth/ctrl/CreateFlavor");
    assert_eq!(sent[0].1, "tok");
    assert_eq!(sent[0].2, input);
}

#[tokio::test]
async fn test_unary_forbidden() {
    let transport = CannedTransport::new(403, r#"{"message":"Forbidden"}"#);
    let err = call_unary::<_, Value>(&transport, "", "tok", "DeleteFlavor", &json!({}))
        .await
        .expect_err("forbidden");
    assert_eq!(err.status(), 403);
    assert!(err.to_string().contains("Forbidden"));
}

#[tokio::test]
async fn test_stream_call_collects_items_in_order() {
    let transport = CannedTransport::new(200, "{\"data\":{\"n\":1}}\n{\"data\":{\"n\":2}}\n");
    let items: Vec<Value> =
        call_stream(&transport, "", "tok", "ShowFlavor", &json!({})).await.expect("stream");
    assert_eq!(items, vec![json!({"n": 1}), json!({"n": 2})]);
}

/// An item type with no `Default`, as generated message types may be
#[derive(Debug, PartialEq, serde::Deserialize)]
struct Count {
    n: u32,
}

#[test]
fn test_decode_stream_of_items_without_default() {
    let resp = ApiResponse { status: 200, body: b"{\"data\":{\"n\":7}}\n".to_vec() };
    let items: Vec<Count> = decode_stream(&resp).expect("stream");
    assert_eq!(items, vec![Count { n: 7 }]);
}

#[tokio::test]
async fn test_stream_call_empty_body() {
    let transport = CannedTransport::new(200, "");
    let items: Vec<Value> =
        call_stream(&transport, "", "tok", "ShowFlavor", &json!({})).await.expect("stream");
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_stream_call_result_envelope_fails() {
    let body = "{\"data\":{\"n\":1}}\n{\"result\":{\"message\":\"lost connection\",\"code\":400}}\n";
    let transport = CannedTransport::new(200, body);
    let err = call_stream::<_, Value>(&transport, "", "tok", "ShowFlavor", &json!({}))
        .await
        .expect_err("result envelope");
    match err {
        ClientError::Stream { code, message } => {
            assert_eq!(code, 400);
            assert_eq!(message, "lost connection");
        }
        other => panic!("expected stream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let err = call_unary::<_, Value>(&Unreachable, "", "tok", "CreateFlavor", &json!({}))
        .await
        .expect_err("unreachable");
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.status(), 0);
}
