//! Generated gateway, client bindings and permission tests run against each
//! other through an in-memory transport.

use std::sync::Mutex;

use futures::stream::{self, StreamExt};
use restgate_generated_tests::edgeproto::{self, Settings, Widget, WidgetKey};
use restgate_generated_tests::{mctestclient, orm, ormapi, permtest, testutil};
use restgate_runtime::{
    async_trait, route_url, write_error, ApiResponse, ApiTransport, BackendStream, ClientError,
    Enforcer, GatewayError, RecordedResponse, RegionContext, RegionObj,
};

const URI: &str = "http://gateway/api/v1";
const REGION: &str = "local";
const SHOW_COUNT: usize = 2;

/// Backend serving two widgets per organization in region `local`.
struct WidgetStore {
    widgets: Vec<Widget>,
    updated_fields: Mutex<Vec<Vec<String>>>,
}

fn check_region(rc: &RegionContext) -> Result<(), GatewayError> {
    if rc.region == REGION {
        Ok(())
    } else {
        Err(GatewayError::RegionNotFound(rc.region.clone()))
    }
}

fn done(action: &str, obj: &Widget) -> edgeproto::Result {
    edgeproto::Result { message: format!("{action} {}", obj.key.name) }
}

#[async_trait]
impl orm::WidgetApi for WidgetStore {
    async fn create_widget(&self, rc: &RegionContext, obj: &Widget) -> Result<edgeproto::Result, GatewayError> {
        check_region(rc)?;
        Ok(done("created", obj))
    }

    async fn delete_widget(&self, rc: &RegionContext, obj: &Widget) -> Result<edgeproto::Result, GatewayError> {
        check_region(rc)?;
        Ok(done("deleted", obj))
    }

    async fn update_widget(&self, rc: &RegionContext, obj: &Widget) -> Result<edgeproto::Result, GatewayError> {
        check_region(rc)?;
        self.updated_fields.lock().expect("lock").push(obj.fields.clone());
        Ok(done("updated", obj))
    }

    async fn show_widget(&self, rc: &RegionContext, obj: &Widget) -> Result<BackendStream<Widget>, GatewayError> {
        check_region(rc)?;
        let org = obj.key.organization.clone();
        let widgets: Vec<Result<Widget, GatewayError>> = self
            .widgets
            .iter()
            .filter(|w| org.is_empty() || w.key.organization == org)
            .cloned()
            .map(Ok)
            .collect();
        Ok(stream::iter(widgets).boxed())
    }
}

#[async_trait]
impl orm::ClusterApi for WidgetStore {
    async fn inject_widget(&self, rc: &RegionContext, obj: &Widget) -> Result<edgeproto::Result, GatewayError> {
        check_region(rc)?;
        Ok(done("injected", obj))
    }

    async fn show_settings(&self, rc: &RegionContext, _obj: &Settings) -> Result<BackendStream<Settings>, GatewayError> {
        check_region(rc)?;
        Ok(stream::iter(vec![Ok(Settings { name: "global".to_string() })]).boxed())
    }

    async fn stream_settings(&self, rc: &RegionContext, _obj: &Settings) -> Result<BackendStream<Settings>, GatewayError> {
        check_region(rc)?;
        let items = vec![Ok(Settings { name: "first".to_string() }), Err(GatewayError::backend("boom"))];
        Ok(stream::iter(items).boxed())
    }
}

/// Users may only act within the org named after them.
struct OwnOrg;

impl Enforcer for OwnOrg {
    fn enforce(&self, subject: &str, org: &str, _resource: &str, _action: &str) -> bool {
        subject == org
    }
}

/// Serves gateway calls with the generated dispatcher; the token names the
/// user, and `ops` is an internal caller.
struct InMemoryGateway {
    store: WidgetStore,
}

#[async_trait]
impl ApiTransport for InMemoryGateway {
    async fn post(&self, url: &str, token: &str, body: Vec<u8>) -> Result<ApiResponse, ClientError> {
        let path = url
            .strip_prefix(URI)
            .ok_or_else(|| ClientError::Transport(format!("no route to {url}")))?;
        let rc = if token == "ops" { RegionContext::internal(token) } else { RegionContext::new(token) };
        let mut sink = RecordedResponse::new();
        if let Err(err) = orm::dispatch(path, &self.store, &OwnOrg, rc, &body, &mut sink).await {
            write_error(&mut sink, &err).map_err(|e| ClientError::Transport(e.to_string()))?;
        }
        Ok(ApiResponse { status: sink.status.unwrap_or(500), body: sink.body })
    }
}

fn widget(name: &str, org: &str) -> Widget {
    Widget {
        key: WidgetKey { name: name.to_string(), organization: org.to_string() },
        ..Default::default()
    }
}

/// Helper function to create a gateway with two widgets for alice and two for bob
fn gateway() -> InMemoryGateway {
    InMemoryGateway {
        store: WidgetStore {
            widgets: vec![
                widget("a1", "alice"),
                widget("b1", "bob"),
                widget("a2", "alice"),
                widget("b2", "bob"),
            ],
            updated_fields: Mutex::new(Vec::new()),
        },
    }
}

#[tokio::test]
async fn test_generated_permission_matrix() {
    let gateway = gateway();
    permtest::perm_test_widget_api_widget(&gateway, URI, "alice", "bob", REGION, "alice", "bob", SHOW_COUNT, &[])
        .await;
    permtest::perm_test_cluster_api_widget(&gateway, URI, "alice", "bob", REGION, "alice", "bob", SHOW_COUNT, &[])
        .await;
}

#[tokio::test]
async fn test_unknown_region_is_rejected() {
    let gateway = gateway();
    let err = testutil::test_perm_create_widget(&gateway, URI, "alice", "nope", "alice", &[])
        .await
        .expect_err("unknown region");
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "Region \"nope\" not found");
}

#[tokio::test]
async fn test_mod_funcs_shape_the_request() {
    let gateway = gateway();
    let rename = |w: &mut Widget| w.key.name = "renamed".to_string();
    let resp = testutil::test_perm_create_widget(&gateway, URI, "bob", REGION, "bob", &[&rename])
        .await
        .expect("own org");
    assert_eq!(resp.message, "created renamed");
}

#[tokio::test]
async fn test_update_fields_follow_sent_keys() {
    let gateway = gateway();
    let body = br#"{"Region":"local","Widget":{"key":{"organization":"alice"},"size":3}}"#;
    let resp = gateway.post(&route_url(URI, "UpdateWidget"), "alice", body.to_vec()).await.expect("reply");
    assert_eq!(resp.status, 200);

    // The generated test helper names the org field explicitly, which is kept.
    testutil::test_perm_update_widget(&gateway, URI, "alice", REGION, "alice", &[]).await.expect("update");

    let updated = gateway.store.updated_fields.lock().expect("lock").clone();
    assert_eq!(updated, vec![vec!["2.2".to_string(), "3".to_string()], vec!["2.2".to_string()]]);
}

#[tokio::test]
async fn test_show_without_org_only_serves_internal_callers() {
    let gateway = gateway();
    let input = ormapi::RegionSettings { region: REGION.to_string(), settings: Settings::default() };

    let seen = mctestclient::show_settings(&gateway, URI, "alice", &input).await.expect("show");
    assert!(seen.is_empty());

    let seen = mctestclient::show_settings(&gateway, URI, "ops", &input).await.expect("show");
    assert_eq!(seen, vec![Settings { name: "global".to_string() }]);
}

#[tokio::test]
async fn test_stream_failure_after_first_item() {
    let gateway = gateway();
    let input = ormapi::RegionSettings { region: REGION.to_string(), settings: Settings::default() };

    let resp = gateway
        .post(&route_url(URI, "StreamSettings"), "alice", serde_json::to_vec(&input).expect("encode"))
        .await
        .expect("reply");
    assert_eq!(resp.status, 200);
    assert_eq!(
        String::from_utf8(resp.body).expect("utf8"),
        "{\"data\":{\"name\":\"first\"}}\n{\"result\":{\"message\":\"boom\",\"code\":400}}\n"
    );

    match mctestclient::stream_settings(&gateway, URI, "alice", &input).await {
        Err(err @ ClientError::Stream { .. }) => {
            assert_eq!(err.status(), 400);
            assert_eq!(err.to_string(), "boom");
        }
        other => panic!("expected an in-band failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let gateway = gateway();
    let resp = gateway.post(&route_url(URI, "ResetSettings"), "ops", b"{}".to_vec()).await.expect("reply");
    assert_eq!(resp.status, 404);
}

#[test]
fn test_wrapper_shared_across_files() {
    let req: ormapi::InjectWidgetRequest = ormapi::RegionWidget {
        region: REGION.to_string(),
        widget: widget("w", "alice"),
    };
    assert_eq!(req.obj_name(), "Widget");
    assert_eq!(req.obj().key.organization, "alice");

    let paths: Vec<&str> = orm::CONTROLLER_ROUTES.iter().map(|r| r.path).collect();
    assert_eq!(paths.len(), 7);
    assert!(paths.contains(&"/auth/ctrl/InjectWidget"));
    assert!(!paths.contains(&"/auth/ctrl/ResetSettings"));
}
