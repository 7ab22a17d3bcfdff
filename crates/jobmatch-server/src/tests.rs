//! Tests for the remote function client (against a loopback server) and the
//! assembled router.

use std::sync::Arc;

use axum::{
  Json, Router,
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
  routing::post,
};
use jobmatch_core::{profile::AgentProvisionRequest, store::AgentProvisioner};
use jobmatch_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AgentBackend, Error, ServerConfig,
  config::{AgentProvisioningConfig, RemoteFunctionConfig},
  functions::RemoteAgentProvisioner,
};

/// Serve a fake functions endpoint on an ephemeral port; returns its base URL.
async fn spawn_functions() -> String {
  let app = Router::new()
    .route(
      "/v1/create-vr-profile",
      post(|headers: HeaderMap, Json(body): Json<Value>| async move {
        let auth = headers
          .get(header::AUTHORIZATION)
          .and_then(|v| v.to_str().ok());
        if auth != Some("Bearer secret") {
          return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
        }
        (StatusCode::OK, Json(json!({ "provisioned": true, "vr": body })))
      }),
    )
    .route(
      "/v1/broken",
      post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{addr}/v1")
}

fn remote_config(functions_url: String, function_name: &str) -> RemoteFunctionConfig {
  RemoteFunctionConfig {
    functions_url,
    function_name: function_name.to_owned(),
    api_key: Some("secret".to_owned()),
    timeout_secs: 5,
  }
}

fn request() -> AgentProvisionRequest {
  AgentProvisionRequest {
    user_id:   Uuid::new_v4(),
    full_name: "Vera".into(),
    email:     "vera@agency.com".into(),
  }
}

// ─── Remote provisioning ─────────────────────────────────────────────────────

#[tokio::test]
async fn remote_provisioner_posts_camel_case_payload() {
  let url = spawn_functions().await;
  let provisioner =
    RemoteAgentProvisioner::new(&remote_config(url, "create-vr-profile")).unwrap();
  let req = request();

  let payload = provisioner.provision_agent(req.clone()).await.unwrap();

  assert_eq!(payload["provisioned"], true);
  assert_eq!(payload["vr"]["userId"], json!(req.user_id));
  assert_eq!(payload["vr"]["fullName"], "Vera");
  assert_eq!(payload["vr"]["email"], "vera@agency.com");
}

#[tokio::test]
async fn remote_provisioner_surfaces_error_status() {
  let url = spawn_functions().await;
  let provisioner =
    RemoteAgentProvisioner::new(&remote_config(url, "broken")).unwrap();

  let err = provisioner.provision_agent(request()).await.unwrap_err();

  let Error::FunctionStatus { name, status, body } = err else {
    panic!("expected status error");
  };
  assert_eq!(name, "broken");
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, "boom");
}

#[tokio::test]
async fn remote_provisioner_without_key_is_rejected() {
  let url = spawn_functions().await;
  let mut config = remote_config(url, "create-vr-profile");
  config.api_key = None;
  let provisioner = RemoteAgentProvisioner::new(&config).unwrap();

  let err = provisioner.provision_agent(request()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::FunctionStatus { status, .. } if status == StatusCode::UNAUTHORIZED
  ));
}

// ─── Router ──────────────────────────────────────────────────────────────────

async fn app(agent_provisioning: AgentProvisioningConfig) -> Router {
  let config = ServerConfig {
    host: "127.0.0.1".into(),
    port: 0,
    store_path: ":memory:".into(),
    agent_provisioning,
  };
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  crate::router(crate::provisioner(&config, store).unwrap())
}

async fn signup_agent(app: Router) -> (StatusCode, Value) {
  let req = Request::builder()
    .method("POST")
    .uri("/api/signup")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(
      json!({
        "email": "vera@agency.com",
        "password": "pw",
        "userType": "agent",
        "fullName": "Vera",
      })
      .to_string(),
    ))
    .unwrap();
  let res = app.oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
  let res = app
    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_check() {
  let app = app(AgentProvisioningConfig::Local).await;
  let res = app
    .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn local_backend_provisions_agents() {
  let (status, body) = signup_agent(app(AgentProvisioningConfig::Local).await).await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["profile"]["role"], "agent");
  assert_eq!(body["profile"]["profile"]["email"], "vera@agency.com");
}

#[tokio::test]
async fn remote_backend_provisions_agents() {
  let url = spawn_functions().await;
  let config =
    AgentProvisioningConfig::Remote(remote_config(url, "create-vr-profile"));

  let (status, body) = signup_agent(app(config).await).await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["profile"]["profile"]["provisioned"], true);
}

#[tokio::test]
async fn remote_agents_have_a_readable_profile() {
  let url = spawn_functions().await;
  let config =
    AgentProvisioningConfig::Remote(remote_config(url, "create-vr-profile"));
  let app = app(config).await;

  let (status, body) = signup_agent(app.clone()).await;
  assert_eq!(status, StatusCode::CREATED);
  let user_id = body["user_id"].as_str().unwrap().to_owned();

  let (status, role) = get(app.clone(), &format!("/api/users/{user_id}/role")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(role["role"], "agent");

  let (status, profile) =
    get(app, &format!("/api/users/{user_id}/profile")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(profile["role"], "agent");
  assert_eq!(profile["profile"]["email"], "vera@agency.com");
}

#[tokio::test]
async fn failing_remote_backend_fails_signup() {
  let url = spawn_functions().await;
  let config = AgentProvisioningConfig::Remote(remote_config(url, "broken"));

  let (status, body) = signup_agent(app(config).await).await;

  assert_eq!(status, StatusCode::BAD_GATEWAY);
  assert!(body["error"].as_str().unwrap().contains("role_assigned"));
}

#[tokio::test]
async fn backend_follows_config() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let local = AgentBackend::from_config(&AgentProvisioningConfig::Local, store.clone())
    .unwrap();
  assert!(matches!(local, AgentBackend::Local(_)));

  let remote = AgentBackend::from_config(
    &AgentProvisioningConfig::Remote(remote_config("http://fn.test/v1".into(), "f")),
    store,
  )
  .unwrap();
  assert!(matches!(remote, AgentBackend::Remote { .. }));
}
