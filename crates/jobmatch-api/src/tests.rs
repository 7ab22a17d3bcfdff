//! End-to-end tests through the router against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use jobmatch_core::{Provisioner, store::ProvisioningStore};
use jobmatch_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn app() -> (Arc<SqliteStore>, Router) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let provisioner =
    Arc::new(Provisioner::new(store.clone(), store.clone(), store.clone()));
  (store, api_router(provisioner))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let res = app.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn user_id(body: &Value) -> Uuid {
  body["user_id"].as_str().unwrap().parse().unwrap()
}

// ─── Signup ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn candidate_signup_applies_defaults() {
  let (store, app) = app().await;

  let (status, body) = send(
    &app,
    post(
      "/signup",
      json!({
        "email": "a@x.com",
        "password": "pw",
        "userType": "candidate",
        "fullName": "Ada",
      }),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["role"], "candidate");
  let profile = &body["profile"]["profile"];
  assert_eq!(profile["job_title"], "Not specified");
  assert_eq!(profile["min_salary"], 0);
  assert_eq!(profile["max_salary"], 0);
  assert_eq!(profile["years_experience"], 0);

  let id = user_id(&body);
  let role = store.get_role(id).await.unwrap().unwrap();
  assert_eq!(role.role.as_ref(), "candidate");
}

#[tokio::test]
async fn employer_signup_is_sme() {
  let (store, app) = app().await;

  let (status, body) = send(
    &app,
    post(
      "/signup",
      json!({
        "email": "boss@acme.com",
        "password": "pw",
        "userType": "employer",
        "fullName": "Ada",
        "companyName": "Acme",
        "companySize": 50,
      }),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  let employer = store
    .get_employer_profile(user_id(&body))
    .await
    .unwrap()
    .unwrap();
  assert!(employer.is_sme);
  assert_eq!(employer.job_title, "Not specified");
  assert_eq!(employer.company_size, Some(50));
}

#[tokio::test]
async fn employer_without_company_is_rejected() {
  let (_, app) = app().await;

  let (status, body) = send(
    &app,
    post(
      "/signup",
      json!({
        "email": "boss@acme.com",
        "password": "pw",
        "userType": "employer",
        "fullName": "Ada",
      }),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("companyName"));
}

#[tokio::test]
async fn unknown_user_type_is_rejected() {
  let (_, app) = app().await;

  let (status, _) = send(
    &app,
    post(
      "/signup",
      json!({
        "email": "a@x.com",
        "password": "pw",
        "userType": "recruiter",
        "fullName": "Ada",
      }),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
  let (_, app) = app().await;
  let body = json!({
    "email": "a@x.com",
    "password": "pw",
    "userType": "candidate",
    "fullName": "Ada",
  });

  let (first, _) = send(&app, post("/signup", body.clone())).await;
  let (second, _) = send(&app, post("/signup", body)).await;

  assert_eq!(first, StatusCode::CREATED);
  assert_eq!(second, StatusCode::CONFLICT);
}

// ─── Referrals ───────────────────────────────────────────────────────────────

async fn signup_agent(app: &Router) -> Uuid {
  let (status, body) = send(
    app,
    post(
      "/signup",
      json!({
        "email": "vera@agency.com",
        "password": "pw",
        "userType": "agent",
        "fullName": "Vera",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  user_id(&body)
}

#[tokio::test]
async fn referral_code_links_candidate() {
  let (_, app) = app().await;
  let agent_id = signup_agent(&app).await;

  let (status, _) = send(
    &app,
    post(
      "/referrals",
      json!({
        "agent_id": agent_id,
        "candidate_email": "a@x.com",
        "referral_code": "REF123",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    &app,
    post(
      "/signup",
      json!({
        "email": "a@x.com",
        "password": "pw",
        "userType": "candidate",
        "fullName": "Ada",
        "referralCode": "REF123",
      }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let candidate_id = user_id(&body);

  let (status, referral) = send(&app, get("/referrals/REF123?email=a@x.com")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(referral["status"], "completed");
  assert_eq!(referral["candidate_id"], json!(candidate_id));
  assert!(!referral["signed_up_at"].is_null());
}

#[tokio::test]
async fn bad_referral_code_does_not_fail_signup() {
  let (_, app) = app().await;
  let agent_id = signup_agent(&app).await;
  send(
    &app,
    post(
      "/referrals",
      json!({ "agent_id": agent_id, "candidate_email": "a@x.com", "referral_code": "REF123" }),
    ),
  )
  .await;

  let (status, body) = send(
    &app,
    post(
      "/signup",
      json!({
        "email": "a@x.com",
        "password": "pw",
        "userType": "candidate",
        "fullName": "Ada",
        "referralCode": "BADCODE",
      }),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert!(body.get("error").is_none());

  let (_, listed) = send(&app, get(&format!("/referrals?agent_id={agent_id}"))).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
  assert_eq!(listed[0]["status"], "pending");
  assert!(listed[0]["candidate_id"].is_null());
}

#[tokio::test]
async fn non_agents_cannot_issue_referrals() {
  let (_, app) = app().await;

  let (status, _) = send(
    &app,
    post(
      "/referrals",
      json!({ "agent_id": Uuid::new_v4(), "candidate_email": "a@x.com" }),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_referral_is_not_found() {
  let (_, app) = app().await;
  let (status, _) = send(&app, get("/referrals/NOPE?email=a@x.com")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn agent_profile_is_readable() {
  let (_, app) = app().await;
  let agent_id = signup_agent(&app).await;

  let (status, role) = send(&app, get(&format!("/users/{agent_id}/role"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(role["role"], "agent");

  let (status, profile) = send(&app, get(&format!("/users/{agent_id}/profile"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(profile["role"], "agent");
  assert_eq!(profile["profile"]["full_name"], "Vera");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
  let (_, app) = app().await;
  let (status, _) = send(&app, get(&format!("/users/{}/role", Uuid::new_v4()))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
