//! Handlers for `/referrals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/referrals` | `?agent_id` required |
//! | `POST` | `/referrals` | Body: [`CreateBody`]; returns 201 + the referral |
//! | `GET`  | `/referrals/:code` | `?email` required; 404 if no match |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use jobmatch_core::{
  Provisioner,
  referral::Referral,
  store::{AccountService, AgentProvisioner, ProvisioningStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub agent_id: Uuid,
}

/// `GET /referrals?agent_id=<id>`
pub async fn list<S, P, A>(
  State(provisioner): State<Arc<Provisioner<S, P, A>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Referral>>, ApiError>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  Ok(Json(provisioner.referrals(params.agent_id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub agent_id:        Uuid,
  pub candidate_email: String,
  /// Generated when omitted.
  pub referral_code:   Option<String>,
}

/// `POST /referrals` — the issuing user must be an agent.
pub async fn create<S, P, A>(
  State(provisioner): State<Arc<Provisioner<S, P, A>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  if body.candidate_email.trim().is_empty() {
    return Err(ApiError::BadRequest("candidate_email is required".into()));
  }

  let referral = provisioner
    .issue_referral(body.agent_id, &body.candidate_email, body.referral_code)
    .await?;
  Ok((StatusCode::CREATED, Json(referral)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LookupParams {
  pub email: String,
}

/// `GET /referrals/:code?email=<candidate email>`
pub async fn get_one<S, P, A>(
  State(provisioner): State<Arc<Provisioner<S, P, A>>>,
  Path(code): Path<String>,
  Query(params): Query<LookupParams>,
) -> Result<Json<Referral>, ApiError>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  let referral = provisioner
    .find_referral(&code, &params.email)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("referral {code} not found")))?;
  Ok(Json(referral))
}
