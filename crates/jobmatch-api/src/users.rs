//! Handlers for `/users/:id/*` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/role` | 404 if the user has no role |
//! | `GET`  | `/users/:id/profile` | Profile from the table matching the role |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use jobmatch_core::{
  Provisioner,
  profile::Profile,
  role::UserRole,
  store::{AccountService, AgentProvisioner, ProvisioningStore},
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:id/role`
pub async fn role<S, P, A>(
  State(provisioner): State<Arc<Provisioner<S, P, A>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<UserRole>, ApiError>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  let role = provisioner
    .role(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("no role for user {id}")))?;
  Ok(Json(role))
}

/// `GET /users/:id/profile`
pub async fn profile<S, P, A>(
  State(provisioner): State<Arc<Provisioner<S, P, A>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  let profile = provisioner
    .profile(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("no profile for user {id}")))?;
  Ok(Json(profile))
}
