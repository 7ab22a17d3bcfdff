//! Handler for `POST /signup`.
//!
//! The body mirrors the signup form: `{email, password, userType, fullName,
//! referralCode?}`, plus `companyName`, `companyWebsite` and `companySize` for
//! employers. A referral that could not be linked is not reported back; the
//! signup succeeds either way.

use std::{str::FromStr, sync::Arc};

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use jobmatch_core::{
  Error as CoreError, Provisioner,
  profile::{Profile, ProfileDetails},
  provision::SignupRequest,
  role::Role,
  store::{AccountService, AgentProvisioner, ProvisioningStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
  pub email:           String,
  pub password:        String,
  /// `candidate`, `employer` or `agent`.
  pub user_type:       String,
  pub full_name:       String,
  pub referral_code:   Option<String>,
  pub company_name:    Option<String>,
  pub company_website: Option<String>,
  pub company_size:    Option<u32>,
}

impl TryFrom<SignupBody> for SignupRequest {
  type Error = ApiError;

  fn try_from(b: SignupBody) -> Result<Self, ApiError> {
    if b.email.trim().is_empty() {
      return Err(ApiError::BadRequest("email is required".into()));
    }
    if b.password.is_empty() {
      return Err(ApiError::BadRequest("password is required".into()));
    }

    let role = Role::from_str(b.user_type.trim())
      .map_err(|_| CoreError::UnknownRole(b.user_type.clone()))?;

    let details = match role {
      Role::Candidate => ProfileDetails::Candidate,
      Role::Employer => ProfileDetails::Employer {
        company_name:    b
          .company_name
          .filter(|n| !n.trim().is_empty())
          .ok_or(CoreError::MissingField { role, field: "companyName" })?,
        company_website: b.company_website.filter(|w| !w.trim().is_empty()),
        company_size:    b.company_size,
      },
      Role::Agent => ProfileDetails::Agent,
    };

    Ok(SignupRequest {
      email: b.email,
      password: b.password,
      full_name: b.full_name,
      details,
      referral_code: b.referral_code,
    })
  }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
  pub user_id: Uuid,
  pub role:    Role,
  pub profile: Profile,
}

/// `POST /signup` — returns 201 + the new user's id, role and profile.
pub async fn handler<S, P, A>(
  State(provisioner): State<Arc<Provisioner<S, P, A>>>,
  Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  let request = SignupRequest::try_from(body)?;
  let outcome = provisioner.signup(request).await?;

  Ok((
    StatusCode::CREATED,
    Json(SignupResponse {
      user_id: outcome.user_id,
      role:    outcome.role.role,
      profile: outcome.profile,
    }),
  ))
}
