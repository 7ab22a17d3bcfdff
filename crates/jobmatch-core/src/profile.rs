//! Profile types. Each user owns exactly one profile, shaped by their role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// Job title written when the user has not supplied one.
pub const DEFAULT_JOB_TITLE: &str = "Not specified";

// ─── Candidate ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
  pub user_id:          Uuid,
  pub full_name:        String,
  pub email:            String,
  pub job_title:        String,
  pub min_salary:       i64,
  pub max_salary:       i64,
  pub years_experience: u32,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`crate::store::ProvisioningStore::insert_candidate_profile`].
#[derive(Debug, Clone)]
pub struct NewCandidateProfile {
  pub user_id:          Uuid,
  pub full_name:        String,
  pub email:            String,
  pub job_title:        String,
  pub min_salary:       i64,
  pub max_salary:       i64,
  pub years_experience: u32,
}

impl NewCandidateProfile {
  /// A fresh candidate profile: placeholder job title, zero salary range and
  /// zero years of experience.
  pub fn new(user_id: Uuid, full_name: String, email: String) -> Self {
    Self {
      user_id,
      full_name,
      email,
      job_title: DEFAULT_JOB_TITLE.to_owned(),
      min_salary: 0,
      max_salary: 0,
      years_experience: 0,
    }
  }
}

// ─── Employer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerProfile {
  pub user_id:         Uuid,
  pub company_name:    String,
  pub full_name:       String,
  pub company_website: Option<String>,
  /// Headcount bucket.
  pub company_size:    Option<u32>,
  /// Small/medium enterprise.
  pub is_sme:          bool,
  pub job_title:       String,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::ProvisioningStore::insert_employer_profile`].
#[derive(Debug, Clone)]
pub struct NewEmployerProfile {
  pub user_id:         Uuid,
  pub company_name:    String,
  pub full_name:       String,
  pub company_website: Option<String>,
  pub company_size:    Option<u32>,
  pub is_sme:          bool,
  pub job_title:       String,
}

impl NewEmployerProfile {
  /// New employers start flagged as SMEs with a placeholder job title.
  pub fn new(
    user_id: Uuid,
    company_name: String,
    full_name: String,
    company_website: Option<String>,
    company_size: Option<u32>,
  ) -> Self {
    Self {
      user_id,
      company_name,
      full_name,
      company_website,
      company_size,
      is_sme: true,
      job_title: DEFAULT_JOB_TITLE.to_owned(),
    }
  }
}

// ─── Agent ───────────────────────────────────────────────────────────────────

/// A recruiting agent's profile. Only ever written by the agent-provisioning
/// function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
  pub user_id:    Uuid,
  pub full_name:  String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// The payload sent to the agent-provisioning function. Field names follow
/// the function's camelCase contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProvisionRequest {
  pub user_id:   Uuid,
  pub full_name: String,
  pub email:     String,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Role-specific signup data. The variant decides which profile is created,
/// and with it the role that is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileDetails {
  Candidate,
  Employer {
    company_name:    String,
    company_website: Option<String>,
    company_size:    Option<u32>,
  },
  Agent,
}

impl ProfileDetails {
  pub fn role(&self) -> Role {
    match self {
      Self::Candidate => Role::Candidate,
      Self::Employer { .. } => Role::Employer,
      Self::Agent => Role::Agent,
    }
  }
}

/// A created (or fetched) profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum Profile {
  Candidate(CandidateProfile),
  Employer(EmployerProfile),
  /// Whatever the agent-provisioning function returned.
  Agent(serde_json::Value),
}

impl Profile {
  pub fn role(&self) -> Role {
    match self {
      Self::Candidate(_) => Role::Candidate,
      Self::Employer(_) => Role::Employer,
      Self::Agent(_) => Role::Agent,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn provision_request_uses_camel_case() {
    let user_id = Uuid::new_v4();
    let json = serde_json::to_value(AgentProvisionRequest {
      user_id,
      full_name: "Vera".into(),
      email: "v@x.com".into(),
    })
    .unwrap();

    assert_eq!(
      json,
      serde_json::json!({ "userId": user_id, "fullName": "Vera", "email": "v@x.com" })
    );
  }

  #[test]
  fn details_resolve_their_role() {
    let employer = ProfileDetails::Employer {
      company_name:    "Acme".into(),
      company_website: None,
      company_size:    None,
    };
    assert_eq!(employer.role(), Role::Employer);
    assert_eq!(ProfileDetails::Candidate.role(), Role::Candidate);
    assert_eq!(ProfileDetails::Agent.role(), Role::Agent);
  }
}
