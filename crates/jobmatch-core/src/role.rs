//! User roles. Every user holds exactly one, assigned once at signup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// The closed set of roles a user can hold.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
  Candidate,
  Employer,
  /// A recruiting agent ("VR") who refers candidates via referral codes.
  Agent,
}

/// The association of a user with their role. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
  pub user_id:     Uuid,
  pub role:        Role,
  pub assigned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn parses_tags_case_insensitively() {
    assert_eq!(Role::from_str("candidate").unwrap(), Role::Candidate);
    assert_eq!(Role::from_str("Employer").unwrap(), Role::Employer);
    assert_eq!(Role::from_str("AGENT").unwrap(), Role::Agent);
    assert!(Role::from_str("recruiter").is_err());
  }

  #[test]
  fn tag_matches_serde_form() {
    let json = serde_json::to_string(&Role::Employer).unwrap();
    assert_eq!(json, "\"employer\"");
    assert_eq!(Role::Employer.as_ref(), "employer");
  }
}
