//! Referral records and the outcome of resolving one at signup.
//!
//! An agent issues a referral for a candidate's email address. When that
//! candidate signs up with the matching code, the record is completed and
//! linked to the new user. A completed referral is never modified again.

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::error::ReferralError;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReferralStatus {
  Pending,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
  pub referral_id:     Uuid,
  pub referral_code:   String,
  /// The agent who issued the referral.
  pub agent_id:        Uuid,
  pub candidate_email: String,
  pub status:          ReferralStatus,
  /// Set on completion.
  pub candidate_id:    Option<Uuid>,
  /// Set on completion.
  pub signed_up_at:    Option<DateTime<Utc>>,
  pub created_at:      DateTime<Utc>,
}

impl Referral {
  pub fn is_pending(&self) -> bool { self.status == ReferralStatus::Pending }
}

/// Input to [`crate::store::ProvisioningStore::insert_referral`].
#[derive(Debug, Clone)]
pub struct NewReferral {
  pub referral_code:   String,
  pub agent_id:        Uuid,
  pub candidate_email: String,
}

/// Generate a referral code of the form `REF` followed by eight upper-case hex
/// digits.
pub fn generate_code() -> String {
  let mut bytes = [0u8; 4];
  OsRng.fill_bytes(&mut bytes);
  format!("REF{}", hex::encode_upper(bytes))
}

/// What happened to the referral code supplied at signup.
///
/// Resolution never fails a signup, so this is an outcome rather than a
/// `Result`.
#[derive(Debug)]
pub enum ReferralOutcome {
  /// No code was supplied.
  Skipped,
  /// The pending referral was completed and linked to the new user.
  Linked(Referral),
  /// Resolution failed; the error has already been logged.
  Failed(ReferralError),
}

impl ReferralOutcome {
  pub fn is_linked(&self) -> bool { matches!(self, Self::Linked(_)) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_codes_have_expected_shape() {
    let code = generate_code();
    assert_eq!(code.len(), 11);
    assert!(code.starts_with("REF"));
    assert!(
      code[3..]
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );
  }

  #[test]
  fn generated_codes_differ() {
    assert_ne!(generate_code(), generate_code());
  }
}
