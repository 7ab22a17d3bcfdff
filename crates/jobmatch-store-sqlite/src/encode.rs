//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings and enum tags as their lowercase names.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use jobmatch_core::{
  profile::{AgentProfile, CandidateProfile, EmployerProfile},
  referral::{Referral, ReferralStatus},
  role::{Role, UserRole},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn decode_role(s: &str) -> Result<Role> {
  Role::from_str(s).map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

pub fn decode_status(s: &str) -> Result<ReferralStatus> {
  ReferralStatus::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown referral status: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `user_roles` row.
pub struct RawUserRole {
  pub user_id:     String,
  pub role:        String,
  pub assigned_at: String,
}

impl RawUserRole {
  pub fn into_user_role(self) -> Result<UserRole> {
    Ok(UserRole {
      user_id:     decode_uuid(&self.user_id)?,
      role:        decode_role(&self.role)?,
      assigned_at: decode_dt(&self.assigned_at)?,
    })
  }
}

/// Raw values read directly from a `candidate_profiles` row.
pub struct RawCandidate {
  pub user_id:          String,
  pub full_name:        String,
  pub email:            String,
  pub job_title:        String,
  pub min_salary:       i64,
  pub max_salary:       i64,
  pub years_experience: u32,
  pub created_at:       String,
}

impl RawCandidate {
  pub fn into_profile(self) -> Result<CandidateProfile> {
    Ok(CandidateProfile {
      user_id:          decode_uuid(&self.user_id)?,
      full_name:        self.full_name,
      email:            self.email,
      job_title:        self.job_title,
      min_salary:       self.min_salary,
      max_salary:       self.max_salary,
      years_experience: self.years_experience,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `employer_profiles` row.
pub struct RawEmployer {
  pub user_id:         String,
  pub company_name:    String,
  pub full_name:       String,
  pub company_website: Option<String>,
  pub company_size:    Option<u32>,
  pub is_sme:          bool,
  pub job_title:       String,
  pub created_at:      String,
}

impl RawEmployer {
  pub fn into_profile(self) -> Result<EmployerProfile> {
    Ok(EmployerProfile {
      user_id:         decode_uuid(&self.user_id)?,
      company_name:    self.company_name,
      full_name:       self.full_name,
      company_website: self.company_website,
      company_size:    self.company_size,
      is_sme:          self.is_sme,
      job_title:       self.job_title,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `agent_profiles` row.
pub struct RawAgent {
  pub user_id:    String,
  pub full_name:  String,
  pub email:      String,
  pub created_at: String,
}

impl RawAgent {
  pub fn into_profile(self) -> Result<AgentProfile> {
    Ok(AgentProfile {
      user_id:    decode_uuid(&self.user_id)?,
      full_name:  self.full_name,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawReferral::from_row`].
pub const REFERRAL_COLUMNS: &str = "referral_id, referral_code, agent_id, \
                                    candidate_email, status, candidate_id, \
                                    signed_up_at, created_at";

/// Raw values read directly from a `referrals` row.
pub struct RawReferral {
  pub referral_id:     String,
  pub referral_code:   String,
  pub agent_id:        String,
  pub candidate_email: String,
  pub status:          String,
  pub candidate_id:    Option<String>,
  pub signed_up_at:    Option<String>,
  pub created_at:      String,
}

impl RawReferral {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      referral_id:     row.get(0)?,
      referral_code:   row.get(1)?,
      agent_id:        row.get(2)?,
      candidate_email: row.get(3)?,
      status:          row.get(4)?,
      candidate_id:    row.get(5)?,
      signed_up_at:    row.get(6)?,
      created_at:      row.get(7)?,
    })
  }

  pub fn into_referral(self) -> Result<Referral> {
    Ok(Referral {
      referral_id:     decode_uuid(&self.referral_id)?,
      referral_code:   self.referral_code,
      agent_id:        decode_uuid(&self.agent_id)?,
      candidate_email: self.candidate_email,
      status:          decode_status(&self.status)?,
      candidate_id:    self.candidate_id.as_deref().map(decode_uuid).transpose()?,
      signed_up_at:    self.signed_up_at.as_deref().map(decode_dt).transpose()?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
