//! [`SqliteStore`] — the SQLite implementation of the workflow collaborators.

use std::path::Path;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::{DateTime, Utc};
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use jobmatch_core::{
  normalize_email,
  profile::{
    AgentProfile, AgentProvisionRequest, CandidateProfile, EmployerProfile,
    NewCandidateProfile, NewEmployerProfile,
  },
  referral::{NewReferral, Referral, ReferralStatus},
  role::{Role, UserRole},
  store::{AccountService, AgentProvisioner, ProvisioningStore},
};

use crate::{
  Error, Result,
  encode::{
    REFERRAL_COLUMNS, RawAgent, RawCandidate, RawEmployer, RawReferral,
    RawUserRole, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A jobmatch store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The stored argon2 hash for an account, if one exists for `email`.
  #[cfg(test)]
  pub(crate) async fn password_hash(&self, email: &str) -> Result<Option<String>> {
    let email = normalize_email(email);

    let hash: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT password_hash FROM accounts WHERE email = ?1",
              rusqlite::params![email],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(hash)
  }

  /// Write the local `agent_profiles` row for a provisioned agent.
  ///
  /// This is the whole of local provisioning. A remote provisioner calls it
  /// after the remote function succeeds so agent profile reads stay local.
  pub async fn record_agent_profile(
    &self,
    request: AgentProvisionRequest,
  ) -> Result<AgentProfile> {
    let profile = AgentProfile {
      user_id:    request.user_id,
      full_name:  request.full_name,
      email:      request.email,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(profile.user_id);
    let full_name = profile.full_name.clone();
    let email     = profile.email.clone();
    let at_str    = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO agent_profiles (user_id, full_name, email, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, full_name, email, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_write("agent_profiles", e))?;

    Ok(profile)
  }

  async fn get_referral(&self, referral_id: Uuid) -> Result<Option<Referral>> {
    let id_str = encode_uuid(referral_id);

    let raw: Option<RawReferral> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REFERRAL_COLUMNS} FROM referrals WHERE referral_id = ?1"),
              rusqlite::params![id_str],
              RawReferral::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReferral::into_referral).transpose()
  }
}

// ─── ProvisioningStore impl ──────────────────────────────────────────────────

impl ProvisioningStore for SqliteStore {
  type Error = Error;

  // ── Roles ─────────────────────────────────────────────────────────────────

  async fn insert_role(&self, user_id: Uuid, role: Role) -> Result<UserRole> {
    let assigned = UserRole { user_id, role, assigned_at: Utc::now() };

    let id_str   = encode_uuid(user_id);
    let role_str = role.as_ref().to_owned();
    let at_str   = encode_dt(assigned.assigned_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO user_roles (user_id, role, assigned_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, role_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_write("user_roles", e))?;

    Ok(assigned)
  }

  async fn get_role(&self, user_id: Uuid) -> Result<Option<UserRole>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUserRole> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, role, assigned_at FROM user_roles WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawUserRole {
                  user_id:     row.get(0)?,
                  role:        row.get(1)?,
                  assigned_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUserRole::into_user_role).transpose()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn insert_candidate_profile(
    &self,
    input: NewCandidateProfile,
  ) -> Result<CandidateProfile> {
    let profile = CandidateProfile {
      user_id:          input.user_id,
      full_name:        input.full_name,
      email:            input.email,
      job_title:        input.job_title,
      min_salary:       input.min_salary,
      max_salary:       input.max_salary,
      years_experience: input.years_experience,
      created_at:       Utc::now(),
    };

    let id_str    = encode_uuid(profile.user_id);
    let full_name = profile.full_name.clone();
    let email     = profile.email.clone();
    let job_title = profile.job_title.clone();
    let (min, max, years) =
      (profile.min_salary, profile.max_salary, profile.years_experience);
    let at_str    = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO candidate_profiles (
             user_id, full_name, email, job_title,
             min_salary, max_salary, years_experience, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, full_name, email, job_title, min, max, years, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_write("candidate_profiles", e))?;

    Ok(profile)
  }

  async fn get_candidate_profile(
    &self,
    user_id: Uuid,
  ) -> Result<Option<CandidateProfile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawCandidate> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, full_name, email, job_title,
                      min_salary, max_salary, years_experience, created_at
               FROM candidate_profiles WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCandidate {
                  user_id:          row.get(0)?,
                  full_name:        row.get(1)?,
                  email:            row.get(2)?,
                  job_title:        row.get(3)?,
                  min_salary:       row.get(4)?,
                  max_salary:       row.get(5)?,
                  years_experience: row.get(6)?,
                  created_at:       row.get(7)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCandidate::into_profile).transpose()
  }

  async fn insert_employer_profile(
    &self,
    input: NewEmployerProfile,
  ) -> Result<EmployerProfile> {
    let profile = EmployerProfile {
      user_id:         input.user_id,
      company_name:    input.company_name,
      full_name:       input.full_name,
      company_website: input.company_website,
      company_size:    input.company_size,
      is_sme:          input.is_sme,
      job_title:       input.job_title,
      created_at:      Utc::now(),
    };

    let id_str       = encode_uuid(profile.user_id);
    let company_name = profile.company_name.clone();
    let full_name    = profile.full_name.clone();
    let website      = profile.company_website.clone();
    let size         = profile.company_size;
    let is_sme       = profile.is_sme;
    let job_title    = profile.job_title.clone();
    let at_str       = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO employer_profiles (
             user_id, company_name, full_name, company_website,
             company_size, is_sme, job_title, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, company_name, full_name, website, size, is_sme, job_title,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_write("employer_profiles", e))?;

    Ok(profile)
  }

  async fn get_employer_profile(
    &self,
    user_id: Uuid,
  ) -> Result<Option<EmployerProfile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawEmployer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, company_name, full_name, company_website,
                      company_size, is_sme, job_title, created_at
               FROM employer_profiles WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawEmployer {
                  user_id:         row.get(0)?,
                  company_name:    row.get(1)?,
                  full_name:       row.get(2)?,
                  company_website: row.get(3)?,
                  company_size:    row.get(4)?,
                  is_sme:          row.get(5)?,
                  job_title:       row.get(6)?,
                  created_at:      row.get(7)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEmployer::into_profile).transpose()
  }

  async fn get_agent_profile(&self, user_id: Uuid) -> Result<Option<AgentProfile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawAgent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, full_name, email, created_at
               FROM agent_profiles WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawAgent {
                  user_id:    row.get(0)?,
                  full_name:  row.get(1)?,
                  email:      row.get(2)?,
                  created_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAgent::into_profile).transpose()
  }

  // ── Referrals ─────────────────────────────────────────────────────────────

  async fn insert_referral(&self, input: NewReferral) -> Result<Referral> {
    let referral = Referral {
      referral_id:     Uuid::new_v4(),
      referral_code:   input.referral_code,
      agent_id:        input.agent_id,
      candidate_email: input.candidate_email,
      status:          ReferralStatus::Pending,
      candidate_id:    None,
      signed_up_at:    None,
      created_at:      Utc::now(),
    };

    let id_str       = encode_uuid(referral.referral_id);
    let code         = referral.referral_code.clone();
    let agent_id_str = encode_uuid(referral.agent_id);
    let email        = referral.candidate_email.clone();
    let status       = referral.status.as_ref().to_owned();
    let at_str       = encode_dt(referral.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO referrals (
             referral_id, referral_code, agent_id, candidate_email, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, code, agent_id_str, email, status, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_write("referrals", e))?;

    Ok(referral)
  }

  async fn find_referral(
    &self,
    referral_code:   &str,
    candidate_email: &str,
  ) -> Result<Option<Referral>> {
    let code  = referral_code.to_owned();
    let email = candidate_email.to_owned();

    let raw: Option<RawReferral> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {REFERRAL_COLUMNS} FROM referrals
                 WHERE referral_code = ?1 AND candidate_email = ?2"
              ),
              rusqlite::params![code, email],
              RawReferral::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReferral::into_referral).transpose()
  }

  async fn complete_referral(
    &self,
    referral_id:  Uuid,
    candidate_id: Uuid,
    signed_up_at: DateTime<Utc>,
  ) -> Result<Option<Referral>> {
    let id_str        = encode_uuid(referral_id);
    let candidate_str = encode_uuid(candidate_id);
    let at_str        = encode_dt(signed_up_at);

    // Conditional on `pending` so a completed referral is never overwritten.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE referrals
           SET status = 'completed', candidate_id = ?2, signed_up_at = ?3
           WHERE referral_id = ?1 AND status = 'pending'",
          rusqlite::params![id_str, candidate_str, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_referral(referral_id).await
  }

  async fn list_referrals(&self, agent_id: Uuid) -> Result<Vec<Referral>> {
    let agent_id_str = encode_uuid(agent_id);

    let raws: Vec<RawReferral> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REFERRAL_COLUMNS} FROM referrals
           WHERE agent_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![agent_id_str], RawReferral::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReferral::into_referral).collect()
  }
}

// ─── AgentProvisioner impl ───────────────────────────────────────────────────

/// Local stand-in for the remote agent-provisioning function: writes the agent
/// profile into the same database and returns it as JSON.
impl AgentProvisioner for SqliteStore {
  type Error = Error;

  async fn provision_agent(
    &self,
    request: AgentProvisionRequest,
  ) -> Result<serde_json::Value> {
    let profile = self.record_agent_profile(request).await?;
    Ok(serde_json::to_value(profile)?)
  }
}

// ─── AccountService impl ─────────────────────────────────────────────────────

impl AccountService for SqliteStore {
  type Error = Error;

  async fn create_account(&self, email: &str, password: &str) -> Result<Uuid> {
    let user_id  = Uuid::new_v4();
    let password = password.to_owned();

    // Hashing is CPU-bound; keep it off both the runtime and the DB thread.
    let hash = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut OsRng);
      Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
    })
    .await??;

    let id_str = encode_uuid(user_id);
    let email  = normalize_email(email);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email, hash, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| Error::on_write("accounts", e))?;

    tracing::debug!(%user_id, "account created");
    Ok(user_id)
  }

  fn is_email_taken(error: &Error) -> bool {
    matches!(error, Error::Conflict("accounts"))
  }
}
