//! The signup provisioning workflow.
//!
//! After an account is created the new user receives exactly one role, exactly
//! one profile shaped by that role and, when a referral code was supplied, a
//! link to the agent's referral record:
//!
//! ```text
//! Started → AccountCreated → RoleAssigned → ProfileCreated → ReferralResolved → Done
//! ```
//!
//! Account, role and profile failures are fatal and abort the signup.
//! Referral failures are logged and swallowed. There is no compensating
//! transaction: an account or role written before a later failure stays.

use std::sync::Arc;

use chrono::Utc;
use strum::Display;
use uuid::Uuid;

use crate::{
  Error, ReferralError, Result, SignupError, normalize_email,
  profile::{
    AgentProvisionRequest, NewCandidateProfile, NewEmployerProfile, Profile,
    ProfileDetails,
  },
  referral::{self, NewReferral, Referral, ReferralOutcome},
  role::{Role, UserRole},
  store::{AccountService, AgentProvisioner, ProvisioningStore},
};

// ─── Request / outcome ───────────────────────────────────────────────────────

/// Everything the signup form submits.
#[derive(Debug, Clone)]
pub struct SignupRequest {
  pub email:         String,
  pub password:      String,
  pub full_name:     String,
  pub details:       ProfileDetails,
  pub referral_code: Option<String>,
}

/// Progress of a single signup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SignupStage {
  Started,
  AccountCreated,
  RoleAssigned,
  ProfileCreated,
  ReferralResolved,
  Done,
}

/// A completed signup. `stage` is always [`SignupStage::Done`].
#[derive(Debug)]
pub struct SignupOutcome {
  pub user_id:  Uuid,
  pub stage:    SignupStage,
  pub role:     UserRole,
  pub profile:  Profile,
  pub referral: ReferralOutcome,
}

// ─── Provisioner ─────────────────────────────────────────────────────────────

/// Runs the provisioning workflow against injected collaborators.
pub struct Provisioner<S, P, A> {
  store:    Arc<S>,
  agents:   Arc<P>,
  accounts: Arc<A>,
}

impl<S, P, A> Provisioner<S, P, A>
where
  S: ProvisioningStore,
  P: AgentProvisioner,
  A: AccountService,
{
  pub fn new(store: Arc<S>, agents: Arc<P>, accounts: Arc<A>) -> Self {
    Self { store, agents, accounts }
  }

  // ── Steps ─────────────────────────────────────────────────────────────

  /// Record `role` for `user_id`. Fails if the user already has a role.
  pub async fn assign_role(&self, user_id: Uuid, role: Role) -> Result<UserRole> {
    let assigned = self.store.insert_role(user_id, role).await.map_err(|e| {
      tracing::error!(%user_id, %role, error = %e, "failed to assign role");
      Error::persistence("user_roles", e)
    })?;
    tracing::debug!(%user_id, %role, "role assigned");
    Ok(assigned)
  }

  /// Create the profile matching `details`.
  ///
  /// Candidates and employers are inserted directly with their defaults.
  /// Agents are handed to the agent-provisioning function, whose payload is
  /// returned as-is.
  pub async fn create_profile(
    &self,
    user_id: Uuid,
    full_name: &str,
    email: &str,
    details: &ProfileDetails,
  ) -> Result<Profile> {
    let profile = match details {
      ProfileDetails::Candidate => {
        let input = NewCandidateProfile::new(
          user_id,
          full_name.to_owned(),
          email.to_owned(),
        );
        let profile =
          self.store.insert_candidate_profile(input).await.map_err(|e| {
            tracing::error!(%user_id, error = %e, "failed to create candidate profile");
            Error::persistence("candidate_profiles", e)
          })?;
        Profile::Candidate(profile)
      }
      ProfileDetails::Employer {
        company_name,
        company_website,
        company_size,
      } => {
        let input = NewEmployerProfile::new(
          user_id,
          company_name.clone(),
          full_name.to_owned(),
          company_website.clone(),
          *company_size,
        );
        let profile =
          self.store.insert_employer_profile(input).await.map_err(|e| {
            tracing::error!(%user_id, error = %e, "failed to create employer profile");
            Error::persistence("employer_profiles", e)
          })?;
        Profile::Employer(profile)
      }
      ProfileDetails::Agent => {
        let request = AgentProvisionRequest {
          user_id,
          full_name: full_name.to_owned(),
          email: email.to_owned(),
        };
        let payload =
          self.agents.provision_agent(request).await.map_err(|e| {
            tracing::error!(%user_id, error = %e, "agent provisioning failed");
            Error::RemoteProvisioning(Box::new(e))
          })?;
        Profile::Agent(payload)
      }
    };

    tracing::debug!(%user_id, role = %profile.role(), "profile created");
    Ok(profile)
  }

  /// Link `user_id` to the pending referral matching `(code, email)`.
  ///
  /// A missing or blank code is a no-op. Failures are logged and reported in
  /// the outcome, never returned as errors.
  pub async fn resolve_referral(
    &self,
    code: Option<&str>,
    user_id: Uuid,
    email: &str,
  ) -> ReferralOutcome {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
      return ReferralOutcome::Skipped;
    };

    match self.link_referral(code, user_id, email).await {
      Ok(referral) => {
        tracing::info!(
          %user_id,
          referral_id = %referral.referral_id,
          agent_id = %referral.agent_id,
          "referral completed"
        );
        ReferralOutcome::Linked(referral)
      }
      Err(e) => {
        tracing::warn!(%user_id, code, error = %e, "referral not linked");
        ReferralOutcome::Failed(e)
      }
    }
  }

  async fn link_referral(
    &self,
    code: &str,
    user_id: Uuid,
    email: &str,
  ) -> Result<Referral, ReferralError> {
    let email = normalize_email(email);
    let referral = self
      .store
      .find_referral(code, &email)
      .await
      .map_err(|e| ReferralError::Persistence(Box::new(e)))?
      .ok_or_else(|| ReferralError::NotFound {
        code:  code.to_owned(),
        email: email.clone(),
      })?;

    if !referral.is_pending() {
      return Err(ReferralError::AlreadyCompleted(referral.referral_id));
    }

    self
      .store
      .complete_referral(referral.referral_id, user_id, Utc::now())
      .await
      .map_err(|e| ReferralError::Persistence(Box::new(e)))?
      .ok_or(ReferralError::AlreadyCompleted(referral.referral_id))
  }

  // ── Orchestration ─────────────────────────────────────────────────────

  /// Create the account, then assign the role, create the profile and resolve
  /// the referral code, in that order.
  pub async fn signup(
    &self,
    request: SignupRequest,
  ) -> Result<SignupOutcome, SignupError> {
    let email = normalize_email(&request.email);
    let role = request.details.role();

    let user_id = self
      .accounts
      .create_account(&email, &request.password)
      .await
      .map_err(|e| {
        tracing::error!(%email, error = %e, "account creation failed");
        let source = if A::is_email_taken(&e) {
          Error::EmailTaken(email.clone())
        } else {
          Error::Account(Box::new(e))
        };
        SignupError { stage: SignupStage::Started, source }
      })?;

    let role = self.assign_role(user_id, role).await.map_err(|source| {
      SignupError { stage: SignupStage::AccountCreated, source }
    })?;

    let profile = self
      .create_profile(user_id, &request.full_name, &email, &request.details)
      .await
      .map_err(|source| SignupError { stage: SignupStage::RoleAssigned, source })?;

    let referral = self
      .resolve_referral(request.referral_code.as_deref(), user_id, &email)
      .await;
    tracing::debug!(%user_id, stage = %SignupStage::ReferralResolved, "stage reached");

    tracing::info!(
      %user_id,
      role = %role.role,
      referral_linked = referral.is_linked(),
      "signup complete"
    );

    Ok(SignupOutcome {
      user_id,
      stage: SignupStage::Done,
      role,
      profile,
      referral,
    })
  }

  // ── Referral issuance and reads ───────────────────────────────────────

  /// Issue a pending referral from `agent_id` to `candidate_email`.
  ///
  /// A code is generated unless one is supplied.
  pub async fn issue_referral(
    &self,
    agent_id: Uuid,
    candidate_email: &str,
    code: Option<String>,
  ) -> Result<Referral> {
    match self.role(agent_id).await? {
      Some(UserRole { role: Role::Agent, .. }) => {}
      _ => return Err(Error::NotAnAgent(agent_id)),
    }

    let referral_code = code
      .map(|c| c.trim().to_owned())
      .filter(|c| !c.is_empty())
      .unwrap_or_else(referral::generate_code);

    let referral = self
      .store
      .insert_referral(NewReferral {
        referral_code,
        agent_id,
        candidate_email: normalize_email(candidate_email),
      })
      .await
      .map_err(|e| Error::persistence("referrals", e))?;

    tracing::info!(
      %agent_id,
      referral_id = %referral.referral_id,
      "referral issued"
    );
    Ok(referral)
  }

  pub async fn role(&self, user_id: Uuid) -> Result<Option<UserRole>> {
    self
      .store
      .get_role(user_id)
      .await
      .map_err(|e| Error::persistence("user_roles", e))
  }

  /// Fetch the profile of `user_id` from the table matching their role.
  pub async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let Some(role) = self.role(user_id).await? else {
      return Ok(None);
    };

    match role.role {
      Role::Candidate => Ok(
        self
          .store
          .get_candidate_profile(user_id)
          .await
          .map_err(|e| Error::persistence("candidate_profiles", e))?
          .map(Profile::Candidate),
      ),
      Role::Employer => Ok(
        self
          .store
          .get_employer_profile(user_id)
          .await
          .map_err(|e| Error::persistence("employer_profiles", e))?
          .map(Profile::Employer),
      ),
      Role::Agent => self
        .store
        .get_agent_profile(user_id)
        .await
        .map_err(|e| Error::persistence("agent_profiles", e))?
        .map(|p| {
          serde_json::to_value(p)
            .map(Profile::Agent)
            .map_err(|e| Error::persistence("agent_profiles", e))
        })
        .transpose(),
    }
  }

  pub async fn referrals(&self, agent_id: Uuid) -> Result<Vec<Referral>> {
    self
      .store
      .list_referrals(agent_id)
      .await
      .map_err(|e| Error::persistence("referrals", e))
  }

  pub async fn find_referral(
    &self,
    code: &str,
    candidate_email: &str,
  ) -> Result<Option<Referral>> {
    let email = normalize_email(candidate_email);
    self
      .store
      .find_referral(code.trim(), &email)
      .await
      .map_err(|e| Error::persistence("referrals", e))
  }
}
