//! The collaborator traits the provisioning workflow is built on.
//!
//! [`ProvisioningStore`] is implemented by storage backends (e.g.
//! `jobmatch-store-sqlite`). [`AgentProvisioner`] and [`AccountService`] stand
//! in for the agent-provisioning function and the account-creation call.
//! Higher layers depend on these abstractions, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  profile::{
    AgentProfile, AgentProvisionRequest, CandidateProfile, EmployerProfile,
    NewCandidateProfile, NewEmployerProfile,
  },
  referral::{NewReferral, Referral},
  role::{Role, UserRole},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Table-scoped access to the remote data store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ProvisioningStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Roles ─────────────────────────────────────────────────────────────

  /// Record the role for a user. Must fail if the user already has one.
  fn insert_role(
    &self,
    user_id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<UserRole, Self::Error>> + Send + '_;

  fn get_role(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserRole>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Insert a candidate profile. `created_at` is set by the store.
  fn insert_candidate_profile(
    &self,
    input: NewCandidateProfile,
  ) -> impl Future<Output = Result<CandidateProfile, Self::Error>> + Send + '_;

  fn get_candidate_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<CandidateProfile>, Self::Error>> + Send + '_;

  /// Insert an employer profile. `created_at` is set by the store.
  fn insert_employer_profile(
    &self,
    input: NewEmployerProfile,
  ) -> impl Future<Output = Result<EmployerProfile, Self::Error>> + Send + '_;

  fn get_employer_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<EmployerProfile>, Self::Error>> + Send + '_;

  /// Agent profiles are written by the provisioning function; the store only
  /// reads them.
  fn get_agent_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<AgentProfile>, Self::Error>> + Send + '_;

  // ── Referrals ─────────────────────────────────────────────────────────

  /// Insert a pending referral. Fails if `(referral_code, candidate_email)` is
  /// already taken.
  fn insert_referral(
    &self,
    input: NewReferral,
  ) -> impl Future<Output = Result<Referral, Self::Error>> + Send + '_;

  /// Find the referral matching both the code and the candidate email,
  /// whatever its status.
  fn find_referral<'a>(
    &'a self,
    referral_code: &'a str,
    candidate_email: &'a str,
  ) -> impl Future<Output = Result<Option<Referral>, Self::Error>> + Send + 'a;

  /// Mark a pending referral completed and link it to `candidate_id`.
  ///
  /// Returns `None` without modifying anything if the referral is not pending
  /// (already completed, or missing).
  fn complete_referral(
    &self,
    referral_id: Uuid,
    candidate_id: Uuid,
    signed_up_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Referral>, Self::Error>> + Send + '_;

  /// All referrals issued by an agent, oldest first.
  fn list_referrals(
    &self,
    agent_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Referral>, Self::Error>> + Send + '_;
}

// ─── Agent provisioning ──────────────────────────────────────────────────────

/// The function that creates agent (VR) profiles on the workflow's behalf.
pub trait AgentProvisioner: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Provision an agent profile and return the function's payload verbatim.
  fn provision_agent(
    &self,
    request: AgentProvisionRequest,
  ) -> impl Future<Output = Result<serde_json::Value, Self::Error>> + Send + '_;
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// The account-creation call that produces a user identifier.
pub trait AccountService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an authenticated account and return its user id.
  fn create_account<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + 'a;

  /// Whether `error` from [`create_account`](Self::create_account) means the
  /// email already has an account.
  fn is_email_taken(error: &Self::Error) -> bool;
}
