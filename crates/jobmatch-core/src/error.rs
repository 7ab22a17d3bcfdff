//! Error types for `jobmatch-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::role::Role;

/// A boxed error from an injected collaborator (store, provisioning function,
/// account service).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal errors: any of these aborts a signup.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown role tag: {0:?}")]
  UnknownRole(String),

  #[error("{role} profile requires {field}")]
  MissingField { role: Role, field: &'static str },

  #[error("user {0} is not an agent")]
  NotAnAgent(Uuid),

  #[error("email {0} is already registered")]
  EmailTaken(String),

  #[error("account creation failed: {0}")]
  Account(#[source] BoxError),

  #[error("persistence error on {table}: {source}")]
  Persistence {
    table:  &'static str,
    #[source]
    source: BoxError,
  },

  #[error("agent provisioning function failed: {0}")]
  RemoteProvisioning(#[source] BoxError),
}

impl Error {
  pub fn persistence<E>(table: &'static str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Persistence { table, source: Box::new(source) }
  }
}

/// Non-fatal referral resolution failures. These are logged and never abort
/// a signup.
#[derive(Debug, Error)]
pub enum ReferralError {
  #[error("no referral with code {code:?} for {email}")]
  NotFound { code: String, email: String },

  #[error("referral {0} is already completed")]
  AlreadyCompleted(Uuid),

  #[error("persistence error on referrals: {0}")]
  Persistence(#[source] BoxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A fatal signup failure, tagged with the last stage that completed before
/// it.
///
/// Nothing completed before `stage` is rolled back: an account or role
/// recorded earlier stays in place.
#[derive(Debug, Error)]
#[error("signup failed after stage {stage}: {source}")]
pub struct SignupError {
  pub stage:  crate::provision::SignupStage,
  #[source]
  pub source: Error,
}
