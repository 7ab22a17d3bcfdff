//! JSON REST API for jobmatch.
//!
//! Exposes an axum [`Router`] backed by a [`Provisioner`] over any store,
//! agent provisioner and account service. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", jobmatch_api::api_router(provisioner.clone()))
//! ```

pub mod error;
pub mod referrals;
pub mod signup;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use jobmatch_core::{
  Provisioner,
  store::{AccountService, AgentProvisioner, ProvisioningStore},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `provisioner`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P, A>(provisioner: Arc<Provisioner<S, P, A>>) -> Router<()>
where
  S: ProvisioningStore + 'static,
  P: AgentProvisioner + 'static,
  A: AccountService + 'static,
{
  Router::new()
    .route("/signup", post(signup::handler::<S, P, A>))
    // Users
    .route("/users/{id}/role", get(users::role::<S, P, A>))
    .route("/users/{id}/profile", get(users::profile::<S, P, A>))
    // Referrals
    .route(
      "/referrals",
      get(referrals::list::<S, P, A>).post(referrals::create::<S, P, A>),
    )
    .route("/referrals/{code}", get(referrals::get_one::<S, P, A>))
    .with_state(provisioner)
}

#[cfg(test)]
mod tests;
