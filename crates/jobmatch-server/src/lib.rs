//! HTTP server wiring for jobmatch.
//!
//! Builds the [`Provisioner`] from a [`ServerConfig`] (SQLite store, local or
//! remote agent provisioning) and mounts the JSON API under `/api`.

pub mod config;
pub mod error;
pub mod functions;

pub use crate::config::ServerConfig;
pub use error::{Error, Result};

use std::sync::Arc;

use axum::{Router, routing::get};
use jobmatch_core::{
  Provisioner,
  profile::AgentProvisionRequest,
  store::AgentProvisioner,
};
use jobmatch_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

use crate::{config::AgentProvisioningConfig, functions::RemoteAgentProvisioner};

// ─── Agent provisioning backend ──────────────────────────────────────────────

/// The agent provisioner selected by configuration.
///
/// Both variants leave an `agent_profiles` row in the local store, so profile
/// reads do not depend on the mode.
#[derive(Clone)]
pub enum AgentBackend {
  Local(Arc<SqliteStore>),
  Remote {
    function: RemoteAgentProvisioner,
    store:    Arc<SqliteStore>,
  },
}

impl AgentBackend {
  pub fn from_config(
    config: &AgentProvisioningConfig,
    store: Arc<SqliteStore>,
  ) -> Result<Self> {
    Ok(match config {
      AgentProvisioningConfig::Local => Self::Local(store),
      AgentProvisioningConfig::Remote(remote) => Self::Remote {
        function: RemoteAgentProvisioner::new(remote)?,
        store,
      },
    })
  }
}

impl AgentProvisioner for AgentBackend {
  type Error = Error;

  async fn provision_agent(
    &self,
    request: AgentProvisionRequest,
  ) -> Result<serde_json::Value> {
    match self {
      Self::Local(store) => Ok(store.provision_agent(request).await?),
      Self::Remote { function, store } => {
        let payload = function.provision_agent(request.clone()).await?;
        store.record_agent_profile(request).await?;
        Ok(payload)
      }
    }
  }
}

// ─── Application ─────────────────────────────────────────────────────────────

pub type AppProvisioner = Provisioner<SqliteStore, AgentBackend, SqliteStore>;

/// Build the provisioner for an opened store.
pub fn provisioner(
  config: &ServerConfig,
  store: Arc<SqliteStore>,
) -> Result<Arc<AppProvisioner>> {
  let agents = AgentBackend::from_config(&config.agent_provisioning, store.clone())?;
  Ok(Arc::new(Provisioner::new(store.clone(), Arc::new(agents), store)))
}

/// Build the axum [`Router`]: the JSON API under `/api` plus `/health`.
pub fn router(provisioner: Arc<AppProvisioner>) -> Router {
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", jobmatch_api::api_router(provisioner))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
