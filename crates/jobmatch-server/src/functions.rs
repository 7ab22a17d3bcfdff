//! Client for remote serverless functions, and the agent provisioner built on
//! it.

use std::time::Duration;

use jobmatch_core::{profile::AgentProvisionRequest, store::AgentProvisioner};
use reqwest::Client;
use serde::Serialize;

use crate::{Error, Result, config::RemoteFunctionConfig};

/// Invokes named functions with `POST {functions_url}/{name}`.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FunctionClient {
  client:   Client,
  base_url: String,
  api_key:  Option<String>,
}

impl FunctionClient {
  pub fn new(config: &RemoteFunctionConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self {
      client,
      base_url: config.functions_url.trim_end_matches('/').to_owned(),
      api_key: config.api_key.clone(),
    })
  }

  fn url(&self, name: &str) -> String { format!("{}/{name}", self.base_url) }

  /// Call function `name` with a JSON payload and return its JSON response.
  pub async fn invoke<T: Serialize + ?Sized>(
    &self,
    name: &str,
    payload: &T,
  ) -> Result<serde_json::Value> {
    let mut req = self.client.post(self.url(name)).json(payload);
    if let Some(key) = &self.api_key {
      req = req.bearer_auth(key);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::FunctionStatus { name: name.to_owned(), status, body });
    }
    Ok(resp.json().await?)
  }
}

/// Provisions agents by calling the remote agent-provisioning function.
#[derive(Clone)]
pub struct RemoteAgentProvisioner {
  client:        FunctionClient,
  function_name: String,
}

impl RemoteAgentProvisioner {
  pub fn new(config: &RemoteFunctionConfig) -> Result<Self> {
    Ok(Self {
      client:        FunctionClient::new(config)?,
      function_name: config.function_name.clone(),
    })
  }
}

impl AgentProvisioner for RemoteAgentProvisioner {
  type Error = Error;

  async fn provision_agent(
    &self,
    request: AgentProvisionRequest,
  ) -> Result<serde_json::Value> {
    tracing::debug!(
      user_id = %request.user_id,
      function = %self.function_name,
      "invoking agent provisioning function"
    );
    self.client.invoke(&self.function_name, &request).await
  }
}
