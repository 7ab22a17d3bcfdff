//! Runtime server configuration, deserialised from `config.toml` and
//! `JOBMATCH_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  #[serde(default)]
  pub agent_provisioning: AgentProvisioningConfig,
}

/// Where agent profiles are provisioned.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AgentProvisioningConfig {
  /// Write agent profiles into the local store.
  #[default]
  Local,
  /// Call a remote serverless function.
  Remote(RemoteFunctionConfig),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RemoteFunctionConfig {
  /// Base URL functions are invoked under, e.g.
  /// `https://project.example.co/functions/v1`.
  pub functions_url: String,
  #[serde(default = "default_function_name")]
  pub function_name: String,
  /// Sent as a bearer token when set.
  pub api_key:       Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:  u64,
}

impl AgentProvisioningConfig {
  pub fn mode(&self) -> &'static str {
    match self {
      Self::Local => "local",
      Self::Remote(_) => "remote",
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("jobmatch.db") }

fn default_function_name() -> String { "create-vr-profile".to_owned() }

fn default_timeout_secs() -> u64 { 30 }

impl ServerConfig {
  /// Layer the TOML file at `path` (optional) under `JOBMATCH_*` environment
  /// variables. Nested keys use `__`, e.g.
  /// `JOBMATCH_AGENT_PROVISIONING__MODE=remote`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with(path, environment())
  }

  fn load_with(
    path: &Path,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// `JOBMATCH_*` variables. Values are parsed into numbers and booleans where
/// they look like one; the tagged `agent_provisioning` block cannot coerce
/// strings itself.
fn environment() -> config::Environment {
  config::Environment::with_prefix("JOBMATCH")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_to_local_provisioning() {
    let cfg = parse("port = 9000");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.agent_provisioning, AgentProvisioningConfig::Local);
  }

  #[test]
  fn remote_provisioning_fills_defaults() {
    let cfg = parse(
      r#"
        store_path = "/tmp/jobmatch.db"

        [agent_provisioning]
        mode = "remote"
        functions_url = "https://fn.example.com/v1"
      "#,
    );

    let AgentProvisioningConfig::Remote(remote) = cfg.agent_provisioning else {
      panic!("expected remote");
    };
    assert_eq!(remote.function_name, "create-vr-profile");
    assert_eq!(remote.timeout_secs, 30);
    assert_eq!(remote.api_key, None);
  }

  fn env(vars: &[(&str, &str)]) -> config::Environment {
    let vars = vars
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect::<config::Map<_, _>>();
    environment().source(Some(vars))
  }

  #[test]
  fn remote_provisioning_from_environment() {
    let cfg = ServerConfig::load_with(
      Path::new("/nonexistent/jobmatch.toml"),
      env(&[
        ("JOBMATCH_PORT", "9100"),
        ("JOBMATCH_AGENT_PROVISIONING__MODE", "remote"),
        ("JOBMATCH_AGENT_PROVISIONING__FUNCTIONS_URL", "https://fn.example.com/v1"),
        ("JOBMATCH_AGENT_PROVISIONING__TIMEOUT_SECS", "5"),
      ]),
    )
    .unwrap();

    assert_eq!(cfg.port, 9100);
    let AgentProvisioningConfig::Remote(remote) = cfg.agent_provisioning else {
      panic!("expected remote");
    };
    assert_eq!(remote.functions_url, "https://fn.example.com/v1");
    assert_eq!(remote.timeout_secs, 5);
    assert_eq!(remote.function_name, "create-vr-profile");
  }

  #[test]
  fn environment_overrides_file() {
    let dir = std::env::temp_dir()
      .join(format!("jobmatch-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(&path, "port = 9000\nhost = \"0.0.0.0\"\n").unwrap();

    let cfg =
      ServerConfig::load_with(&path, env(&[("JOBMATCH_PORT", "9200")])).unwrap();
    assert_eq!(cfg.port, 9200);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.agent_provisioning, AgentProvisioningConfig::Local);

    std::fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn tilde_is_expanded() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/data/jobmatch.db"));
    assert_eq!(expanded, PathBuf::from(home).join("data/jobmatch.db"));
    assert_eq!(expand_tilde(Path::new("/abs.db")), PathBuf::from("/abs.db"));
  }
}
