//! Server configuration: an optional TOML file overlaid by `CEPEX_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Populate an empty store with a few users and opportunities.
  #[serde(default)]
  pub seed_demo:  bool,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { "~/.local/share/cepex/cepex.db".into() }

impl ServerConfig {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CEPEX").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
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
  use super::*;

  fn scratch_path() -> PathBuf {
    std::env::temp_dir().join(format!("cepex-{}.toml", uuid::Uuid::new_v4()))
  }

  #[test]
  fn missing_file_yields_defaults() {
    let path = scratch_path();
    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.store_path, default_store_path());
    assert!(!cfg.seed_demo);
  }

  #[test]
  fn file_values_override_defaults() {
    let path = scratch_path();
    std::fs::write(
      &path,
      "host = \"0.0.0.0\"\nstore_path = \"/srv/cepex.db\"\nseed_demo = true\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.store_path, PathBuf::from("/srv/cepex.db"));
    assert!(cfg.seed_demo);
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    let home = std::env::var("HOME").unwrap_or_default();
    if home.is_empty() {
      return;
    }
    assert_eq!(
      expand_tilde(Path::new("~/cepex.db")),
      PathBuf::from(&home).join("cepex.db")
    );
    assert_eq!(expand_tilde(Path::new("/tmp/~/x")), PathBuf::from("/tmp/~/x"));
  }
}
