use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use taskdeck_core::DEFAULT_API_URL;
use tracing::{
  debug,
  info
};

pub const API_URL_ENV: &str =
  "TASKDECK_API_URL";

#[derive(
  Debug, Clone, Default, Deserialize,
)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  api_url:  Option<String>,
  data_dir: Option<PathBuf>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub api_url:     String,
  pub data_dir:    Option<PathBuf>,
  pub loaded_file: Option<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_url:     DEFAULT_API_URL
        .to_string(),
      data_dir:    None,
      loaded_file: None
    }
  }
}

impl Config {
  /// Defaults, then the config file,
  /// then `TASKDECK_API_URL`.
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    match resolve_config_path(
      config_override
    ) {
      | Some(path) => {
        info!(config = %path.display(), "loading config");
        cfg.load_file(&path)?;
      }
      | None => {
        debug!(
          "no config file found; \
           using defaults"
        );
      }
    }

    if let Ok(url) =
      std::env::var(API_URL_ENV)
      && !url.trim().is_empty()
    {
      debug!(%url, "api url from environment");
      cfg.api_url = url;
    }

    Ok(cfg)
  }

  pub fn apply_api_url(
    &mut self,
    url: Option<&str>
  ) {
    if let Some(url) = url {
      self.api_url = url.to_string();
    }
  }

  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    let file: ConfigFile =
      toml::from_str(&text)
        .with_context(|| {
          format!(
            "failed to parse {}",
            path.display()
          )
        })?;

    if let Some(url) = file.api_url {
      self.api_url = url;
    }
    if let Some(dir) = file.data_dir {
      self.data_dir =
        Some(expand_tilde(&dir));
    }
    self.loaded_file = Some(path);
    Ok(())
  }
}

/// Picks the data directory: flag, then
/// config, then the platform default.
/// Creates it when missing.
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    expand_tilde(path)
  } else if let Some(dir) =
    cfg.data_dir.clone()
  {
    dir
  } else {
    default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  let candidate = dirs::config_dir()?
    .join("taskdeck")
    .join("config.toml");
  candidate.exists().then_some(candidate)
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  dirs::data_dir()
    .or_else(dirs::home_dir)
    .map(|base| base.join("taskdeck"))
    .ok_or_else(|| {
      anyhow!(
        "cannot determine a data \
         directory; pass --data"
      )
    })
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
