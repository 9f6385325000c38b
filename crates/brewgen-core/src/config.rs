use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coordinator::FailurePolicy;
use crate::fetch::{HttpOptions, DEFAULT_USER_AGENT};
use crate::release::DEFAULT_GITHUB_API_URL;

/// Global configuration loaded from `~/.config/brewgen/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewgenConfig {
    /// Base URL of the GitHub REST API.
    pub github_api_url: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Repository owner used when `--owner` is not given.
    #[serde(default)]
    pub default_owner: Option<String>,
    /// "abort" (default) fails the run when any asset download fails; "skip" leaves it out.
    #[serde(default)]
    pub on_fetch_error: FailurePolicy,
    /// Per-asset download deadline in seconds (None = wait indefinitely).
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    /// Connect deadline in seconds (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for BrewgenConfig {
    fn default() -> Self {
        Self {
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_owner: None,
            on_fetch_error: FailurePolicy::Abort,
            fetch_timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

impl BrewgenConfig {
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.fetch_timeout_secs.map(Duration::from_secs),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// `~/.config/brewgen/config.toml`. Nothing is created.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("brewgen")?;
    Ok(xdg_dirs.get_config_home().join("brewgen").join("config.toml"))
}

/// Load the user's configuration, or defaults when there is no config file.
/// Never writes to disk; see [`init_at`].
pub fn load() -> Result<BrewgenConfig> {
    load_or_default(&config_path()?)
}

/// Load `path` if it exists, defaults otherwise.
pub fn load_or_default(path: &Path) -> Result<BrewgenConfig> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(BrewgenConfig::default());
    }
    load_from(path)
}

/// Write a default config file at `path`. An existing file is kept unless
/// `force` is set. Returns whether a file was written.
pub fn init_at(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    let toml = toml::to_string_pretty(&BrewgenConfig::default())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, toml).with_context(|| format!("write config {}", path.display()))?;
    tracing::info!("wrote default config to {}", path.display());
    Ok(true)
}

/// Load configuration from an explicit path (e.g. `--config`).
pub fn load_from(path: &Path) -> Result<BrewgenConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: BrewgenConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
