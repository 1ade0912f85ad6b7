//! Configuration: an optional TOML file, environment variables, and the
//! credential pair needed by `update`.
//!
//! Precedence is CLI flag > environment > config file > built-in default.
//! Everything is resolved once at startup and passed down explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::badge::BadgeStyle;
use crate::error::TrafficError;
use crate::repo::RepoId;

/// Environment variable holding `owner/name` (set by GitHub Actions).
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Preferred credential variable.
pub const ENV_TOKEN: &str = "TRAFFIC_TOKEN";
/// Fallback credential variable.
pub const ENV_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
/// Forces a config file path instead of the XDG location.
pub const ENV_CONFIG: &str = "RTRACK_CONFIG";

/// Global configuration loaded from `~/.config/rtrack/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtrackConfig {
    /// Base URL of the traffic API.
    pub api_base: String,
    /// `User-Agent` header; the API rejects requests without one.
    pub user_agent: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Total per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// History JSON file.
    pub data_file: PathBuf,
    /// Generated SVG badge.
    pub svg_file: PathBuf,
    /// Badge style.
    pub style: BadgeStyle,
    /// Label text on the badge.
    pub label: String,
    /// Days of history drawn by the dashboard chart.
    pub chart_days: usize,
}

impl Default for RtrackConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            user_agent: concat!("rtrack/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            data_file: PathBuf::from("traffic-data.json"),
            svg_file: PathBuf::from("traffic-stat.svg"),
            style: BadgeStyle::default(),
            label: "views".to_string(),
            chart_days: 14,
        }
    }
}

impl RtrackConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply `RTRACK_*` environment overrides. `lookup` is `std::env::var`
    /// in production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), TrafficError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = non_empty(lookup("RTRACK_API_BASE")) {
            self.api_base = v;
        }
        if let Some(v) = non_empty(lookup("RTRACK_DATA_FILE")) {
            self.data_file = PathBuf::from(v);
        }
        if let Some(v) = non_empty(lookup("RTRACK_SVG_FILE")) {
            self.svg_file = PathBuf::from(v);
        }
        if let Some(v) = non_empty(lookup("RTRACK_STYLE")) {
            self.style = v.parse()?;
        }
        Ok(())
    }
}

/// Repository and token for the traffic API. The token is never logged.
#[derive(Clone)]
pub struct Credentials {
    pub repo: RepoId,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve from the process environment.
    pub fn from_env(repo_override: Option<&str>) -> Result<Self, TrafficError> {
        Self::resolve(repo_override, |k| std::env::var(k).ok())
    }

    /// Resolve the repository (flag, then `GITHUB_REPOSITORY`) and the token
    /// (`TRAFFIC_TOKEN`, then `GITHUB_TOKEN`). Both are trimmed; an empty
    /// token counts as missing.
    pub fn resolve<F>(repo_override: Option<&str>, lookup: F) -> Result<Self, TrafficError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = non_empty(lookup(ENV_TOKEN))
            .or_else(|| non_empty(lookup(ENV_TOKEN_FALLBACK)))
            .ok_or_else(|| {
                TrafficError::Config(format!(
                    "{ENV_TOKEN} is missing; add it to the repository secrets"
                ))
            })?;
        let repo = match repo_override {
            Some(r) => r.to_string(),
            None => non_empty(lookup(ENV_REPOSITORY)).ok_or_else(|| {
                TrafficError::Config(format!("{ENV_REPOSITORY} is not set (expected owner/name)"))
            })?,
        };
        Ok(Credentials {
            repo: repo.parse()?,
            token,
        })
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// `$RTRACK_CONFIG` if set, else `~/.config/rtrack/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(p) = non_empty(std::env::var(ENV_CONFIG).ok()) {
        return Ok(PathBuf::from(p));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rtrack")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RtrackConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<RtrackConfig> {
    if !path.exists() {
        let default_cfg = RtrackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RtrackConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
