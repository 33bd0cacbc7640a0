//! Configuration loading and resolution
//!
//! Bootstrap configuration comes from a small TOML file. Sources are applied
//! in priority order:
//! 1. Command-line arguments (highest priority, applied by the binary)
//! 2. Environment variables (`SPROUT_CONFIG`, `SPROUT_API_URL`, `SPROUT_API_TOKEN`)
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is never fatal: a warning is logged and defaults are
//! used. A config file that exists but does not parse is a `Config` error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG_PATH: &str = "SPROUT_CONFIG";
/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "SPROUT_API_URL";
/// Environment variable overriding `api.token`
pub const ENV_API_TOKEN: &str = "SPROUT_API_TOKEN";

const CONFIG_DIR_NAME: &str = "sprout";
const CONFIG_FILE_NAME: &str = "sprout.toml";

/// Camera facing preference for the first acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear-facing camera (points at the child, not the caregiver)
    #[default]
    Environment,
    /// Front-facing camera
    User,
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Capture behaviour
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. `http://127.0.0.1:8000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Caregiver auth token, sent as `Authorization: Token <token>`
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout for snapshot fetches and review overrides
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Capture behaviour
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CaptureConfig {
    /// Camera tried first; falls back to any camera on constraint failure
    #[serde(default)]
    pub preferred_facing: FacingMode,

    /// Forward zero-length recordings to the backend instead of rejecting them
    #[serde(default)]
    pub allow_empty_upload: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a config file. Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse config text
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load configuration, falling back to defaults when no file exists.
    ///
    /// Environment overrides are applied on top of whatever was loaded.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(cli_path) {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            Some(path) => {
                warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => {
                debug!("No config file located, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line values on top of file and environment, then re-validate
    pub fn with_cli_overrides(
        mut self,
        base_url: Option<String>,
        token: Option<String>,
    ) -> Result<Self> {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token);
        }
        self.validate()?;
        Ok(self)
    }

    /// Apply `SPROUT_API_URL` / `SPROUT_API_TOKEN` when set and non-empty
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = non_empty_env(ENV_API_TOKEN) {
            self.api.token = Some(token);
        }
    }

    fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Locate the config file following the priority order.
///
/// Returns the CLI path or `SPROUT_CONFIG` as given (even if missing, so the
/// caller can warn), otherwise the platform default only if it exists.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Some(path) = non_empty_env(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }

    default_config_path().filter(|path| path.exists())
}

/// Platform config location (`~/.config/sprout/sprout.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
