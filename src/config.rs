//! Application configuration: TOML file plus environment overlay.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8787
//!
//! [provider]
//! api_key = "..."
//! base_url = "https://api.exa.ai"
//! auth_mode = "header"
//!
//! [routing]
//! primary_timeout_ms = 3000
//! retry_timeout_ms = 2500
//! acceptable_score = 10.0
//! ```
//!
//! Every section and field is optional. Environment variables are applied
//! on top by [`AppConfig::apply_env`].

use std::path::{Path, PathBuf};

use quickopen_route::{AuthMode, ProviderConfig, RouterConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Provider API key.
pub const ENV_API_KEY: &str = "EXA_API_KEY";
/// Provider base URL or full search endpoint.
pub const ENV_ENDPOINT: &str = "QUICKOPEN_EXA_ENDPOINT";
/// `header` or `bearer`.
pub const ENV_AUTH_MODE: &str = "QUICKOPEN_EXA_AUTH_MODE";
/// Primary phase deadline in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "QUICKOPEN_TIMEOUT_MS";
pub const ENV_HOST: &str = "QUICKOPEN_HOST";
pub const ENV_PORT: &str = "QUICKOPEN_PORT";

/// Where the HTTP endpoint listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8787,
        }
    }
}

/// Provider settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// Prefer the `EXA_API_KEY` environment variable over storing it here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    /// `header` (x-api-key) or `bearer`.
    pub auth_mode: String,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: quickopen_route::config::DEFAULT_PROVIDER_BASE_URL.to_owned(),
            auth_mode: "header".to_owned(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderSection,
    pub routing: RouterConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/quickopen/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("quickopen").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("quickopen")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/quickopen-config/config.toml")
        }
    }

    /// Load `path` if given, otherwise the default path if it exists,
    /// otherwise defaults; then overlay the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded, or if
    /// an environment override does not parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_config_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay environment overrides read through `lookup`.
    ///
    /// Empty values are ignored. `QUICKOPEN_TIMEOUT_MS` sets the primary
    /// deadline and lowers the retry deadline to match if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if a numeric or enumerated override
    /// does not parse.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = get(ENV_API_KEY) {
            self.provider.api_key = Some(key);
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.provider.base_url = endpoint;
        }
        if let Some(mode) = get(ENV_AUTH_MODE) {
            self.provider.auth_mode = mode;
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            let ms: u64 = raw
                .parse()
                .map_err(|e| AppError::Config(format!("{ENV_TIMEOUT_MS}={raw}: {e}")))?;
            self.routing.primary_timeout_ms = ms;
            self.routing.retry_timeout_ms = self.routing.retry_timeout_ms.min(ms);
        }
        if let Some(host) = get(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(raw) = get(ENV_PORT) {
            self.server.port = raw
                .parse()
                .map_err(|e| AppError::Config(format!("{ENV_PORT}={raw}: {e}")))?;
        }
        Ok(())
    }

    /// The provider settings in the form the router crate expects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for an unknown auth mode.
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let auth_mode = AuthMode::parse(&self.provider.auth_mode).ok_or_else(|| {
            AppError::Config(format!(
                "unknown provider auth mode {:?} (expected header or bearer)",
                self.provider.auth_mode
            ))
        })?;
        let mut provider = ProviderConfig::default()
            .with_base_url(self.provider.base_url.clone())
            .with_auth_mode(auth_mode);
        if let Some(key) = &self.provider.api_key {
            provider = provider.with_api_key(key.clone());
        }
        Ok(provider)
    }

    /// Validate every section.
    ///
    /// A missing API key or a malformed provider endpoint is not an error
    /// here; either fails each search call and resolution falls back to the
    /// generic search URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Config("server host must not be empty".into()));
        }
        self.routing.validate()?;
        self.provider_config()?;
        Ok(())
    }
}
