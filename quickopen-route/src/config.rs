//! Routing and provider configuration with sensible defaults.
//!
//! Nothing in this crate reads the process environment. Callers build a
//! [`RouterConfig`] and a [`ProviderConfig`] (the root application overlays
//! its TOML file and environment onto them) and pass them in explicitly.

use crate::error::RouteError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default provider endpoint base.
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.exa.ai";

/// Tuning for classification, ranking and the two search phases.
///
/// The threshold and weights are empirically chosen and have no derivation
/// beyond "worked on real queries"; override them freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Deadline for the primary provider call, in milliseconds.
    pub primary_timeout_ms: u64,
    /// Deadline for the retry provider call, in milliseconds.
    pub retry_timeout_ms: u64,
    /// A primary-phase winner at or above this score ends the search early.
    pub acceptable_score: f64,
    /// Multiplier applied to the provider's own relevance score.
    pub provider_score_weight: f64,
    /// Number of results requested per phase.
    pub num_results: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            primary_timeout_ms: 3000,
            retry_timeout_ms: 2500,
            acceptable_score: 10.0,
            provider_score_weight: 3.0,
            num_results: 10,
        }
    }
}

impl RouterConfig {
    /// The primary phase deadline.
    pub fn primary_timeout(&self) -> Duration {
        Duration::from_millis(self.primary_timeout_ms)
    }

    /// The retry phase deadline.
    pub fn retry_timeout(&self) -> Duration {
        Duration::from_millis(self.retry_timeout_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - both timeouts must be greater than 0
    /// - `retry_timeout_ms` must be <= `primary_timeout_ms`
    /// - `num_results` must be greater than 0
    /// - `acceptable_score` and `provider_score_weight` must be finite
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.primary_timeout_ms == 0 || self.retry_timeout_ms == 0 {
            return Err(RouteError::Config(
                "phase timeouts must be greater than 0".into(),
            ));
        }
        if self.retry_timeout_ms > self.primary_timeout_ms {
            return Err(RouteError::Config(
                "retry_timeout_ms must be <= primary_timeout_ms".into(),
            ));
        }
        if self.num_results == 0 {
            return Err(RouteError::Config(
                "num_results must be greater than 0".into(),
            ));
        }
        if !self.acceptable_score.is_finite() || !self.provider_score_weight.is_finite() {
            return Err(RouteError::Config(
                "acceptable_score and provider_score_weight must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// How the API key is presented to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// `x-api-key: <key>`
    #[default]
    Header,
    /// `Authorization: Bearer <key>`
    Bearer,
}

impl AuthMode {
    /// Parse a mode name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "header" | "x-api-key" => Some(Self::Header),
            "bearer" => Some(Self::Bearer),
            _ => None,
        }
    }
}

/// Connection settings for the search provider.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider-issued secret. Absence only fails at call time.
    pub api_key: Option<String>,
    /// Base URL; `/search` is appended.
    pub base_url: String,
    pub auth_mode: AuthMode,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            auth_mode: AuthMode::Header,
        }
    }
}

// Hand-written so the key never lands in logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("auth_mode", &self.auth_mode)
            .finish()
    }
}

impl ProviderConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL (useful for testing with mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the auth mode.
    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// The non-empty API key.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Config`] if no key is configured.
    pub fn require_api_key(&self) -> Result<&str, RouteError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| RouteError::Config("missing provider API key (EXA_API_KEY)".into()))
    }

    /// The full search endpoint derived from `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Config`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn search_endpoint(&self) -> Result<Url, RouteError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed)
            .map_err(|e| RouteError::Config(format!("invalid provider endpoint: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RouteError::Config(format!(
                "provider endpoint must be http(s), got {}",
                base.scheme()
            )));
        }
        if base.path().ends_with("/search") {
            return Ok(base);
        }
        Url::parse(&format!("{trimmed}/search"))
            .map_err(|e| RouteError::Config(format!("invalid provider endpoint: {e}")))
    }
}
