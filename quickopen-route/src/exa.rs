//! Exa search API client.
//!
//! `POST {base}/search` with a JSON [`SearchRequest`] body, authenticated
//! by the configured [`AuthMode`]. The key is read from [`ProviderConfig`]
//! on every call, so a missing key fails that call (and only that call).

use reqwest::header::ACCEPT;

use crate::config::{AuthMode, ProviderConfig};
use crate::error::RouteError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::{SearchRequest, SearchResponse};

/// Longest slice of an error body kept in [`RouteError::Http`] messages.
const ERROR_BODY_EXCERPT_CHARS: usize = 300;

/// Exa HTTP client.
#[derive(Debug, Clone)]
pub struct ExaProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl ExaProvider {
    /// Create a provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, RouteError> {
        Ok(Self::with_client(http::build_client()?, config))
    }

    /// Create a provider that shares an existing client.
    pub fn with_client(client: reqwest::Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    /// The provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl SearchProvider for ExaProvider {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, RouteError> {
        let api_key = self.config.require_api_key()?;
        let endpoint = self.config.search_endpoint()?;

        tracing::trace!(query = %request.query, "exa search");

        let builder = self
            .client
            .post(endpoint)
            .header(ACCEPT, "application/json")
            .json(request);
        let builder = match self.config.auth_mode {
            AuthMode::Header => builder.header("x-api-key", api_key),
            AuthMode::Bearer => builder.bearer_auth(api_key),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| RouteError::Http(format!("exa request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RouteError::Http(format!(
                "exa returned {status}: {}",
                excerpt(&body)
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RouteError::Parse(format!("exa response: {e}")))?;

        tracing::trace!(count = parsed.results.len(), "exa response received");
        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "exa"
    }
}

fn excerpt(body: &str) -> String {
    body.trim().chars().take(ERROR_BODY_EXCERPT_CHARS).collect()
}
