//! Shared HTTP client for provider requests.

use crate::error::RouteError;
use std::time::Duration;

/// TCP connect deadline. Whole-request deadlines belong to the orchestrator.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the [`reqwest::Client`] used for provider calls.
///
/// The client identifies itself as `quickopen-route/<version>`, follows no
/// redirects (an API endpoint that redirects is misconfigured), and has no
/// overall timeout of its own.
///
/// # Errors
///
/// Returns [`RouteError::Http`] if the client cannot be constructed.
pub fn build_client() -> Result<reqwest::Client, RouteError> {
    reqwest::Client::builder()
        .user_agent(concat!("quickopen-route/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| RouteError::Http(format!("failed to build HTTP client: {e}")))
}
