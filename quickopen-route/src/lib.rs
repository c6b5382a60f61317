//! # quickopen-route
//!
//! Turns a free-text query into a single landing URL.
//!
//! ## Pipeline
//!
//! 1. [`classifier::classify`] normalises the query and picks an [`Intent`]
//!    through ordered checks: direct address, well-known site, repo,
//!    problem, docs, company, default. Non-direct intents get a primary
//!    [`SearchRequest`] and usually a retry.
//! 2. [`Orchestrator`] issues the primary request under a deadline, ranks
//!    the candidates and stops if the winner is good enough. Otherwise it
//!    issues the retry under a shorter deadline.
//! 3. [`ranking::pick_best`] scores candidates from URL structure, title and
//!    the provider's own relevance, after screening each URL through
//!    [`safety::screen_url`].
//! 4. When nothing usable survives, [`fallback::lucky_url`] builds a
//!    first-result web search URL.
//!
//! ## Failure model
//!
//! Resolution never fails. Provider errors and timeouts are logged, stored
//! in the per-phase report and absorbed by the next step.
//!
//! ## Security
//!
//! - Only HTTPS URLs with a plain DNS host leave this crate
//! - Queries are logged only at trace level
//! - The provider API key is redacted from `Debug` output

pub mod classifier;
pub mod config;
pub mod error;
pub mod exa;
pub mod fallback;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod ranking;
pub mod safety;
pub mod sites;
pub mod types;

pub use classifier::classify;
pub use config::{AuthMode, ProviderConfig, RouterConfig};
pub use error::{Result, RouteError};
pub use exa::ExaProvider;
pub use orchestrator::{Orchestrator, Phase, PhaseReport, Resolution, ResolutionSource};
pub use provider::SearchProvider;
pub use types::{Intent, PlanReason, RoutedPlan, SearchRequest, SearchResponse, SearchResult};

/// Classify and resolve `query` with the hosted provider.
///
/// Convenience wrapper that builds an [`ExaProvider`] and an
/// [`Orchestrator`] for a single call. Long-running callers should build
/// the orchestrator once and reuse it.
///
/// # Errors
///
/// Returns [`RouteError::Config`] if `router` is invalid and
/// [`RouteError::Http`] if the HTTP client cannot be built. Search
/// failures never surface here; they resolve to the fallback URL.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> quickopen_route::Result<()> {
/// use quickopen_route::{ProviderConfig, RouterConfig};
///
/// let provider = ProviderConfig::default().with_api_key("exa-key");
/// let resolution =
///     quickopen_route::resolve("tokio docs", provider, RouterConfig::default()).await?;
/// println!("{} ({:?})", resolution.url, resolution.source);
/// # Ok(())
/// # }
/// ```
pub async fn resolve(
    query: &str,
    provider: ProviderConfig,
    router: RouterConfig,
) -> Result<Resolution> {
    let orchestrator = Orchestrator::new(ExaProvider::new(provider)?, router)?;
    Ok(orchestrator.resolve_query(query).await)
}
