//! Trait definition for the external search provider.
//!
//! The orchestrator is generic over [`SearchProvider`], so the production
//! HTTP client ([`crate::exa::ExaProvider`]) and in-process test fakes are
//! interchangeable.

use crate::error::RouteError;
use crate::types::{SearchRequest, SearchResponse};

/// A remote search service.
///
/// Implementations perform exactly one attempt per call: no internal retry
/// or backoff. Deadlines are imposed by the caller, which drops the future
/// when a phase runs out of time, so implementations must be cancel-safe.
///
/// All implementations must be `Send + Sync` so a single provider can serve
/// concurrent requests.
pub trait SearchProvider: Send + Sync {
    /// Run `request` and return the provider's ranked candidates.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Config`] for a missing credential or bad
    /// endpoint, [`RouteError::Http`] for transport failures and non-2xx
    /// responses, and [`RouteError::Parse`] for undecodable bodies.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<SearchResponse, RouteError>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
