//! Error types for the quickopen-route crate.
//!
//! Errors never carry the provider API key. Every variant is absorbed by the
//! orchestrator into a failed phase; callers of [`crate::Orchestrator::resolve`]
//! only ever see them inside a phase report.

/// Errors that can occur while talking to the search provider.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Missing credential, malformed endpoint, or invalid tuning values.
    #[error("config error: {0}")]
    Config(String),

    /// Transport failure or non-2xx response from the provider.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A phase deadline elapsed before the provider answered.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The provider response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience type alias for quickopen-route results.
pub type Result<T> = std::result::Result<T, RouteError>;
