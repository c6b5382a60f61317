//! Error types for the quickopen application.

/// Top-level error type for configuration loading and serving.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server bind or serve failure.
    #[error("server error: {0}")]
    Server(String),
}

impl From<quickopen_route::RouteError> for AppError {
    fn from(err: quickopen_route::RouteError) -> Self {
        match err {
            quickopen_route::RouteError::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
