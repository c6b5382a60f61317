//! HTTP endpoint for Quick Open.
//!
//! ## Endpoints
//!
//! - `GET /api?q=<query>`: `302` to the resolved destination
//! - `GET /api?q=<query>&debug=1`: the [`Resolution`] as JSON
//! - `GET /`: a minimal query page
//! - `GET /healthz`: liveness probe

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use quickopen_route::{ExaProvider, Orchestrator, Resolution, SearchProvider};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, info};
use uuid::Uuid;

use crate::config::{AppConfig, ServerConfig};
use crate::error::{AppError, Result};

/// Response header carrying the per-request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Quick Open</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 4rem auto; padding: 0 1rem; }
input[type=text] { width: 100%; font-size: 1.25rem; padding: .5rem; box-sizing: border-box; }
.chips a { display: inline-block; margin: .5rem .25rem 0 0; padding: .2rem .6rem; border: 1px solid #ccc; border-radius: 1rem; text-decoration: none; color: inherit; }
</style>
</head>
<body>
<h1>Quick Open</h1>
<form action="/api" method="get">
<input type="text" name="q" autofocus placeholder="Type a site, a repo, an error message...">
</form>
<div class="chips">
<a href="/api?q=hacker%20news">hacker news</a>
<a href="/api?q=github%20segmentanything">github segmentanything</a>
<a href="/api?q=nextjs%20routing">nextjs routing</a>
<a href="/api?q=stripe">stripe</a>
<a href="/api?q=tokio%20join%20error%20fix">tokio join error fix</a>
</div>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
struct ApiParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    debug: Option<String>,
}

impl ApiParams {
    fn debug(&self) -> bool {
        matches!(
            self.debug.as_deref().map(str::trim),
            Some("1" | "true" | "yes" | "on")
        )
    }
}

/// Build the router over a shared orchestrator.
pub fn router<P>(orchestrator: Arc<Orchestrator<P>>) -> Router
where
    P: SearchProvider + 'static,
{
    Router::new()
        .route("/", get(handle_index))
        .route("/healthz", get(handle_health))
        .route("/api", get(handle_api::<P>))
        .with_state(orchestrator)
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_health() -> &'static str {
    "ok"
}

async fn handle_api<P>(
    State(orchestrator): State<Arc<Orchestrator<P>>>,
    Query(params): Query<ApiParams>,
) -> Response
where
    P: SearchProvider + 'static,
{
    let debug_mode = params.debug();
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return found("/");
    }

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("api", %request_id);
    let resolution = orchestrator.resolve_query(query).instrument(span).await;

    tracing::debug!(
        %request_id,
        intent = %resolution.intent,
        source = ?resolution.source,
        debug = debug_mode,
        "api request resolved"
    );

    let mut response = if debug_mode {
        Json::<Resolution>(resolution).into_response()
    } else {
        found(&resolution.url)
    };
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// `302 Found` to `location`, never cached.
fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (
            StatusCode::FOUND,
            [
                (header::LOCATION, value),
                (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "resolved URL is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The running HTTP endpoint. Dropping it stops the server.
pub struct QuickOpenServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl QuickOpenServer {
    /// Validate `config`, build the hosted provider and start serving.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for invalid configuration and
    /// [`AppError::Server`] if the listener cannot be bound.
    pub async fn start(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let provider_config = config.provider_config()?;
        if let Err(e) = provider_config.search_endpoint() {
            tracing::warn!(
                error = %e,
                "provider endpoint unusable; every search will use the fallback URL"
            );
        }
        let provider = ExaProvider::new(provider_config)?;
        let orchestrator = Orchestrator::new(provider, config.routing.clone())?;
        Self::start_with(orchestrator, &config.server).await
    }

    /// Start serving with an already-built orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Server`] if the listener cannot be bound.
    pub async fn start_with<P>(orchestrator: Orchestrator<P>, server: &ServerConfig) -> Result<Self>
    where
        P: SearchProvider + 'static,
    {
        let app = router(Arc::new(orchestrator));

        let bind_addr = format!("{}:{}", server.host, server.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind {bind_addr} failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Server(format!("failed to get local addr: {e}")))?;

        info!("quickopen listening on http://{addr}/");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("quickopen server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for QuickOpenServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
