//! Dashboard API for zoom: project views, task mutation, LLM analysis, and a
//! server-sent event stream that fires when project files change.

pub mod analysis;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use claude_agent::LlmClient;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router with the LLM backend named in the root's config.
///
/// The backend is resolved per analysis request, so a misconfigured backend
/// only fails `POST /api/analyze`.
pub fn build_router(root: PathBuf) -> Router {
    router(state::AppState::new(root))
}

/// Build the router around a fixed LLM client. Used by integration tests.
pub fn build_router_with_client(root: PathBuf, llm: Arc<dyn LlmClient>) -> Router {
    router(state::AppState::with_client(root, llm))
}

fn router(app_state: state::AppState) -> Router {
    // Browsers may only call the API from pages served on this machine.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| is_loopback_origin(origin)))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects/{name}", get(routes::projects::get_project))
        // Levels
        .route("/api/levels/{level}", get(routes::levels::get_level))
        // Tasks
        .route("/api/tasks", post(routes::tasks::add_task))
        .route("/api/tasks/complete", post(routes::tasks::complete))
        .route("/api/tasks/reopen", post(routes::tasks::reopen))
        // Analysis
        .route("/api/analyze", post(routes::analyze::analyze))
        .route("/api/changes/apply", post(routes::changes::apply_changes))
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// `http(s)://localhost`, `127.0.0.1` or `[::1]`, any port.
fn is_loopback_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let host = match rest.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => rest,
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}

/// Start the dashboard server on `port`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the dashboard server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    if let Ok(config) = analysis::load_config_or_default(&root) {
        if let Err(e) = analysis::client_from_config(&config.llm) {
            tracing::warn!(error = %e, "LLM backend unavailable; analysis requests will fail");
        }
    }
    let app = build_router(root);

    tracing::info!("zoom dashboard listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/projects");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
