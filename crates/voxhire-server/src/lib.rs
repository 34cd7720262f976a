//! Voxhire Server
//!
//! Self-hosted API server for AI-administered technical interviews.
//! This is a library crate — the server is started via `start_server()`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::Method,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use voxhire_core::paths;
use voxhire_core::storage::Database;
use voxhire_core::{InterviewService, LlmClient, RequestQueue, ThrottleSlot};

pub mod error;
pub mod routes;
pub mod types;

/// Configuration for starting the server.
pub struct ServerConfig {
    /// Port to listen on (default: 3000).
    pub port: u16,
    /// SQLite database file for interviews and governor state.
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            db_path: paths::db_path(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db_path: Arc<PathBuf>,
    /// Governed interview operations (None when no API key is configured).
    pub service: Option<Arc<InterviewService>>,
}

/// Build the interview service from env credentials.
///
/// Checks `VOXHIRE_API_KEY`, then `OPENAI_API_KEY`, then `GROQ_API_KEY`. The
/// key's shape picks the backend and its cooldown profile; the governor's
/// timestamp persists in the same database as the interviews.
pub fn create_interview_service(db_path: &std::path::Path) -> Option<InterviewService> {
    let api_key = std::env::var("VOXHIRE_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .or_else(|_| std::env::var("GROQ_API_KEY"));

    let api_key = match api_key {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            tracing::warn!(
                "No API key found; interview endpoints will be unavailable until one is configured"
            );
            return None;
        }
    };

    let client = LlmClient::from_api_key(api_key);
    let cooldown = client.profile().cooldown;
    let slot = Arc::new(ThrottleSlot::new(db_path.to_path_buf()));
    let queue = RequestQueue::new(cooldown, slot);

    Some(InterviewService::new(Arc::new(client), queue))
}

/// Build the Axum router with all routes.
pub fn build_router(config: &ServerConfig) -> anyhow::Result<(Router, AppState)> {
    // Open once at startup so migrations run before any request arrives.
    let _db = Database::new(&config.db_path)?;

    let service = create_interview_service(&config.db_path).map(Arc::new);

    let state = AppState {
        db_path: Arc::new(config.db_path.clone()),
        service,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", routes::api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((app, state))
}

/// Start the Voxhire server and block until shutdown.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let (app, _state) = build_router(&config)?;

    tracing::info!("Voxhire server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn router_builds_against_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            port: 0,
            db_path: dir.path().join("test.db"),
        };

        let (_app, state) = build_router(&config).unwrap();
        assert!(state.db_path.ends_with("test.db"));
    }
}
