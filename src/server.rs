//! JSON HTTP API.
//!
//! Serves the playground's three surfaces (chat, ingestion, settings) to
//! browser-based front ends. Handlers are thin: they snapshot the session,
//! build collaborators through the injected [`ClientFactory`], and call
//! the orchestration functions. Every orchestration outcome — including
//! validation and collaborator failures — is a `200` with a status string,
//! mirroring how the UI shows results inline; only malformed requests get
//! a 4xx from axum itself.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/chat` | Run one chat turn, returns the full transcript |
//! | `POST` | `/ingest/text` | Submit raw text for ingestion |
//! | `POST` | `/ingest/url` | Submit a remote document by URL |
//! | `POST` | `/ingest/file` | Upload a local file by path |
//! | `GET`  | `/jobs/{id}` | Look up ingestion job status |
//! | `GET`  | `/settings` | Current settings (credentials redacted) |
//! | `PUT`  | `/config` | Save API credentials |
//! | `PUT`  | `/settings` | Save model and retrieval settings |
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support
//! browser-based clients.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::chat;
use crate::client::{ClientFactory, HttpClientFactory};
use crate::config::Config;
use crate::ingest;
use crate::models::ChatMessage;
use crate::session::Session;

/// Shared application state passed to all route handlers.
///
/// The session sits behind an async `RwLock`: the original design assumed
/// a single user mutating settings with no synchronization, but handlers
/// run concurrently here, so reads snapshot and writes are exclusive.
#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<Session>>,
    factory: Arc<dyn ClientFactory>,
    available_models: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(session: Session, factory: Arc<dyn ClientFactory>, available_models: Vec<String>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            factory,
            available_models: Arc::new(available_models),
        }
    }
}

/// Build the API router. Public so tests can drive the API in-process.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/chat", post(handle_chat))
        .route("/ingest/text", post(handle_ingest_text))
        .route("/ingest/url", post(handle_ingest_url))
        .route("/ingest/file", post(handle_ingest_file))
        .route("/jobs/{id}", get(handle_job_status))
        .route("/settings", get(handle_get_settings).put(handle_put_settings))
        .route("/config", put(handle_put_config))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server with the production collaborators.
///
/// Binds to `[server].bind` and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let session = Session::from_config(config);
    let factory = Arc::new(HttpClientFactory::new(config.clone()));
    let state = AppState::new(session, factory, config.model.available.clone());

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("listening on http://{}", config.server.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /chat ============

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

/// The transcript is returned in full; `input` is the cleared input-field
/// value the client writes back.
#[derive(Serialize)]
struct ChatResponse {
    history: Vec<ChatMessage>,
    input: String,
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let session = state.session.read().await.clone();
    let rag = state.factory.rag(&session);
    let (history, input) = chat::chat(&session, rag.as_ref(), req.history, &req.message).await;
    Json(ChatResponse { history, input })
}

// ============ Ingestion ============

/// Status-string response shared by all ingestion and settings actions.
#[derive(Serialize)]
struct StatusResponse {
    status: String,
}

#[derive(Deserialize)]
struct IngestTextRequest {
    content: String,
    #[serde(default)]
    file_name: Option<String>,
}

async fn handle_ingest_text(
    State(state): State<AppState>,
    Json(req): Json<IngestTextRequest>,
) -> Json<StatusResponse> {
    let session = state.session.read().await.clone();
    let ingester = state.factory.ingester(&session);
    let status = ingest::ingest_text(
        &session,
        ingester.as_ref(),
        &req.content,
        req.file_name.as_deref(),
    )
    .await;
    Json(StatusResponse { status })
}

#[derive(Deserialize)]
struct IngestUrlRequest {
    name: String,
    url: String,
}

async fn handle_ingest_url(
    State(state): State<AppState>,
    Json(req): Json<IngestUrlRequest>,
) -> Json<StatusResponse> {
    let session = state.session.read().await.clone();
    let ingester = state.factory.ingester(&session);
    let status = ingest::ingest_url(&session, ingester.as_ref(), &req.name, &req.url).await;
    Json(StatusResponse { status })
}

#[derive(Deserialize)]
struct IngestFileRequest {
    path: String,
    #[serde(default)]
    name: Option<String>,
}

async fn handle_ingest_file(
    State(state): State<AppState>,
    Json(req): Json<IngestFileRequest>,
) -> Json<StatusResponse> {
    let session = state.session.read().await.clone();
    let ingester = state.factory.ingester(&session);
    let status =
        ingest::ingest_file(&session, ingester.as_ref(), &req.path, req.name.as_deref()).await;
    Json(StatusResponse { status })
}

// ============ GET /jobs/{id} ============

async fn handle_job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<StatusResponse> {
    let session = state.session.read().await.clone();
    let ingester = state.factory.ingester(&session);
    let status = ingest::check_status(&session, ingester.as_ref(), &id).await;
    Json(StatusResponse { status })
}

// ============ Settings ============

/// Read view of the session. API keys are reduced to presence flags so
/// secrets never round-trip through the browser.
#[derive(Serialize)]
struct SettingsView {
    configured: bool,
    openai_api_key_set: bool,
    agentset_api_key_set: bool,
    namespace_id: String,
    model: String,
    available_models: Vec<String>,
    top_k: u32,
    min_score: f64,
}

async fn handle_get_settings(State(state): State<AppState>) -> Json<SettingsView> {
    let session = state.session.read().await;
    Json(SettingsView {
        configured: session.is_configured(),
        openai_api_key_set: !session.openai_api_key.is_empty(),
        agentset_api_key_set: !session.agentset_api_key.is_empty(),
        namespace_id: session.namespace_id.clone(),
        model: session.model.clone(),
        available_models: state.available_models.as_ref().clone(),
        top_k: session.top_k,
        min_score: session.min_score,
    })
}

#[derive(Deserialize)]
struct ConfigRequest {
    openai_api_key: String,
    agentset_api_key: String,
    namespace_id: String,
}

async fn handle_put_config(
    State(state): State<AppState>,
    Json(req): Json<ConfigRequest>,
) -> Json<StatusResponse> {
    let mut session = state.session.write().await;
    let status = session.save_credentials(
        req.openai_api_key,
        req.agentset_api_key,
        req.namespace_id,
    );
    Json(StatusResponse { status })
}

/// `top_k` arrives as a float from slider-style inputs; coercion happens
/// in [`Session::save_settings`].
#[derive(Deserialize)]
struct SettingsRequest {
    model: String,
    top_k: f64,
    min_score: f64,
}

async fn handle_put_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsRequest>,
) -> Json<StatusResponse> {
    let mut session = state.session.write().await;
    let status = session.save_settings(req.model, req.top_k, req.min_score);
    Json(StatusResponse { status })
}
