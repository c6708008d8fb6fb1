//! HTTP facade over the turn state machine.
//!
//! Thin by design: every route locks the shared engine, delegates, and
//! serializes the outcome. All game semantics live in the engine.

use crate::engine::{TurnError, TurnStateMachine};
use crate::judge::Judge;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Engine shared across request handlers.
///
/// The async mutex serializes submissions: the engine is single-writer and
/// the judge call suspends while the lock is held.
pub type SharedEngine<J> = Arc<Mutex<TurnStateMachine<J>>>;

/// Body of a submission request.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// The player's raw phrase.
    #[serde(default)]
    pub input_text: String,
}

/// Builds the API router over a shared engine.
pub fn router<J: Judge + 'static>(engine: SharedEngine<J>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/state", get(state::<J>))
        .route("/api/start", post(start::<J>))
        .route("/api/submit", post(submit::<J>))
        .route("/api/timeout", post(timeout::<J>))
        .route("/api/pause", post(pause::<J>))
        .route("/api/resume", post(resume::<J>))
        .with_state(engine)
}

/// Binds and serves the API until the process is stopped.
#[instrument(skip(engine))]
pub async fn serve<J: Judge + 'static>(
    engine: SharedEngine<J>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app = router(engine);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "Server ready");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn state<J: Judge>(State(engine): State<SharedEngine<J>>) -> Json<Value> {
    let engine = engine.lock().await;
    Json(json!({ "ok": true, "state": engine.snapshot() }))
}

async fn start<J: Judge>(State(engine): State<SharedEngine<J>>) -> Json<Value> {
    let mut engine = engine.lock().await;
    let state = engine.reset();
    Json(json!({ "ok": true, "state": state }))
}

async fn submit<J: Judge>(
    State(engine): State<SharedEngine<J>>,
    Json(request): Json<SubmitRequest>,
) -> (StatusCode, Json<Value>) {
    let mut engine = engine.lock().await;
    match engine.submit(&request.input_text).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "result": outcome })),
        ),
        Err(error @ (TurnError::TurnInFlight | TurnError::SessionPaused)) => (
            StatusCode::CONFLICT,
            Json(json!({ "ok": false, "error": error.to_string() })),
        ),
        Err(error @ TurnError::JudgeUnavailable { .. }) => {
            error!(error = %error, "Judge transport failure");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "ok": false, "error": error.to_string() })),
            )
        }
    }
}

async fn timeout<J: Judge>(State(engine): State<SharedEngine<J>>) -> Json<Value> {
    let mut engine = engine.lock().await;
    let state = engine.timer_expired();
    Json(json!({ "ok": true, "state": state }))
}

async fn pause<J: Judge>(State(engine): State<SharedEngine<J>>) -> Json<Value> {
    let mut engine = engine.lock().await;
    let state = engine.pause();
    Json(json!({ "ok": true, "state": state }))
}

async fn resume<J: Judge>(State(engine): State<SharedEngine<J>>) -> Json<Value> {
    let mut engine = engine.lock().await;
    let state = engine.resume();
    Json(json!({ "ok": true, "state": state }))
}
