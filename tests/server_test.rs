//! Tests for the HTTP facade, driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bribe_the_scale::config::GameConfig;
use bribe_the_scale::engine::TurnStateMachine;
use bribe_the_scale::judge::{JudgeError, ScriptedJudge, passing_payload};
use bribe_the_scale::server::{SharedEngine, router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

fn app() -> (Router, Arc<ScriptedJudge>) {
    let judge = Arc::new(ScriptedJudge::new());
    let config = GameConfig::default().without_pacing_floor();
    let engine: SharedEngine<Arc<ScriptedJudge>> =
        Arc::new(Mutex::new(TurnStateMachine::new(config, Arc::clone(&judge))));
    (router(engine), judge)
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).expect("bad request"))
        .await
        .expect("request failed");
    read(response).await
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("bad request");
    let response = app.clone().oneshot(request).await.expect("request failed");
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read failed")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("body was not JSON");
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _judge) = app();
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn test_state_reports_fresh_session() {
    let (app, _judge) = app();
    let (status, body) = get(&app, "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["turn_number"], json!(1));
    assert_eq!(body["state"]["lives"], json!(3));
    assert_eq!(body["state"]["game_over"], json!(false));
}

#[tokio::test]
async fn test_submit_resolves_a_turn() {
    let (app, judge) = app();
    judge.push_payload(passing_payload("brick", 2000));

    let (status, body) = post(&app, "/api/submit", json!({ "input_text": "a brick" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["result"]["type"], json!("turn_result"));
    assert_eq!(body["result"]["pass"], json!(true));
    assert_eq!(body["result"]["state"]["score"], json!(1));
}

#[tokio::test]
async fn test_submit_missing_body_field_treated_as_empty() {
    let (app, _judge) = app();
    let (status, body) = post(&app, "/api/submit", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["type"], json!("empty_input"));
}

#[tokio::test]
async fn test_judge_outage_maps_to_bad_gateway() {
    let (app, judge) = app();
    judge.push_error(JudgeError::transport("connection refused"));

    let (status, body) = post(&app, "/api/submit", json!({ "input_text": "a brick" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["ok"], json!(false));

    // The turn was not consumed.
    let (_, state) = get(&app, "/api/state").await;
    assert_eq!(state["state"]["turn_number"], json!(1));
    assert_eq!(state["state"]["lives"], json!(3));
}

#[tokio::test]
async fn test_timeout_endpoint_ends_the_run() {
    let (app, _judge) = app();
    let (status, body) = post(&app, "/api/timeout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["game_over"], json!(true));
    assert_eq!(body["state"]["game_over_reason"], json!("timer"));
}

#[tokio::test]
async fn test_start_resets_a_finished_run() {
    let (app, judge) = app();
    post(&app, "/api/timeout", json!({})).await;

    let (status, body) = post(&app, "/api/start", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"]["game_over"], json!(false));
    assert_eq!(body["state"]["turn_number"], json!(1));

    judge.push_payload(passing_payload("brick", 2000));
    let (status, body) = post(&app, "/api/submit", json!({ "input_text": "a brick" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["pass"], json!(true));
}

#[tokio::test]
async fn test_pause_blocks_submissions_until_resume() {
    let (app, judge) = app();
    post(&app, "/api/pause", json!({})).await;

    let (status, body) = post(&app, "/api/submit", json!({ "input_text": "a brick" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("the session is paused"));

    post(&app, "/api/resume", json!({})).await;
    judge.push_payload(passing_payload("brick", 2000));
    let (status, _) = post(&app, "/api/submit", json!({ "input_text": "a brick" })).await;
    assert_eq!(status, StatusCode::OK);
}
