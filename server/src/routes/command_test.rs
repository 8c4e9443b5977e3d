use std::sync::Arc;

use super::*;
use crate::llm::LlmChat;
use crate::llm::types::LlmError;
use crate::routes::app;
use crate::state::test_helpers::{MockLlm, test_app_state, test_app_state_with_llm, valid_reply};
use serde_json::{Value, json};

async fn spawn(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_with(llm: MockLlm) -> String {
    let llm: Arc<dyn LlmChat> = Arc::new(llm);
    spawn(test_app_state_with_llm(llm)).await
}

async fn post_json(base: &str, body: &Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/ai-command"))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

fn command(prompt: &str) -> Value {
    json!({ "prompt": prompt, "canvasState": { "shapes": [], "canvasSize": { "width": 5000, "height": 5000 } } })
}

// =============================================================================
// method handling
// =============================================================================

#[tokio::test]
async fn get_is_method_not_allowed() {
    let base = spawn(test_app_state()).await;
    let resp = reqwest::get(format!("{base}/api/ai-command")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Method not allowed" }));
}

#[tokio::test]
async fn options_is_ok() {
    let base = spawn(test_app_state()).await;
    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{base}/api/ai-command"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn cors_headers_are_open() {
    let base = spawn(test_app_state()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/ai-command"))
        .header("Origin", "https://board.example")
        .json(&command("draw"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = spawn(test_app_state()).await;
    let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

// =============================================================================
// configuration and validation
// =============================================================================

#[tokio::test]
async fn missing_llm_is_server_error_without_secrets() {
    let base = spawn(test_app_state()).await;
    let (status, body) = post_json(&base, &command("draw a circle")).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "E_LLM_NOT_CONFIGURED");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("configuration"));
    assert!(!error.contains("API_KEY"));
}

#[tokio::test]
async fn invalid_body_is_bad_request() {
    let base = spawn_with(MockLlm::new(Vec::new())).await;
    let (status, body) = post_json(&base, &json!({ "prompt": "", "canvasState": {} })).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "E_VALIDATION");
    assert!(body["error"].as_str().unwrap().starts_with("prompt:"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let base = spawn_with(MockLlm::new(Vec::new())).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/ai-command"))
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

// =============================================================================
// model outcomes
// =============================================================================

#[tokio::test]
async fn red_rectangle_succeeds() {
    let base = spawn_with(MockLlm::replying(valid_reply(
        "Creating a red rectangle",
        json!([{ "type": "createRectangle", "parameters": { "x": 100.2, "y": 100.7, "width": 150, "height": 80, "color": "red" } }]),
    )))
    .await;
    let (status, body) = post_json(&base, &command("create a red rectangle at 100,100")).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Creating a red rectangle",
            "actions": [{
                "type": "createRectangle",
                "parameters": { "x": 100, "y": 101, "width": 150, "height": 80, "color": "#ef4444" }
            }]
        })
    );
}

#[tokio::test]
async fn alias_route_serves_commands() {
    let base = spawn_with(MockLlm::replying(valid_reply(
        "ok",
        json!([{ "type": "zIndex", "parameters": { "operation": "bringToFront" } }]),
    )))
    .await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/ai/command"))
        .json(&command("bring it forward"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["actions"][0], json!({ "type": "zIndex", "parameters": { "operation": "bringToFront" } }));
}

#[tokio::test]
async fn oversized_bulk_create_is_soft_failure() {
    let base = spawn_with(MockLlm::replying(valid_reply(
        "Creating 1500 circles",
        json!([{ "type": "bulkCreate", "parameters": { "shapeType": "circle", "count": 1500 } }]),
    )))
    .await;
    let (status, body) = post_json(&base, &command("create 1500 circles")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Creating 1500 circles");
    assert!(body["error"].as_str().unwrap().contains("count must be between 1 and 1000"));
    assert!(body.get("actions").is_none());
}

#[tokio::test]
async fn invalid_command_is_soft_failure() {
    let base = spawn_with(MockLlm::replying(json!({
        "isValidCommand": false,
        "explanation": "I can only edit the canvas",
        "actions": []
    })))
    .await;
    let (status, body) = post_json(&base, &command("tell me a joke")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "I can only edit the canvas");
}

#[tokio::test]
async fn garbage_model_output_is_soft_failure() {
    let base = spawn_with(MockLlm::replying(json!("not an object"))).await;
    let (status, body) = post_json(&base, &command("draw")).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "E_INVALID_MODEL_OUTPUT");
}

// =============================================================================
// provider failures
// =============================================================================

#[tokio::test]
async fn rate_limit_maps_to_429() {
    let base = spawn_with(MockLlm::failing(LlmError::ApiResponse { status: 429, body: "slow".into() })).await;
    let (status, body) = post_json(&base, &command("draw")).await;
    assert_eq!(status, 429);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "E_RATE_LIMITED");
}

#[tokio::test]
async fn provider_error_maps_to_500() {
    let base = spawn_with(MockLlm::failing(LlmError::ApiRequest("connection reset".into()))).await;
    let (status, body) = post_json(&base, &command("draw")).await;
    assert_eq!(status, 500);
    assert!(body["error"].as_str().unwrap().starts_with("AI service error:"));
}
