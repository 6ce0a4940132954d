//! Integration tests for the stdio and HTTP transports.

#![cfg(unix)]

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode};
use deckhand_server::{AppState, create_router, serve_io};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

#[tokio::test]
async fn test_stdio_answers_every_request() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let dispatcher = common::dispatcher(temp.path());

    let input = [
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({
            "jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": { "name": "generate_images", "arguments": { "text": "# A\n---\n# B" } }
        }),
        json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": { "name": "generate_pdf", "arguments": { "text": "# C" } }
        }),
        json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/list" }),
    ]
    .iter()
    .map(|m| m.to_string())
    .collect::<Vec<_>>()
    .join("\n")
        + "\n\n";

    let mut output = Vec::new();
    serve_io(dispatcher, input.as_bytes(), &mut output)
        .await
        .expect("Failed to serve");

    let responses: HashMap<i64, Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .map(|v| (v["id"].as_i64().unwrap(), v))
        .collect();

    // The notification gets no answer; everything else does.
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[&1]["result"]["serverInfo"]["name"], "deckhand");
    assert_eq!(responses[&2]["result"]["content"].as_array().unwrap().len(), 4);
    assert_eq!(responses[&3]["result"]["content"][0]["type"], "resource");
    assert_eq!(responses[&4]["result"]["tools"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stdio_reports_parse_errors_and_continues() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let dispatcher = common::dispatcher(temp.path());

    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n";
    let mut output = Vec::new();
    serve_io(dispatcher, input.as_bytes(), &mut output)
        .await
        .expect("Failed to serve");

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().any(|l| l["error"]["code"] == -32700 && l["id"].is_null()));
    assert!(lines.iter().any(|l| l["id"] == 9 && l["result"] == json!({})));
}

fn router(dir: &std::path::Path) -> axum::Router {
    create_router(Arc::new(AppState {
        dispatcher: common::dispatcher(dir),
    }))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_http_health() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let response = router(temp.path())
        .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_http_tool_call() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let request = json!({
        "jsonrpc": "2.0", "id": 1, "method": "tools/call",
        "params": { "name": "generate_pptx", "arguments": { "text": "# Deck", "theme": "bricks" } }
    });

    let response = router(temp.path())
        .oneshot(
            HttpRequest::post("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let resource = &json["result"]["content"][0]["resource"];
    assert!(resource["uri"].as_str().unwrap().ends_with("/slides-export.pptx"));
}

#[tokio::test]
async fn test_http_notification_is_accepted() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    let response = router(temp.path())
        .oneshot(
            HttpRequest::post("/mcp")
                .body(Body::from(
                    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}
