//! Local stand-in for the inference endpoint.

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One canned reply from the stub endpoint
#[derive(Clone)]
pub enum StubReply {
    /// `{"output": <value>}`
    Output(Value),
    /// Raw body sent as-is with status 200
    Raw(String),
    Status(u16, String),
    /// Sleep before replying `{"output": ""}`
    Slow(Duration),
}

#[derive(Default)]
pub struct StubEndpoint {
    replies: Mutex<VecDeque<StubReply>>,
    prompts: Mutex<Vec<String>>,
}

impl StubEndpoint {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

async fn infer(State(stub): State<Arc<StubEndpoint>>, body: String) -> Response {
    let prompt = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("prompt").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default();
    stub.prompts.lock().unwrap().push(prompt);

    let reply = stub.replies.lock().unwrap().pop_front();
    match reply {
        Some(StubReply::Output(value)) => {
            axum::Json(serde_json::json!({ "ok": true, "output": value })).into_response()
        }
        Some(StubReply::Raw(text)) => text.into_response(),
        Some(StubReply::Status(code, text)) => {
            (StatusCode::from_u16(code).unwrap(), text).into_response()
        }
        Some(StubReply::Slow(wait)) => {
            tokio::time::sleep(wait).await;
            axum::Json(serde_json::json!({ "output": "" })).into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no reply scripted").into_response(),
    }
}

/// Serve the scripted replies on 127.0.0.1; returns the endpoint URL and the stub.
pub async fn spawn_stub(replies: Vec<StubReply>) -> (String, Arc<StubEndpoint>) {
    let stub = Arc::new(StubEndpoint {
        replies: Mutex::new(replies.into()),
        prompts: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/infer", post(infer))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/infer", addr), stub)
}

/// URL on a port nothing is listening on
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/infer", addr)
}
