use agentcore_shim::message::{AgentReply, DispatchReply, ErrorBody};
use agentcore_shim::routes::create_router;
use agentcore_shim::services::normalizer::{AgentOutput, OutputPart};
use agentcore_shim::services::runtime_client::{AgentRuntime, RuntimeError, RuntimeInvocation};
use agentcore_shim::state::AppState;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

const ARN: &str = "arn:aws:bedrock-agentcore:us-east-1:123456789012:runtime/demo-agent";

/// Runtime fake that records every call and answers with a numbered reply.
#[derive(Default)]
struct RecordingRuntime {
    calls: Mutex<Vec<RuntimeInvocation>>,
    counter: AtomicUsize,
}

#[async_trait]
impl AgentRuntime for RecordingRuntime {
    async fn invoke(&self, invocation: RuntimeInvocation) -> Result<Option<AgentOutput>, RuntimeError> {
        self.calls.lock().unwrap().push(invocation);
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(AgentOutput::List(vec![OutputPart::Bytes(
            format!("answer #{n}").into_bytes(),
        )])))
    }
}

fn app_with(runtime: Arc<RecordingRuntime>, runtime_arn: Option<&str>) -> Router {
    let state = Arc::new(AppState::new(runtime, runtime_arn.map(str::to_string)));
    create_router().with_state(state)
}

fn app() -> Router {
    app_with(Arc::new(RecordingRuntime::default()), Some(ARN))
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_invocations_endpoint() {
    let response = app()
        .oneshot(post("/invocations", r#"{"prompt": "Hello!", "sessionId": "abc"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply: AgentReply = read_json(response).await;
    assert_eq!(reply.session_id, "abc");
    assert!(reply.result.starts_with("Hello! I'm your simple agent."));
    assert!(!reply.timestamp.is_empty());
}

#[tokio::test]
async fn test_session_alias_and_default() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post("/invocations", r#"{"prompt": "hi", "session_id": "snake"}"#))
        .await
        .unwrap();
    let reply: AgentReply = read_json(response).await;
    assert_eq!(reply.session_id, "snake");

    let response = app
        .oneshot(post("/invocations", r#"{"prompt": "hi"}"#))
        .await
        .unwrap();
    let reply: AgentReply = read_json(response).await;
    assert_eq!(reply.session_id, "default");
}

#[tokio::test]
async fn test_missing_prompt_is_bad_request() {
    for body in [r#"{"sessionId": "abc"}"#, r#"{"prompt": ""}"#, "{not json", ""] {
        let response = app().oneshot(post("/invocations", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: ErrorBody = read_json(response).await;
        assert_eq!(err.error, "Bad Request");
    }
}

#[tokio::test]
async fn test_non_string_session_is_bad_request() {
    let runtime = Arc::new(RecordingRuntime::default());
    let app = app_with(runtime.clone(), Some(ARN));
    for uri in ["/invocations", "/runtime/invocations"] {
        let response = app
            .clone()
            .oneshot(post(uri, r#"{"prompt": "hi", "sessionId": 42}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        let err: ErrorBody = read_json(response).await;
        assert_eq!(err.message, "sessionId must be a string");
    }
    assert!(runtime.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_flow_integration() {
    let app = app();
    for prompt in ["Hello!", "What's your name?", "5 plus 3"] {
        let body = format!(r#"{{"prompt": "{prompt}", "sessionId": "hist"}}"#);
        let response = app.clone().oneshot(post("/invocations", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Another session must not leak into this one.
    app.clone()
        .oneshot(post("/invocations", r#"{"prompt": "bye", "sessionId": "other"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(post("/invocations", r#"{"prompt": "show me history", "sessionId": "hist"}"#))
        .await
        .unwrap();
    let reply: AgentReply = read_json(response).await;

    let lines: Vec<&str> = reply.result.lines().skip(1).collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines.iter().filter(|l| l.starts_with("You: ")).count(), 3);
    assert_eq!(lines.iter().filter(|l| l.starts_with("Me: ")).count(), 3);
    assert_eq!(lines[0], "You: Hello!");
    assert_eq!(lines[4], "You: 5 plus 3");
    assert_eq!(lines[5], "Me: The answer is: 8");
}

#[tokio::test]
async fn test_ping() {
    let response = app()
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["status"], "Healthy");
}

#[tokio::test]
async fn test_runtime_dispatch_echoes_session() {
    let runtime = Arc::new(RecordingRuntime::default());
    let app = app_with(runtime.clone(), Some(ARN));

    let response = app
        .oneshot(post("/runtime/invocations", r#"{"prompt": "What is S3?", "sessionId": "sess-123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    let reply: DispatchReply = read_json(response).await;
    assert_eq!(reply.session_id, "sess-123");
    assert_eq!(reply.response, "answer #1");

    let calls = runtime.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].runtime_arn, ARN);
    assert_eq!(calls[0].payload, r#"{"prompt":"What is S3?"}"#);
}

#[tokio::test]
async fn test_runtime_dispatch_generates_session_when_missing() {
    let response = app()
        .oneshot(post("/runtime/invocations", r#"{"prompt": "hi"}"#))
        .await
        .unwrap();
    let reply: DispatchReply = read_json(response).await;
    assert_eq!(reply.session_id.len(), 36);
}

#[tokio::test]
async fn test_runtime_dispatch_without_arn_is_configuration_error() {
    let runtime = Arc::new(RecordingRuntime::default());
    let app = app_with(runtime.clone(), None);

    for body in [r#"{"prompt": "hi"}"#, r#"{}"#, "garbage"] {
        let response = app.clone().oneshot(post("/runtime/invocations", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err: ErrorBody = read_json(response).await;
        assert_eq!(err.error, "Configuration Error");
    }
    assert!(runtime.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_runtime_dispatch_bad_request() {
    for body in [r#"{"sessionId": "x"}"#, "garbage"] {
        let response = app().oneshot(post("/runtime/invocations", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ErrorBody = read_json(response).await;
        assert_eq!(err.error, "Bad Request");
    }
}

#[tokio::test]
async fn test_identical_requests_are_not_cached() {
    let runtime = Arc::new(RecordingRuntime::default());
    let app = app_with(runtime.clone(), Some(ARN));
    let body = r#"{"prompt": "same", "sessionId": "s"}"#;

    let first: DispatchReply =
        read_json(app.clone().oneshot(post("/runtime/invocations", body)).await.unwrap()).await;
    let second: DispatchReply =
        read_json(app.oneshot(post("/runtime/invocations", body)).await.unwrap()).await;

    assert_eq!(runtime.calls.lock().unwrap().len(), 2);
    assert_eq!(first.response, "answer #1");
    assert_eq!(second.response, "answer #2");
}
