use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::{Local, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{AgentReply, InvocationResponse},
    services::{
        chatbot::generate_reply,
        dispatch::handle_event,
        payload::parse_body,
        session_log::HISTORY_EXCHANGES,
    },
    state::SharedState,
};

/// Session used by the local agent when the caller sends none.
pub const DEFAULT_SESSION: &str = "default";

// Local toy agent.
pub async fn invocations_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<AgentReply>, AppError> {
    let request = parse_body(&body, DEFAULT_SESSION)?;
    tracing::info!(session_id = %request.session_id, prompt = %request.prompt, "received");

    let history = state.sessions.recent(&request.session_id, HISTORY_EXCHANGES).await;
    let reply = generate_reply(&history, &request.prompt, Local::now().naive_local());

    state
        .sessions
        .record_exchange(&request.session_id, &request.prompt, &reply)
        .await;

    Ok(Json(AgentReply {
        result: reply,
        session_id: request.session_id,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

// Same contract as the Lambda entrypoint, reachable over HTTP.
pub async fn runtime_invocations_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> InvocationResponse {
    let request_id = Uuid::new_v4().to_string();
    // Undecodable bodies go through as text so the parser reports them.
    let event = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

    handle_event(
        state.runtime.as_ref(),
        state.runtime_arn.as_deref(),
        event,
        &request_id,
    )
    .await
}

pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "status": "Healthy" }))
}

impl IntoResponse for InvocationResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }
        response
    }
}
